use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    batch::{InteractionRecord, InteractionsBatch},
    error::ensure_non_empty,
    Api, Attributes, Restriction, Result,
};

use super::{body_restriction, ListOptions};

const INSERT_INTERACTION_URL: &str = "/{accountId}/interaction";
const DELETE_INTERACTION_URL: &str = "/{accountId}/interaction{?userId,itemId,timestamp}";
const DELETE_INTERACTIONS_URL: &str = "/{accountId}/interactions";
const GET_INTERACTION_DEFINITIONS_URL: &str =
    "/{accountId}/interactions/definitions{?limit,offset,attributes,searchQuery,searchAttributes}";

const USER_ID_PARAMETER: &str = "userId";
const ITEM_ID_PARAMETER: &str = "itemId";
const TIMESTAMP_PARAMETER: &str = "timestamp";

#[derive(Debug, Serialize)]
struct InteractionsContent<'a> {
    interactions: &'a [InteractionRecord],
}

/// Interactions between users and items.
pub struct InteractionsSection<'c> {
    api: &'c Api<'c>,
}

impl<'c> InteractionsSection<'c> {
    pub(crate) fn new(api: &'c Api<'c>) -> Self {
        Self { api }
    }

    /// Record one interaction.
    pub fn insert_interaction(
        &self,
        user_id: &str,
        item_id: &str,
        interaction_id: &str,
        time: Option<DateTime<Utc>>,
        attributes: Option<Attributes>,
    ) -> Result<Option<Value>> {
        let mut batch = InteractionsBatch::new();
        batch.add_interaction(user_id, item_id, interaction_id, time, attributes)?;
        self.insert_interactions(&batch)
    }

    /// Record every interaction of `batch` in a single call.
    pub fn insert_interactions(&self, batch: &InteractionsBatch) -> Result<Option<Value>> {
        let restriction = body_restriction(&InteractionsContent {
            interactions: batch.interactions(),
        })?;
        self.api
            .perform_post(INSERT_INTERACTION_URL, Some(restriction))
    }

    /// Delete the interaction of `user_id` with `item_id` that happened at `time`.
    pub fn delete_interaction(
        &self,
        user_id: &str,
        item_id: &str,
        time: DateTime<Utc>,
    ) -> Result<Option<Value>> {
        ensure_non_empty(user_id, "user id")?;
        ensure_non_empty(item_id, "item id")?;
        let restriction = Restriction::new()
            .with_parameter(USER_ID_PARAMETER, user_id)
            .with_parameter(ITEM_ID_PARAMETER, item_id)
            .with_parameter(TIMESTAMP_PARAMETER, time.timestamp());
        self.api
            .perform_delete(DELETE_INTERACTION_URL, Some(restriction))
    }

    /// Delete every interaction of the user.
    pub fn delete_user_interactions(&self, user_id: &str) -> Result<Option<Value>> {
        ensure_non_empty(user_id, "user id")?;
        let restriction = Restriction::new().with_parameter(USER_ID_PARAMETER, user_id);
        self.api
            .perform_delete(DELETE_INTERACTION_URL, Some(restriction))
    }

    /// Delete every interaction with the item.
    pub fn delete_item_interactions(&self, item_id: &str) -> Result<Option<Value>> {
        ensure_non_empty(item_id, "item id")?;
        let restriction = Restriction::new().with_parameter(ITEM_ID_PARAMETER, item_id);
        self.api
            .perform_delete(DELETE_INTERACTION_URL, Some(restriction))
    }

    /// Delete all interactions of the account.
    pub fn delete_interactions(&self) -> Result<Option<Value>> {
        self.api.perform_delete(DELETE_INTERACTIONS_URL, None)
    }

    /// List interaction definitions, 100 at a time unless the options say otherwise.
    ///
    /// Ordering is not supported by this endpoint and is ignored.
    pub fn get_interaction_definitions(&self, options: &ListOptions) -> Result<Option<Value>> {
        let restriction = options.with_default_paging(100, 0).to_restriction()?;
        self.api
            .perform_get(GET_INTERACTION_DEFINITIONS_URL, Some(restriction))
    }
}
