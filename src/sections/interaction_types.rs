use serde::Serialize;
use serde_json::Value;

use crate::{
    batch::{InteractionTypeOptions, InteractionTypeRecord, InteractionTypesBatch},
    error::ensure_non_empty,
    Api, Restriction, Result,
};

use super::{body_restriction, ListOptions};

const INSERT_OR_UPDATE_INTERACTION_TYPE_URL: &str = "/{accountId}/interaction/type";
const INTERACTION_TYPE_URL: &str = "/{accountId}/interactions/type/{interactionTypeId}";
const GET_INTERACTION_TYPES_URL: &str =
    "/{accountId}/interactions/type{?limit,offset,attributes,searchQuery,searchAttributes}";

const INTERACTION_TYPE_ID_PARAMETER: &str = "interactionTypeId";

#[derive(Debug, Serialize)]
struct InteractionTypesContent<'a> {
    entities: &'a [InteractionTypeRecord],
}

/// Interaction type definitions.
pub struct InteractionTypesSection<'c> {
    api: &'c Api<'c>,
}

impl<'c> InteractionTypesSection<'c> {
    pub(crate) fn new(api: &'c Api<'c>) -> Self {
        Self { api }
    }

    /// Insert an interaction type, or update an existing one.
    pub fn insert_or_update_interaction_type(
        &self,
        interaction_type_id: &str,
        options: InteractionTypeOptions,
    ) -> Result<Option<Value>> {
        let mut batch = InteractionTypesBatch::new();
        batch.add_interaction_type(interaction_type_id, options)?;
        self.insert_or_update_interaction_types(&batch)
    }

    /// Insert or update every type of `batch` in a single call.
    pub fn insert_or_update_interaction_types(
        &self,
        batch: &InteractionTypesBatch,
    ) -> Result<Option<Value>> {
        let restriction = body_restriction(&InteractionTypesContent {
            entities: batch.interaction_types(),
        })?;
        self.api
            .perform_post(INSERT_OR_UPDATE_INTERACTION_TYPE_URL, Some(restriction))
    }

    /// Fetch one interaction type.
    pub fn get_interaction_type(&self, interaction_type_id: &str) -> Result<Option<Value>> {
        let restriction = id_restriction(interaction_type_id)?;
        self.api.perform_get(INTERACTION_TYPE_URL, Some(restriction))
    }

    /// List interaction types. Paging is left to the server unless set in `options`.
    pub fn get_interaction_types(&self, options: &ListOptions) -> Result<Option<Value>> {
        let restriction = options.to_restriction()?;
        self.api
            .perform_get(GET_INTERACTION_TYPES_URL, Some(restriction))
    }

    /// Delete one interaction type.
    pub fn delete_interaction_type(&self, interaction_type_id: &str) -> Result<Option<Value>> {
        let restriction = id_restriction(interaction_type_id)?;
        self.api
            .perform_delete(INTERACTION_TYPE_URL, Some(restriction))
    }
}

fn id_restriction(interaction_type_id: &str) -> Result<Restriction> {
    ensure_non_empty(interaction_type_id, "interaction type id")?;
    Ok(Restriction::new().with_parameter(INTERACTION_TYPE_ID_PARAMETER, interaction_type_id))
}
