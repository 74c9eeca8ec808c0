use std::ops::Deref;

use serde::Serialize;
use serde_json::Value;

use crate::{error::ensure_non_empty, Api, Error, Result};

use super::{body_restriction, EntitySection, USERS};

const COPY_USER_URL: &str = "/{accountId}/user/copy";
const MERGE_USERS_URL: &str = "/{accountId}/user/merge";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceAndTarget<'a> {
    source_user_ids: &'a [String],
    target_user_id: &'a str,
}

/// Users. Every [`EntitySection`] operation is available through `Deref`.
pub struct UsersSection<'c> {
    entities: EntitySection<'c>,
}

impl<'c> UsersSection<'c> {
    pub(crate) fn new(api: &'c Api<'c>) -> Self {
        Self {
            entities: EntitySection::new(api, USERS),
        }
    }

    /// Copy the interactions of the source users to the target user.
    pub fn copy_user(&self, source_user_ids: &[String], target_user_id: &str) -> Result<Option<Value>> {
        self.post_source_and_target(COPY_USER_URL, source_user_ids, target_user_id)
    }

    /// Move the interactions of the source users to the target user.
    pub fn merge_users(
        &self,
        source_user_ids: &[String],
        target_user_id: &str,
    ) -> Result<Option<Value>> {
        self.post_source_and_target(MERGE_USERS_URL, source_user_ids, target_user_id)
    }

    fn post_source_and_target(
        &self,
        url: &str,
        source_user_ids: &[String],
        target_user_id: &str,
    ) -> Result<Option<Value>> {
        if source_user_ids.is_empty() {
            return Err(Error::invalid_argument("source user ids can't be empty"));
        }
        ensure_non_empty(target_user_id, "target user id")?;
        let restriction = body_restriction(&SourceAndTarget {
            source_user_ids,
            target_user_id,
        })?;
        self.entities.api().perform_post(url, Some(restriction))
    }
}

impl<'c> Deref for UsersSection<'c> {
    type Target = EntitySection<'c>;

    fn deref(&self) -> &Self::Target {
        &self.entities
    }
}
