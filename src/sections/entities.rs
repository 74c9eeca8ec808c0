//! Operations shared by users and items.
//!
//! The two resources differ only in their URLs and in the name of the id parameter, so a single
//! [`EntitySection`] is parameterised by an [`EntityKind`] record.
use serde::Serialize;
use serde_json::Value;

use crate::{
    batch::{EntitiesBatch, EntityRecord},
    error::ensure_non_empty,
    Api, Attributes, Error, Restriction, Result,
};

use super::{body_restriction, ListOptions};

const WITH_INTERACTIONS_PARAMETER: &str = "withInteractions";
const INTERACTIONS_LIMIT_PARAMETER: &str = "interactionsLimit";
const INTERACTIONS_OFFSET_PARAMETER: &str = "interactionsOffset";
const PERMANENTLY_PARAMETER: &str = "permanently";

/// URL templates and id parameter of one entity resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityKind {
    /// Human readable name used in error messages.
    pub name: &'static str,
    /// Path parameter naming a single entity, `userId` or `itemId`.
    pub id_parameter: &'static str,
    /// Bulk insert/update.
    pub insert_or_update_url: &'static str,
    /// Paged listing.
    pub get_entities_url: &'static str,
    /// Single entity, optionally with its interactions.
    pub get_entity_url: &'static str,
    /// Entities selected by id.
    pub get_selected_entities_url: &'static str,
    /// Single entity deletion.
    pub delete_entity_url: &'static str,
    /// Deletion of every entity of the resource.
    pub delete_entities_url: &'static str,
    /// `None` when the resource can't be activated.
    pub activate_entities_url: Option<&'static str>,
}

/// Users of the account.
pub const USERS: EntityKind = EntityKind {
    name: "user",
    id_parameter: "userId",
    insert_or_update_url: "/{accountId}/user/",
    get_entities_url:
        "/{accountId}/users/{?limit,offset,attributes,orderBy,order,searchQuery,searchAttributes}",
    get_entity_url:
        "/{accountId}/users/{userId}{?withInteractions,interactionsLimit,interactionsOffset}",
    get_selected_entities_url:
        "/{accountId}/users/{?withInteractions,interactionsLimit,interactionsOffset}",
    delete_entity_url: "/{accountId}/users/{userId}{?permanently}",
    delete_entities_url: "/{accountId}/users",
    activate_entities_url: Some("/{accountId}/users/activate"),
};

/// Items of the account.
pub const ITEMS: EntityKind = EntityKind {
    name: "item",
    id_parameter: "itemId",
    insert_or_update_url: "/{accountId}/item/",
    get_entities_url:
        "/{accountId}/items/{?limit,offset,attributes,orderBy,order,searchQuery,searchAttributes}",
    get_entity_url:
        "/{accountId}/items/{itemId}{?withInteractions,interactionsLimit,interactionsOffset}",
    get_selected_entities_url:
        "/{accountId}/items/{?withInteractions,interactionsLimit,interactionsOffset}",
    delete_entity_url: "/{accountId}/items/{itemId}{?permanently}",
    delete_entities_url: "/{accountId}/items",
    activate_entities_url: None,
};

/// Whether and which interactions to return along with an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionsPaging {
    /// Sent as the `withInteractions` flag.
    pub with_interactions: bool,
    /// Maximum number of interactions.
    pub limit: u32,
    /// Interactions to skip.
    pub offset: u32,
}

impl Default for InteractionsPaging {
    fn default() -> Self {
        Self {
            with_interactions: false,
            limit: 100,
            offset: 0,
        }
    }
}

impl InteractionsPaging {
    /// Include the first `limit` interactions after `offset`.
    pub fn with_interactions(limit: u32, offset: u32) -> Self {
        Self {
            with_interactions: true,
            limit,
            offset,
        }
    }

    fn apply(&self, restriction: Restriction) -> Restriction {
        restriction
            .with_flag(WITH_INTERACTIONS_PARAMETER, self.with_interactions)
            .with_parameter(INTERACTIONS_LIMIT_PARAMETER, self.limit)
            .with_parameter(INTERACTIONS_OFFSET_PARAMETER, self.offset)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntitiesContent<'a> {
    entities: &'a [EntityRecord],
    disable_checks: bool,
}

#[derive(Debug, Serialize)]
struct IdsContent<'a> {
    ids: &'a [String],
}

/// Users or items, depending on the [`EntityKind`].
pub struct EntitySection<'c> {
    api: &'c Api<'c>,
    kind: EntityKind,
}

impl<'c> EntitySection<'c> {
    /// Section operating on `kind` through `api`.
    pub fn new(api: &'c Api<'c>, kind: EntityKind) -> Self {
        Self { api, kind }
    }

    /// URLs and naming of the resource.
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub(crate) fn api(&self) -> &'c Api<'c> {
        self.api
    }

    /// Insert an entity, or update the attributes of an existing one.
    pub fn insert_or_update_entity(
        &self,
        entity_id: &str,
        attributes: Attributes,
    ) -> Result<Option<Value>> {
        let mut batch = EntitiesBatch::new();
        batch.add_entity(entity_id, attributes)?;
        self.insert_or_update_entities(&batch)
    }

    /// Insert or update every entity of `batch` in a single call.
    pub fn insert_or_update_entities(&self, batch: &EntitiesBatch) -> Result<Option<Value>> {
        let restriction = body_restriction(&EntitiesContent {
            entities: batch.entities(),
            disable_checks: false,
        })?;
        self.api
            .perform_post(self.kind.insert_or_update_url, Some(restriction))
    }

    /// List entities. Without explicit paging the first 100 are returned.
    pub fn get_entities(&self, options: &ListOptions) -> Result<Option<Value>> {
        let restriction = options.with_default_paging(100, 0).to_restriction()?;
        self.api
            .perform_get(self.kind.get_entities_url, Some(restriction))
    }

    /// Fetch one entity.
    pub fn get_entity(&self, entity_id: &str, paging: InteractionsPaging) -> Result<Option<Value>> {
        self.ensure_id(entity_id)?;
        let restriction =
            paging.apply(Restriction::new().with_parameter(self.kind.id_parameter, entity_id));
        self.api
            .perform_get(self.kind.get_entity_url, Some(restriction))
    }

    /// Fetch the entities with the given ids in a single call.
    pub fn get_selected_entities(
        &self,
        ids: &[String],
        paging: InteractionsPaging,
    ) -> Result<Option<Value>> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("ids can't be empty"));
        }
        let restriction = paging.apply(body_restriction(&IdsContent { ids })?);
        self.api
            .perform_post(self.kind.get_selected_entities_url, Some(restriction))
    }

    /// Delete one entity. A non-permanent delete keeps the entity's interactions.
    pub fn delete_entity(&self, entity_id: &str, permanently: bool) -> Result<Option<Value>> {
        self.ensure_id(entity_id)?;
        let restriction = Restriction::new()
            .with_parameter(self.kind.id_parameter, entity_id)
            .with_flag(PERMANENTLY_PARAMETER, permanently);
        self.api
            .perform_delete(self.kind.delete_entity_url, Some(restriction))
    }

    /// Delete every entity of the resource.
    pub fn delete_entities(&self) -> Result<Option<Value>> {
        self.api.perform_delete(self.kind.delete_entities_url, None)
    }

    /// Activate previously deleted entities.
    pub fn activate_entities(&self, ids: &[String]) -> Result<Option<Value>> {
        let url = self.kind.activate_entities_url.ok_or_else(|| {
            Error::invalid_argument(format!("{}s can't be activated", self.kind.name))
        })?;
        if ids.is_empty() {
            return Err(Error::invalid_argument("ids can't be empty"));
        }
        let restriction = body_restriction(&IdsContent { ids })?;
        self.api.perform_post(url, Some(restriction))
    }

    fn ensure_id(&self, entity_id: &str) -> Result<()> {
        ensure_non_empty(entity_id, &format!("{} id", self.kind.name))
    }
}

#[cfg(test)]
mod tests {
    use crate::{path_builder, Restriction};

    use super::{InteractionsPaging, ITEMS, USERS};

    #[test]
    fn interactions_paging_defaults() {
        let restriction = InteractionsPaging::default()
            .apply(Restriction::new().with_parameter("userId", "john"));

        assert_eq!(
            path_builder::build(USERS.get_entity_url, &restriction.with_parameter("accountId", "a"))
                .unwrap(),
            "/a/users/john?withInteractions=&interactionsLimit=100&interactionsOffset=0"
        );
    }

    #[test]
    fn kinds_use_their_own_id_parameter() {
        let restriction = Restriction::new()
            .with_parameter("accountId", "a")
            .with_parameter("itemId", "i1")
            .with_flag("permanently", true);

        assert_eq!(
            path_builder::build(ITEMS.delete_entity_url, &restriction).unwrap(),
            "/a/items/i1?permanently=1"
        );
        assert!(path_builder::build(USERS.delete_entity_url, &restriction).is_err());
    }

    #[test]
    fn requested_interactions_are_flagged() {
        let restriction = InteractionsPaging::with_interactions(5, 10).apply(
            Restriction::new()
                .with_parameter("accountId", "a")
                .with_parameter("itemId", "i1"),
        );

        assert_eq!(
            path_builder::build(ITEMS.get_entity_url, &restriction).unwrap(),
            "/a/items/i1?withInteractions=1&interactionsLimit=5&interactionsOffset=10"
        );
    }

    #[test]
    fn delete_all_urls_have_no_trailing_slash() {
        let restriction = Restriction::new().with_parameter("accountId", "a");

        assert_eq!(
            path_builder::build(USERS.delete_entities_url, &restriction).unwrap(),
            "/a/users"
        );
        assert_eq!(
            path_builder::build(ITEMS.delete_entities_url, &restriction).unwrap(),
            "/a/items"
        );
    }

    #[test]
    fn only_users_can_be_activated() {
        assert!(USERS.activate_entities_url.is_some());
        assert!(ITEMS.activate_entities_url.is_none());
    }
}
