//! Caller-accumulated records submitted in a single call.
//!
//! Every `add_*` method validates its record immediately, so a batch that was built without
//! errors is always valid to send.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::ensure_non_empty,
    recommendation::{RecommendationContentBuilder, RecommendationOptions, RecommendationTarget},
    Attributes, Error, InteractionMetaType, Result,
};

/// One user or item with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    /// Id of the user or item.
    pub id: String,
    /// Attributes to set.
    pub attributes: Attributes,
}

/// Users or items to insert or update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitiesBatch {
    entities: Vec<EntityRecord>,
}

impl EntitiesBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. The id must not be empty.
    pub fn add_entity(
        &mut self,
        entity_id: impl Into<String>,
        attributes: Attributes,
    ) -> Result<&mut Self> {
        let id = entity_id.into();
        ensure_non_empty(&id, "entity id")?;
        self.entities.push(EntityRecord { id, attributes });
        Ok(self)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// `true` if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Interaction type and attributes of a single interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDetail {
    /// Id of the interaction type.
    pub interaction_id: String,
    /// Attributes of the interaction itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

/// An interaction of a user with an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    /// Id of the user who interacted.
    pub user_id: String,
    /// Id of the item interacted with.
    pub item_id: String,
    /// What kind of interaction it was.
    pub interaction: InteractionDetail,
    /// Seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Interactions of users with items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionsBatch {
    interactions: Vec<InteractionRecord>,
}

impl InteractionsBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interaction. The ids must not be empty; empty attributes are not sent.
    pub fn add_interaction(
        &mut self,
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        interaction_id: impl Into<String>,
        time: Option<DateTime<Utc>>,
        attributes: Option<Attributes>,
    ) -> Result<&mut Self> {
        let (user_id, item_id, interaction_id) =
            (user_id.into(), item_id.into(), interaction_id.into());
        ensure_non_empty(&user_id, "user id")?;
        ensure_non_empty(&item_id, "item id")?;
        ensure_non_empty(&interaction_id, "interaction id")?;

        self.interactions.push(InteractionRecord {
            user_id,
            item_id,
            interaction: InteractionDetail {
                interaction_id,
                attributes: attributes.filter(|attributes| !attributes.is_empty()),
            },
            timestamp: time.map(|time| time.timestamp()),
        });
        Ok(self)
    }

    /// Interactions in insertion order.
    pub fn interactions(&self) -> &[InteractionRecord] {
        &self.interactions
    }
}

/// Optional properties of an interaction type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTypeOptions {
    /// Whether the interaction is a goal.
    pub meta_type: Option<InteractionMetaType>,
    /// Attributes of the interaction type.
    pub attributes: Attributes,
    /// Must lie in `[-1, 1]`.
    pub weight: Option<f64>,
    /// Must lie in `[-1, 1]`.
    pub learn_weight: Option<f64>,
    /// When the type was defined.
    pub time: Option<DateTime<Utc>>,
}

/// Interaction type as sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionTypeRecord {
    /// Id of the interaction type.
    pub id: String,
    /// Attributes of the interaction type.
    pub attributes: Attributes,
    /// Whether the interaction is a goal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_meta_type: Option<InteractionMetaType>,
    /// Weight in `[-1, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_weight: Option<f64>,
    /// Learning weight in `[-1, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_learn_weight: Option<f64>,
    /// Seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Interaction types to insert or update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTypesBatch {
    interaction_types: Vec<InteractionTypeRecord>,
}

impl InteractionTypesBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interaction type. Weights outside `[-1, 1]` are rejected.
    pub fn add_interaction_type(
        &mut self,
        interaction_type_id: impl Into<String>,
        options: InteractionTypeOptions,
    ) -> Result<&mut Self> {
        let id = interaction_type_id.into();
        ensure_non_empty(&id, "interaction type id")?;
        let interaction_weight = unit_weight(options.weight, "interaction weight")?;
        let interaction_learn_weight =
            unit_weight(options.learn_weight, "interaction learn weight")?;

        self.interaction_types.push(InteractionTypeRecord {
            id,
            attributes: options.attributes,
            interaction_meta_type: options.meta_type,
            interaction_weight,
            interaction_learn_weight,
            timestamp: options.time.map(|time| time.timestamp()),
        });
        Ok(self)
    }

    /// Interaction types in insertion order.
    pub fn interaction_types(&self) -> &[InteractionTypeRecord] {
        &self.interaction_types
    }
}

fn unit_weight(weight: Option<f64>, name: &str) -> Result<Option<f64>> {
    match weight {
        Some(weight) if !(-1.0..=1.0).contains(&weight) => Err(Error::invalid_argument(format!(
            "{name} must be a number in interval <-1,1>"
        ))),
        weight => Ok(weight),
    }
}

/// One entity a recommendation is computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntity {
    /// Id of the user or item.
    pub entity_id: String,
    /// Weight of a weighted entity, renamed to `userWeight` or `itemWeight` on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_weight: Option<f64>,
    /// Interaction name mapped to its weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactions: Option<HashMap<String, f64>>,
}

/// Several users or items to recommend for, optionally with one primary entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationEntitiesBatch {
    entities: Vec<RecommendationEntity>,
    primary_entity_id: Option<String>,
}

impl RecommendationEntitiesBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, optionally annotated with interactions the server should take into
    /// account. `interactions` maps an interaction name to its weight.
    pub fn add_entity(
        &mut self,
        entity_id: impl Into<String>,
        interactions: Option<HashMap<String, f64>>,
    ) -> Result<&mut Self> {
        let entity_id = entity_id.into();
        ensure_non_empty(&entity_id, "entity id")?;
        if let Some(interactions) = &interactions {
            for (name, weight) in interactions {
                ensure_non_empty(name, "interaction name")?;
                if !weight.is_finite() {
                    return Err(Error::invalid_argument(format!(
                        "weight of interaction {name} must be a finite number"
                    )));
                }
            }
        }
        self.entities.push(RecommendationEntity {
            entity_id,
            entity_weight: None,
            interactions,
        });
        Ok(self)
    }

    /// Add an entity with a finite weight.
    pub fn add_weighted_entity(
        &mut self,
        entity_id: impl Into<String>,
        weight: f64,
    ) -> Result<&mut Self> {
        let entity_id = entity_id.into();
        ensure_non_empty(&entity_id, "entity id")?;
        if !weight.is_finite() {
            return Err(Error::invalid_argument("entity weight must be a finite number"));
        }
        self.entities.push(RecommendationEntity {
            entity_id,
            entity_weight: Some(weight),
            interactions: None,
        });
        Ok(self)
    }

    /// Also send this id as the singular `userId` or `itemId` field.
    pub fn set_primary_entity_id(&mut self, entity_id: impl Into<String>) -> Result<&mut Self> {
        let entity_id = entity_id.into();
        ensure_non_empty(&entity_id, "primary entity id")?;
        self.primary_entity_id = Some(entity_id);
        Ok(self)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[RecommendationEntity] {
        &self.entities
    }

    /// Primary entity, if one was designated.
    pub fn primary_entity_id(&self) -> Option<&str> {
        self.primary_entity_id.as_deref()
    }
}

/// One request of a recommendations batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequestRecord {
    /// Caller-chosen id identifying the request in the response.
    pub request_id: String,
    /// Finite importance, interpreted according to the batch mode.
    pub importance: f64,
    /// Body of a single recommendation request.
    pub request: Value,
}

/// Several recommendation requests evaluated by the server in one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationsBatch {
    recommendations: Vec<RecommendationRequestRecord>,
}

impl RecommendationsBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request. `users` and `items` are interpreted as by
    /// [`RecommendationContentBuilder::construct`].
    pub fn request_recommendations(
        &mut self,
        request_id: impl Into<String>,
        importance: f64,
        users: Option<&RecommendationTarget>,
        items: Option<&RecommendationTarget>,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<&mut Self> {
        let request_id = request_id.into();
        ensure_non_empty(&request_id, "request id")?;
        if !importance.is_finite() {
            return Err(Error::invalid_argument("importance must be a finite number"));
        }
        let request = RecommendationContentBuilder::construct(users, items, count, options)?;
        self.recommendations.push(RecommendationRequestRecord {
            request_id,
            importance,
            request,
        });
        Ok(self)
    }

    /// Add a request for a single user.
    pub fn request_recommendations_for_user(
        &mut self,
        request_id: impl Into<String>,
        importance: f64,
        user_id: &str,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<&mut Self> {
        let users = RecommendationTarget::from(user_id);
        self.request_recommendations(request_id, importance, Some(&users), None, count, options)
    }

    /// Add a request for weighted users.
    pub fn request_recommendations_for_users(
        &mut self,
        request_id: impl Into<String>,
        importance: f64,
        users: RecommendationEntitiesBatch,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<&mut Self> {
        let users = RecommendationTarget::from(users);
        self.request_recommendations(request_id, importance, Some(&users), None, count, options)
    }

    /// Add a request for a single item.
    pub fn request_recommendations_for_item(
        &mut self,
        request_id: impl Into<String>,
        importance: f64,
        item_id: &str,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<&mut Self> {
        let items = RecommendationTarget::from(item_id);
        self.request_recommendations(request_id, importance, None, Some(&items), count, options)
    }

    /// Add a request for weighted items.
    pub fn request_recommendations_for_items(
        &mut self,
        request_id: impl Into<String>,
        importance: f64,
        items: RecommendationEntitiesBatch,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<&mut Self> {
        let items = RecommendationTarget::from(items);
        self.request_recommendations(request_id, importance, None, Some(&items), count, options)
    }

    /// Add a request for neither users nor items.
    pub fn request_general_recommendations(
        &mut self,
        request_id: impl Into<String>,
        importance: f64,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<&mut Self> {
        self.request_recommendations(request_id, importance, None, None, count, options)
    }

    /// Requests in insertion order.
    pub fn recommendations(&self) -> &[RecommendationRequestRecord] {
        &self.recommendations
    }

    /// `true` if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use crate::{
        recommendation::RecommendationOptions, AttributeValue, Error, InteractionMetaType,
    };

    use super::{
        EntitiesBatch, InteractionTypeOptions, InteractionTypesBatch, InteractionsBatch,
        RecommendationEntitiesBatch, RecommendationsBatch,
    };

    #[test]
    fn entities_keep_insertion_order() {
        let mut batch = EntitiesBatch::new();
        batch
            .add_entity(
                "user_john",
                [("age".to_owned(), AttributeValue::Integer(42))].into(),
            )
            .unwrap()
            .add_entity("user_paul", Default::default())
            .unwrap();

        assert_eq!(
            serde_json::to_value(batch.entities()).unwrap(),
            json!([
                {"id": "user_john", "attributes": {"age": 42}},
                {"id": "user_paul", "attributes": {}},
            ])
        );
    }

    #[test]
    fn rejects_empty_entity_id() {
        assert!(matches!(
            EntitiesBatch::new().add_entity("", Default::default()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn interaction_records_nest_interaction_id() {
        let time = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let mut batch = InteractionsBatch::new();
        batch
            .add_interaction("john", "foo", "Like", Some(time), None)
            .unwrap()
            .add_interaction(
                "paul",
                "bar",
                "Purchase",
                None,
                Some([("price".to_owned(), AttributeValue::Integer(10))].into()),
            )
            .unwrap();

        assert_eq!(
            serde_json::to_value(batch.interactions()).unwrap(),
            json!([
                {
                    "userId": "john",
                    "itemId": "foo",
                    "interaction": {"interactionId": "Like"},
                    "timestamp": 1420070400,
                },
                {
                    "userId": "paul",
                    "itemId": "bar",
                    "interaction": {"interactionId": "Purchase", "attributes": {"price": 10}},
                },
            ])
        );
    }

    #[test]
    fn interaction_requires_all_ids() {
        let mut batch = InteractionsBatch::new();

        assert!(batch.add_interaction("", "foo", "Like", None, None).is_err());
        assert!(batch.add_interaction("john", "", "Like", None, None).is_err());
        assert!(batch.add_interaction("john", "foo", "", None, None).is_err());
        assert!(batch.interactions().is_empty());
    }

    #[test]
    fn interaction_weight_bounds_are_inclusive() {
        let mut batch = InteractionTypesBatch::new();
        let with_weight = |weight| InteractionTypeOptions {
            weight: Some(weight),
            ..Default::default()
        };

        assert!(matches!(
            batch.add_interaction_type("Like", with_weight(1.5)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(batch.add_interaction_type("Like", with_weight(1.0)).is_ok());
        assert!(batch.add_interaction_type("Dislike", with_weight(-1.0)).is_ok());
        assert!(batch
            .add_interaction_type(
                "View",
                InteractionTypeOptions {
                    learn_weight: Some(-1.01),
                    ..Default::default()
                }
            )
            .is_err());
        assert_eq!(batch.interaction_types().len(), 2);
    }

    #[test]
    fn interaction_type_record_omits_unset_fields() {
        let mut batch = InteractionTypesBatch::new();
        batch
            .add_interaction_type(
                "Purchase",
                InteractionTypeOptions {
                    meta_type: Some(InteractionMetaType::Conversion),
                    weight: Some(0.5),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(
            serde_json::to_value(batch.interaction_types()).unwrap(),
            json!([{
                "id": "Purchase",
                "attributes": {},
                "interactionMetaType": "conversion",
                "interactionWeight": 0.5,
            }])
        );
    }

    #[test]
    fn recommendation_entities_validate_input() {
        let mut batch = RecommendationEntitiesBatch::new();

        assert!(batch.add_entity("", None).is_err());
        assert!(batch
            .add_entity("paul", Some(HashMap::from([("Like".to_owned(), f64::INFINITY)])))
            .is_err());
        assert!(batch
            .add_entity("paul", Some(HashMap::from([(String::new(), 1.0)])))
            .is_err());
        assert!(batch.add_weighted_entity("john", f64::NAN).is_err());
        assert!(batch.set_primary_entity_id("").is_err());
        assert!(batch.add_weighted_entity("john", -7.25).is_ok());
        assert_eq!(batch.entities().len(), 1);
        assert_eq!(batch.primary_entity_id(), None);
    }

    #[test]
    fn recommendations_batch_wraps_request_content() {
        let mut batch = RecommendationsBatch::new();
        batch
            .request_recommendations_for_user(
                "first",
                2.0,
                "john",
                5,
                RecommendationOptions::new().template_id("tmpl"),
            )
            .unwrap()
            .request_general_recommendations("second", 1.0, 3, &RecommendationOptions::new())
            .unwrap();

        assert_eq!(
            serde_json::to_value(batch.recommendations()).unwrap(),
            json!([
                {
                    "requestId": "first",
                    "importance": 2.0,
                    "request": {"count": 5, "userId": "john", "template": {"templateId": "tmpl"}},
                },
                {"requestId": "second", "importance": 1.0, "request": {"count": 3}},
            ])
        );
    }

    #[test]
    fn recommendations_batch_validates_request() {
        let mut batch = RecommendationsBatch::new();
        let options = RecommendationOptions::new();

        assert!(batch
            .request_general_recommendations("", 1.0, 3, &options)
            .is_err());
        assert!(batch
            .request_general_recommendations("r", 1.0, 0, &options)
            .is_err());
        assert!(batch
            .request_recommendations_for_item("r", 1.0, "", 3, &options)
            .is_err());
        assert!(batch.is_empty());
    }
}
