//! Resource families of the API.
//!
//! A section validates typed arguments, turns them into a [`Restriction`] and hands it to the
//! [`Api`](crate::Api) together with the endpoint's path template. Sections borrow the client and
//! are cheap to create; get them through the [`Client`](crate::Client) accessors.
mod attributes;
mod entities;
mod interaction_types;
mod interactions;
mod recommendations;
mod templates;
mod users;

pub use ab_tests::AbTestsSection;
pub use attributes::{AttributeKind, AttributesSection};
pub use entities::{EntityKind, EntitySection, InteractionsPaging, ITEMS, USERS};
pub use interaction_types::InteractionTypesSection;
pub use interactions::InteractionsSection;
pub use recommendations::{BatchEvaluation, ImportanceType, RecommendationsSection};
pub use templates::TemplatesSection;
pub use users::UsersSection;

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Order, Restriction, Result};

/// Restriction whose content is the serialized `body`. `body` must serialize to a JSON object.
pub(crate) fn body_restriction<T: Serialize>(body: &T) -> Result<Restriction> {
    match serde_json::to_value(body) {
        Ok(Value::Object(content)) => Ok(Restriction::from_content(content)),
        Ok(other) => Err(Error::invalid_argument(format!(
            "request body must be an object, got {other}"
        ))),
        Err(err) => Err(Error::invalid_argument(format!(
            "unable to serialize request body: {err}"
        ))),
    }
}

/// Paging, projection, ordering and search of a listing.
///
/// Only the parameters an endpoint understands are sent: the path template decides which of
/// them end up in the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
    pub(crate) attributes: Option<Vec<String>>,
    pub(crate) order_by: Option<String>,
    pub(crate) order: Option<Order>,
    pub(crate) search_query: Option<String>,
    pub(crate) search_attributes: Option<Vec<String>>,
}

impl ListOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of records.
    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Records to skip.
    pub fn offset(&mut self, offset: u32) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Return only these attributes of each record.
    pub fn attributes(&mut self, attributes: Vec<String>) -> &mut Self {
        self.attributes = Some(attributes);
        self
    }

    /// Sort by `attribute`.
    pub fn order_by(&mut self, attribute: impl Into<String>, order: Order) -> &mut Self {
        self.order_by = Some(attribute.into());
        self.order = Some(order);
        self
    }

    /// Full-text search, optionally restricted to some attributes.
    pub fn search(&mut self, query: impl Into<String>, attributes: Option<Vec<String>>) -> &mut Self {
        self.search_query = Some(query.into());
        self.search_attributes = attributes;
        self
    }

    /// Fill limit and offset when the caller left them unset.
    pub(crate) fn with_default_paging(&self, limit: u32, offset: u32) -> Self {
        Self {
            limit: self.limit.or(Some(limit)),
            offset: self.offset.or(Some(offset)),
            ..self.clone()
        }
    }

    pub(crate) fn to_restriction(&self) -> Result<Restriction> {
        if self.order_by.as_deref() == Some("") {
            return Err(Error::invalid_argument("order by can't be empty"));
        }

        Ok(Restriction::new()
            .with_optional_parameter("limit", self.limit)
            .with_optional_parameter("offset", self.offset)
            .with_optional_parameter("attributes", self.attributes.as_ref().map(|a| a.join(",")))
            .with_optional_parameter("orderBy", self.order_by.as_deref())
            .with_optional_parameter("order", self.order)
            .with_optional_parameter("searchQuery", self.search_query.as_deref())
            .with_optional_parameter(
                "searchAttributes",
                self.search_attributes.as_ref().map(|a| a.join(",")),
            ))
    }
}
