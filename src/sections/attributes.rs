use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::{error::ensure_non_empty, Api, DataType, Error, MetaType, Restriction, Result};

use super::body_restriction;

const ATTRIBUTE_NAME_PARAMETER: &str = "attributeName";

/// Which records an attribute belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Attributes of users.
    Users,
    /// Attributes of items.
    Items,
    /// Attributes of interactions.
    Interactions,
}

impl AttributeKind {
    fn add_url(&self) -> &'static str {
        match self {
            Self::Users => "/{accountId}/attribute/users",
            Self::Items => "/{accountId}/attribute/items",
            Self::Interactions => "/{accountId}/attribute/interactions",
        }
    }

    fn list_url(&self) -> &'static str {
        match self {
            Self::Users => "/{accountId}/attributes/users",
            Self::Items => "/{accountId}/attributes/items",
            Self::Interactions => "/{accountId}/attributes/interactions",
        }
    }

    fn attribute_url(&self) -> &'static str {
        match self {
            Self::Users => "/{accountId}/attributes/users/{attributeName}",
            Self::Items => "/{accountId}/attributes/items/{attributeName}",
            Self::Interactions => "/{accountId}/attributes/interactions/{attributeName}",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Description<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta_type: Option<MetaType>,
}

impl Description<'_> {
    fn is_empty(&self) -> bool {
        self.language.is_none() && self.meta_type.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewAttribute<'a> {
    name: &'a str,
    data_type: DataType,
    #[serde(skip_serializing_if = "Description::is_empty")]
    description: Description<'a>,
}

#[derive(Debug, Serialize)]
struct DescriptionUpdate<'a> {
    description: Description<'a>,
}

/// Schema of users, items and interactions.
pub struct AttributesSection<'c> {
    api: &'c Api<'c>,
}

impl<'c> AttributesSection<'c> {
    pub(crate) fn new(api: &'c Api<'c>) -> Self {
        Self { api }
    }

    /// Register a new attribute.
    ///
    /// `name` has to start with a letter and may only contain letters, digits and `_`.
    pub fn add(
        &self,
        kind: AttributeKind,
        name: &str,
        data_type: DataType,
        language: Option<&str>,
        meta_type: Option<MetaType>,
    ) -> Result<Option<Value>> {
        validate_name(name)?;
        let restriction = body_restriction(&NewAttribute {
            name,
            data_type,
            description: Description {
                language,
                meta_type,
            },
        })?;
        self.api.perform_post(kind.add_url(), Some(restriction))
    }

    /// List the attributes of `kind`.
    pub fn get(&self, kind: AttributeKind) -> Result<Option<Value>> {
        self.api.perform_get(kind.list_url(), None)
    }

    /// Replace the description of an attribute.
    pub fn update_description(
        &self,
        kind: AttributeKind,
        name: &str,
        language: Option<&str>,
        meta_type: Option<MetaType>,
    ) -> Result<Option<Value>> {
        validate_name(name)?;
        let restriction = body_restriction(&DescriptionUpdate {
            description: Description {
                language,
                meta_type,
            },
        })?
        .with_parameter(ATTRIBUTE_NAME_PARAMETER, name);
        self.api.perform_post(kind.attribute_url(), Some(restriction))
    }

    /// Delete the attribute `name`.
    pub fn delete(&self, kind: AttributeKind, name: &str) -> Result<Option<Value>> {
        ensure_non_empty(name, "attribute name")?;
        let restriction = Restriction::new().with_parameter(ATTRIBUTE_NAME_PARAMETER, name);
        self.api.perform_delete(kind.attribute_url(), Some(restriction))
    }
}

fn validate_name(name: &str) -> Result<()> {
    static NAME: OnceLock<Option<Regex>> = OnceLock::new();

    ensure_non_empty(name, "attribute name")?;
    let valid = NAME
        .get_or_init(|| Regex::new("^[A-Za-z][A-Za-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name));
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            "attribute name can only contain letters, numbers and _ and has to start with a letter",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_name;

    #[test]
    fn attribute_names() {
        assert!(validate_name("name").is_ok());
        assert!(validate_name("Price_2").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("2price").is_err());
        assert!(validate_name("_price").is_err());
        assert!(validate_name("full name").is_err());
        assert!(validate_name("název").is_err());
    }
}
