use std::{collections::HashMap, fmt};

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Attributes of a user, item, interaction or interaction type.
pub type Attributes = HashMap<String, AttributeValue>;

/// Value of an attribute. Serialized as the bare JSON value.
#[derive(Debug, Serialize, Deserialize, PartialEq, PartialOrd, From, Clone)]
#[serde(untagged)]
pub enum AttributeValue {
    /// JSON string.
    String(String),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Number(f64),
    /// JSON boolean.
    Boolean(bool),
    /// Array of values.
    Array(Vec<AttributeValue>),
    /// JSON `null`.
    Null,
}
impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Data type of a registered attribute.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// `TEXT`
    Text,
    /// `INTEGER`
    Integer,
    /// `FLOAT`
    Float,
    /// `BOOLEAN`
    Boolean,
    /// `JSON`
    Json,
}

impl DataType {
    /// Wire name of the data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Boolean => "BOOLEAN",
            Self::Json => "JSON",
        }
    }
}

/// Semantic meaning of an attribute.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MetaType {
    /// Categories the record belongs to.
    Categories,
    /// Price of an item.
    Price,
    /// Display title.
    Title,
}

impl MetaType {
    /// Wire name of the meta type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Price => "price",
            Self::Title => "title",
        }
    }
}

/// Semantic meaning of an interaction type.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMetaType {
    /// The interaction is a goal, e.g. a purchase.
    Conversion,
    /// Any other interaction, e.g. a view.
    Action,
}

impl InteractionMetaType {
    /// Wire name of the interaction meta type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conversion => "conversion",
            Self::Action => "action",
        }
    }
}

/// Sort direction of entity listings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl Order {
    /// Wire name of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
