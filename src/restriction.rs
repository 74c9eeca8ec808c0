use std::collections::HashMap;

use serde_json::{Map, Value};

/// Path/query parameters and JSON body of a single API call.
///
/// Parameter values are stored as strings: [`Restriction::with_parameter`] accepts anything
/// implementing [`ToString`], so numbers are coerced on insertion. Booleans go through
/// [`Restriction::with_flag`], which renders `true` as `1` and `false` as an empty value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restriction {
    parameters: HashMap<String, String>,
    content: Map<String, Value>,
}

impl Restriction {
    /// Create an empty restriction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a restriction that only carries a JSON body.
    pub fn from_content(content: Map<String, Value>) -> Self {
        Self {
            parameters: HashMap::new(),
            content,
        }
    }

    /// Add (or replace) a path/query parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.add_parameter(name, value);
        self
    }

    /// Add the parameter only when `value` is present.
    pub fn with_optional_parameter<T: ToString>(
        mut self,
        name: impl Into<String>,
        value: Option<T>,
    ) -> Self {
        if let Some(value) = value {
            self.add_parameter(name, value);
        }
        self
    }

    /// Add (or replace) a path/query parameter in place.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.parameters.insert(name.into(), value.to_string());
        self
    }

    /// Add (or replace) a boolean parameter, sent as `1` or as an empty value.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.add_flag(name, value);
        self
    }

    /// In-place variant of [`with_flag`](Self::with_flag).
    pub fn add_flag(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.add_parameter(name, if value { "1" } else { "" })
    }

    /// Value of the parameter `name`, if set.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// All parameters set so far.
    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    /// Add (or replace) a top-level body field.
    pub fn with_content(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(name.into(), value.into());
        self
    }

    /// JSON body fields set so far.
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    pub(crate) fn into_content(self) -> Map<String, Value> {
        self.content
    }
}
