use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signed-in identity as returned by the backend.
///
/// The record is kept opaque: any JSON object is accepted and preserved
/// as-is. The accessors below cover the fields the backend currently sends
/// (`email`, `firstName`, `lastName`, `role`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User {
    fields: Map<String, Value>,
}

impl User {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up any field of the record
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.get_str("firstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.get_str("lastName")
    }

    pub fn role(&self) -> Option<&str> {
        self.get_str("role")
    }

    /// "First Last", falling back to the email, then to "Unknown user"
    pub fn display_name(&self) -> String {
        match (self.first_name(), self.last_name()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self.email().unwrap_or("Unknown user").to_string(),
        }
    }
}
