use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// A single item on the todo list
///
/// Serialized as `{"title": "...", "description": "..."}`. Both fields are
/// required when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub title: String,
    pub description: String,
}

impl Todo {
    /// Decode a todo from a request body
    ///
    /// Only a JSON object is accepted; the derived impl alone would also take
    /// the positional `["title", "description"]` array form.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        match serde_json::from_slice(bytes)? {
            value @ serde_json::Value::Object(_) => Self::deserialize(value),
            _ => Err(serde_json::Error::custom("expected a JSON object")),
        }
    }
}

#[cfg(test)]
impl Todo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
