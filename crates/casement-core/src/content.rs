//! Decoded notification content.
//!
//! [`DecodedContent`] is the nested key/value tree produced by a decoder. Leaf
//! values are strings; inner nodes are mappings. It is produced once per
//! envelope, never mutated afterwards, and moved into the selected
//! [`HandlerVariant`](crate::variant::HandlerVariant).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded notification payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodedContent(Map<String, Value>);

impl DecodedContent {
    /// Wraps an already-decoded mapping.
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the string stored under `key`.
    ///
    /// Absent keys, non-string values and empty strings all yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        non_empty_str(self.0.get(key)?)
    }

    /// Walks a nested path of mapping keys and returns the value at its end.
    ///
    /// Returns `None` as soon as a segment is missing or an intermediate node
    /// is not a mapping.
    pub fn lookup_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no top-level keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the content and returns the underlying mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for DecodedContent {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Returns the value as a non-empty string slice.
pub(crate) fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(value: Value) -> DecodedContent {
        match value {
            Value::Object(map) => DecodedContent::new(map),
            _ => panic!("test content must be an object"),
        }
    }

    #[test]
    fn test_get_str_filters_empty_and_non_strings() {
        let c = content(json!({
            "MsgType": "text",
            "Empty": "",
            "Nested": { "a": "b" }
        }));
        assert_eq!(c.get_str("MsgType"), Some("text"));
        assert_eq!(c.get_str("Empty"), None);
        assert_eq!(c.get_str("Nested"), None);
        assert_eq!(c.get_str("Missing"), None);
    }

    #[test]
    fn test_lookup_path() {
        let c = content(json!({
            "ActionParam": { "scene": { "sceneId": "abc" } },
            "Flat": "value"
        }));
        assert_eq!(
            c.lookup_path(&["ActionParam", "scene", "sceneId"]),
            Some(&json!("abc"))
        );
        assert_eq!(c.lookup_path(&["ActionParam", "missing"]), None);
        assert_eq!(c.lookup_path(&["Flat", "scene"]), None);
        assert_eq!(c.lookup_path(&[]), None);
    }

    #[test]
    fn test_serializes_transparently() {
        let c = content(json!({ "MsgType": "event" }));
        assert_eq!(serde_json::to_value(&c).unwrap(), json!({ "MsgType": "event" }));
    }
}
