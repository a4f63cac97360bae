//! Context fragments - one named, prioritized contribution of context data

use serde::Serialize;
use serde_json::{Map, Value};

/// Source type used when a producer does not name one
pub const DEFAULT_SOURCE_TYPE: &str = "unknown";

/// Options attached to a fragment when it is registered
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    /// Higher priorities override lower ones on conflict
    pub priority: i64,
    /// Free-form tag such as "file" or "user_profile"
    pub source_type: String,
    /// Informational metadata, never merged
    pub metadata: Map<String, Value>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            priority: crate::DEFAULT_PRIORITY,
            source_type: DEFAULT_SOURCE_TYPE.to_string(),
            metadata: Map::new(),
        }
    }
}

impl SourceOptions {
    /// Default options with the given priority
    pub fn with_priority(priority: i64) -> Self {
        Self {
            priority,
            ..Default::default()
        }
    }
}

/// A single registered source of context
///
/// Fragments are immutable once the store has accepted them. Updating a
/// source means adding a new fragment (optionally removing the old one).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextFragment {
    name: String,
    content: Map<String, Value>,
    priority: i64,
    source_type: String,
    metadata: Map<String, Value>,
    sequence: u64,
}

impl ContextFragment {
    pub(crate) fn new(name: String, content: Map<String, Value>, options: SourceOptions, sequence: u64) -> Self {
        Self {
            name,
            content,
            priority: options.priority,
            source_type: options.source_type,
            metadata: options.metadata,
            sequence,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Insertion number assigned by the store; breaks priority ties
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Path the fragment was loaded from, if it came from a file
    pub fn path(&self) -> Option<&str> {
        self.metadata.get("path").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_source_options_default() {
        let options = SourceOptions::default();
        assert_eq!(options.priority, 0);
        assert_eq!(options.source_type, "unknown");
        assert!(options.metadata.is_empty());
    }

    #[test]
    fn test_with_priority_keeps_other_defaults() {
        let options = SourceOptions::with_priority(-3);
        assert_eq!(options.priority, -3);
        assert_eq!(options.source_type, DEFAULT_SOURCE_TYPE);
    }

    #[test]
    fn test_fragment_accessors() {
        let options = SourceOptions {
            priority: 7,
            source_type: "file".to_string(),
            metadata: object(json!({"path": "/etc/app.yml"})),
        };
        let fragment = ContextFragment::new("app.yml".to_string(), object(json!({"a": 1})), options, 4);

        assert_eq!(fragment.name(), "app.yml");
        assert_eq!(fragment.content()["a"], json!(1));
        assert_eq!(fragment.priority(), 7);
        assert_eq!(fragment.source_type(), "file");
        assert_eq!(fragment.sequence(), 4);
        assert_eq!(fragment.path(), Some("/etc/app.yml"));
    }

    #[test]
    fn test_fragment_serializes_all_fields() {
        let fragment = ContextFragment::new("s".to_string(), object(json!({"k": [1, 2]})), SourceOptions::default(), 3);

        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "s",
                "content": {"k": [1, 2]},
                "priority": 0,
                "source_type": "unknown",
                "metadata": {},
                "sequence": 3,
            })
        );
    }
}
