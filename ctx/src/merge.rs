//! Priority fold and dotted-path lookup
//!
//! Fragments are stable-sorted by priority ascending and folded left to right,
//! so the highest priority (and, among equals, the latest insertion) is applied
//! last and wins every conflicting leaf.

use serde_json::{Map, Value};

use crate::fragment::ContextFragment;

/// Separator between segments of a dotted path
pub const PATH_SEPARATOR: char = '.';

/// Deep-merge `incoming` into `target`
///
/// Keys whose values are mappings on both sides are merged recursively.
/// Every other incoming value replaces what `target` holds, including arrays,
/// which are never merged element-wise.
pub fn deep_merge(target: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, value) in incoming {
        if let (Some(Value::Object(existing)), Value::Object(nested)) = (target.get_mut(key), value) {
            deep_merge(existing, nested);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Fragments in the order they are folded: priority ascending, ties by insertion
pub fn fold_order(fragments: &[ContextFragment]) -> Vec<&ContextFragment> {
    let mut ordered: Vec<&ContextFragment> = fragments.iter().collect();
    // sort_by_key is stable, so equal priorities keep insertion order
    ordered.sort_by_key(|fragment| fragment.priority());
    ordered
}

/// Merge all fragments into a single mapping
pub fn merge_fragments(fragments: &[ContextFragment]) -> Map<String, Value> {
    fold_order(fragments)
        .into_iter()
        .fold(Map::new(), |mut merged, fragment| {
            deep_merge(&mut merged, fragment.content());
            merged
        })
}

/// Resolve a dotted path against a value
///
/// An empty path resolves to `root` itself. Walking stops with `None` as soon
/// as a segment is missing or the current value is not a mapping.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split(PATH_SEPARATOR)
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The fragment holds a value at the full path
    Present,
    /// The fragment holds a non-mapping at a proper prefix of the path
    Blocked,
    /// The fragment does not touch the path
    Absent,
}

fn probe(content: &Map<String, Value>, segments: &[&str]) -> Probe {
    let mut current = content;
    for (index, segment) in segments.iter().enumerate() {
        match current.get(*segment) {
            None => return Probe::Absent,
            Some(_) if index + 1 == segments.len() => return Probe::Present,
            Some(Value::Object(nested)) => current = nested,
            Some(_) => return Probe::Blocked,
        }
    }
    Probe::Absent
}

/// The fragment that last wrote the value visible at `path`
///
/// Follows the fold: a fragment containing the full path takes ownership, a
/// fragment replacing an ancestor with a non-mapping erases it. Returns `None`
/// for an empty path or when the path is absent from the merged result.
pub fn provenance<'a>(fragments: &'a [ContextFragment], path: &str) -> Option<&'a ContextFragment> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();

    fold_order(fragments)
        .into_iter()
        .fold(None, |owner, fragment| match probe(fragment.content(), &segments) {
            Probe::Present => Some(fragment),
            Probe::Blocked => None,
            Probe::Absent => owner,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::SourceOptions;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn fragment(name: &str, content: Value, priority: i64, sequence: u64) -> ContextFragment {
        ContextFragment::new(
            name.to_string(),
            object(content),
            SourceOptions::with_priority(priority),
            sequence,
        )
    }

    #[test]
    fn test_deep_merge_preserves_siblings() {
        let mut target = object(json!({"app": {"name": "X", "version": "1.0"}}));
        deep_merge(&mut target, &object(json!({"app": {"name": "Y"}})));

        assert_eq!(Value::Object(target), json!({"app": {"name": "Y", "version": "1.0"}}));
    }

    #[test]
    fn test_deep_merge_scalar_replaces_mapping() {
        let mut target = object(json!({"a": {"b": 1}}));
        deep_merge(&mut target, &object(json!({"a": 5})));

        assert_eq!(Value::Object(target), json!({"a": 5}));
    }

    #[test]
    fn test_deep_merge_mapping_replaces_scalar() {
        let mut target = object(json!({"a": 5}));
        deep_merge(&mut target, &object(json!({"a": {"b": 1}})));

        assert_eq!(Value::Object(target), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_deep_merge_replaces_arrays_wholesale() {
        let mut target = object(json!({"tags": ["a", "b", "c"]}));
        deep_merge(&mut target, &object(json!({"tags": ["z"]})));

        assert_eq!(Value::Object(target), json!({"tags": ["z"]}));
    }

    #[test]
    fn test_deep_merge_null_is_a_value() {
        let mut target = object(json!({"a": {"b": 1}}));
        deep_merge(&mut target, &object(json!({"a": null})));

        assert_eq!(Value::Object(target), json!({"a": null}));
    }

    #[test]
    fn test_deep_merge_keeps_first_seen_key_order() {
        let mut target = object(json!({"first": 1, "second": 2}));
        deep_merge(&mut target, &object(json!({"third": 3, "first": 10})));

        let keys: Vec<&str> = target.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_merge_fragments_priority_wins() {
        let fragments = vec![fragment("a", json!({"k": "A"}), 10, 0), fragment("b", json!({"k": "B"}), 1, 1)];

        assert_eq!(merge_fragments(&fragments)["k"], json!("A"));
    }

    #[test]
    fn test_merge_fragments_later_insertion_wins_ties() {
        let fragments = vec![fragment("a", json!({"k": "A"}), 5, 0), fragment("b", json!({"k": "B"}), 5, 1)];

        assert_eq!(merge_fragments(&fragments)["k"], json!("B"));
    }

    #[test]
    fn test_merge_fragments_negative_priorities() {
        let fragments = vec![fragment("base", json!({"k": 0}), 0, 0), fragment("low", json!({"k": -1}), -5, 1)];

        assert_eq!(merge_fragments(&fragments)["k"], json!(0));
    }

    #[test]
    fn test_merge_fragments_empty() {
        assert!(merge_fragments(&[]).is_empty());
    }

    #[test]
    fn test_merge_fragments_leaves_content_untouched() {
        let fragments = vec![
            fragment("low", json!({"app": {"name": "X"}}), 0, 0),
            fragment("high", json!({"app": {"theme": "dark"}}), 1, 1),
        ];
        let merged = merge_fragments(&fragments);

        assert_eq!(Value::Object(merged), json!({"app": {"name": "X", "theme": "dark"}}));
        assert_eq!(Value::Object(fragments[0].content().clone()), json!({"app": {"name": "X"}}));
    }

    #[test]
    fn test_lookup_nested() {
        let root = json!({"user": {"preferences": {"theme": "dark"}}});

        assert_eq!(lookup(&root, "user.preferences.theme"), Some(&json!("dark")));
        assert_eq!(lookup(&root, "user.preferences"), Some(&json!({"theme": "dark"})));
    }

    #[test]
    fn test_lookup_empty_path_is_root() {
        let root = json!({"a": 1});
        assert_eq!(lookup(&root, ""), Some(&root));
    }

    #[test]
    fn test_lookup_misses() {
        let root = json!({"a": {"b": 1}, "list": [1, 2]});

        assert_eq!(lookup(&root, "x.y.z"), None);
        assert_eq!(lookup(&root, "a.b.c"), None);
        assert_eq!(lookup(&root, "list.0"), None);
        assert_eq!(lookup(&root, "a."), None);
    }

    #[test]
    fn test_provenance_highest_priority_owner() {
        let fragments = vec![
            fragment("defaults", json!({"app": {"name": "X", "version": "1.0"}}), 0, 0),
            fragment("user", json!({"app": {"name": "Y"}}), 10, 1),
        ];

        assert_eq!(provenance(&fragments, "app.name").map(ContextFragment::name), Some("user"));
        assert_eq!(provenance(&fragments, "app.version").map(ContextFragment::name), Some("defaults"));
    }

    #[test]
    fn test_provenance_erased_by_scalar_ancestor() {
        let fragments = vec![
            fragment("low", json!({"a": {"b": 1}}), 0, 0),
            fragment("high", json!({"a": 5}), 10, 1),
        ];

        assert!(provenance(&fragments, "a.b").is_none());
        assert_eq!(provenance(&fragments, "a").map(ContextFragment::name), Some("high"));
    }

    #[test]
    fn test_provenance_missing_and_empty_path() {
        let fragments = vec![fragment("only", json!({"a": 1}), 0, 0)];

        assert!(provenance(&fragments, "b").is_none());
        assert!(provenance(&fragments, "").is_none());
    }
}
