//! Core ContextStore implementation

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ContextError, Result};
use crate::fragment::{ContextFragment, SourceOptions};
use crate::loader::{kind, read_context_file};
use crate::merge::{lookup, merge_fragments, provenance};
use crate::policy::DuplicatePolicy;

/// Source type recorded for fragments loaded from disk
pub const FILE_SOURCE_TYPE: &str = "file";

/// Holds context fragments and serves their merged view
///
/// The merged view is computed on first read and dropped on every mutation,
/// so reads never observe a stale merge. The store is a plain owned value;
/// callers sharing it across threads wrap it in a lock.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    /// Fragments in insertion order
    fragments: Vec<ContextFragment>,
    /// Cached merged view, always a `Value::Object`
    merged: OnceCell<Value>,
    /// Behavior when a source name is registered twice
    policy: DuplicatePolicy,
    /// Insertion number for the next fragment
    next_sequence: u64,
}

impl ContextStore {
    /// Create an empty store that appends repeated source names
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given duplicate-name policy
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register a fragment from an arbitrary value
    ///
    /// Fails with `InvalidFragment` if `content` is not a mapping or `name`
    /// is empty. An empty mapping is accepted and contributes nothing.
    pub fn add_source(&mut self, name: impl Into<String>, content: Value, options: SourceOptions) -> Result<()> {
        let name = name.into();
        match content {
            Value::Object(map) => self.add_mapping(name, map, options),
            other => Err(ContextError::InvalidFragment {
                reason: format!("content is {}, expected a mapping", kind(&other)),
                name,
            }),
        }
    }

    /// Register a fragment from an already-typed mapping
    pub fn add_mapping(
        &mut self,
        name: impl Into<String>,
        content: Map<String, Value>,
        options: SourceOptions,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ContextError::InvalidFragment {
                name,
                reason: "source name must not be empty".to_string(),
            });
        }

        if self.policy == DuplicatePolicy::Replace {
            self.remove_source(&name);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!(
            source = %name,
            priority = options.priority,
            source_type = %options.source_type,
            keys = content.len(),
            "Added context source"
        );
        self.fragments.push(ContextFragment::new(name, content, options, sequence));
        self.invalidate();
        Ok(())
    }

    /// Load a JSON or YAML file as a fragment named after the file
    pub fn load_from_file(&mut self, path: impl AsRef<Path>, priority: i64) -> Result<()> {
        self.load_from_file_with(
            path,
            SourceOptions {
                priority,
                source_type: FILE_SOURCE_TYPE.to_string(),
                ..Default::default()
            },
        )
    }

    /// Load a JSON or YAML file with explicit options
    ///
    /// The `path` and `format` metadata keys are always set by the loader and
    /// override any values supplied in `options.metadata`.
    pub fn load_from_file_with(&mut self, path: impl AsRef<Path>, options: SourceOptions) -> Result<()> {
        let path = path.as_ref();
        let (format, content) = read_context_file(path)?;

        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| absolute.to_string_lossy().to_string());

        let mut options = options;
        options
            .metadata
            .insert("path".to_string(), Value::String(absolute.to_string_lossy().to_string()));
        options
            .metadata
            .insert("format".to_string(), Value::String(format.to_string()));

        info!(path = %absolute.display(), %format, priority = options.priority, "Loaded context file");
        self.add_mapping(name, content, options)
    }

    /// Remove every fragment registered under `name`
    ///
    /// Returns how many fragments were removed; zero is not an error.
    pub fn remove_source(&mut self, name: &str) -> usize {
        let before = self.fragments.len();
        self.fragments.retain(|fragment| fragment.name() != name);
        let removed = before - self.fragments.len();

        if removed > 0 {
            debug!(source = name, removed, "Removed context source");
            self.invalidate();
        }
        removed
    }

    /// Drop all fragments
    pub fn clear(&mut self) {
        self.fragments.clear();
        self.invalidate();
    }

    /// Compute (or reuse) the merged mapping and return an owned copy
    pub fn merge(&self) -> Map<String, Value> {
        self.get_all().clone()
    }

    /// Borrow the merged mapping
    pub fn get_all(&self) -> &Map<String, Value> {
        match self.view() {
            Value::Object(map) => map,
            _ => unreachable!("merged view is always a mapping"),
        }
    }

    /// Look up a dotted path in the merged view
    ///
    /// An empty path returns the whole merged mapping.
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(self.view(), path)
    }

    /// Look up a dotted path, falling back to `default` when it is absent
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).cloned().unwrap_or(default)
    }

    /// Look up a dotted path and deserialize the value into `T`
    ///
    /// Returns `None` when the path is absent or the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|value| T::deserialize(value).ok())
    }

    /// The fragment that supplied the value visible at `path`
    pub fn provenance(&self, path: &str) -> Option<&ContextFragment> {
        self.get(path)?;
        provenance(&self.fragments, path)
    }

    /// Fragments in insertion order
    pub fn sources(&self) -> &[ContextFragment] {
        &self.fragments
    }

    /// Distinct source names in first-insertion order
    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for fragment in &self.fragments {
            if !names.contains(&fragment.name()) {
                names.push(fragment.name());
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn view(&self) -> &Value {
        self.merged.get_or_init(|| {
            let merged = merge_fragments(&self.fragments);
            debug!(fragments = self.fragments.len(), keys = merged.len(), "Merged context");
            Value::Object(merged)
        })
    }

    fn invalidate(&mut self) {
        self.merged.take();
    }
}
