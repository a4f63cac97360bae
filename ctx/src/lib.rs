//! ctxmerge - priority-based context merge engine
//!
//! Agents carry a mutable context assembled from many producers: config files,
//! user profiles, session managers. Each producer registers a named fragment
//! with a priority; the store folds them into one mapping that consumers read
//! with dotted paths, without knowing which source supplied which value.
//!
//! # Merge rules
//!
//! - Fragments are applied lowest priority first; equal priorities apply in
//!   insertion order, so the latest one wins.
//! - Mappings present on both sides merge key by key.
//! - Any other value (scalar, sequence, null) replaces what was there.
//!
//! # Example
//!
//! ```
//! use ctxmerge::{ContextStore, SourceOptions};
//! use serde_json::json;
//!
//! let mut store = ContextStore::new();
//! store.add_source("defaults", json!({"app": {"name": "demo", "theme": "dark"}}), SourceOptions::default())?;
//! store.add_source("user", json!({"app": {"theme": "light"}}), SourceOptions::with_priority(10))?;
//!
//! assert_eq!(store.get("app.theme"), Some(&json!("light")));
//! assert_eq!(store.get("app.name"), Some(&json!("demo")));
//! assert_eq!(store.get_or("app.locale", json!("en")), json!("en"));
//! # Ok::<(), ctxmerge::ContextError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fragment;
pub mod loader;
pub mod merge;
pub mod policy;
mod store;

pub use error::{ContextError, Result};
pub use fragment::{ContextFragment, DEFAULT_SOURCE_TYPE, SourceOptions};
pub use loader::FileFormat;
pub use policy::DuplicatePolicy;
pub use store::{ContextStore, FILE_SOURCE_TYPE};

/// Priority given to sources that do not specify one
pub const DEFAULT_PRIORITY: i64 = 0;
