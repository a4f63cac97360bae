//! Context error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by context store mutations
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Invalid fragment '{name}': {reason}")]
    InvalidFragment { name: String, reason: String },

    #[error("Context file not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Unsupported file format '{extension}' for {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to load context from {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Result alias for context store operations
pub type Result<T> = std::result::Result<T, ContextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = ContextError::UnsupportedFormat {
            path: PathBuf::from("/tmp/notes.txt"),
            extension: "txt".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("/tmp/notes.txt"));
        assert!(msg.contains("'txt'"));
    }

    #[test]
    fn test_parse_message_preserves_detail() {
        let err = ContextError::Parse {
            path: PathBuf::from("broken.json"),
            message: "expected value at line 1 column 2".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("broken.json"));
        assert!(msg.contains("line 1 column 2"));
    }
}
