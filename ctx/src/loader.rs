//! JSON/YAML context file parsing

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{ContextError, Result};

/// Structured formats a context file may use, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ContextError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Parse text in this format into a top-level mapping
    pub fn parse(self, text: &str) -> std::result::Result<Map<String, Value>, String> {
        let value: Value = match self {
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string())?,
            Self::Yaml => {
                // `<<` merge keys are only expanded on serde_yaml's own Value
                let mut yaml: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
                yaml.apply_merge().map_err(|e| e.to_string())?;
                serde_yaml::from_value(yaml).map_err(|e| e.to_string())?
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(format!("top-level value is {}, expected a mapping", kind(&other))),
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Human-readable name of a value's variant
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Read and parse a context file
///
/// Existence is checked first, then the extension, then the content.
pub fn read_context_file(path: &Path) -> Result<(FileFormat, Map<String, Value>)> {
    if !path.exists() {
        return Err(ContextError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = FileFormat::from_path(path)?;

    let text = fs::read_to_string(path).map_err(|e| ContextError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let content = format.parse(&text).map_err(|message| ContextError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    Ok((format, content))
}
