//! Handling of repeated source names

use serde::{Deserialize, Serialize};

/// What `add_source` does when a fragment with the same name already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep earlier fragments and append the new one
    #[default]
    Append,
    /// Drop every earlier fragment with that name first
    Replace,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            _ => Err(format!("Unknown duplicate policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default_is_append() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Append);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("append".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Append);
        assert_eq!("REPLACE".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Replace);
        assert!("merge".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_policy_serde() {
        let yaml = serde_yaml::to_string(&DuplicatePolicy::Replace).unwrap();
        assert_eq!(yaml.trim(), "replace");

        let policy: DuplicatePolicy = serde_json::from_str("\"append\"").unwrap();
        assert_eq!(policy, DuplicatePolicy::Append);
    }
}
