//! Configuration for the ctx command

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::policy::DuplicatePolicy;

/// Name of the project-local config file
pub const LOCAL_CONFIG_FILE: &str = "ctxmerge.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Priority for sources given without an explicit `@PRIORITY`
    #[serde(rename = "default-priority")]
    pub default_priority: i64,

    /// How repeated source names are handled
    #[serde(rename = "duplicate-policy")]
    pub duplicate_policy: DuplicatePolicy,

    /// Context files loaded before any given on the command line
    pub sources: Vec<SourceEntry>,
}

/// A context file listed in the config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub path: PathBuf,

    /// Falls back to `default-priority` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        Ok(Self::load_first(&Self::candidate_paths()))
    }

    /// Locations searched when no config path is given, most specific first
    pub fn candidate_paths() -> Vec<PathBuf> {
        [
            Some(PathBuf::from(LOCAL_CONFIG_FILE)),
            dirs::config_dir().map(|dir| dir.join("ctxmerge").join(LOCAL_CONFIG_FILE)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// First candidate that exists and parses; broken files are skipped
    fn load_first(candidates: &[PathBuf]) -> Self {
        for path in candidates.iter().filter(|path| path.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), "Skipping config: {:#}", e),
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        // Relative source paths are relative to the config file, not the cwd
        if let Some(base) = path.as_ref().parent() {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Priority for a listed source, honoring `default-priority`
    pub fn priority_for(&self, source: &SourceEntry) -> i64 {
        source.priority.unwrap_or(self.default_priority)
    }
}
