//! CLI argument parsing for ctx

use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::store::ContextStore;

#[derive(Parser, Debug)]
#[command(name = "ctx")]
#[command(author, version, about = "Priority-based context merge engine", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the merged context
    Merge {
        /// Context files as FILE[@PRIORITY]
        sources: Vec<SourceArg>,

        /// Print YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Print the value at a dotted path
    Get {
        /// Dotted path, e.g. user.preferences.theme
        #[arg(required = true)]
        path: String,

        /// Context files as FILE[@PRIORITY]
        sources: Vec<SourceArg>,

        /// Value printed when the path is missing (JSON, or a plain string)
        #[arg(short, long)]
        default: Option<String>,
    },

    /// List the loaded fragments
    Sources {
        /// Context files as FILE[@PRIORITY]
        sources: Vec<SourceArg>,
    },

    /// Show which source supplied the value at a dotted path
    Which {
        /// Dotted path
        #[arg(required = true)]
        path: String,

        /// Context files as FILE[@PRIORITY]
        sources: Vec<SourceArg>,
    },
}

/// A context file named on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct SourceArg {
    pub path: PathBuf,
    pub priority: Option<i64>,
}

impl std::str::FromStr for SourceArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("Source path must not be empty".to_string());
        }

        // Only a trailing @<integer> is a priority; other '@' belong to the path
        if let Some((path, priority)) = s.rsplit_once('@')
            && !path.is_empty()
            && let Ok(priority) = priority.parse::<i64>()
        {
            return Ok(Self {
                path: PathBuf::from(path),
                priority: Some(priority),
            });
        }

        Ok(Self {
            path: PathBuf::from(s),
            priority: None,
        })
    }
}

impl Command {
    /// Sources given to whichever subcommand was chosen
    pub fn sources(&self) -> &[SourceArg] {
        match self {
            Self::Merge { sources, .. }
            | Self::Get { sources, .. }
            | Self::Sources { sources }
            | Self::Which { sources, .. } => sources,
        }
    }
}

/// Build a store from config-listed sources followed by command-line ones
pub fn build_store(config: &Config, sources: &[SourceArg]) -> Result<ContextStore> {
    let mut store = ContextStore::with_policy(config.duplicate_policy);

    for entry in &config.sources {
        store
            .load_from_file(&entry.path, config.priority_for(entry))
            .context(format!("Failed to load configured source {}", entry.path.display()))?;
    }

    for source in sources {
        store
            .load_from_file(&source.path, source.priority.unwrap_or(config.default_priority))
            .context(format!("Failed to load source {}", source.path.display()))?;
    }

    Ok(store)
}
