use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde_json::Value;

use ctxmerge::cli::{Cli, Command, build_store};
use ctxmerge::config::Config;

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .context("Failed to initialize logger")?;
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store = build_store(&config, cli.command.sources())?;

    info!("ctx loaded {} fragment(s)", store.len());

    match cli.command {
        Command::Merge { yaml, .. } => {
            let merged = Value::Object(store.merge());
            if yaml {
                print!("{}", serde_yaml::to_string(&merged)?);
            } else {
                print_json(&merged)?;
            }
        }
        Command::Get { path, default, .. } => match store.get(&path) {
            Some(value) => print_json(value)?,
            None => match default {
                // A default that is not valid JSON is taken as a plain string
                Some(raw) => print_json(&serde_json::from_str(&raw).unwrap_or(Value::String(raw)))?,
                None => return Err(eyre::eyre!("Path not found: {}", path)),
            },
        },
        Command::Sources { .. } => {
            if store.is_empty() {
                println!("No sources loaded");
            }
            for fragment in store.sources() {
                println!(
                    "{} {} {} {}",
                    fragment.name().cyan(),
                    format!("priority={}", fragment.priority()).as_str().yellow(),
                    fragment.source_type().dimmed(),
                    fragment.path().unwrap_or("-")
                );
            }
        }
        Command::Which { path, .. } => match store.provenance(&path) {
            Some(fragment) => println!(
                "{} {} {}",
                "✓".green(),
                fragment.name().cyan(),
                fragment.path().unwrap_or("-").dimmed()
            ),
            None => return Err(eyre::eyre!("Path not found: {}", path)),
        },
    }

    Ok(())
}
