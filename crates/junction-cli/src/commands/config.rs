//! Configuration management commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use junction_core::JunctionConfig;

use crate::config::CONFIG_FILE_NAME;

const EXAMPLE_CONFIG: &str = include_str!("../../../../junction.toml.example");

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Initialize configuration file
    Init {
        /// Where to write the file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommands, config: &JunctionConfig, source: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config, source),
        ConfigCommands::Init { path, force } => init(&path, force).map(|_| ()),
    }
}

fn show(config: &JunctionConfig, source: Option<&Path>) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    match source {
        Some(path) => println!("Config file: {}\n", path.display()),
        None => println!("No configuration file found. Using defaults.\n"),
    }

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{rendered}");

    Ok(())
}

/// Write the example configuration. Returns false when the file exists and
/// `force` is not set.
fn init(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite");
        return Ok(false);
    }

    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Configuration file created: {}", path.display());

    Ok(true)
}
