//! Configuration loading for the junction CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};

use junction_core::JunctionConfig;

/// Configuration file name looked up in the working and user config directories
pub const CONFIG_FILE_NAME: &str = "junction.toml";

/// Load configuration from file and environment, then validate it.
///
/// An explicit path must exist. Without one, the first of `./junction.toml`
/// and `~/.config/junction/junction.toml` is used if present. Environment
/// variables such as `JUNCTION_SIMULATION__SPAWN_RATE` override file values.
/// Returns the configuration and the file it was read from, if any.
pub fn load(explicit: Option<&Path>) -> Result<(JunctionConfig, Option<PathBuf>)> {
    let config_path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

    if let Some(path) = &config_path {
        let file = File::from(path.clone()).required(explicit.is_some());
        builder = builder.add_source(file);
    }

    // Environment variables with JUNCTION_ prefix
    builder = builder.add_source(
        Environment::with_prefix("JUNCTION")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config: JunctionConfig = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    config.validate().context("Invalid configuration")?;

    Ok((config, config_path))
}

/// Find the configuration file
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(home) = dirs::home_dir() {
        let user_config = home.join(".config").join("junction").join(CONFIG_FILE_NAME);
        if user_config.exists() {
            return Some(user_config);
        }
    }

    None
}
