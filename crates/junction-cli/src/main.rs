//! Junction CLI - runs a four-way intersection under Q-learning or timer
//! signal control.
//!
//! `junction run` paces frames at the configured frame rate and reads
//! operator commands from stdin: `t` toggles agent/timer control, `r` resets
//! the world and the agent, `q` (or ctrl-c) quits.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod controller;
mod input;
mod render;

use commands::run;

#[derive(Parser)]
#[command(name = "junction")]
#[command(author, version, long_about = None)]
#[command(about = "Junction - Q-learning traffic signal control")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./junction.toml, then ~/.config/junction/junction.toml)
    #[arg(short, long, global = true, env = "JUNCTION_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run(run::RunArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = crate::config::load(cli.config.as_deref())?;

    // Initialize logging based on verbosity, falling back to the configured level
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("junction={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &source {
        Some(path) => debug!("Loaded configuration from {}", path.display()),
        None => debug!("No configuration file found, using defaults"),
    }

    match cli.command {
        Commands::Run(args) => run::run(args, config).await,
        Commands::Config(cmd) => commands::config::run(cmd, &config, source.as_deref()),
    }
}
