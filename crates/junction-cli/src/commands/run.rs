//! Run the intersection

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use junction_core::JunctionConfig;
use junction_rl::QTable;

use crate::controller::{Controller, Pacing, StopReason};
use crate::input::{spawn_ctrl_c_handler, spawn_stdin_reader, ChannelInput};
use crate::render::LogRenderer;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Stop after this many frames
    #[arg(short, long)]
    pub frames: Option<u64>,

    /// Start under timer control instead of the agent
    #[arg(long)]
    pub manual: bool,

    /// Run frames as fast as possible instead of at the configured frame rate
    #[arg(long)]
    pub fast: bool,

    /// Seed both the world and the agent for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start the agent from a saved Q-table
    #[arg(long, value_name = "PATH")]
    pub load_q_table: Option<PathBuf>,

    /// Save the agent's Q-table when the run ends
    #[arg(long, value_name = "PATH")]
    pub save_q_table: Option<PathBuf>,

    /// Ignore stdin commands (t: toggle control, r: reset, q: quit)
    #[arg(long)]
    pub no_input: bool,
}

pub async fn run(args: RunArgs, config: JunctionConfig) -> Result<()> {
    let (controller, reason) = execute(args, config).await?;
    print_summary(&controller, reason)
}

/// Build the controller, drive it to completion and save the Q-table if asked
async fn execute(args: RunArgs, mut config: JunctionConfig) -> Result<(Controller, StopReason)> {
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
        config.learning.seed = Some(seed.wrapping_add(1));
    }

    let frame_rate = config.simulation.frame_rate;
    let report_interval = config.logging.report_interval;

    let mut controller = Controller::new(config)?;
    if let Some(path) = &args.load_q_table {
        let table = QTable::load_json(path)
            .with_context(|| format!("Failed to load Q-table from {}", path.display()))?;
        controller = controller.with_q_table(table)?;
    }
    controller.set_ai_enabled(!args.manual);

    let (tx, mut input) = ChannelInput::new();
    if !args.no_input {
        spawn_stdin_reader(tx.clone());
        println!("Commands: t = toggle control, r = reset, q = quit");
    }
    spawn_ctrl_c_handler(tx);

    let pacing = if args.fast {
        Pacing::Unpaced
    } else {
        Pacing::from_frame_rate(frame_rate)
    };
    let mut renderer = LogRenderer::new(report_interval);

    let mode = if args.manual { "timer" } else { "agent" };
    info!(
        "Running with {} control{}",
        mode,
        args.frames
            .map(|n| format!(" for {n} frames"))
            .unwrap_or_default()
    );

    let reason = controller
        .drive(&mut input, &mut renderer, pacing, args.frames)
        .await?;
    info!("Run stopped: {:?}", reason);

    if let Some(path) = &args.save_q_table {
        save_q_table(&controller, path)?;
    }

    Ok((controller, reason))
}

fn save_q_table(controller: &Controller, path: &Path) -> Result<()> {
    let table = controller.engine().q_table();
    table
        .save_json(path)
        .with_context(|| format!("Failed to save Q-table to {}", path.display()))?;
    info!(
        "Saved Q-table with {} entries to {}",
        table.len(),
        path.display()
    );
    Ok(())
}

fn print_summary(controller: &Controller, reason: StopReason) -> Result<()> {
    let world = controller.world();

    println!("\nRun Summary");
    println!("===========");
    println!("Stopped:        {reason:?}");
    println!("Entity kind:    {:?}", world.config().entity_kind);
    println!("Frames:         {}", controller.frame_count());
    println!("Spawned:        {}", world.total_spawned());
    println!("On field:       {}", world.entities().len());
    println!("Waiting:        {}", world.currently_waiting());
    println!("Phase:          {}", world.phase());
    println!("Total reward:   {:.2}", controller.total_reward());
    let stats = serde_json::to_string_pretty(&controller.stats())
        .context("Failed to render stats")?;
    println!("\nAgent");
    println!("{stats}");

    Ok(())
}
