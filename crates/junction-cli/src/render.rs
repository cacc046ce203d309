//! Frame rendering
//!
//! Rendering is read-only: a renderer receives a [`FrameView`] borrowed from
//! the controller after each frame and never touches the world.

use junction_core::{Phase, State};
use junction_sim::Entity;
use tracing::info;

/// Read-only snapshot of one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub phase: Phase,
    /// Ticks left on the timer countdown
    pub signal_timer: u32,
    pub entities: &'a [Entity],
    pub state: State,
    pub total_spawned: u64,
    pub currently_waiting: usize,
    pub ai_enabled: bool,
    pub total_reward: f64,
    pub exploration_rate: f64,
    pub q_table_size: usize,
}

/// Consumer of frame snapshots
pub trait Renderer {
    fn draw(&mut self, view: &FrameView<'_>);
}

/// Logs a status line every `interval` frames
pub struct LogRenderer {
    interval: u64,
    lines: u64,
}

impl LogRenderer {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            lines: 0,
        }
    }

    /// Number of status lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, view: &FrameView<'_>) {
        if view.frame == 0 || view.frame % self.interval != 0 {
            return;
        }
        self.lines += 1;

        let mode = if view.ai_enabled { "agent" } else { "timer" };
        info!(
            frame = view.frame,
            mode,
            phase = %view.phase,
            timer = view.signal_timer,
            queue = %view.state,
            on_field = view.entities.len(),
            spawned = view.total_spawned,
            waiting = view.currently_waiting,
            "Frame {}: total reward {:.2}, exploration {:.3}, Q-table size {}",
            view.frame,
            view.total_reward,
            view.exploration_rate,
            view.q_table_size
        );
    }
}
