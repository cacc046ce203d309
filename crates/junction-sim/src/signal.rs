//! Two-phase traffic signal

use serde::{Deserialize, Serialize};

use junction_core::{Axis, Phase};

/// The intersection's single traffic light
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    phase: Phase,
    timer: u32,
    phase_ticks: u32,
}

impl Signal {
    /// Start north/south green with a full countdown of `phase_ticks`
    pub fn new(phase_ticks: u32) -> Self {
        Self {
            phase: Phase::NorthSouthGreen,
            timer: phase_ticks,
            phase_ticks,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks left before the timer-driven flip
    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn is_red_for(&self, axis: Axis) -> bool {
        self.phase.is_red_for(axis)
    }

    /// Set the phase explicitly. The countdown is left alone.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Advance the manual-mode countdown by one tick, flipping the phase
    /// and restarting the countdown when it runs out. Returns true on a flip.
    pub fn countdown(&mut self) -> bool {
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.phase = self.phase.flipped();
            self.timer = self.phase_ticks;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.phase_ticks);
    }
}
