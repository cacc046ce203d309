//! Configuration for the simulation, the learning agent and logging
//!
//! Every section deserializes with defaults, so a partial file (or none at
//! all) yields a usable configuration. Call [`JunctionConfig::validate`]
//! before building a world or an agent from it.

use serde::{Deserialize, Serialize};

use crate::error::{JunctionError, Result};
use crate::types::{Direction, EntityKind};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JunctionConfig {
    pub simulation: SimulationConfig,
    pub learning: LearningConfig,
    pub logging: LoggingConfig,
}

impl JunctionConfig {
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.learning.validate()?;
        self.logging.validate()
    }
}

/// Stop-line bands: inclusive `[lo, hi]` intervals on the leading-edge
/// coordinate at which an entity checks the signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLineBands {
    pub north: [f64; 2],
    pub south: [f64; 2],
    pub east: [f64; 2],
    pub west: [f64; 2],
}

impl StopLineBands {
    /// Bands just outside a crossing of two roads of `road_width` centred
    /// in a `width` x `height` field
    pub fn derive(width: f64, height: f64, road_width: f64, depth: f64) -> Self {
        let half = road_width / 2.0;
        let (cx, cy) = (width / 2.0, height / 2.0);
        Self {
            north: [cy + half, cy + half + depth],
            south: [cy - half - depth, cy - half],
            east: [cx - half - depth, cx - half],
            west: [cx + half, cx + half + depth],
        }
    }

    pub fn band(&self, direction: Direction) -> [f64; 2] {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    /// Whether a leading edge at `edge` lies inside the band for `direction`
    pub fn contains(&self, direction: Direction, edge: f64) -> bool {
        let [lo, hi] = self.band(direction);
        edge >= lo && edge <= hi
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: f64,
    pub height: f64,
    pub frame_rate: u32,
    /// Expected spawns per second; 0 disables spawning
    pub spawn_rate: f64,
    pub entity_speed: f64,
    pub entity_kind: EntityKind,
    /// Phase length in manual (timer-driven) mode
    pub manual_phase_ticks: u32,
    pub road_width: f64,
    pub stop_line_depth: f64,
    /// How far past the field edge entities still count as on the field
    pub despawn_margin: f64,
    /// Distance between the field edge and a freshly spawned entity
    pub spawn_gap: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_line_bands: Option<StopLineBands>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            frame_rate: 60,
            spawn_rate: 0.75,
            entity_speed: 2.0,
            entity_kind: EntityKind::Vehicle,
            manual_phase_ticks: 360,
            road_width: 100.0,
            stop_line_depth: 10.0,
            despawn_margin: 50.0,
            spawn_gap: 20.0,
            stop_line_bands: None,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Ticks between spawn attempts, or `None` when spawning is disabled
    pub fn spawn_interval(&self) -> Option<f64> {
        if self.spawn_rate > 0.0 {
            Some(f64::from(self.frame_rate) / self.spawn_rate)
        } else {
            None
        }
    }

    /// Explicit bands if configured, otherwise derived from the geometry
    pub fn stop_line_bands(&self) -> StopLineBands {
        self.stop_line_bands.unwrap_or_else(|| {
            StopLineBands::derive(
                self.width,
                self.height,
                self.road_width,
                self.stop_line_depth,
            )
        })
    }

    pub fn validate(&self) -> Result<()> {
        positive("simulation.width", self.width)?;
        positive("simulation.height", self.height)?;
        positive("simulation.entity_speed", self.entity_speed)?;
        positive("simulation.road_width", self.road_width)?;
        positive("simulation.stop_line_depth", self.stop_line_depth)?;

        if self.frame_rate == 0 {
            return Err(config_error("simulation.frame_rate must be positive"));
        }
        if self.manual_phase_ticks == 0 {
            return Err(config_error(
                "simulation.manual_phase_ticks must be positive",
            ));
        }
        if !self.spawn_rate.is_finite() || self.spawn_rate < 0.0 {
            return Err(config_error(format!(
                "simulation.spawn_rate must be a finite non-negative number, got {}",
                self.spawn_rate
            )));
        }
        if self.road_width >= self.width.min(self.height) {
            return Err(config_error(
                "simulation.road_width must fit inside the field",
            ));
        }
        non_negative("simulation.spawn_gap", self.spawn_gap)?;
        non_negative("simulation.despawn_margin", self.despawn_margin)?;
        if self.spawn_gap >= self.despawn_margin {
            return Err(config_error(
                "simulation.spawn_gap must be smaller than simulation.despawn_margin",
            ));
        }

        let bands = self.stop_line_bands();
        for direction in Direction::ALL {
            let [lo, hi] = bands.band(direction);
            let limit = match direction {
                Direction::North | Direction::South => self.height,
                Direction::East | Direction::West => self.width,
            };
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(config_error(format!(
                    "stop line band for {direction} is not an interval: [{lo}, {hi}]"
                )));
            }
            if lo < 0.0 || hi > limit {
                return Err(config_error(format!(
                    "stop line band for {direction} lies outside the field: [{lo}, {hi}]"
                )));
            }
            // A narrower band could be stepped over without ever being observed
            if hi - lo < self.entity_speed {
                return Err(config_error(format!(
                    "stop line band for {direction} is narrower than entity_speed {}",
                    self.entity_speed
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub exploration_rate: f64,
    pub exploration_decay: f64,
    pub min_exploration_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            exploration_rate: 1.0,
            exploration_decay: 0.9995,
            min_exploration_rate: 0.01,
            seed: None,
        }
    }
}

impl LearningConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(config_error(format!(
                "learning.learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(config_error(format!(
                "learning.discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(config_error(format!(
                "learning.exploration_rate must be in [0, 1], got {}",
                self.exploration_rate
            )));
        }
        if !(self.exploration_decay > 0.0 && self.exploration_decay <= 1.0) {
            return Err(config_error(format!(
                "learning.exploration_decay must be in (0, 1], got {}",
                self.exploration_decay
            )));
        }
        let floor_range = 0.0..=self.exploration_rate;
        if !floor_range.contains(&self.min_exploration_rate) {
            return Err(config_error(format!(
                "learning.min_exploration_rate must be in [0, {}], got {}",
                self.exploration_rate, self.min_exploration_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Frames between progress reports
    pub report_interval: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            report_interval: 100,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.report_interval == 0 {
            return Err(config_error("logging.report_interval must be positive"));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> JunctionError {
    JunctionError::Config(message.into())
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(config_error(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(config_error(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}
