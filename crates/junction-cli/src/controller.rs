//! Run controller - owns the world and the agent and drives the frame loop

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use junction_core::{JunctionConfig, State};
use junction_rl::{EngineStats, Experience, QLearning, QTable, RLEngine};
use junction_sim::World;

use crate::input::{ControlEvent, InputSource};
use crate::render::{FrameView, Renderer};

/// How frames are spaced in wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// One frame per period
    Realtime(Duration),
    /// As fast as possible
    Unpaced,
}

impl Pacing {
    pub fn from_frame_rate(frame_rate: u32) -> Self {
        let period = 1.0 / f64::from(frame_rate.max(1));
        Self::Realtime(Duration::from_secs_f64(period))
    }
}

/// Why the run loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    FrameLimit,
    Quit,
}

/// Owns one world and one agent
pub struct Controller {
    config: JunctionConfig,
    world: World,
    engine: RLEngine,
    ai_enabled: bool,
    state: State,
    frame: u64,
    total_reward: f64,
}

impl Controller {
    /// Build a fresh world and agent from validated configuration
    pub fn new(config: JunctionConfig) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let world = World::new(config.simulation.clone())
            .context("Failed to create world")?;
        let engine = RLEngine::new(&config.learning)?;
        let state = world.get_state();

        Ok(Self {
            config,
            world,
            engine,
            ai_enabled: true,
            state,
            frame: 0,
            total_reward: 0.0,
        })
    }

    /// Replace the agent with one starting from a saved table
    pub fn with_q_table(mut self, q_table: QTable) -> Result<Self> {
        info!("Starting from saved Q-table with {} entries", q_table.len());
        let agent = QLearning::new(&self.config.learning)
            .context("Failed to create Q-learning agent")?
            .with_q_table(q_table);
        self.engine = RLEngine::with_algorithm(Box::new(agent));
        Ok(self)
    }

    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.ai_enabled = enabled;
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// Frames since start or the last reset
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Sum of rewards collected in agent mode since start or the last reset
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn engine(&self) -> &RLEngine {
        &self.engine
    }

    pub fn stats(&self) -> EngineStats {
        self.engine.stats()
    }

    /// Apply one operator command. Returns false when the loop should stop.
    pub fn handle(&mut self, event: ControlEvent) -> Result<bool> {
        match event {
            ControlEvent::ToggleAi => {
                self.ai_enabled = !self.ai_enabled;
                info!(
                    "Signal control: {}",
                    if self.ai_enabled { "agent" } else { "timer" }
                );
            }
            ControlEvent::Reset => self.reset()?,
            ControlEvent::Quit => {
                info!("Quit requested");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Discard the world and the agent, keeping the control mode
    pub fn reset(&mut self) -> Result<()> {
        self.world.reset();
        self.engine = RLEngine::new(&self.config.learning)?;
        self.state = self.world.get_state();
        self.frame = 0;
        self.total_reward = 0.0;
        info!("Simulation reset");
        Ok(())
    }

    /// Run one frame in the current control mode
    pub fn frame(&mut self) -> Result<()> {
        if self.ai_enabled {
            let action = self.engine.choose_action(&self.state);
            let outcome = self.world.step(action.phase());
            self.engine.learn(&Experience::new(
                self.state,
                action,
                outcome.reward,
                outcome.state,
                outcome.done,
            ))?;
            self.total_reward += outcome.reward;
            self.state = outcome.state;
        } else {
            self.world.tick();
            self.state = self.world.get_state();
        }

        self.frame += 1;
        Ok(())
    }

    /// Snapshot for renderers
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            frame: self.frame,
            phase: self.world.phase(),
            signal_timer: self.world.signal().timer(),
            entities: self.world.entities(),
            state: self.state,
            total_spawned: self.world.total_spawned(),
            currently_waiting: self.world.currently_waiting(),
            ai_enabled: self.ai_enabled,
            total_reward: self.total_reward,
            exploration_rate: self.engine.exploration_rate(),
            q_table_size: self.engine.q_table().len(),
        }
    }

    /// Run frames until `max_frames` have run or a quit command arrives.
    ///
    /// Input is drained before each frame and the renderer sees every frame.
    pub async fn drive<I, D>(
        &mut self,
        input: &mut I,
        renderer: &mut D,
        pacing: Pacing,
        max_frames: Option<u64>,
    ) -> Result<StopReason>
    where
        I: InputSource,
        D: Renderer,
    {
        let mut interval = match pacing {
            Pacing::Realtime(period) => {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                Some(interval)
            }
            Pacing::Unpaced => None,
        };

        let mut frames_run = 0u64;
        loop {
            if max_frames.is_some_and(|max| frames_run >= max) {
                debug!("Frame limit reached after {} frames", frames_run);
                return Ok(StopReason::FrameLimit);
            }

            match interval.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => tokio::task::yield_now().await,
            }

            for event in input.poll() {
                if !self.handle(event)? {
                    return Ok(StopReason::Quit);
                }
            }

            self.frame()?;
            frames_run += 1;
            renderer.draw(&self.view());
        }
    }
}
