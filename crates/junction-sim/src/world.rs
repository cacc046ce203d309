//! World - owns the entity population and the signal
//!
//! One tick is an explicit pipeline: spawn attempt, motion, despawn, then
//! reward and state extraction. [`World::step`] takes the phase from the
//! caller (agent mode), [`World::tick`] drives it from the signal's own
//! countdown (manual mode).

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use junction_core::{
    Axis, Direction, Phase, Rect, Result, Reward, SimulationConfig, State, StopLineBands,
};

use crate::entity::{Entity, EntityId};
use crate::lanes::{Lane, LaneLayout};
use crate::signal::Signal;

/// Number of cosmetic tints handed out at spawn
const TINT_COUNT: u8 = 3;

/// Result of one agent-driven step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub state: State,
    pub reward: Reward,
    /// Always false: the intersection is a continuing task
    pub done: bool,
}

/// The simulated intersection
pub struct World<R: Rng = StdRng> {
    config: SimulationConfig,
    layout: LaneLayout,
    entities: Vec<Entity>,
    signal: Signal,
    spawn_timer: u64,
    spawn_interval: Option<f64>,
    total_spawned: u64,
    currently_waiting: usize,
    next_id: u64,
    rng: R,
}

impl World<StdRng> {
    /// Create a world seeded from `config.seed`, or from entropy when unset
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> World<R> {
    /// Create a world drawing lane choices from `rng`
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let layout = LaneLayout::new(&config);
        let spawn_interval = config.spawn_interval();
        let signal = Signal::new(config.manual_phase_ticks);

        debug!(
            "World created: {}x{}, kind {:?}, spawn interval {:?} ticks",
            config.width, config.height, config.entity_kind, spawn_interval
        );

        Ok(Self {
            config,
            layout,
            entities: Vec::new(),
            signal,
            spawn_timer: 0,
            spawn_interval,
            total_spawned: 0,
            currently_waiting: 0,
            next_id: 0,
            rng,
        })
    }

    /// Discard all entities, counters and timers
    pub fn reset(&mut self) {
        self.entities.clear();
        self.signal.reset();
        self.spawn_timer = 0;
        self.total_spawned = 0;
        self.currently_waiting = 0;
        self.next_id = 0;
        debug!("World reset");
    }

    /// Advance one tick with the signal set to `phase`
    pub fn step(&mut self, phase: Phase) -> StepOutcome {
        self.signal.set_phase(phase);
        self.advance();

        StepOutcome {
            state: self.get_state(),
            reward: self.compute_reward(),
            done: false,
        }
    }

    /// Advance one tick from a raw action index
    pub fn step_index(&mut self, index: usize) -> Result<StepOutcome> {
        let phase = Phase::try_from(index)?;
        Ok(self.step(phase))
    }

    /// Advance one tick with the signal on its own countdown
    pub fn tick(&mut self) {
        self.advance();
        self.compute_reward();
        if self.signal.countdown() {
            debug!("Signal switched to {}", self.signal.phase());
        }
    }

    /// Negative count of entities held at a red stop line. Also refreshes
    /// the `currently_waiting` counter.
    pub fn compute_reward(&mut self) -> Reward {
        self.currently_waiting = self.waiting_count();
        -(self.currently_waiting as Reward)
    }

    /// Live entities per axis, stopped or not
    pub fn get_state(&self) -> State {
        let north_south = self
            .entities
            .iter()
            .filter(|e| e.axis() == Axis::NorthSouth)
            .count();
        State::new(north_south, self.entities.len() - north_south)
    }

    /// Place an entity of the configured kind with its top-left corner at
    /// `(x, y)`. Returns `None` when the spot overlaps a live entity.
    pub fn place(&mut self, direction: Direction, x: f64, y: f64) -> Option<EntityId> {
        let entity = Entity::new(
            EntityId(self.next_id),
            self.config.entity_kind,
            direction,
            self.config.entity_speed,
            x,
            y,
        );
        if self.is_occupied(&entity.rect) {
            return None;
        }
        Some(self.insert(entity))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    pub fn phase(&self) -> Phase {
        self.signal.phase()
    }

    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    pub fn currently_waiting(&self) -> usize {
        self.currently_waiting
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn bands(&self) -> &StopLineBands {
        self.layout.bands()
    }

    fn advance(&mut self) {
        self.try_spawn();
        self.move_entities();
        self.despawn();
    }

    fn try_spawn(&mut self) {
        let Some(interval) = self.spawn_interval else {
            return;
        };

        self.spawn_timer += 1;
        if (self.spawn_timer as f64) < interval {
            return;
        }
        self.spawn_timer = 0;

        let Some(&lane) = Lane::ALL.choose(&mut self.rng) else {
            return;
        };
        let rect = self.layout.spawn_rect(lane);
        if self.is_occupied(&rect) {
            trace!("Spawn on {:?} lane blocked", lane);
            return;
        }

        let tint = self.rng.gen_range(0..TINT_COUNT);
        let entity = Entity::new(
            EntityId(self.next_id),
            self.config.entity_kind,
            lane.direction(),
            self.config.entity_speed,
            rect.x,
            rect.y,
        )
        .with_tint(tint);
        let id = self.insert(entity);
        self.total_spawned += 1;
        debug!(
            "Spawned {} on {:?} lane heading {}",
            id,
            lane,
            lane.direction()
        );
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.next_id += 1;
        self.entities.push(entity);
        id
    }

    fn is_occupied(&self, rect: &Rect) -> bool {
        self.entities.iter().any(|e| e.rect.intersects(rect))
    }

    // Every entity decides against the start-of-tick positions, then all
    // unblocked entities move together.
    fn move_entities(&mut self) {
        let movable: Vec<bool> = (0..self.entities.len())
            .map(|i| self.can_move(i))
            .collect();

        for (entity, can_move) in self.entities.iter_mut().zip(movable) {
            if can_move {
                entity.advance();
            }
        }
    }

    fn can_move(&self, index: usize) -> bool {
        !self.is_blocked(index) && !self.is_held_at_red(&self.entities[index])
    }

    fn is_blocked(&self, index: usize) -> bool {
        let sensor = self.entities[index].sensor_rect();
        self.entities
            .iter()
            .enumerate()
            .any(|(j, other)| j != index && sensor.intersects(&other.rect))
    }

    fn is_held_at_red(&self, entity: &Entity) -> bool {
        self.signal.is_red_for(entity.axis())
            && self
                .layout
                .bands()
                .contains(entity.direction, entity.leading_edge())
    }

    fn waiting_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| self.is_held_at_red(e))
            .count()
    }

    fn despawn(&mut self) {
        let bounds = self.layout.bounds();
        let before = self.entities.len();
        self.entities.retain(|e| bounds.intersects(&e.rect));
        let removed = before - self.entities.len();
        if removed > 0 {
            trace!("Despawned {} entities", removed);
        }
    }
}
