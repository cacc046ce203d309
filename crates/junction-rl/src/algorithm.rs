//! RL Algorithm trait and the tabular Q-learning implementation

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use junction_core::LearningConfig;

use crate::experience::Experience;
use crate::q_table::QTable;
use crate::state::{Action, State};

/// Trait for RL algorithms
pub trait RLAlgorithm: Send + Sync {
    /// Algorithm name
    fn name(&self) -> &str;

    /// Pick an action for `state`, exploring or exploiting
    fn choose_action(&mut self, state: &State) -> Action;

    /// Learn from one experience. Returns the squared TD error.
    fn learn(&mut self, experience: &Experience) -> Result<f64>;

    /// Current probability of taking a random action
    fn exploration_rate(&self) -> f64;

    /// Learned value table
    fn q_table(&self) -> &QTable;

    /// Get algorithm parameters as JSON
    fn get_params(&self) -> serde_json::Value;
}

/// Q-Learning implementation (tabular, epsilon-greedy)
pub struct QLearning<R: Rng = StdRng> {
    q_table: QTable,
    learning_rate: f64,
    discount_factor: f64,
    exploration_rate: f64,
    exploration_decay: f64,
    min_exploration_rate: f64,
    rng: R,
}

impl QLearning<StdRng> {
    /// Create an agent seeded from `config.seed`, or from entropy when unset
    pub fn new(config: &LearningConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> QLearning<R> {
    /// Create an agent drawing exploration decisions from `rng`
    pub fn with_rng(config: &LearningConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            exploration_rate: config.exploration_rate,
            exploration_decay: config.exploration_decay,
            min_exploration_rate: config.min_exploration_rate,
            rng,
        })
    }

    /// Start from previously learned values instead of an empty table
    pub fn with_q_table(mut self, q_table: QTable) -> Self {
        self.q_table = q_table;
        self
    }

    pub fn q_value(&self, state: &State, action: Action) -> f64 {
        self.q_table.get(state, action)
    }

    /// Overwrite one value
    pub fn set_q_value(&mut self, state: State, action: Action, value: f64) {
        self.q_table.set(state, action, value);
    }
}

impl<R: Rng + Send + Sync> RLAlgorithm for QLearning<R> {
    fn name(&self) -> &str {
        "q_learning"
    }

    fn choose_action(&mut self, state: &State) -> Action {
        if self.rng.gen::<f64>() < self.exploration_rate {
            Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
        } else {
            self.q_table.best_action(state)
        }
    }

    fn learn(&mut self, exp: &Experience) -> Result<f64> {
        if !exp.reward.is_finite() {
            bail!("Reward must be finite, got {}", exp.reward);
        }

        // `done` never short-circuits the target: the task is continuing
        let current_q = self.q_table.get(&exp.state, exp.action);
        let max_next_q = self.q_table.max_value(&exp.next_state);
        let target = exp.reward + self.discount_factor * max_next_q;

        let new_q = current_q + self.learning_rate * (target - current_q);
        self.q_table.set(exp.state, exp.action, new_q);

        let decayed = self.exploration_rate * self.exploration_decay;
        self.exploration_rate = decayed.max(self.min_exploration_rate);

        Ok((target - current_q).powi(2))
    }

    fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn get_params(&self) -> serde_json::Value {
        serde_json::json!({
            "learning_rate": self.learning_rate,
            "discount_factor": self.discount_factor,
            "exploration_rate": self.exploration_rate,
            "exploration_decay": self.exploration_decay,
            "min_exploration_rate": self.min_exploration_rate,
            "q_table_size": self.q_table.len()
        })
    }
}
