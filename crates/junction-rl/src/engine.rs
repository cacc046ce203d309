//! RL Engine - Coordinates action selection, learning and statistics

use anyhow::{Context, Result};
use tracing::{debug, info};

use junction_core::LearningConfig;

use crate::algorithm::{QLearning, RLAlgorithm};
use crate::experience::Experience;
use crate::q_table::QTable;
use crate::state::{Action, State};

/// RL Engine wrapping one algorithm with running statistics
pub struct RLEngine {
    algorithm: Box<dyn RLAlgorithm>,
    total_steps: u64,
    total_rewards: f64,
    last_loss: f64,
}

impl RLEngine {
    /// Create an engine running Q-learning with the given parameters
    pub fn new(config: &LearningConfig) -> Result<Self> {
        let algorithm = QLearning::new(config).context("Failed to create Q-learning agent")?;
        Ok(Self::with_algorithm(Box::new(algorithm)))
    }

    /// Create an engine around an already-built algorithm
    pub fn with_algorithm(algorithm: Box<dyn RLAlgorithm>) -> Self {
        info!(
            "RL engine initialized with algorithm: {}, exploration: {:.3}",
            algorithm.name(),
            algorithm.exploration_rate()
        );
        Self {
            algorithm,
            total_steps: 0,
            total_rewards: 0.0,
            last_loss: 0.0,
        }
    }

    /// Get the active algorithm name
    pub fn algorithm_name(&self) -> &str {
        self.algorithm.name()
    }

    /// Choose the next action for a state
    pub fn choose_action(&mut self, state: &State) -> Action {
        self.algorithm.choose_action(state)
    }

    /// Learn from one transition and record its reward
    pub fn learn(&mut self, experience: &Experience) -> Result<f64> {
        let loss = self.algorithm.learn(experience)?;

        self.total_steps += 1;
        self.total_rewards += experience.reward;
        self.last_loss = loss;

        if self.total_steps % 1000 == 0 {
            debug!(
                "Step {}: loss {:.4}, exploration {:.4}, table size {}",
                self.total_steps,
                loss,
                self.algorithm.exploration_rate(),
                self.algorithm.q_table().len()
            );
        }

        Ok(loss)
    }

    pub fn exploration_rate(&self) -> f64 {
        self.algorithm.exploration_rate()
    }

    pub fn q_table(&self) -> &QTable {
        self.algorithm.q_table()
    }

    /// Get statistics
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_steps: self.total_steps,
            total_rewards: self.total_rewards,
            average_reward: if self.total_steps > 0 {
                self.total_rewards / self.total_steps as f64
            } else {
                0.0
            },
            last_loss: self.last_loss,
            exploration_rate: self.algorithm.exploration_rate(),
            q_table_size: self.algorithm.q_table().len(),
            algorithm: self.algorithm.name().to_string(),
        }
    }

    /// Get algorithm parameters
    pub fn get_algorithm_params(&self) -> serde_json::Value {
        self.algorithm.get_params()
    }
}

/// Engine statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineStats {
    pub total_steps: u64,
    pub total_rewards: f64,
    pub average_reward: f64,
    pub last_loss: f64,
    pub exploration_rate: f64,
    pub q_table_size: usize,
    pub algorithm: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_engine() -> RLEngine {
        let config = LearningConfig {
            seed: Some(42),
            ..LearningConfig::default()
        };
        RLEngine::new(&config).unwrap()
    }

    fn transition(reward: f64) -> Experience {
        Experience::new(
            State::new(1, 2),
            Action::EastWestGreen,
            reward,
            State::new(1, 1),
            false,
        )
    }

    #[test]
    fn test_engine_creation() {
        let engine = create_test_engine();
        assert_eq!(engine.algorithm_name(), "q_learning");
        assert_eq!(engine.exploration_rate(), 1.0);
        assert!(engine.q_table().is_empty());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = LearningConfig {
            discount_factor: 2.0,
            ..LearningConfig::default()
        };
        let err = RLEngine::new(&config).err().unwrap();
        assert!(format!("{err:#}").contains("discount_factor"));
    }

    #[test]
    fn test_learn_updates_stats() {
        let mut engine = create_test_engine();
        for reward in [0.0, -1.0, -2.0, -3.0] {
            engine.learn(&transition(reward)).unwrap();
        }

        let stats = engine.stats();
        assert_eq!(stats.total_steps, 4);
        assert_eq!(stats.total_rewards, -6.0);
        assert_eq!(stats.average_reward, -1.5);
        assert_eq!(stats.q_table_size, 1);
        assert!(stats.exploration_rate < 1.0);
        assert_eq!(stats.algorithm, "q_learning");
    }

    #[test]
    fn test_stats_empty_engine() {
        let engine = create_test_engine();
        let stats = engine.stats();
        assert_eq!(stats.total_steps, 0);
        assert_eq!(stats.average_reward, 0.0);
    }

    #[test]
    fn test_choose_action_is_valid() {
        let mut engine = create_test_engine();
        for n in 0..20 {
            let action = engine.choose_action(&State::new(n, 0));
            assert!(Action::ALL.contains(&action));
        }
    }

    #[test]
    fn test_get_params() {
        let engine = create_test_engine();
        let params = engine.get_algorithm_params();
        assert!(!params.is_null());
        assert_eq!(params["exploration_decay"], 0.9995);
    }

    #[test]
    fn test_stats_serialization() {
        let engine = create_test_engine();
        let json = serde_json::to_value(engine.stats()).unwrap();
        assert_eq!(json["total_steps"], 0);
        assert_eq!(json["algorithm"], "q_learning");
    }
}
