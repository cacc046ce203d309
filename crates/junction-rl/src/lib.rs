//! Junction RL - Reinforcement learning for traffic-signal control
//!
//! This crate provides a tabular Q-learning agent that picks the signal
//! phase from per-axis occupancy counts, plus an engine that tracks
//! training statistics around it.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod algorithm;
pub mod engine;
pub mod experience;
pub mod q_table;
pub mod state;

pub use algorithm::{QLearning, RLAlgorithm};
pub use engine::{EngineStats, RLEngine};
pub use experience::Experience;
pub use q_table::QTable;
pub use state::{Action, Reward, State};
