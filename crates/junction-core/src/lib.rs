//! Junction Core - Core types, errors and configuration
//!
//! This crate provides the foundational types shared by the simulation,
//! the learning agent and the CLI.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{JunctionConfig, LearningConfig, LoggingConfig, SimulationConfig, StopLineBands};
pub use error::{JunctionError, Result};
pub use types::*;
