//! Junction Sim - discrete-time simulation of a single four-way intersection
//!
//! Entities enter from the four approach lanes, follow each other with a
//! look-ahead sensor, stop at red signals and leave the field on the far
//! side. The [`World`] exposes one-tick hooks for both agent-driven and
//! timer-driven signal control.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod entity;
pub mod lanes;
pub mod signal;
pub mod world;

pub use entity::{Entity, EntityId};
pub use lanes::{Lane, LaneLayout};
pub use signal::Signal;
pub use world::{StepOutcome, World};
