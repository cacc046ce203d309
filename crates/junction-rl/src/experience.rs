//! Experience tuples fed to the learner

use serde::{Deserialize, Serialize};

use crate::state::{Action, Reward, State};

/// A single experience tuple (s, a, r, s', done)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: State,
    pub action: Action,
    pub reward: Reward,
    pub next_state: State,
    /// Accepted for interface completeness; the intersection never terminates
    pub done: bool,
}

impl Experience {
    /// Create a new experience
    pub fn new(
        state: State,
        action: Action,
        reward: Reward,
        next_state: State,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }
}
