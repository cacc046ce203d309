//! State, Action, and Reward types for RL

use serde::{Deserialize, Serialize};

use junction_core::{JunctionError, Phase};

pub use junction_core::{Reward, State};

/// Action in the RL environment: which axis gets the green light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Give right-of-way to north/south traffic
    NorthSouthGreen,

    /// Give right-of-way to east/west traffic
    EastWestGreen,
}

impl Action {
    /// Every action, in index order
    pub const ALL: [Action; 2] = [Action::NorthSouthGreen, Action::EastWestGreen];

    /// Convert action to index for the discrete action space
    pub fn to_index(self) -> usize {
        match self {
            Action::NorthSouthGreen => 0,
            Action::EastWestGreen => 1,
        }
    }

    /// Create action from index. Out-of-range indices are an error, never clamped.
    pub fn from_index(index: usize) -> Result<Self, JunctionError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(JunctionError::InvalidAction(index))
    }

    /// Number of discrete actions
    pub fn action_space_size() -> usize {
        Self::ALL.len()
    }

    /// Signal phase this action selects
    pub fn phase(self) -> Phase {
        self.into()
    }
}

impl From<Action> for Phase {
    fn from(action: Action) -> Self {
        match action {
            Action::NorthSouthGreen => Phase::NorthSouthGreen,
            Action::EastWestGreen => Phase::EastWestGreen,
        }
    }
}

impl From<Phase> for Action {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::NorthSouthGreen => Action::NorthSouthGreen,
            Phase::EastWestGreen => Action::EastWestGreen,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.phase())
    }
}
