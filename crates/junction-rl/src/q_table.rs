//! Sparse Q-value storage
//!
//! Missing `(state, action)` pairs read as 0.0 and are only materialized
//! when written.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use junction_core::Result;

use crate::state::{Action, State};

/// Q-table keyed by `(state, action)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<QEntry>", into = "Vec<QEntry>")]
pub struct QTable {
    values: HashMap<(State, Action), f64>,
}

/// One table entry in flat form, used for serialization since JSON maps
/// need string keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QEntry {
    pub state: State,
    pub action: Action,
    pub value: f64,
}

impl QEntry {
    fn sort_key(&self) -> (usize, usize, usize) {
        let State {
            north_south,
            east_west,
        } = self.state;
        (north_south, east_west, self.action.to_index())
    }
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value, or 0.0 when the pair was never written
    pub fn get(&self, state: &State, action: Action) -> f64 {
        self.values.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Highest value over all actions in `state`
    pub fn max_value(&self, state: &State) -> f64 {
        Action::ALL
            .iter()
            .map(|&a| self.get(state, a))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for `state`, ties going to the lowest action index
    pub fn best_action(&self, state: &State) -> Action {
        let mut best = Action::ALL[0];
        let mut best_value = self.get(state, best);
        for &action in &Action::ALL[1..] {
            let value = self.get(state, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// Number of materialized entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct states with at least one stored value
    pub fn state_count(&self) -> usize {
        let mut states: Vec<&State> = self.values.keys().map(|(s, _)| s).collect();
        states.sort_by_key(|s| (s.north_south, s.east_west));
        states.dedup();
        states.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, Action, f64)> {
        self.values.iter().map(|((s, a), v)| (s, *a, *v))
    }

    /// Write the table as JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a table previously written by [`QTable::save_json`]
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl From<Vec<QEntry>> for QTable {
    fn from(entries: Vec<QEntry>) -> Self {
        Self {
            values: entries
                .into_iter()
                .map(|e| ((e.state, e.action), e.value))
                .collect(),
        }
    }
}

impl From<QTable> for Vec<QEntry> {
    fn from(table: QTable) -> Self {
        let mut entries: Vec<QEntry> = table
            .values
            .into_iter()
            .map(|((state, action), value)| QEntry {
                state,
                action,
                value,
            })
            .collect();
        entries.sort_by_key(QEntry::sort_key);
        entries
    }
}
