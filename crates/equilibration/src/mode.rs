//! Equilibration selection modes.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Configured equilibration mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum EquilibrationMode {
    /// Score every snapshot and keep the best (`"equilibrationSelect"`).
    #[default]
    #[serde(rename = "equilibrationSelect")]
    Select,

    /// Keep each trajectory's final snapshot (`"equilibrationLastSnapshot"`).
    #[serde(rename = "equilibrationLastSnapshot")]
    LastSnapshot,
}

impl EquilibrationMode {
    /// Configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            EquilibrationMode::Select => "equilibrationSelect",
            EquilibrationMode::LastSnapshot => "equilibrationLastSnapshot",
        }
    }
}

impl fmt::Display for EquilibrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown equilibration mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown equilibration mode {0:?}! Choices are: equilibrationSelect, equilibrationLastSnapshot")]
pub struct ParseModeError(pub String);

impl FromStr for EquilibrationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equilibrationSelect" => Ok(EquilibrationMode::Select),
            "equilibrationLastSnapshot" => Ok(EquilibrationMode::LastSnapshot),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// How one equilibration run is reduced to starting structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// One final snapshot per trajectory.
    LastSnapshot,

    /// One scored winner across all trajectories.
    Scored {
        /// Report column of the similarity metric. `None` computes distance
        /// to a reference snapshot instead.
        similarity_column: Option<usize>,
    },
}

impl SelectionStrategy {
    /// Pick the strategy for an equilibration over `input_structures`.
    ///
    /// Last-snapshot selection only applies to a single input structure;
    /// with several inputs the scored selection is always used.
    pub fn choose(
        mode: EquilibrationMode,
        input_structures: usize,
        similarity_column: Option<usize>,
    ) -> Self {
        if input_structures == 1 && mode == EquilibrationMode::LastSnapshot {
            SelectionStrategy::LastSnapshot
        } else {
            SelectionStrategy::Scored { similarity_column }
        }
    }
}
