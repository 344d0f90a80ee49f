//! Simulation configuration blocks.

use adaptive_exit::ExitConditionBlock;
use serde::Deserialize;
use std::path::PathBuf;

/// `simulation` block of the control tree.
///
/// ```json
/// {"type": "pele", "params": {"processors": 4, "controlFile": "templetized.conf",
///  "iterations": 10, "peleSteps": 8, "seed": 12345}}
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationRunnerBlock {
    /// Simulation type name: `pele` or `test`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Simulation parameters.
    #[serde(default)]
    pub params: SimulationParamsBlock,
}

/// Parameters of a simulation block. Which are required depends on the type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParamsBlock {
    /// Workers per batch.
    pub processors: Option<usize>,
    /// Simulation executable.
    pub executable: Option<PathBuf>,
    /// Control file template.
    pub control_file: Option<PathBuf>,
    /// Data folder linked as `Data`.
    pub data: Option<PathBuf>,
    /// Documents folder linked as `Documents`.
    pub documents: Option<PathBuf>,
    /// Number of epochs.
    pub iterations: Option<usize>,
    /// Simulation steps per epoch.
    pub pele_steps: Option<usize>,
    /// Random seed.
    pub seed: Option<u64>,
    /// Condition ending the loop early. Read for `pele` only.
    pub exit_condition: Option<ExitConditionBlock>,
    /// Moving box mode.
    pub mode_moving_box: Option<String>,
    /// Fixed exploration box center.
    pub box_center: Option<[f64; 3]>,
    /// Exploration box radius.
    pub box_radius: Option<f64>,
    /// Whether to equilibrate the input structures first.
    pub run_equilibration: Option<bool>,
    /// Equilibration selection mode name.
    pub equilibration_mode: Option<String>,
    /// Steps per equilibration run.
    pub equilibration_length: Option<usize>,
    /// Destination of the canned tree (`test` only).
    pub destination: Option<PathBuf>,
    /// Canned output tree to copy (`test` only).
    pub origin: Option<PathBuf>,
}
