//! Exit condition configuration blocks.

use serde::Deserialize;

/// `exitCondition` block of the simulation parameters.
///
/// ```json
/// {"type": "metric", "params": {"metricCol": 5, "exitValue": 2.0, "condition": "<"}}
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct ExitConditionBlock {
    /// Exit condition type name.
    #[serde(rename = "type")]
    pub kind: String,

    /// Type-specific parameters.
    #[serde(default)]
    pub params: ExitConditionParams,
}

/// Parameters of an exit condition block. Which are required depends on the
/// type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitConditionParams {
    /// Report column of the metric (`metric`, `metricMultipleTrajectories`).
    pub metric_col: Option<usize>,

    /// Threshold value (`metric`, `metricMultipleTrajectories`).
    pub exit_value: Option<f64>,

    /// `">"` or `"<"`, defaults to `"<"`.
    pub condition: Option<String>,

    /// Qualifying trajectories needed to stop (`metricMultipleTrajectories`).
    pub num_trajs: Option<usize>,

    /// Trajectories per epoch (`clustering`).
    pub trajectories: Option<usize>,
}
