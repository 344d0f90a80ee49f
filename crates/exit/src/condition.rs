//! The closed family of exit conditions.

use crate::{ClusterPlateau, ExitConditionError, ExitConfigError, MultiTrajectoryMetric, SingleMetric};
use adaptive_types::{ClusteringSummary, ReportReader};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Which exit condition a configuration block asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitConditionKind {
    /// Cluster-count plateau (`"clustering"`).
    ClusterPlateau,
    /// Any cluster crosses a metric threshold (`"metric"`).
    SingleMetric,
    /// Enough trajectories cross a metric threshold
    /// (`"metricMultipleTrajectories"`).
    MultiTrajectoryMetric,
}

impl ExitConditionKind {
    /// Configuration names of every kind.
    pub const CHOICES: [&'static str; 3] = ["metric", "metricMultipleTrajectories", "clustering"];

    /// Configuration name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ExitConditionKind::ClusterPlateau => "clustering",
            ExitConditionKind::SingleMetric => "metric",
            ExitConditionKind::MultiTrajectoryMetric => "metricMultipleTrajectories",
        }
    }
}

impl fmt::Display for ExitConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExitConditionKind {
    type Err = ExitConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clustering" => Ok(ExitConditionKind::ClusterPlateau),
            "metric" => Ok(ExitConditionKind::SingleMetric),
            "metricMultipleTrajectories" => Ok(ExitConditionKind::MultiTrajectoryMetric),
            other => Err(ExitConfigError::UnknownKind(other.to_string())),
        }
    }
}

/// A configured exit condition.
#[derive(Clone, Debug)]
pub enum ExitCondition {
    /// See [`ClusterPlateau`].
    ClusterPlateau(ClusterPlateau),
    /// See [`SingleMetric`].
    SingleMetric(SingleMetric),
    /// See [`MultiTrajectoryMetric`].
    MultiTrajectoryMetric(MultiTrajectoryMetric),
}

impl ExitCondition {
    /// The kind of this condition.
    pub fn kind(&self) -> ExitConditionKind {
        match self {
            ExitCondition::ClusterPlateau(_) => ExitConditionKind::ClusterPlateau,
            ExitCondition::SingleMetric(_) => ExitConditionKind::SingleMetric,
            ExitCondition::MultiTrajectoryMetric(_) => ExitConditionKind::MultiTrajectoryMetric,
        }
    }

    /// Evaluate after an epoch. `true` means the loop should stop.
    ///
    /// Clustering-based conditions look at `clustering`; the multi-trajectory
    /// condition ignores it and reads the epoch's reports from
    /// `output_folder` through `reader`. Mutates the condition's state.
    pub fn check(
        &mut self,
        clustering: &dyn ClusteringSummary,
        output_folder: &Path,
        reader: &dyn ReportReader,
    ) -> Result<bool, ExitConditionError> {
        let kind = self.kind();
        let stop = match self {
            ExitCondition::ClusterPlateau(condition) => condition.check(clustering),
            ExitCondition::SingleMetric(condition) => condition.check(clustering),
            ExitCondition::MultiTrajectoryMetric(condition) => {
                condition.check(output_folder, reader)?
            }
        };
        debug!(kind = %kind, stop, "Exit condition evaluated");
        Ok(stop)
    }
}

impl From<ClusterPlateau> for ExitCondition {
    fn from(condition: ClusterPlateau) -> Self {
        ExitCondition::ClusterPlateau(condition)
    }
}

impl From<SingleMetric> for ExitCondition {
    fn from(condition: SingleMetric) -> Self {
        ExitCondition::SingleMetric(condition)
    }
}

impl From<MultiTrajectoryMetric> for ExitCondition {
    fn from(condition: MultiTrajectoryMetric) -> Self {
        ExitCondition::MultiTrajectoryMetric(condition)
    }
}
