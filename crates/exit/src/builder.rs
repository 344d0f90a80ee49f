//! Construction of exit conditions from configuration.

use crate::{
    ClusterPlateau, ExitCondition, ExitConditionBlock, ExitConditionKind, ExitConfigError,
    MultiTrajectoryMetric, SingleMetric,
};
use adaptive_types::{Comparison, IndexedFileName};

/// Builds an [`ExitCondition`] from its configuration block.
#[derive(Clone, Debug)]
pub struct ExitConditionBuilder {
    processors: usize,
    report_name: Option<IndexedFileName>,
}

impl ExitConditionBuilder {
    /// Builder for a batch of `processors` workers.
    pub fn new(processors: usize) -> Self {
        Self {
            processors,
            report_name: None,
        }
    }

    /// Set the report naming pattern, needed by the multi-trajectory condition.
    pub fn with_report_name(mut self, report_name: IndexedFileName) -> Self {
        self.report_name = Some(report_name);
        self
    }

    /// Build the condition the block describes.
    pub fn build(&self, block: &ExitConditionBlock) -> Result<ExitCondition, ExitConfigError> {
        let kind: ExitConditionKind = block.kind.parse()?;
        let params = &block.params;
        let kind_name = kind.as_str();
        let missing = |parameter| ExitConfigError::MissingParameter {
            kind: kind_name,
            parameter,
        };

        match kind {
            ExitConditionKind::ClusterPlateau => {
                let trajectories = params.trajectories.ok_or_else(|| missing("trajectories"))?;
                Ok(ClusterPlateau::new(trajectories).into())
            }
            ExitConditionKind::SingleMetric => {
                let column = params.metric_col.ok_or_else(|| missing("metricCol"))?;
                let threshold = params.exit_value.ok_or_else(|| missing("exitValue"))?;
                let comparison = parse_comparison(kind_name, params.condition.as_deref())?;
                Ok(SingleMetric::new(column, threshold, comparison).into())
            }
            ExitConditionKind::MultiTrajectoryMetric => {
                let column = params.metric_col.ok_or_else(|| missing("metricCol"))?;
                let threshold = params.exit_value.ok_or_else(|| missing("exitValue"))?;
                let target = params.num_trajs.ok_or_else(|| missing("numTrajs"))?;
                let comparison = parse_comparison(kind_name, params.condition.as_deref())?;
                let report_name = self
                    .report_name
                    .clone()
                    .ok_or(ExitConfigError::MissingReportName(kind_name))?;
                Ok(MultiTrajectoryMetric::new(
                    column,
                    threshold,
                    comparison,
                    report_name,
                    target,
                    self.processors,
                )
                .into())
            }
        }
    }
}

fn parse_comparison(kind: &'static str, condition: Option<&str>) -> Result<Comparison, ExitConfigError> {
    match condition {
        None => Ok(Comparison::default()),
        Some(symbol) => symbol
            .parse()
            .map_err(|source| ExitConfigError::InvalidComparison { kind, source }),
    }
}
