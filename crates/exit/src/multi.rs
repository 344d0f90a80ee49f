//! Stop once enough trajectories have crossed a metric threshold.

use crate::ExitConditionError;
use adaptive_types::{Comparison, IndexedFileName, ReportReader, ReportTable};
use std::path::Path;
use tracing::debug;

/// Counts trajectories whose report reaches a threshold, across epochs.
///
/// A trajectory counts when the extreme of its metric column (maximum for
/// `>`, minimum for `<`) satisfies the comparison. The running count is
/// never reset: every call adds the qualifying trajectories of the epoch it
/// is shown, so evaluating the same epoch twice counts it twice. The
/// condition fires once the count reaches the target.
#[derive(Clone, Debug)]
pub struct MultiTrajectoryMetric {
    column: usize,
    threshold: f64,
    comparison: Comparison,
    report_name: IndexedFileName,
    target: usize,
    processors: usize,
    found: usize,
}

impl MultiTrajectoryMetric {
    /// Create the condition.
    ///
    /// Reports `1..processors` are read from each epoch folder using
    /// `report_name`; worker 0 writes no report.
    pub fn new(
        column: usize,
        threshold: f64,
        comparison: Comparison,
        report_name: IndexedFileName,
        target: usize,
        processors: usize,
    ) -> Self {
        Self {
            column,
            threshold,
            comparison,
            report_name,
            target,
            processors,
            found: 0,
        }
    }

    /// Trajectories counted so far.
    pub fn trajectories_found(&self) -> usize {
        self.found
    }

    /// Number of qualifying trajectories needed to stop.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Whether one report satisfies the comparison.
    ///
    /// An empty report has no extreme value and never qualifies.
    pub fn qualifies(&self, report: &ReportTable) -> Result<bool, ExitConditionError> {
        let values = report.column(self.column)?;
        Ok(self
            .comparison
            .extreme(values)
            .is_some_and(|extreme| self.comparison.holds(extreme, self.threshold)))
    }

    /// Count qualifying reports and decide whether to stop.
    ///
    /// All reports are checked before any are counted, so a bad report leaves
    /// the running count untouched.
    pub fn check_reports(&mut self, reports: &[ReportTable]) -> Result<bool, ExitConditionError> {
        let mut qualifying = 0;
        for report in reports {
            if self.qualifies(report)? {
                qualifying += 1;
            }
        }
        self.found += qualifying;

        debug!(
            qualifying,
            found = self.found,
            target = self.target,
            "Multi-trajectory metric check"
        );
        Ok(self.found >= self.target)
    }

    /// Read the epoch's reports from `output_folder` and check them.
    pub fn check(
        &mut self,
        output_folder: &Path,
        reader: &dyn ReportReader,
    ) -> Result<bool, ExitConditionError> {
        let reports = (1..self.processors)
            .map(|trajectory| reader.read_trajectory(output_folder, &self.report_name, trajectory))
            .collect::<Result<Vec<_>, _>>()?;
        self.check_reports(&reports)
    }
}
