//! Stop when any cluster crosses a metric threshold.

use adaptive_types::{ClusteringSummary, Comparison};
use tracing::debug;

/// Stops as soon as one cluster's metric satisfies the comparison.
///
/// Clusters without a value in the configured column are skipped.
#[derive(Clone, Debug)]
pub struct SingleMetric {
    column: usize,
    threshold: f64,
    comparison: Comparison,
}

impl SingleMetric {
    /// Test report column `column` against `threshold`.
    pub fn new(column: usize, threshold: f64, comparison: Comparison) -> Self {
        Self {
            column,
            threshold,
            comparison,
        }
    }

    /// Report column being tested.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Threshold value.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Comparison direction.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Whether any cluster satisfies the comparison.
    pub fn check(&self, clustering: &dyn ClusteringSummary) -> bool {
        let hit = clustering
            .metrics_in_column(self.column)
            .position(|metric| metric.is_some_and(|m| self.comparison.holds(m, self.threshold)));

        if let Some(cluster) = hit {
            debug!(cluster, column = self.column, "Cluster metric crossed threshold");
        }
        hit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptive_test_helpers::StaticClustering;

    #[test]
    fn test_any_cluster_above() {
        let condition = SingleMetric::new(4, 5.0, Comparison::GreaterThan);
        let clustering = StaticClustering::with_metric_column(4, &[Some(1.0), Some(6.0), Some(2.0)]);
        assert!(condition.check(&clustering));
    }

    #[test]
    fn test_no_cluster_above() {
        let condition = SingleMetric::new(4, 5.0, Comparison::GreaterThan);
        let clustering = StaticClustering::with_metric_column(4, &[Some(1.0), Some(5.0), Some(2.0)]);
        assert!(!condition.check(&clustering));
    }

    #[test]
    fn test_cluster_without_metric_is_skipped() {
        let condition = SingleMetric::new(4, 5.0, Comparison::GreaterThan);

        let only_missing = StaticClustering::with_metric_column(4, &[None, None]);
        assert!(!condition.check(&only_missing));

        let mixed = StaticClustering::with_metric_column(4, &[None, Some(6.0)]);
        assert!(condition.check(&mixed));
    }

    #[test]
    fn test_less_than() {
        let condition = SingleMetric::new(5, 2.0, Comparison::LessThan);
        let clustering = StaticClustering::with_metric_column(5, &[Some(3.0), Some(1.9)]);
        assert!(condition.check(&clustering));
    }

    #[test]
    fn test_stateless_between_calls() {
        let condition = SingleMetric::new(4, 5.0, Comparison::GreaterThan);
        let clustering = StaticClustering::with_metric_column(4, &[Some(6.0)]);
        assert!(condition.check(&clustering));
        assert!(condition.check(&clustering));
        assert!(!condition.check(&StaticClustering::default()));
    }
}
