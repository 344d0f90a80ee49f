//! Read-only view of a clustering result.

/// The two queries exit conditions make against a clustering.
///
/// The clustering algorithm itself lives outside this engine; exit conditions
/// only need the cluster count and per-cluster metric lookups.
pub trait ClusteringSummary {
    /// Number of clusters currently known.
    fn number_of_clusters(&self) -> usize;

    /// Metric value recorded for `cluster` at report column `column`.
    ///
    /// Returns `None` when the cluster carries no metrics.
    fn metric_from_column(&self, cluster: usize, column: usize) -> Option<f64>;

    /// Iterate the metric at `column` for every cluster, in cluster order.
    fn metrics_in_column(&self, column: usize) -> Box<dyn Iterator<Item = Option<f64>> + '_> {
        Box::new((0..self.number_of_clusters()).map(move |c| self.metric_from_column(c, column)))
    }
}
