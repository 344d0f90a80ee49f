//! Stop when new epochs stop discovering clusters.

use adaptive_types::ClusteringSummary;
use tracing::debug;

/// Fraction of an epoch's trajectories that must turn into new clusters for
/// sampling to continue.
const MIN_NEW_CLUSTERS_PER_TRAJECTORY: f64 = 0.1;

/// Stops once an epoch adds fewer than `0.1 * trajectories_per_epoch` clusters.
///
/// Remembers the cluster count from the previous call and overwrites it on
/// every call, including the one that returns `true`.
#[derive(Clone, Debug)]
pub struct ClusterPlateau {
    trajectories_per_epoch: usize,
    last_count: usize,
}

impl ClusterPlateau {
    /// Create a plateau check for epochs of `trajectories_per_epoch`.
    pub fn new(trajectories_per_epoch: usize) -> Self {
        Self {
            trajectories_per_epoch,
            last_count: 0,
        }
    }

    /// Cluster count seen on the previous call.
    pub fn last_count(&self) -> usize {
        self.last_count
    }

    /// Record the current cluster count and decide whether to stop.
    pub fn check(&mut self, clustering: &dyn ClusteringSummary) -> bool {
        let count = clustering.number_of_clusters();
        let new_clusters = count as f64 - self.last_count as f64;
        self.last_count = count;

        let threshold = MIN_NEW_CLUSTERS_PER_TRAJECTORY * self.trajectories_per_epoch as f64;
        debug!(count, new_clusters, threshold, "Cluster plateau check");
        new_clusters < threshold
    }
}
