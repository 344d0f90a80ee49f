//! Pooled candidate rows with per-trajectory bookkeeping.

use adaptive_types::TrajectoryIndex;

/// One recorded step considered for selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Energy of the step.
    pub energy: f64,
    /// Similarity metric of the step (RMSD, distance, ...).
    pub similarity: f64,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(energy: f64, similarity: f64) -> Self {
        Self { energy, similarity }
    }
}

/// Candidates of several trajectories stacked into one table.
///
/// Trajectories are appended in order and numbered from 1. The table keeps
/// the global row at which each trajectory starts so a selected row can be
/// traced back to its trajectory and snapshot. A trajectory with no rows
/// still takes a slot; it simply starts where the next one does.
#[derive(Clone, Debug, Default)]
pub struct CandidateTable {
    rows: Vec<Candidate>,
    offsets: Vec<usize>,
}

impl CandidateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the candidates of the next trajectory and return its index.
    pub fn push_trajectory<I>(&mut self, candidates: I) -> TrajectoryIndex
    where
        I: IntoIterator<Item = Candidate>,
    {
        self.offsets.push(self.rows.len());
        self.rows.extend(candidates);
        self.offsets.len()
    }

    /// All candidate rows.
    pub fn rows(&self) -> &[Candidate] {
        &self.rows
    }

    /// Global start row of each trajectory, in trajectory order.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of candidate rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no candidate rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of trajectories appended, including empty ones.
    pub fn num_trajectories(&self) -> usize {
        self.offsets.len()
    }

    /// Map a global row to `(trajectory, snapshot)`.
    ///
    /// The owner is the last trajectory whose start offset is at or before
    /// `row`, so empty trajectories never own a row. Trajectories are
    /// 1-indexed, snapshots 0-indexed.
    pub fn locate(&self, row: usize) -> Option<(TrajectoryIndex, usize)> {
        if row >= self.rows.len() {
            return None;
        }
        let owner = self.offsets.partition_point(|&offset| offset <= row) - 1;
        Some((owner + 1, row - self.offsets[owner]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Candidate> {
        (0..n).map(|i| Candidate::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_offsets_track_trajectory_starts() {
        let mut table = CandidateTable::new();
        assert_eq!(table.push_trajectory(rows(3)), 1);
        assert_eq!(table.push_trajectory(rows(2)), 2);
        assert_eq!(table.offsets(), &[0, 3]);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_locate() {
        let mut table = CandidateTable::new();
        table.push_trajectory(rows(3));
        table.push_trajectory(rows(2));
        table.push_trajectory(rows(4));

        assert_eq!(table.locate(0), Some((1, 0)));
        assert_eq!(table.locate(2), Some((1, 2)));
        assert_eq!(table.locate(3), Some((2, 0)));
        assert_eq!(table.locate(4), Some((2, 1)));
        assert_eq!(table.locate(5), Some((3, 0)));
        assert_eq!(table.locate(8), Some((3, 3)));
        assert_eq!(table.locate(9), None);
    }

    #[test]
    fn test_empty_trajectories_never_own_rows() {
        let mut table = CandidateTable::new();
        table.push_trajectory(Vec::new());
        table.push_trajectory(rows(2));
        table.push_trajectory(Vec::new());
        table.push_trajectory(Vec::new());
        table.push_trajectory(rows(1));

        assert_eq!(table.offsets(), &[0, 0, 2, 2, 2]);
        assert_eq!(table.num_trajectories(), 5);
        assert_eq!(table.locate(0), Some((2, 0)));
        assert_eq!(table.locate(1), Some((2, 1)));
        assert_eq!(table.locate(2), Some((5, 0)));
    }

    #[test]
    fn test_locate_in_empty_table() {
        let mut table = CandidateTable::new();
        assert_eq!(table.locate(0), None);
        table.push_trajectory(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.locate(0), None);
    }
}
