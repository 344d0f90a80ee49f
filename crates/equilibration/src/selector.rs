//! Selection of starting structures from one equilibration run.

use crate::{select_best, Candidate, CandidateTable, SelectionError, SelectionStrategy};
use adaptive_types::{
    IndexedFileName, ReportReader, ReportTable, Snapshot, SnapshotSource, StructuralComparator,
    TrajectoryIndex, ENERGY_COLUMN,
};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the output of one equilibration batch lives.
#[derive(Clone, Debug)]
pub struct EquilibrationRun {
    /// Folder holding the batch's reports and trajectories.
    pub folder: PathBuf,
    /// Report naming pattern.
    pub report_name: IndexedFileName,
    /// Trajectory naming pattern.
    pub trajectory_name: IndexedFileName,
    /// Workers in the batch, including the coordinating worker 0.
    pub processors: usize,
}

impl EquilibrationRun {
    /// Describe a batch written to `folder`.
    pub fn new(
        folder: impl Into<PathBuf>,
        report_name: IndexedFileName,
        trajectory_name: IndexedFileName,
        processors: usize,
    ) -> Self {
        Self {
            folder: folder.into(),
            report_name,
            trajectory_name,
            processors,
        }
    }

    /// Trajectories written by the batch, `1..processors`.
    pub fn trajectories(&self) -> Range<TrajectoryIndex> {
        1..self.processors.max(1)
    }

    /// Report of one trajectory.
    pub fn report_path(&self, trajectory: TrajectoryIndex) -> PathBuf {
        self.report_name.path_in(&self.folder, trajectory)
    }

    /// Trajectory file of one trajectory.
    pub fn trajectory_path(&self, trajectory: TrajectoryIndex) -> PathBuf {
        self.trajectory_name.path_in(&self.folder, trajectory)
    }
}

/// Picks starting structures out of an equilibration run.
pub struct EquilibrationSelector<'a> {
    reports: &'a dyn ReportReader,
    snapshots: &'a dyn SnapshotSource,
    comparator: &'a dyn StructuralComparator,
}

impl<'a> EquilibrationSelector<'a> {
    /// Create a selector over the given collaborators.
    pub fn new(
        reports: &'a dyn ReportReader,
        snapshots: &'a dyn SnapshotSource,
        comparator: &'a dyn StructuralComparator,
    ) -> Self {
        Self {
            reports,
            snapshots,
            comparator,
        }
    }

    /// Select structures with the given strategy.
    ///
    /// Last-snapshot selection returns one structure per trajectory; scored
    /// selection returns exactly one.
    pub fn select(
        &self,
        run: &EquilibrationRun,
        strategy: SelectionStrategy,
    ) -> Result<Vec<Snapshot>, SelectionError> {
        match strategy {
            SelectionStrategy::LastSnapshot => self.last_snapshots(run),
            SelectionStrategy::Scored { similarity_column } => {
                Ok(vec![self.best_snapshot(run, similarity_column)?])
            }
        }
    }

    /// Final snapshot of every trajectory, in trajectory order.
    pub fn last_snapshots(&self, run: &EquilibrationRun) -> Result<Vec<Snapshot>, SelectionError> {
        run.trajectories()
            .map(|i| {
                self.snapshots
                    .last_snapshot(&run.trajectory_path(i))
                    .map_err(SelectionError::from)
            })
            .collect()
    }

    /// The single best-scoring snapshot across all trajectories.
    pub fn best_snapshot(
        &self,
        run: &EquilibrationRun,
        similarity_column: Option<usize>,
    ) -> Result<Snapshot, SelectionError> {
        let table = self.candidate_table(run, similarity_column)?;
        let row = select_best(table.rows())?;
        let (trajectory, snapshot) = table.locate(row).ok_or(SelectionError::NoCandidates)?;

        debug!(row, trajectory, snapshot, "Selected equilibration snapshot");
        Ok(self
            .snapshots
            .snapshot_at(&run.trajectory_path(trajectory), snapshot)?)
    }

    /// Pool every trajectory's steps into one candidate table.
    ///
    /// With a similarity column, both values come straight from the reports.
    /// Without one, similarity is the structural distance to a reference: the
    /// first snapshot of the first trajectory that has any. The reference
    /// itself is not compared and enters the table with similarity zero.
    pub fn candidate_table(
        &self,
        run: &EquilibrationRun,
        similarity_column: Option<usize>,
    ) -> Result<CandidateTable, SelectionError> {
        let mut table = CandidateTable::new();
        let mut reference: Option<Snapshot> = None;

        for trajectory in run.trajectories() {
            let report = self.reports.read(&run.report_path(trajectory))?;
            let candidates = match similarity_column {
                Some(column) => report_candidates(&report, column)?,
                None => self.distance_candidates(
                    &report,
                    &run.trajectory_path(trajectory),
                    trajectory,
                    &mut reference,
                )?,
            };
            table.push_trajectory(candidates);
        }
        Ok(table)
    }

    fn distance_candidates(
        &self,
        report: &ReportTable,
        trajectory_path: &Path,
        trajectory: TrajectoryIndex,
        reference: &mut Option<Snapshot>,
    ) -> Result<Vec<Candidate>, SelectionError> {
        let snapshots = self.snapshots.snapshots(trajectory_path)?;
        let mut candidates = Vec::with_capacity(snapshots.len());

        for (index, snapshot) in snapshots.into_iter().enumerate() {
            let energy = report.value(index, ENERGY_COLUMN).ok_or(
                SelectionError::MissingReportRow {
                    trajectory,
                    snapshot: index,
                },
            )?;
            let similarity = match reference.as_ref() {
                Some(reference) => self.comparator.distance(reference, &snapshot)?,
                None => {
                    *reference = Some(snapshot);
                    0.0
                }
            };
            candidates.push(Candidate::new(energy, similarity));
        }
        Ok(candidates)
    }
}

fn report_candidates(report: &ReportTable, similarity_column: usize) -> Result<Vec<Candidate>, SelectionError> {
    let energies = report.column(ENERGY_COLUMN)?;
    let similarities = report.column(similarity_column)?;
    Ok(energies
        .into_iter()
        .zip(similarities)
        .map(|(energy, similarity)| Candidate::new(energy, similarity))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptive_test_helpers::{
        report_row, MemoryReportReader, MemorySnapshotSource, ScalarComparator,
    };
    use tracing_test::traced_test;

    fn run(processors: usize) -> EquilibrationRun {
        EquilibrationRun::new(
            "/eq",
            IndexedFileName::from_base("report"),
            IndexedFileName::from_base("trajectory.pdb"),
            processors,
        )
    }

    fn rows(energies: &[f64], similarities: &[f64]) -> Vec<Vec<f64>> {
        energies
            .iter()
            .zip(similarities)
            .enumerate()
            .map(|(step, (e, s))| report_row(step, *e, &[*s]))
            .collect()
    }

    #[traced_test]
    #[test]
    fn test_scored_selection_from_report_column() {
        // Pooled energies [-10, -20 | -30, -15] normalize to [0, .5 | 1, .25];
        // similarities [1, 1 | 1, 5] weigh [.75, .75 | .75, .25].
        // Scores [.75, 1.25 | 1.75, .5]: trajectory 2, snapshot 0.
        let mut reports = MemoryReportReader::new();
        reports.insert("/eq/report_1", rows(&[-10.0, -20.0], &[1.0, 1.0]));
        reports.insert("/eq/report_2", rows(&[-30.0, -15.0], &[1.0, 5.0]));

        let mut snapshots = MemorySnapshotSource::new();
        snapshots.insert("/eq/trajectory_1.pdb", ["t1s0", "t1s1"]);
        snapshots.insert("/eq/trajectory_2.pdb", ["t2s0", "t2s1"]);

        let selector = EquilibrationSelector::new(&reports, &snapshots, &ScalarComparator);
        let selected = selector
            .select(
                &run(3),
                SelectionStrategy::Scored {
                    similarity_column: Some(4),
                },
            )
            .unwrap();

        assert_eq!(selected, vec![Snapshot::new("t2s0")]);
        assert!(logs_contain("Selected equilibration snapshot"));
    }

    #[test]
    fn test_scored_selection_by_distance_to_reference() {
        // Snapshots are numbers; distance is |a - b| against the first one (0).
        // Similarities [0, 3, .5 | 10, .2], energies [-5, -6, -7 | -8, -4].
        // Normalized energies [.25, .5, .75 | 1, 0]. Histogram over [0, 10]
        // puts 0, .5 and .2 in bin 0 (.6); 3 is equidistant from the centers
        // 2.5 and 3.5 and takes the empty bin 2; 10 weighs .2.
        // Scores [.85, .5, 1.35 | 1.2, .6]: trajectory 1, snapshot 2.
        let mut reports = MemoryReportReader::new();
        reports.insert("/eq/report_1", rows(&[-5.0, -6.0, -7.0], &[0.0; 3]));
        reports.insert("/eq/report_2", rows(&[-8.0, -4.0], &[0.0; 2]));

        let mut snapshots = MemorySnapshotSource::new();
        snapshots.insert("/eq/trajectory_1.pdb", ["0", "3", "0.5"]);
        snapshots.insert("/eq/trajectory_2.pdb", ["10", "0.2"]);

        let selector = EquilibrationSelector::new(&reports, &snapshots, &ScalarComparator);
        let table = selector.candidate_table(&run(3), None).unwrap();
        let similarities: Vec<f64> = table.rows().iter().map(|c| c.similarity).collect();
        assert_eq!(similarities, vec![0.0, 3.0, 0.5, 10.0, 0.2]);

        let best = selector.best_snapshot(&run(3), None).unwrap();
        assert_eq!(best, Snapshot::new("0.5"));
    }

    #[test]
    fn test_empty_trajectory_contributes_no_rows() {
        let mut reports = MemoryReportReader::new();
        reports.insert("/eq/report_1", Vec::new());
        reports.insert("/eq/report_2", rows(&[-1.0, -9.0], &[2.0, 2.0]));

        let mut snapshots = MemorySnapshotSource::new();
        snapshots.insert("/eq/trajectory_1.pdb", Vec::<String>::new());
        snapshots.insert("/eq/trajectory_2.pdb", ["a", "b"]);

        let selector = EquilibrationSelector::new(&reports, &snapshots, &ScalarComparator);
        let table = selector.candidate_table(&run(3), Some(4)).unwrap();
        assert_eq!(table.offsets(), &[0, 0]);

        let best = selector.best_snapshot(&run(3), Some(4)).unwrap();
        assert_eq!(best, Snapshot::new("b"));
    }

    #[test]
    fn test_constant_energy_is_reported() {
        let mut reports = MemoryReportReader::new();
        reports.insert("/eq/report_1", rows(&[-3.0, -3.0], &[1.0, 2.0]));
        let snapshots = MemorySnapshotSource::new();

        let selector = EquilibrationSelector::new(&reports, &snapshots, &ScalarComparator);
        let err = selector.best_snapshot(&run(2), Some(4)).unwrap_err();
        assert!(matches!(err, SelectionError::DegenerateEnergy { rows: 2, .. }));
    }

    #[test]
    fn test_last_snapshot_single_structure() {
        let reports = MemoryReportReader::new();
        let mut snapshots = MemorySnapshotSource::new();
        snapshots.insert("/eq/trajectory_1.pdb", ["first", "middle", "last"]);

        let selector = EquilibrationSelector::new(&reports, &snapshots, &ScalarComparator);
        let selected = selector
            .select(&run(2), SelectionStrategy::LastSnapshot)
            .unwrap();
        assert_eq!(selected, vec![Snapshot::new("last")]);
    }

    #[test]
    fn test_last_snapshot_one_per_trajectory() {
        let reports = MemoryReportReader::new();
        let mut snapshots = MemorySnapshotSource::new();
        snapshots.insert("/eq/trajectory_1.pdb", ["a0", "a1"]);
        snapshots.insert("/eq/trajectory_2.pdb", ["b0"]);
        snapshots.insert("/eq/trajectory_3.pdb", ["c0", "c1", "c2"]);

        let selector = EquilibrationSelector::new(&reports, &snapshots, &ScalarComparator);
        let selected = selector.last_snapshots(&run(4)).unwrap();
        assert_eq!(
            selected,
            vec![Snapshot::new("a1"), Snapshot::new("b0"), Snapshot::new("c2")]
        );
    }

    #[test]
    fn test_snapshot_without_report_row() {
        let mut reports = MemoryReportReader::new();
        reports.insert("/eq/report_1", rows(&[-1.0], &[0.0]));
        let mut snapshots = MemorySnapshotSource::new();
        snapshots.insert("/eq/trajectory_1.pdb", ["0", "1"]);

        let selector = EquilibrationSelector::new(&reports, &snapshots, &ScalarComparator);
        let err = selector.candidate_table(&run(2), None).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::MissingReportRow {
                trajectory: 1,
                snapshot: 1
            }
        ));
    }
}
