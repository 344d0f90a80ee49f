//! Test helpers for adaptive sampling.
//!
//! In-memory stand-ins for the collaborators the engine talks to, so exit
//! conditions and equilibration selection can be exercised without an
//! external simulation engine or real trajectory files.

use adaptive_types::{
    ClusteringSummary, ReportError, ReportReader, ReportTable, Snapshot, SnapshotError,
    SnapshotSource, StructuralComparator, StructureError,
};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A clustering with fixed per-cluster metric rows.
#[derive(Clone, Debug, Default)]
pub struct StaticClustering {
    clusters: Vec<Vec<f64>>,
}

impl StaticClustering {
    /// One entry per cluster; an empty row means the cluster has no metrics.
    pub fn new(clusters: Vec<Vec<f64>>) -> Self {
        Self { clusters }
    }

    /// `count` clusters without metrics.
    pub fn with_count(count: usize) -> Self {
        Self {
            clusters: vec![Vec::new(); count],
        }
    }

    /// Clusters whose only meaningful metric sits at `column`.
    ///
    /// `None` produces a cluster with no metrics at all.
    pub fn with_metric_column(column: usize, values: &[Option<f64>]) -> Self {
        let clusters = values
            .iter()
            .map(|value| match value {
                Some(v) => {
                    let mut row = vec![0.0; column + 1];
                    row[column] = *v;
                    row
                }
                None => Vec::new(),
            })
            .collect();
        Self { clusters }
    }
}

impl ClusteringSummary for StaticClustering {
    fn number_of_clusters(&self) -> usize {
        self.clusters.len()
    }

    fn metric_from_column(&self, cluster: usize, column: usize) -> Option<f64> {
        self.clusters
            .get(cluster)
            .and_then(|metrics| metrics.get(column))
            .copied()
    }
}

/// Report tables keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryReportReader {
    tables: HashMap<PathBuf, ReportTable>,
}

impl MemoryReportReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table built from rows.
    pub fn insert(&mut self, path: impl Into<PathBuf>, rows: Vec<Vec<f64>>) {
        let table = ReportTable::from_rows(rows).expect("fixture rows must be rectangular");
        self.tables.insert(path.into(), table);
    }
}

impl ReportReader for MemoryReportReader {
    fn read(&self, path: &Path) -> Result<ReportTable, ReportError> {
        self.tables.get(path).cloned().ok_or_else(|| ReportError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no fixture report"),
        })
    }
}

/// Snapshots keyed by trajectory path.
#[derive(Clone, Debug, Default)]
pub struct MemorySnapshotSource {
    trajectories: HashMap<PathBuf, Vec<Snapshot>>,
}

impl MemorySnapshotSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trajectory.
    pub fn insert<S: Into<String>>(
        &mut self,
        path: impl Into<PathBuf>,
        snapshots: impl IntoIterator<Item = S>,
    ) {
        self.trajectories.insert(
            path.into(),
            snapshots.into_iter().map(Snapshot::new).collect(),
        );
    }
}

impl SnapshotSource for MemorySnapshotSource {
    fn snapshots(&self, trajectory: &Path) -> Result<Vec<Snapshot>, SnapshotError> {
        self.trajectories
            .get(trajectory)
            .cloned()
            .ok_or_else(|| SnapshotError::Io {
                path: trajectory.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no fixture trajectory"),
            })
    }
}

/// Treats each snapshot as a number; distance is the absolute difference.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarComparator;

impl ScalarComparator {
    fn value(snapshot: &Snapshot) -> Result<f64, StructureError> {
        snapshot
            .as_str()
            .trim()
            .parse()
            .map_err(|_| StructureError::NoAtoms(snapshot.as_str().to_string()))
    }
}

impl StructuralComparator for ScalarComparator {
    fn distance(&self, reference: &Snapshot, other: &Snapshot) -> Result<f64, StructureError> {
        Ok((Self::value(reference)? - Self::value(other)?).abs())
    }

    fn center(&self, structure: &Snapshot) -> Result<[f64; 3], StructureError> {
        Ok([Self::value(structure)?, 0.0, 0.0])
    }
}

/// Build a report row with the fixed leading columns and trailing metrics.
///
/// Task is 1, steps and accepted steps are both `step`.
pub fn report_row(step: usize, energy: f64, metrics: &[f64]) -> Vec<f64> {
    let mut row = vec![1.0, step as f64, step as f64, energy];
    row.extend_from_slice(metrics);
    row
}

/// Write rows as a whitespace-delimited report with a header line.
pub fn write_report(path: &Path, rows: &[Vec<f64>]) -> io::Result<()> {
    let mut text = String::from("#Task Steps AcceptedSteps Energy Metrics\n");
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&line.join("    "));
        text.push('\n');
    }
    fs::write(path, text)
}

/// Write snapshots as a multi-model PDB trajectory.
pub fn write_pdb_trajectory(path: &Path, models: &[&str]) -> io::Result<()> {
    let mut text = String::new();
    for (i, model) in models.iter().enumerate() {
        text.push_str(&format!("MODEL     {}\n{}ENDMDL\n", i + 1, model));
    }
    text.push_str("END\n");
    fs::write(path, text)
}
