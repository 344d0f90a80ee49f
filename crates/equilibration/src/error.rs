//! Error types for equilibration selection.

use adaptive_types::{ReportError, SnapshotError, StructureError};
use thiserror::Error;

/// Errors that prevent a selection from producing a structure.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Every candidate has the same energy, so energies cannot be normalized.
    #[error("All {rows} candidates have energy {energy}; energy normalization is undefined")]
    DegenerateEnergy {
        /// The shared energy.
        energy: f64,
        /// Number of candidate rows.
        rows: usize,
    },

    /// No trajectory recorded any step.
    #[error("No candidate snapshots to select from")]
    NoCandidates,

    /// A candidate carries NaN or infinity.
    #[error("Candidate row {row} has a non-finite value")]
    NonFiniteValue {
        /// Global row index.
        row: usize,
    },

    /// A trajectory has more snapshots than its report has rows.
    #[error("Report of trajectory {trajectory} has no row for snapshot {snapshot}")]
    MissingReportRow {
        /// 1-based trajectory index.
        trajectory: usize,
        /// 0-based snapshot index.
        snapshot: usize,
    },

    /// A report could not be used.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// A trajectory could not be read.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Two structures could not be compared.
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),
}
