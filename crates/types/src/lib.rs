//! Core types for adaptive sampling.
//!
//! This crate holds the vocabulary shared by the epoch control engine:
//!
//! - **Collaborator traits**: [`ReportReader`], [`SnapshotSource`],
//!   [`StructuralComparator`] and [`ClusteringSummary`] describe what the
//!   engine needs from report parsing, trajectory decoding, geometry and
//!   clustering without owning any of them.
//! - **Plain data**: [`ReportTable`], [`Snapshot`], [`IndexedFileName`] and
//!   [`ProcessorMapping`].
//! - **Bundled implementations**: a whitespace table reader, a multi-model
//!   PDB splitter and a ligand RMSD comparator, enough to drive a real
//!   engine run without further plumbing.

mod clustering;
mod comparison;
mod mapping;
mod naming;
mod report;
mod snapshot;
mod structure;

pub use clustering::ClusteringSummary;
pub use comparison::{Comparison, ParseComparisonError};
pub use mapping::{MappingError, ProcessorMapping, PROCESSOR_MAPPING_FILE};
pub use naming::IndexedFileName;
pub use report::{PlainTextReportReader, ReportError, ReportReader, ReportTable, ENERGY_COLUMN};
pub use snapshot::{PdbSnapshotSource, Snapshot, SnapshotError, SnapshotSource};
pub use structure::{LigandComparator, StructuralComparator, StructureError};

/// Index of a trajectory within one epoch.
///
/// Trajectories are 1-indexed on disk; worker 0 coordinates the batch and
/// does not write a trajectory of its own.
pub type TrajectoryIndex = usize;
