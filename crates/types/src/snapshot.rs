//! Structural snapshots and the trajectories that contain them.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One recorded structural state, kept as the text the engine wrote.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot(String);

impl Snapshot {
    /// Wrap snapshot text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The snapshot text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the snapshot text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors while reading snapshots from a trajectory.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The trajectory file could not be read.
    #[error("Failed to read trajectory {path}: {source}")]
    Io {
        /// Trajectory path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The trajectory format is not handled by this source.
    #[error("Unrecognized trajectory format for {0}")]
    UnsupportedFormat(PathBuf),

    /// The trajectory contains no snapshots.
    #[error("Trajectory {0} contains no snapshots")]
    Empty(PathBuf),

    /// A snapshot index past the end of the trajectory.
    #[error("Snapshot {index} requested from {path}, which has {available}")]
    OutOfRange {
        /// Trajectory path.
        path: PathBuf,
        /// Requested 0-based index.
        index: usize,
        /// Number of snapshots in the trajectory.
        available: usize,
    },
}

/// Decodes a trajectory file into its snapshots, in file order.
///
/// Each call re-reads the trajectory, so the sequence can be restarted by
/// calling again.
pub trait SnapshotSource: Send + Sync {
    /// All snapshots in `trajectory`.
    fn snapshots(&self, trajectory: &Path) -> Result<Vec<Snapshot>, SnapshotError>;

    /// The snapshot at 0-based `index`.
    fn snapshot_at(&self, trajectory: &Path, index: usize) -> Result<Snapshot, SnapshotError> {
        let mut snapshots = self.snapshots(trajectory)?;
        let available = snapshots.len();
        if index >= available {
            return Err(SnapshotError::OutOfRange {
                path: trajectory.to_path_buf(),
                index,
                available,
            });
        }
        Ok(snapshots.swap_remove(index))
    }

    /// The final snapshot in `trajectory`.
    fn last_snapshot(&self, trajectory: &Path) -> Result<Snapshot, SnapshotError> {
        self.snapshots(trajectory)?
            .pop()
            .ok_or_else(|| SnapshotError::Empty(trajectory.to_path_buf()))
    }
}

/// Splits multi-model PDB trajectories on `ENDMDL` records.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdbSnapshotSource;

impl PdbSnapshotSource {
    /// Split PDB text into models.
    ///
    /// The text after the last `ENDMDL` is dropped when the file holds more
    /// than one model. A file without `ENDMDL` is a single snapshot.
    pub fn split_models(text: &str) -> Vec<Snapshot> {
        let mut models: Vec<&str> = text.split("ENDMDL").collect();
        if models.len() > 1 {
            models.pop();
        }
        models.into_iter().map(Snapshot::new).collect()
    }
}

impl SnapshotSource for PdbSnapshotSource {
    fn snapshots(&self, trajectory: &Path) -> Result<Vec<Snapshot>, SnapshotError> {
        let is_pdb = trajectory
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdb"));
        if !is_pdb {
            return Err(SnapshotError::UnsupportedFormat(trajectory.to_path_buf()));
        }

        let text = fs::read_to_string(trajectory).map_err(|source| SnapshotError::Io {
            path: trajectory.to_path_buf(),
            source,
        })?;
        Ok(Self::split_models(&text))
    }
}
