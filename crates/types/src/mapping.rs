//! Processor-to-cluster mapping carried between epochs.
//!
//! Entry `i` is the structure that worker `i` of the next epoch starts from.
//! The mapping is persisted next to each epoch's output so pathways through
//! epochs can be rebuilt later; that reconstruction is best-effort, so a
//! missing file is reported as [`MappingError::NotFound`] for the caller to
//! downgrade.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the persisted mapping inside an epoch folder.
pub const PROCESSOR_MAPPING_FILE: &str = "processorMapping.txt";

/// Errors reading or writing a persisted mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// No mapping was persisted for this epoch.
    #[error("Processor mapping not found at {0}")]
    NotFound(PathBuf),

    /// The mapping file exists but could not be read or written.
    #[error("Processor mapping I/O error at {path}: {source}")]
    Io {
        /// Mapping file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// An entry is not a non-negative integer.
    #[error("Malformed processor mapping entry {0:?}")]
    Malformed(String),
}

/// Ordered structure indices, one per non-coordinating worker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProcessorMapping(Vec<usize>);

impl ProcessorMapping {
    /// Wrap an explicit mapping.
    pub fn new(entries: Vec<usize>) -> Self {
        Self(entries)
    }

    /// All-zero mapping for a batch of `processors` workers.
    ///
    /// Worker 0 coordinates, so the mapping has `processors - 1` entries.
    pub fn zeroed(processors: usize) -> Self {
        Self(vec![0; processors.saturating_sub(1)])
    }

    /// Rotate left by one: `new[i] = old[(i + 1) % n]`.
    pub fn rotated(&self) -> Self {
        let mut entries = self.0.clone();
        if !entries.is_empty() {
            entries.rotate_left(1);
        }
        Self(entries)
    }

    /// The entries in worker order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Colon-separated encoding, e.g. `3:0:7`.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Parse the colon-separated encoding. Surrounding whitespace is ignored.
    pub fn decode(text: &str) -> Result<Self, MappingError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        text.split(':')
            .map(|entry| {
                entry
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| MappingError::Malformed(entry.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Path of the mapping file inside `epoch_dir`.
    pub fn path_in(epoch_dir: &Path) -> PathBuf {
        epoch_dir.join(PROCESSOR_MAPPING_FILE)
    }

    /// Persist to `epoch_dir` as the bare colon encoding.
    pub fn write_to(&self, epoch_dir: &Path) -> Result<(), MappingError> {
        let path = Self::path_in(epoch_dir);
        fs::write(&path, self.encode())
            .map_err(|source| MappingError::Io { path, source })
    }

    /// Load the mapping persisted in `epoch_dir`.
    pub fn read_from(epoch_dir: &Path) -> Result<Self, MappingError> {
        let path = Self::path_in(epoch_dir);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MappingError::NotFound(path))
            }
            Err(source) => return Err(MappingError::Io { path, source }),
        };
        Self::decode(&text)
    }
}

impl From<Vec<usize>> for ProcessorMapping {
    fn from(entries: Vec<usize>) -> Self {
        Self(entries)
    }
}

impl fmt::Display for ProcessorMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
