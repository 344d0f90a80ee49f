//! Per-trajectory file naming.

use crate::TrajectoryIndex;
use std::fmt;
use std::path::{Path, PathBuf};

/// A file name with a trajectory index inserted before its extension.
///
/// `report` becomes `report_3` and `trajectory.pdb` becomes
/// `trajectory_3.pdb`. Only the final path component of the base name is
/// kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexedFileName {
    stem: String,
    extension: Option<String>,
}

impl IndexedFileName {
    /// Build from a base file name or path such as `output/report`.
    pub fn from_base(base: &str) -> Self {
        let name = Path::new(base)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // A leading dot marks a hidden file, not an extension.
        match name.rfind('.') {
            Some(pos) if pos > 0 && !name[..pos].chars().all(|c| c == '.') => Self {
                stem: name[..pos].to_string(),
                extension: Some(name[pos + 1..].to_string()),
            },
            _ => Self {
                stem: name,
                extension: None,
            },
        }
    }

    /// File name for one trajectory.
    pub fn file_name(&self, trajectory: TrajectoryIndex) -> String {
        match &self.extension {
            Some(ext) => format!("{}_{}.{}", self.stem, trajectory, ext),
            None => format!("{}_{}", self.stem, trajectory),
        }
    }

    /// Full path for one trajectory inside `folder`.
    pub fn path_in(&self, folder: &Path, trajectory: TrajectoryIndex) -> PathBuf {
        folder.join(self.file_name(trajectory))
    }

    /// The extension, without the dot.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

impl fmt::Display for IndexedFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.extension {
            Some(ext) => write!(f, "{}_<n>.{}", self.stem, ext),
            None => write!(f, "{}_<n>", self.stem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_goes_before_extension() {
        let traj = IndexedFileName::from_base("output_path/trajectory.pdb");
        assert_eq!(traj.file_name(3), "trajectory_3.pdb");
        assert_eq!(traj.extension(), Some("pdb"));
    }

    #[test]
    fn test_no_extension() {
        let report = IndexedFileName::from_base("report");
        assert_eq!(report.file_name(1), "report_1");
        assert_eq!(report.extension(), None);
    }

    #[test]
    fn test_only_last_dot_splits() {
        let name = IndexedFileName::from_base("run.v2.xtc");
        assert_eq!(name.file_name(12), "run.v2_12.xtc");
    }

    #[test]
    fn test_hidden_file_has_no_extension() {
        let name = IndexedFileName::from_base(".report");
        assert_eq!(name.file_name(2), ".report_2");
    }

    #[test]
    fn test_path_in_folder() {
        let name = IndexedFileName::from_base("report");
        assert_eq!(
            name.path_in(Path::new("/tmp/0"), 4),
            PathBuf::from("/tmp/0/report_4")
        );
    }
}
