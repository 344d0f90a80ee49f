//! Numeric report tables written by the simulation engine.
//!
//! A report is a whitespace-delimited table with one row per recorded step.
//! Columns are positional: the first four are fixed (task, steps, accepted
//! steps, energy) and the configured metrics follow in control-file order.

use crate::{IndexedFileName, TrajectoryIndex};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column holding the energy of each recorded step.
pub const ENERGY_COLUMN: usize = 3;

/// Errors while loading a report table.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be read.
    #[error("Failed to read report {path}: {source}")]
    Io {
        /// Path of the report.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A token is not a number.
    #[error("Invalid number {token:?} on line {line}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A row has a different width than the first row.
    #[error("Line {line} has {actual} columns, expected {expected}")]
    Ragged {
        /// 1-based line number.
        line: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        actual: usize,
    },

    /// A requested column does not exist.
    #[error("Column {column} requested from a report with {width} columns")]
    MissingColumn {
        /// Requested column.
        column: usize,
        /// Number of columns in the table.
        width: usize,
    },
}

/// A rectangular table of report values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportTable {
    rows: Vec<Vec<f64>>,
    width: usize,
}

impl ReportTable {
    /// Build a table from rows, rejecting rows of unequal width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ReportError> {
        let width = rows.first().map_or(0, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ReportError::Ragged {
                    line: i + 1,
                    expected: width,
                    actual: row.len(),
                });
            }
        }
        Ok(Self { rows, width })
    }

    /// Parse report text. Blank lines and `#` comment lines are skipped.
    pub fn parse(text: &str) -> Result<Self, ReportError> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut width = None;

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| ReportError::Parse {
                        line: i + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(ReportError::Ragged {
                    line: i + 1,
                    expected,
                    actual: row.len(),
                });
            }
            rows.push(row);
        }

        Ok(Self {
            rows,
            width: width.unwrap_or(0),
        })
    }

    /// Number of recorded steps.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (zero for an empty table).
    pub fn num_columns(&self) -> usize {
        self.width
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in file order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// A single value, if both indices are in range.
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Every value of one column, in row order.
    ///
    /// An empty table yields an empty column for any index.
    pub fn column(&self, column: usize) -> Result<Vec<f64>, ReportError> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        if column >= self.width {
            return Err(ReportError::MissingColumn {
                column,
                width: self.width,
            });
        }
        Ok(self.rows.iter().map(|r| r[column]).collect())
    }
}

/// Source of report tables.
pub trait ReportReader: Send + Sync {
    /// Load the report at `path`.
    fn read(&self, path: &Path) -> Result<ReportTable, ReportError>;

    /// Load the report of one trajectory inside an epoch folder.
    fn read_trajectory(
        &self,
        folder: &Path,
        name: &IndexedFileName,
        trajectory: TrajectoryIndex,
    ) -> Result<ReportTable, ReportError> {
        self.read(&name.path_in(folder, trajectory))
    }
}

/// Reads whitespace-delimited report files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextReportReader;

impl ReportReader for PlainTextReportReader {
    fn read(&self, path: &Path) -> Result<ReportTable, ReportError> {
        let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ReportTable::parse(&text)
    }
}
