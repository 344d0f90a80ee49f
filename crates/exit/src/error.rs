//! Error types for exit conditions.

use adaptive_types::{ParseComparisonError, ReportError};
use thiserror::Error;

/// Errors building an exit condition from configuration.
///
/// These are fatal: a bad exit condition block must stop the run before the
/// first epoch.
#[derive(Debug, Error)]
pub enum ExitConfigError {
    /// The `type` field names no known exit condition.
    #[error("Unknown exit condition type {0:?}! Choices are: {choices}", choices = crate::ExitConditionKind::CHOICES.join(", "))]
    UnknownKind(String),

    /// The `condition` field is not `>` or `<`.
    #[error("In {kind} exit condition: {source}")]
    InvalidComparison {
        /// Exit condition type being built.
        kind: &'static str,
        /// Parse failure.
        #[source]
        source: ParseComparisonError,
    },

    /// A parameter required by this exit condition type is absent.
    #[error("Exit condition {kind} requires parameter {parameter:?}")]
    MissingParameter {
        /// Exit condition type being built.
        kind: &'static str,
        /// Missing parameter name.
        parameter: &'static str,
    },

    /// The report naming pattern is needed but was not supplied.
    #[error("Exit condition {0} needs the report file name from the control file")]
    MissingReportName(&'static str),
}

/// Errors while evaluating an exit condition.
#[derive(Debug, Error)]
pub enum ExitConditionError {
    /// A report of the finished epoch could not be used.
    #[error("Exit condition report error: {0}")]
    Report(#[from] ReportError),
}
