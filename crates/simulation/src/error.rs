//! Error types for the simulation runner.

use crate::{ControlFileError, LaunchError, TemplateError};
use adaptive_equilibration::{ParseModeError, SelectionError};
use adaptive_exit::{ExitConditionError, ExitConfigError};
use adaptive_types::{MappingError, SnapshotError, StructureError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors while running simulation batches.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The batch could not be launched.
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Filling in the control file failed.
    #[error("Control file substitution failed: {0}")]
    Template(#[from] TemplateError),

    /// The control file template is unusable.
    #[error(transparent)]
    ControlFile(#[from] ControlFileError),

    /// Picking equilibrated structures failed.
    #[error("Equilibration selection failed: {0}")]
    Selection(#[from] SelectionError),

    /// Evaluating the exit condition failed.
    #[error("Exit condition check failed: {0}")]
    ExitCondition(#[from] ExitConditionError),

    /// Persisting the processor mapping failed.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The test variant has no tree to copy.
    #[error("Test simulation requires {0} to be set")]
    MissingCopyTree(&'static str),

    /// An input structure could not be read.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Geometry on an input structure failed.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl SimulationError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| SimulationError::Io { path, source }
    }
}

/// Errors while building a runner from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown simulation type.
    #[error("Unknown simulation type {0:?}, choices are: pele, test")]
    UnknownSimulationKind(String),

    /// A parameter required by the simulation type is missing.
    #[error("Simulation type {kind} requires parameter {parameter}")]
    MissingParameter {
        /// Simulation type.
        kind: &'static str,
        /// Missing parameter.
        parameter: &'static str,
    },

    /// The exit condition block is invalid.
    #[error(transparent)]
    ExitCondition(#[from] ExitConfigError),

    /// The equilibration mode is unknown.
    #[error(transparent)]
    EquilibrationMode(#[from] ParseModeError),

    /// The control file template could not be read.
    #[error(transparent)]
    ControlFile(#[from] ControlFileError),

    /// The configuration is not valid JSON for a runner block.
    #[error("Invalid simulation block: {0}")]
    Json(#[from] serde_json::Error),
}
