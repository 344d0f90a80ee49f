//! Simulation runner for the adaptive sampling loop.
//!
//! The adaptive loop alternates between running a batch of simulation
//! workers and analysing what they produced. This crate owns the simulation
//! half of that cycle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    SimulationRunner                      │
//! │                                                          │
//! │  control file template ──► Template ──► working control  │
//! │                                              │           │
//! │                                              ▼           │
//! │  ┌─────────────────────┐         ┌─────────────────────┐ │
//! │  │ Production          │         │ Test                │ │
//! │  │ RunLauncher (mpirun)│         │ copy canned tree    │ │
//! │  └──────────┬──────────┘         └──────────┬──────────┘ │
//! │             └───────────────┬───────────────┘            │
//! │                             ▼                            │
//! │        reports + trajectories in the epoch folder        │
//! │                             │                            │
//! │          ┌──────────────────┼──────────────────┐         │
//! │          ▼                  ▼                  ▼         │
//! │   ExitCondition     ProcessorMapping    EquilibrationSel.│
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Runners are usually built from the `simulation` block of the control tree
//! with [`RunnerBuilder`]. Collaborators for reading reports and snapshots
//! default to the plain-text and PDB implementations in `adaptive-types` and
//! can be swapped with the `with_*` methods on [`SimulationRunner`].

mod builder;
mod config;
mod control_file;
mod error;
mod launcher;
mod params;
mod runner;
mod template;

pub use builder::RunnerBuilder;
pub use config::{SimulationParamsBlock, SimulationRunnerBlock};
pub use control_file::{
    ControlFile, ControlFileError, EQUILIBRATION_ROTATION_SCALING, EQUILIBRATION_TRANSLATION_RANGE,
    STRING_PLACEHOLDERS,
};
pub use error::{ConfigError, SimulationError};
pub use launcher::{
    LaunchError, LaunchRequest, MpiLauncher, RunLauncher, RunOutput, DEFAULT_MPI_PROGRAM,
};
pub use params::{
    SimulationKind, SimulationParameters, DEFAULT_BOX_RADIUS, DEFAULT_DATA_FOLDER,
    DEFAULT_DOCUMENTS_FOLDER, DEFAULT_EQUILIBRATION_LENGTH, DEFAULT_EXECUTABLE,
    EQUILIBRATION_BOX_RADIUS,
};
pub use runner::{complexes_string, EquilibrationLayout, SimulationRunner};
pub use template::{values, Template, TemplateError, TemplateValues};
