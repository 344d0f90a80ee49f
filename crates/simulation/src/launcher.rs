//! Launching a parallel simulation batch.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use thiserror::Error;

/// Default MPI launcher program.
pub const DEFAULT_MPI_PROGRAM: &str = "mpirun";

/// Errors while launching a batch.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The launcher process could not be started.
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        /// Command line that failed.
        command: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// One batch to run: `processors` workers of `executable` on `control_file`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Worker count, including the coordinating worker.
    pub processors: usize,
    /// Simulation executable.
    pub executable: PathBuf,
    /// Filled-in control file passed to the executable.
    pub control_file: PathBuf,
    /// Directory the batch runs in.
    pub working_dir: PathBuf,
}

impl fmt::Display for LaunchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "-np {} {} {}",
            self.processors,
            self.executable.display(),
            self.control_file.display()
        )
    }
}

/// Captured result of a finished batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Wall-clock time of the batch.
    pub elapsed: Duration,
    /// Exit code, `None` if killed by a signal or never launched.
    pub exit_code: Option<i32>,
}

impl RunOutput {
    /// Whether the batch exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a batch and blocks until it finishes.
pub trait RunLauncher: Send + Sync {
    /// Run the batch. `elapsed` is filled in by the caller.
    fn launch(&self, request: &LaunchRequest) -> Result<RunOutput, LaunchError>;
}

/// Launches batches through an MPI launcher: `mpirun -np N exe control`.
#[derive(Clone, Debug)]
pub struct MpiLauncher {
    program: String,
}

impl MpiLauncher {
    /// Launcher using `program` instead of `mpirun`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The launcher program.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for MpiLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_MPI_PROGRAM)
    }
}

impl RunLauncher for MpiLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<RunOutput, LaunchError> {
        let output = Command::new(&self.program)
            .arg("-np")
            .arg(request.processors.to_string())
            .arg(&request.executable)
            .arg(&request.control_file)
            .current_dir(&request.working_dir)
            .output()
            .map_err(|source| LaunchError::Spawn {
                command: format!("{} {}", self.program, request),
                source,
            })?;

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed: Duration::ZERO,
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LaunchRequest {
        LaunchRequest {
            processors: 4,
            executable: PathBuf::from("bin/PELE-1.5_mpi"),
            control_file: PathBuf::from("control.conf"),
            working_dir: std::env::temp_dir(),
        }
    }

    #[test]
    fn test_request_display() {
        assert_eq!(request().to_string(), "-np 4 bin/PELE-1.5_mpi control.conf");
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let launcher = MpiLauncher::new("definitely-not-an-mpi-launcher");
        let err = launcher.launch(&request()).unwrap_err();
        let LaunchError::Spawn { command, .. } = err;
        assert!(command.starts_with("definitely-not-an-mpi-launcher -np 4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output_and_status() {
        let launcher = MpiLauncher::new("false");
        let output = launcher.launch(&request()).unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(1));
    }
}
