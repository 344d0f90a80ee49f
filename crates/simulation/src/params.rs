//! Simulation parameters.

use adaptive_equilibration::EquilibrationMode;
use crate::ConfigError;
use adaptive_exit::ExitCondition;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default simulation executable.
pub const DEFAULT_EXECUTABLE: &str = "bin/PELE-1.5_mpi";
/// Default data folder linked into the working directory.
pub const DEFAULT_DATA_FOLDER: &str = "Data";
/// Default documents folder linked into the working directory.
pub const DEFAULT_DOCUMENTS_FOLDER: &str = "Documents";
/// Default exploration box radius.
pub const DEFAULT_BOX_RADIUS: f64 = 20.0;
/// Default number of equilibration steps.
pub const DEFAULT_EQUILIBRATION_LENGTH: usize = 50;
/// Box radius used for equilibration runs.
pub const EQUILIBRATION_BOX_RADIUS: f64 = 2.0;

/// Which runner variant to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimulationKind {
    /// Launches the external simulation program.
    Production,
    /// Copies a canned output tree instead of simulating.
    Test,
}

impl SimulationKind {
    /// Configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            SimulationKind::Production => "pele",
            SimulationKind::Test => "test",
        }
    }
}

impl FromStr for SimulationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pele" => Ok(SimulationKind::Production),
            "test" => Ok(SimulationKind::Test),
            other => Err(ConfigError::UnknownSimulationKind(other.to_string())),
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a runner needs to know about the simulations it drives.
///
/// Built once and only read afterwards, apart from the exit condition's own
/// bookkeeping which the runner advances.
#[derive(Clone, Debug)]
pub struct SimulationParameters {
    /// Workers per batch, including the coordinating worker.
    pub processors: usize,

    /// Simulation executable.
    pub executable: PathBuf,

    /// Control file template.
    pub control_file: PathBuf,

    /// Data folder to link into the working directory.
    pub data_folder: PathBuf,

    /// Documents folder to link into the working directory.
    pub documents_folder: PathBuf,

    /// Directory batches run in.
    pub working_dir: PathBuf,

    /// Number of epochs.
    pub iterations: usize,

    /// Simulation steps per epoch.
    pub steps: usize,

    /// Random seed passed to the simulation.
    pub seed: u64,

    /// Condition that ends the loop early.
    pub exit_condition: Option<ExitCondition>,

    /// Moving box mode, if any.
    pub moving_box: Option<String>,

    /// Fixed exploration box center.
    pub box_center: Option<[f64; 3]>,

    /// Exploration box radius.
    pub box_radius: f64,

    /// Whether to equilibrate the initial structures.
    pub run_equilibration: bool,

    /// How equilibrated structures are picked.
    pub equilibration_mode: EquilibrationMode,

    /// Equilibration steps.
    pub equilibration_length: usize,

    /// Test variant: canned output tree to copy.
    pub origin: Option<PathBuf>,

    /// Test variant: where to copy the canned tree.
    pub destination: Option<PathBuf>,
}

impl SimulationParameters {
    /// Parameters for `processors` workers with defaults for everything else.
    pub fn new(processors: usize) -> Self {
        Self {
            processors,
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            control_file: PathBuf::new(),
            data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
            documents_folder: PathBuf::from(DEFAULT_DOCUMENTS_FOLDER),
            working_dir: PathBuf::from("."),
            iterations: 0,
            steps: 0,
            seed: 0,
            exit_condition: None,
            moving_box: None,
            box_center: None,
            box_radius: DEFAULT_BOX_RADIUS,
            run_equilibration: false,
            equilibration_mode: EquilibrationMode::default(),
            equilibration_length: DEFAULT_EQUILIBRATION_LENGTH,
            origin: None,
            destination: None,
        }
    }

    /// Set the simulation executable.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Set the control file template.
    pub fn with_control_file(mut self, control_file: impl Into<PathBuf>) -> Self {
        self.control_file = control_file.into();
        self
    }

    /// Set the data and documents folders.
    pub fn with_data_folders(
        mut self,
        data: impl Into<PathBuf>,
        documents: impl Into<PathBuf>,
    ) -> Self {
        self.data_folder = data.into();
        self.documents_folder = documents.into();
        self
    }

    /// Set the working directory.
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    /// Set epochs, steps per epoch and seed.
    pub fn with_schedule(mut self, iterations: usize, steps: usize, seed: u64) -> Self {
        self.iterations = iterations;
        self.steps = steps;
        self.seed = seed;
        self
    }

    /// Set the exit condition.
    pub fn with_exit_condition(mut self, exit_condition: ExitCondition) -> Self {
        self.exit_condition = Some(exit_condition);
        self
    }

    /// Set the moving box mode.
    pub fn with_moving_box(mut self, mode: impl Into<String>) -> Self {
        self.moving_box = Some(mode.into());
        self
    }

    /// Set the exploration box.
    pub fn with_box(mut self, center: Option<[f64; 3]>, radius: f64) -> Self {
        self.box_center = center;
        self.box_radius = radius;
        self
    }

    /// Enable equilibration.
    pub fn with_equilibration(mut self, mode: EquilibrationMode, length: usize) -> Self {
        self.run_equilibration = true;
        self.equilibration_mode = mode;
        self.equilibration_length = length;
        self
    }

    /// Set the test variant's origin and destination trees.
    pub fn with_copy_tree(mut self, origin: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self.destination = Some(destination.into());
        self
    }
}
