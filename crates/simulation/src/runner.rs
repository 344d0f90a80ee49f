//! The simulation runner.

use crate::control_file::ControlFile;
use crate::launcher::{LaunchRequest, MpiLauncher, RunLauncher, RunOutput};
use crate::params::{
    SimulationKind, SimulationParameters, DEFAULT_DATA_FOLDER, DEFAULT_DOCUMENTS_FOLDER,
    EQUILIBRATION_BOX_RADIUS,
};
use crate::template::{Template, TemplateValues};
use crate::SimulationError;
use adaptive_equilibration::{EquilibrationRun, EquilibrationSelector, SelectionStrategy};
use adaptive_types::{
    ClusteringSummary, MappingError, PdbSnapshotSource, PlainTextReportReader, ProcessorMapping,
    ReportReader, SnapshotSource, StructuralComparator, PROCESSOR_MAPPING_FILE,
};
use serde_json::{json, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Temporary files used by [`SimulationRunner::equilibrate`].
#[derive(Clone, Debug)]
pub struct EquilibrationLayout {
    /// Folder that receives one `equilibration_<i>` folder per structure.
    pub output_path: PathBuf,
    /// Folder for the copied input structures and filled-in control files.
    pub tmp_folder: PathBuf,
}

impl EquilibrationLayout {
    /// Layout rooted at the given folders.
    pub fn new(output_path: impl Into<PathBuf>, tmp_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            tmp_folder: tmp_folder.into(),
        }
    }

    /// Output folder of the equilibration of structure `i` (1-indexed).
    pub fn output_folder(&self, i: usize) -> PathBuf {
        self.output_path.join(format!("equilibration_{i}"))
    }

    /// Temporary copy of input structure `i`.
    pub fn initial_structure(&self, i: usize) -> PathBuf {
        self.tmp_folder.join(format!("initial_equilibration_{i}.pdb"))
    }

    /// Filled-in control file for structure `i`.
    pub fn control_file(&self, i: usize) -> PathBuf {
        self.tmp_folder.join(format!("controlFile_equilibration_{i}.conf"))
    }
}

enum Backend {
    Production(Box<dyn RunLauncher>),
    Test { copied: bool },
}

/// Drives simulation batches for the adaptive loop.
///
/// The production variant launches the external program; the test variant
/// copies a canned output tree once and does nothing on later runs. Both keep
/// the processor-to-cluster mapping and the exit condition.
pub struct SimulationRunner {
    parameters: SimulationParameters,
    backend: Backend,
    reports: Box<dyn ReportReader>,
    snapshots: Box<dyn SnapshotSource>,
    mapping: ProcessorMapping,
}

impl fmt::Debug for SimulationRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationRunner")
            .field("kind", &self.kind())
            .field("processors", &self.parameters.processors)
            .field("mapping", &self.mapping)
            .finish_non_exhaustive()
    }
}

impl SimulationRunner {
    /// Create a runner of the given kind with the bundled collaborators.
    pub fn new(kind: SimulationKind, parameters: SimulationParameters) -> Self {
        let backend = match kind {
            SimulationKind::Production => Backend::Production(Box::new(MpiLauncher::default())),
            SimulationKind::Test => Backend::Test { copied: false },
        };
        Self {
            parameters,
            backend,
            reports: Box::new(PlainTextReportReader),
            snapshots: Box::new(PdbSnapshotSource),
            mapping: ProcessorMapping::default(),
        }
    }

    /// Use a different launcher. Has no effect on the test variant.
    pub fn with_launcher(mut self, launcher: impl RunLauncher + 'static) -> Self {
        if let Backend::Production(current) = &mut self.backend {
            *current = Box::new(launcher);
        }
        self
    }

    /// Use a different report reader.
    pub fn with_report_reader(mut self, reports: impl ReportReader + 'static) -> Self {
        self.reports = Box::new(reports);
        self
    }

    /// Use a different snapshot source.
    pub fn with_snapshot_source(mut self, snapshots: impl SnapshotSource + 'static) -> Self {
        self.snapshots = Box::new(snapshots);
        self
    }

    /// Which variant this is.
    pub fn kind(&self) -> SimulationKind {
        match self.backend {
            Backend::Production(_) => SimulationKind::Production,
            Backend::Test { .. } => SimulationKind::Test,
        }
    }

    /// The parameters the runner was built with.
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Run one batch on a filled-in control file and wait for it.
    ///
    /// A non-zero exit status or output on stderr is logged and returned,
    /// not treated as an error.
    pub fn run(&mut self, control_file: &Path) -> Result<RunOutput, SimulationError> {
        let start = Instant::now();
        match &mut self.backend {
            Backend::Production(launcher) => {
                link_data_folders(&self.parameters)?;

                let request = LaunchRequest {
                    processors: self.parameters.processors,
                    executable: self.parameters.executable.clone(),
                    control_file: control_file.to_path_buf(),
                    working_dir: self.parameters.working_dir.clone(),
                };
                info!(command = %request, "Launching simulation batch");

                let mut output = launcher.launch(&request)?;
                output.elapsed = start.elapsed();

                let stderr = output.stderr.trim();
                if !stderr.is_empty() {
                    warn!(stderr, "Simulation batch wrote to stderr");
                }
                if !output.success() {
                    warn!(exit_code = ?output.exit_code, "Simulation batch exited unsuccessfully");
                }
                info!(
                    elapsed_secs = output.elapsed.as_secs_f64(),
                    "Simulation batch finished"
                );
                Ok(output)
            }
            Backend::Test { copied } => {
                if *copied {
                    debug!("Test output already in place");
                } else {
                    let origin = self
                        .parameters
                        .origin
                        .as_deref()
                        .ok_or(SimulationError::MissingCopyTree("origin"))?;
                    let destination = self
                        .parameters
                        .destination
                        .as_deref()
                        .ok_or(SimulationError::MissingCopyTree("destination"))?;
                    copy_tree(origin, destination)?;
                    *copied = true;
                    info!(
                        origin = %origin.display(),
                        destination = %destination.display(),
                        "Copied test simulation output"
                    );
                }
                Ok(RunOutput {
                    elapsed: start.elapsed(),
                    exit_code: Some(0),
                    ..RunOutput::default()
                })
            }
        }
    }

    /// Whether an exit condition is configured.
    pub fn has_exit_condition(&self) -> bool {
        self.parameters.exit_condition.is_some()
    }

    /// Evaluate the exit condition after an epoch. Without a condition the
    /// loop never stops early.
    pub fn check_exit_condition(
        &mut self,
        clustering: &dyn ClusteringSummary,
        output_folder: &Path,
    ) -> Result<bool, SimulationError> {
        match self.parameters.exit_condition.as_mut() {
            Some(condition) => Ok(condition.check(clustering, output_folder, self.reports.as_ref())?),
            None => Ok(false),
        }
    }

    /// Fill in a control file template and write it to `path`.
    ///
    /// The template is `template` if given, the configured control file
    /// otherwise. Every placeholder needs a value, and single quotes in the
    /// result become double quotes. The test variant writes nothing.
    pub fn make_working_control_file(
        &self,
        path: &Path,
        values: &TemplateValues,
        template: Option<&str>,
    ) -> Result<(), SimulationError> {
        if self.kind() == SimulationKind::Test {
            debug!(path = %path.display(), "Test runner skips control file");
            return Ok(());
        }

        let text = match template {
            Some(text) => text.to_string(),
            None => fs::read_to_string(&self.parameters.control_file)
                .map_err(SimulationError::io(&self.parameters.control_file))?,
        };
        let filled = Template::new(text).substitute(values)?.replace('\'', "\"");
        fs::write(path, filled).map_err(SimulationError::io(path))
    }

    /// Placeholder values for a production epoch.
    ///
    /// `BOX_CENTER` is only set when a box center is configured.
    pub fn epoch_values(&self, output_path: &Path, complexes: &str) -> TemplateValues {
        let mut values = TemplateValues::new();
        values.insert("OUTPUT_PATH".into(), output_path.display().to_string());
        values.insert("COMPLEXES".into(), complexes.to_string());
        values.insert("SEED".into(), self.parameters.seed.to_string());
        values.insert("PELE_STEPS".into(), self.parameters.steps.to_string());
        values.insert("BOX_RADIUS".into(), self.parameters.box_radius.to_string());
        if let Some(center) = self.parameters.box_center {
            values.insert("BOX_CENTER".into(), format_point(center));
        }
        values
    }

    /// Current processor-to-cluster mapping.
    pub fn processor_mapping(&self) -> &ProcessorMapping {
        &self.mapping
    }

    /// Adopt the mapping produced by clustering.
    ///
    /// Worker 0 coordinates and seeds no trajectory, so the first entry is
    /// moved to the end to line entries up with workers `1..`.
    pub fn update_mapping(&mut self, mapping: &ProcessorMapping) {
        self.mapping = mapping.rotated();
    }

    /// Map every trajectory to cluster 0.
    pub fn set_zero_mapping(&mut self) {
        self.mapping = ProcessorMapping::zeroed(self.parameters.processors);
    }

    /// Persist the mapping in `epoch_dir`. An empty mapping is not written.
    pub fn write_mapping_to_disk(&self, epoch_dir: &Path) -> Result<(), SimulationError> {
        if self.mapping.is_empty() {
            debug!(epoch_dir = %epoch_dir.display(), "No processor mapping to write");
            return Ok(());
        }
        self.mapping.write_to(epoch_dir)?;
        Ok(())
    }

    /// Load the mapping persisted in `epoch_dir`.
    ///
    /// A missing file is logged and the current mapping is kept; lineage
    /// reconstruction across epochs is best-effort.
    pub fn read_mapping_from_disk(&mut self, epoch_dir: &Path) -> Result<(), SimulationError> {
        match ProcessorMapping::read_from(epoch_dir) {
            Ok(mapping) => {
                self.mapping = mapping;
                Ok(())
            }
            Err(MappingError::NotFound(path)) => {
                warn!(
                    path = %path.display(),
                    "{PROCESSOR_MAPPING_FILE} not found, you might not be able to reconstruct fine-grained pathways"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Center of the first input structure, rendered as `[x, y, z]`.
    ///
    /// `structures` is either a complexes string as written into control
    /// files or a plain path.
    pub fn select_initial_box_center(
        &self,
        structures: &str,
        comparator: &dyn StructuralComparator,
    ) -> Result<String, SimulationError> {
        let path = first_complex_path(structures).unwrap_or_else(|| PathBuf::from(structures));
        let structure = self.snapshots.snapshot_at(&path, 0)?;
        Ok(format_point(comparator.center(&structure)?))
    }

    /// Run a short simulation per input structure and pick starting
    /// structures from each.
    ///
    /// Returns the paths of the written structures, in input order.
    pub fn equilibrate(
        &mut self,
        initial_structures: &[PathBuf],
        layout: &EquilibrationLayout,
        comparator: &dyn StructuralComparator,
    ) -> Result<Vec<PathBuf>, SimulationError> {
        let control = ControlFile::from_path(&self.parameters.control_file)?.for_equilibration()?;
        let (report_name, trajectory_name) = control.output_names()?;
        let template = control.to_template_string()?;
        let strategy = SelectionStrategy::choose(
            self.parameters.equilibration_mode,
            initial_structures.len(),
            control.similarity_column(),
        );

        fs::create_dir_all(&layout.tmp_folder).map_err(SimulationError::io(&layout.tmp_folder))?;

        let mut selected = Vec::new();
        for (i, structure) in (1..).zip(initial_structures) {
            let folder = layout.output_folder(i);
            fs::create_dir_all(&folder).map_err(SimulationError::io(&folder))?;

            let tmp_structure = layout.initial_structure(i);
            fs::copy(structure, &tmp_structure).map_err(SimulationError::io(structure))?;

            let mut values = TemplateValues::new();
            values.insert("PELE_STEPS".into(), self.parameters.equilibration_length.to_string());
            values.insert("SEED".into(), self.parameters.seed.to_string());
            values.insert("OUTPUT_PATH".into(), folder.display().to_string());
            values.insert("COMPLEXES".into(), complexes_string(&[tmp_structure]));
            values.insert(
                "BOX_CENTER".into(),
                self.select_initial_box_center(&structure.to_string_lossy(), comparator)?,
            );
            values.insert("BOX_RADIUS".into(), EQUILIBRATION_BOX_RADIUS.to_string());

            info!(structure = i, "Running equilibration");
            let control_path = layout.control_file(i);
            self.make_working_control_file(&control_path, &values, Some(&template))?;
            self.run(&control_path)?;

            let run = EquilibrationRun::new(
                &folder,
                report_name.clone(),
                trajectory_name.clone(),
                self.parameters.processors,
            );
            let selector = EquilibrationSelector::new(
                self.reports.as_ref(),
                self.snapshots.as_ref(),
                comparator,
            );
            for (j, snapshot) in (1..).zip(selector.select(&run, strategy)?) {
                let path = folder.join(format!("equilibration_struc_{i}_{j}.pdb"));
                fs::write(&path, snapshot.as_str()).map_err(SimulationError::io(&path))?;
                selected.push(path);
            }
        }
        Ok(selected)
    }
}

/// Complexes entry for control files, one `{"files": [{"path": ...}]}` per
/// structure.
pub fn complexes_string(structures: &[PathBuf]) -> String {
    let entries: Vec<String> = structures
        .iter()
        .map(|path| json!({ "files": [{ "path": path.to_string_lossy() }] }).to_string())
        .collect();
    format!("\n{}", entries.join(",\n"))
}

fn first_complex_path(structures: &str) -> Option<PathBuf> {
    let first = structures.split(',').next()?.trim();
    let entry: Value = serde_json::from_str(first).ok()?;
    entry
        .pointer("/files/0/path")
        .and_then(Value::as_str)
        .map(PathBuf::from)
}

fn format_point(point: [f64; 3]) -> String {
    format!("[{:?}, {:?}, {:?}]", point[0], point[1], point[2])
}

/// Link the data and documents folders into the working directory unless
/// something of that name is already there.
fn link_data_folders(parameters: &SimulationParameters) -> Result<(), SimulationError> {
    let links = [
        (DEFAULT_DATA_FOLDER, &parameters.data_folder),
        (DEFAULT_DOCUMENTS_FOLDER, &parameters.documents_folder),
    ];
    for (name, folder) in links {
        if folder.as_path() == Path::new(name) {
            continue;
        }
        let link = parameters.working_dir.join(name);
        if link.symlink_metadata().is_ok() {
            continue;
        }
        symlink_dir(folder, &link).map_err(SimulationError::io(&link))?;
        debug!(link = %link.display(), target = %folder.display(), "Linked data folder");
    }
    Ok(())
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Replace `destination` with a copy of the tree at `origin`.
fn copy_tree(origin: &Path, destination: &Path) -> Result<(), SimulationError> {
    if destination.exists() {
        fs::remove_dir_all(destination).map_err(SimulationError::io(destination))?;
    }
    for entry in WalkDir::new(origin) {
        let entry = entry.map_err(|err| SimulationError::Io {
            path: err.path().unwrap_or(origin).to_path_buf(),
            source: err.into(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(origin) else {
            continue;
        };
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(SimulationError::io(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(SimulationError::io(&target))?;
        }
    }
    Ok(())
}
