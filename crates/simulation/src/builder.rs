//! Construction of runners from configuration.

use crate::{
    ConfigError, ControlFile, SimulationKind, SimulationParameters, SimulationParamsBlock,
    SimulationRunner, SimulationRunnerBlock,
};
use adaptive_equilibration::EquilibrationMode;
use adaptive_exit::{ExitCondition, ExitConditionBuilder, ExitConditionKind};
use std::path::Path;
use tracing::debug;

/// Builds a [`SimulationRunner`] from its configuration block.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunnerBuilder;

impl RunnerBuilder {
    /// Create a builder.
    pub fn new() -> Self {
        Self
    }

    /// Build from JSON text of a simulation block.
    pub fn build_from_json(&self, text: &str) -> Result<SimulationRunner, ConfigError> {
        self.build(&serde_json::from_str(text)?)
    }

    /// Build the runner the block describes.
    ///
    /// `pele` builds the production variant and `test` the test variant.
    /// Any other type, including `md`, is rejected. Only the production
    /// variant reads `exitCondition`.
    pub fn build(&self, block: &SimulationRunnerBlock) -> Result<SimulationRunner, ConfigError> {
        let kind: SimulationKind = block.kind.parse()?;
        let params = &block.params;
        let kind_name = kind.as_str();
        let missing = |parameter| ConfigError::MissingParameter {
            kind: kind_name,
            parameter,
        };

        let processors = params.processors.ok_or_else(|| missing("processors"))?;
        let iterations = params.iterations.ok_or_else(|| missing("iterations"))?;
        let steps = params.pele_steps.ok_or_else(|| missing("peleSteps"))?;
        let seed = params.seed.ok_or_else(|| missing("seed"))?;

        let mut parameters =
            SimulationParameters::new(processors).with_schedule(iterations, steps, seed);

        match kind {
            SimulationKind::Production => {
                let control_file = params
                    .control_file
                    .clone()
                    .ok_or_else(|| missing("controlFile"))?;
                parameters = production_parameters(parameters, params)?.with_control_file(control_file);
                if let Some(exit) = &params.exit_condition {
                    parameters.exit_condition = Some(build_exit_condition(
                        exit,
                        processors,
                        parameters.control_file.as_path(),
                    )?);
                }
            }
            SimulationKind::Test => {
                let origin = params.origin.clone().ok_or_else(|| missing("origin"))?;
                let destination = params
                    .destination
                    .clone()
                    .ok_or_else(|| missing("destination"))?;
                parameters = parameters.with_copy_tree(origin, destination);
            }
        }

        debug!(
            kind = %kind,
            processors,
            iterations,
            exit_condition = parameters.exit_condition.is_some(),
            "Built simulation runner"
        );
        Ok(SimulationRunner::new(kind, parameters))
    }
}

fn production_parameters(
    mut parameters: SimulationParameters,
    params: &SimulationParamsBlock,
) -> Result<SimulationParameters, ConfigError> {
    if let Some(executable) = &params.executable {
        parameters = parameters.with_executable(executable);
    }
    if let Some(data) = &params.data {
        parameters.data_folder = data.clone();
    }
    if let Some(documents) = &params.documents {
        parameters.documents_folder = documents.clone();
    }
    if let Some(mode) = &params.mode_moving_box {
        parameters = parameters.with_moving_box(mode);
    }
    let radius = params.box_radius.unwrap_or(parameters.box_radius);
    parameters = parameters.with_box(params.box_center, radius);

    if params.run_equilibration.unwrap_or(false) {
        let mode: EquilibrationMode = match &params.equilibration_mode {
            Some(mode) => mode.parse()?,
            None => EquilibrationMode::default(),
        };
        let length = params
            .equilibration_length
            .unwrap_or(parameters.equilibration_length);
        parameters = parameters.with_equilibration(mode, length);
    }
    Ok(parameters)
}

/// The multi-trajectory condition reads reports, so its naming comes from
/// the control file. Other kinds never open the control file.
fn build_exit_condition(
    block: &adaptive_exit::ExitConditionBlock,
    processors: usize,
    control_file: &Path,
) -> Result<ExitCondition, ConfigError> {
    let mut builder = ExitConditionBuilder::new(processors);
    if block.kind.parse::<ExitConditionKind>()? == ExitConditionKind::MultiTrajectoryMetric {
        let (report_name, _) = ControlFile::from_path(control_file)?.output_names()?;
        builder = builder.with_report_name(report_name);
    }
    Ok(builder.build(block)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_file::tests::CONTROL_TEMPLATE;
    use adaptive_exit::ExitConfigError;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_build_production() {
        let runner = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "pele", "params": {
                    "processors": 4, "controlFile": "t.conf", "iterations": 10,
                    "peleSteps": 8, "seed": 12345, "executable": "bin/other",
                    "boxCenter": [1.0, 2.0, 3.0], "boxRadius": 5.0,
                    "runEquilibration": true, "equilibrationMode": "equilibrationLastSnapshot"
                }}"#,
            )
            .unwrap();
        assert_eq!(runner.kind(), SimulationKind::Production);
        let params = runner.parameters();
        assert_eq!(params.processors, 4);
        assert_eq!(params.executable, PathBuf::from("bin/other"));
        assert_eq!(params.control_file, PathBuf::from("t.conf"));
        assert_eq!(params.box_center, Some([1.0, 2.0, 3.0]));
        assert_eq!(params.box_radius, 5.0);
        assert!(params.run_equilibration);
        assert_eq!(params.equilibration_mode, EquilibrationMode::LastSnapshot);
        assert_eq!(params.equilibration_length, 50);
        assert_eq!(params.data_folder, PathBuf::from("Data"));
        assert!(!runner.has_exit_condition());
    }

    #[test]
    fn test_production_defaults() {
        let runner = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "pele", "params": {
                    "processors": 2, "controlFile": "t.conf", "iterations": 1,
                    "peleSteps": 1, "seed": 1, "equilibrationMode": "bogus"
                }}"#,
            )
            .unwrap();
        let params = runner.parameters();
        assert_eq!(params.executable, PathBuf::from("bin/PELE-1.5_mpi"));
        assert_eq!(params.box_radius, 20.0);
        assert!(params.box_center.is_none());
        // The mode is only read when equilibration is enabled.
        assert!(!params.run_equilibration);
    }

    #[test]
    fn test_build_test_variant() {
        let runner = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "test", "params": {
                    "processors": 3, "iterations": 2, "peleSteps": 4, "seed": 7,
                    "origin": "canned", "destination": "out"
                }}"#,
            )
            .unwrap();
        assert_eq!(runner.kind(), SimulationKind::Test);
        assert_eq!(runner.parameters().origin, Some(PathBuf::from("canned")));
    }

    #[test]
    fn test_test_variant_ignores_exit_condition() {
        let runner = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "test", "params": {
                    "processors": 3, "iterations": 2, "peleSteps": 4, "seed": 7,
                    "origin": "canned", "destination": "out",
                    "exitCondition": {"type": "metricMultipleTrajectories",
                        "params": {"metricCol": 5, "exitValue": 2.0, "numTrajs": 2}}
                }}"#,
            )
            .unwrap();
        assert!(!runner.has_exit_condition());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("pele".parse::<SimulationKind>().unwrap(), SimulationKind::Production);
        assert_eq!("test".parse::<SimulationKind>().unwrap(), SimulationKind::Test);
        assert!(matches!(
            "md".parse::<SimulationKind>(),
            Err(ConfigError::UnknownSimulationKind(k)) if k == "md"
        ));
    }

    #[test]
    fn test_unknown_kind() {
        for kind in ["md", "gromacs"] {
            let text = format!(r#"{{"type": "{kind}", "params": {{}}}}"#);
            assert!(matches!(
                RunnerBuilder::new().build_from_json(&text),
                Err(ConfigError::UnknownSimulationKind(k)) if k == kind
            ));
        }
    }

    #[test]
    fn test_missing_parameters() {
        let err = RunnerBuilder::new()
            .build_from_json(r#"{"type": "pele", "params": {"processors": 2}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter { kind: "pele", parameter: "iterations" }
        ));

        let err = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "test", "params": {
                    "processors": 3, "iterations": 2, "peleSteps": 4, "seed": 7, "origin": "x"
                }}"#,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter { kind: "test", parameter: "destination" }
        ));
    }

    #[test]
    fn test_bad_equilibration_mode() {
        let err = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "pele", "params": {
                    "processors": 2, "controlFile": "t.conf", "iterations": 1,
                    "peleSteps": 1, "seed": 1, "runEquilibration": true,
                    "equilibrationMode": "bogus"
                }}"#,
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::EquilibrationMode(_)));
    }

    #[test]
    fn test_exit_condition_from_block() {
        let runner = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "pele", "params": {
                    "processors": 2, "controlFile": "missing.conf", "iterations": 1,
                    "peleSteps": 1, "seed": 1,
                    "exitCondition": {"type": "metric", "params": {"metricCol": 5, "exitValue": 2.0}}
                }}"#,
            )
            .unwrap();
        let condition = runner.parameters().exit_condition.as_ref().unwrap();
        assert_eq!(condition.kind(), ExitConditionKind::SingleMetric);
    }

    #[test]
    fn test_multi_trajectory_exit_reads_control_file() {
        let dir = tempfile::tempdir().unwrap();
        let control_file = dir.path().join("template.conf");
        fs::write(&control_file, CONTROL_TEMPLATE).unwrap();

        let text = format!(
            r#"{{"type": "pele", "params": {{
                "processors": 5, "controlFile": {}, "iterations": 1,
                "peleSteps": 1, "seed": 1,
                "exitCondition": {{"type": "metricMultipleTrajectories",
                    "params": {{"metricCol": 5, "exitValue": 2.0, "numTrajs": 2}}}}
            }}}}"#,
            serde_json::to_string(&control_file).unwrap()
        );
        let runner = RunnerBuilder::new().build_from_json(&text).unwrap();
        let condition = runner.parameters().exit_condition.as_ref().unwrap();
        assert_eq!(condition.kind(), ExitConditionKind::MultiTrajectoryMetric);
    }

    #[test]
    fn test_multi_trajectory_exit_without_control_file() {
        let err = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "pele", "params": {
                    "processors": 2, "controlFile": "/nonexistent/t.conf", "iterations": 1,
                    "peleSteps": 1, "seed": 1,
                    "exitCondition": {"type": "metricMultipleTrajectories",
                        "params": {"metricCol": 5, "exitValue": 2.0, "numTrajs": 2}}
                }}"#,
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::ControlFile(_)));
    }

    #[test]
    fn test_bad_exit_condition() {
        let err = RunnerBuilder::new()
            .build_from_json(
                r#"{"type": "pele", "params": {
                    "processors": 2, "controlFile": "t.conf", "iterations": 1,
                    "peleSteps": 1, "seed": 1,
                    "exitCondition": {"type": "metric",
                        "params": {"metricCol": 5, "exitValue": 2.0, "condition": "=="}}
                }}"#,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ExitCondition(ExitConfigError::InvalidComparison { .. })
        ));
    }
}
