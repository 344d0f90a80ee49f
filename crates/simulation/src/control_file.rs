//! Templated simulation control files.
//!
//! A control file is JSON with bare `$NAME` placeholders where values are
//! filled in per run (`"steps": $PELE_STEPS`). Bare placeholders are not
//! valid JSON, so parsing first quotes them, and rendering removes the
//! quotes again. Placeholders already inside strings (`"$OUTPUT_PATH/report"`)
//! are left alone, as is the braced `${NAME}` form.

use crate::template::{Template, TemplateValues};
use adaptive_types::IndexedFileName;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholders that only ever appear inside JSON strings.
pub const STRING_PLACEHOLDERS: [&str; 3] = ["OUTPUT_PATH", "REPORT_NAME", "TRAJECTORY_NAME"];

const REPORT_PATH: &str = "/commands/0/PELE_Output/reportPath";
const TRAJECTORY_PATH: &str = "/commands/0/PELE_Output/trajectoryPath";
const METRICS: &str = "/commands/0/PeleTasks/0/metrics";
const PERTURBATION_PARAMETERS: &str = "/commands/0/Perturbation/parameters";
const FIRST_TASK: &str = "/commands/0/PeleTasks/0";

/// Perturbation translation range used while equilibrating.
pub const EQUILIBRATION_TRANSLATION_RANGE: f64 = 0.5;
/// Perturbation rotation scaling used while equilibrating.
pub const EQUILIBRATION_ROTATION_SCALING: f64 = 0.01;

/// Errors while reading a control file.
#[derive(Debug, Error)]
pub enum ControlFileError {
    /// Reading the file failed.
    #[error("Failed to read control file {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON once placeholders are quoted.
    #[error("Control file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required entry is missing.
    #[error("Control file has no {0}")]
    MissingField(&'static str),
}

/// A parsed control file template.
#[derive(Clone, Debug)]
pub struct ControlFile {
    document: Value,
    quoted: Vec<String>,
}

impl ControlFile {
    /// Parse control file template text.
    pub fn parse(text: &str) -> Result<Self, ControlFileError> {
        let template = Template::new(text);
        let quoted: Vec<String> = template
            .bare_placeholders()
            .into_iter()
            .filter(|name| !STRING_PLACEHOLDERS.contains(&name.as_str()))
            .collect();
        let wrapped: TemplateValues = quoted
            .iter()
            .map(|name| (name.clone(), format!("\"${name}\"")))
            .collect();

        let document = serde_json::from_str(&template.safe_substitute(&wrapped))?;
        Ok(Self { document, quoted })
    }

    /// Read and parse a control file template.
    pub fn from_path(path: &Path) -> Result<Self, ControlFileError> {
        let text = fs::read_to_string(path).map_err(|source| ControlFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// The JSON document, placeholders appearing as `"$NAME"` strings.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Placeholders that were quoted to make the file parse.
    pub fn quoted_placeholders(&self) -> &[String] {
        &self.quoted
    }

    /// Per-trajectory report and trajectory naming of the first command.
    pub fn output_names(&self) -> Result<(IndexedFileName, IndexedFileName), ControlFileError> {
        let report = self.string_at(REPORT_PATH, "report path")?;
        let trajectory = self.string_at(TRAJECTORY_PATH, "trajectory path")?;
        Ok((
            IndexedFileName::from_base(report),
            IndexedFileName::from_base(trajectory),
        ))
    }

    /// Report column holding the similarity metric, if the first task
    /// declares one.
    ///
    /// Metrics follow the four fixed report columns, so metric `i` is column
    /// `i + 4`. An RMSD metric is preferred over a distance metric.
    pub fn similarity_column(&self) -> Option<usize> {
        let metrics = self.document.pointer(METRICS)?.as_array()?;
        let mut distance = None;
        for (i, metric) in metrics.iter().enumerate() {
            let kind = metric
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase();
            if kind.contains("rmsd") {
                return Some(i + 4);
            }
            if distance.is_none() && kind.contains("distance") {
                distance = Some(i + 4);
            }
        }
        distance
    }

    /// The variant used for short equilibration runs.
    ///
    /// Perturbation is narrowed and the first task's exit conditions and
    /// parameter changes are dropped.
    pub fn for_equilibration(&self) -> Result<Self, ControlFileError> {
        let mut equilibration = self.clone();
        let document = &mut equilibration.document;

        let parameters = document
            .pointer_mut(PERTURBATION_PARAMETERS)
            .and_then(Value::as_object_mut)
            .ok_or(ControlFileError::MissingField("perturbation parameters"))?;
        parameters.insert("translationRange".into(), json!(EQUILIBRATION_TRANSLATION_RANGE));
        parameters.insert(
            "rotationScalingFactor".into(),
            json!(EQUILIBRATION_ROTATION_SCALING),
        );

        let task = document
            .pointer_mut(FIRST_TASK)
            .and_then(Value::as_object_mut)
            .ok_or(ControlFileError::MissingField("simulation task"))?;
        task.remove("exitConditions");
        task.remove("parametersChanges");

        Ok(equilibration)
    }

    /// Render back to template text with bare placeholders.
    pub fn to_template_string(&self) -> Result<String, ControlFileError> {
        let mut text = serde_json::to_string_pretty(&self.document)?;
        for name in &self.quoted {
            text = text.replace(&format!("\"${name}\""), &format!("${name}"));
        }
        Ok(text)
    }

    fn string_at(&self, pointer: &str, what: &'static str) -> Result<&str, ControlFileError> {
        self.document
            .pointer(pointer)
            .and_then(Value::as_str)
            .ok_or(ControlFileError::MissingField(what))
    }
}
