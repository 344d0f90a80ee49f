//! `$name` placeholder templates for control files.
//!
//! Syntax:
//!
//! - `$name` or `${name}` is a placeholder, `name` matching
//!   `[_A-Za-z][_A-Za-z0-9]*`
//! - `$$` is a literal `$`
//! - any other `$` is invalid

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Placeholder values keyed by name.
pub type TemplateValues = BTreeMap<String, String>;

/// Errors from strict substitution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder has no value.
    #[error("Template placeholder ${0} has no value")]
    MissingKey(String),

    /// A `$` that starts neither a placeholder nor an escape.
    #[error("Invalid placeholder in template: line {line}, col {column}")]
    InvalidPlaceholder {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
    },
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))",
        )
        .expect("placeholder pattern is valid")
    })
}

/// A text template with `$name` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    /// Wrap template text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of first appearance, without duplicates.
    pub fn placeholders(&self) -> Vec<String> {
        self.collect_names(true)
    }

    /// Names written as bare `$NAME`, ignoring the `${NAME}` form.
    pub fn bare_placeholders(&self) -> Vec<String> {
        self.collect_names(false)
    }

    fn collect_names(&self, include_braced: bool) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in pattern().captures_iter(&self.text) {
            let braced = caps.name("braced").filter(|_| include_braced);
            if let Some(name) = caps.name("named").or(braced) {
                if !names.iter().any(|n| n == name.as_str()) {
                    names.push(name.as_str().to_string());
                }
            }
        }
        names
    }

    /// Replace every placeholder, failing on a missing value or invalid `$`.
    ///
    /// Values without a placeholder are ignored.
    pub fn substitute(&self, values: &TemplateValues) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(self.text.len());
        let mut last = 0;

        for caps in pattern().captures_iter(&self.text) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            output.push_str(&self.text[last..whole.start]);
            last = whole.end;

            if caps.name("escaped").is_some() {
                output.push('$');
            } else if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
                let value = values
                    .get(name.as_str())
                    .ok_or_else(|| TemplateError::MissingKey(name.as_str().to_string()))?;
                output.push_str(value);
            } else {
                return Err(self.invalid_at(whole.start));
            }
        }
        output.push_str(&self.text[last..]);
        Ok(output)
    }

    /// Replace placeholders that have values and leave everything else as is.
    pub fn safe_substitute(&self, values: &TemplateValues) -> String {
        pattern()
            .replace_all(&self.text, |caps: &Captures<'_>| {
                if caps.name("escaped").is_some() {
                    return "$".to_string();
                }
                caps.name("named")
                    .or_else(|| caps.name("braced"))
                    .and_then(|name| values.get(name.as_str()).cloned())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn invalid_at(&self, offset: usize) -> TemplateError {
        let before = &self.text[..offset];
        let line = before.matches('\n').count() + 1;
        let column = offset - before.rfind('\n').map_or(0, |p| p + 1) + 1;
        TemplateError::InvalidPlaceholder { line, column }
    }
}

/// Build template values from `(name, value)` pairs.
pub fn values<I, K, V>(pairs: I) -> TemplateValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}
