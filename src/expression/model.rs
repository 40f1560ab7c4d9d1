use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{PuppetryError, PuppetryResult};

/// File suffix used by expression documents.
pub const EXPRESSION_FILE_SUFFIX: &str = ".exp3.json";

/// How a [`ParameterEffect`] combines with the parameter's value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ExpressionBlend {
    /// Summed with other `Add` effects and added to the parameter.
    #[default]
    Add,
    /// Summed with other `Multiply` effects; the sum scales the parameter.
    Multiply,
    /// Replaces the parameter; the last active expression in library order wins.
    Overwrite,
}

/// One parameter change contributed by an expression.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterEffect {
    pub id: String,
    pub value: f32,
    #[serde(default)]
    pub blend: ExpressionBlend,
}

/// A named overlay of parameter effects that can be faded in and out.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Expression {
    #[serde(skip)]
    pub name: String,
    #[serde(default = "default_fade")]
    pub fade_in_time: f32,
    #[serde(default = "default_fade")]
    pub fade_out_time: f32,
    #[serde(default)]
    pub parameters: Vec<ParameterEffect>,
}

fn default_fade() -> f32 {
    1.0
}

impl Expression {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterEffect>) -> Self {
        Self {
            name: name.into(),
            fade_in_time: default_fade(),
            fade_out_time: default_fade(),
            parameters,
        }
    }

    pub fn from_json_str(name: impl Into<String>, s: &str) -> PuppetryResult<Self> {
        let mut e: Self = serde_json::from_str(s)?;
        e.name = name.into();
        e.validate()?;
        Ok(e)
    }

    /// Load an expression document; the name is the file name without its suffix.
    pub fn from_path(path: impl AsRef<Path>) -> PuppetryResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PuppetryError::validation("expression path has no file name"))?;
        let name = file_name
            .strip_suffix(EXPRESSION_FILE_SUFFIX)
            .unwrap_or(file_name);
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read expression '{}'", path.display()))?;
        Self::from_json_str(name, &s)
    }

    pub fn validate(&self) -> PuppetryResult<()> {
        if self.name.trim().is_empty() {
            return Err(PuppetryError::validation("expression name must be non-empty"));
        }
        for (field, v) in [
            ("fade_in_time", self.fade_in_time),
            ("fade_out_time", self.fade_out_time),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(PuppetryError::validation(format!(
                    "expression '{}' {field} must be finite and >= 0",
                    self.name
                )));
            }
        }
        for p in &self.parameters {
            if p.id.trim().is_empty() {
                return Err(PuppetryError::validation(format!(
                    "expression '{}' has a parameter effect without id",
                    self.name
                )));
            }
            if !p.value.is_finite() {
                return Err(PuppetryError::validation(format!(
                    "expression '{}' value for '{}' must be finite",
                    self.name, p.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/model.rs"]
mod tests;
