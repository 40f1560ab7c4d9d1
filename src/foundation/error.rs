/// Convenience result type used across puppetry.
pub type PuppetryResult<T> = Result<T, PuppetryError>;

/// Top-level error taxonomy for the fallible, one-time operations (loading, binding, config).
///
/// Per-frame paths never produce these: a missing overlay or a culled mask is a normal state.
#[derive(thiserror::Error, Debug)]
pub enum PuppetryError {
    /// Invalid user-provided model, expression or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The model runtime reported something the pipeline cannot consume.
    #[error("model error: {0}")]
    Model(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PuppetryError {
    /// Build a [`PuppetryError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PuppetryError::Model`] value.
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Build a [`PuppetryError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PuppetryError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
