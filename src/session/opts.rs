use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{PuppetryError, PuppetryResult};

/// Largest accepted mask target side, in pixels.
pub const MAX_MASK_VIEWPORT_SIZE: u32 = 4096;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Per-model update options.
pub struct ModelOpts {
    /// Upper bound on mask target sides in pixels; `0` leaves targets at their on-screen size.
    pub mask_viewport_size: u32,
    /// Run the physics simulation each frame when one is attached.
    pub physics_evaluate: bool,
    /// Run the pose simulation each frame when one is attached.
    pub pose_update: bool,
}

impl Default for ModelOpts {
    fn default() -> Self {
        Self {
            mask_viewport_size: 0,
            physics_evaluate: true,
            pose_update: true,
        }
    }
}

impl ModelOpts {
    pub fn from_json_str(s: &str) -> PuppetryResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PuppetryResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> PuppetryResult<()> {
        if self.mask_viewport_size > MAX_MASK_VIEWPORT_SIZE {
            return Err(PuppetryError::validation(format!(
                "mask_viewport_size must be <= {MAX_MASK_VIEWPORT_SIZE}, got {}",
                self.mask_viewport_size
            )));
        }
        Ok(())
    }
}
