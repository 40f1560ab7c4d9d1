use crate::foundation::error::{PuppetryError, PuppetryResult};
use crate::model::runtime::DrawableBlendMode;

/// The ten shader programs a model is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderVariant {
    NormAdd,
    NormMix,
    NormMul,
    MaskAdd,
    MaskMix,
    MaskMul,
    MaskAddInv,
    MaskMixInv,
    MaskMulInv,
    /// Writes a mask drawable into its owner's offscreen target.
    Mask,
}

impl ShaderVariant {
    pub const COUNT: usize = 10;

    pub const ALL: [Self; Self::COUNT] = [
        Self::NormAdd,
        Self::NormMix,
        Self::NormMul,
        Self::MaskAdd,
        Self::MaskMix,
        Self::MaskMul,
        Self::MaskAddInv,
        Self::MaskMixInv,
        Self::MaskMulInv,
        Self::Mask,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Pick the variant for a drawable; unknown blend modes fall back to the mix variant.
    pub fn classify(mask_count: usize, inverted_mask: bool, blend: DrawableBlendMode) -> Self {
        use DrawableBlendMode as B;
        match (mask_count > 0, inverted_mask, blend) {
            (false, _, B::Additive) => Self::NormAdd,
            (false, _, B::Multiplicative) => Self::NormMul,
            (false, _, B::Normal | B::Other(_)) => Self::NormMix,
            (true, false, B::Additive) => Self::MaskAdd,
            (true, false, B::Multiplicative) => Self::MaskMul,
            (true, false, B::Normal | B::Other(_)) => Self::MaskMix,
            (true, true, B::Additive) => Self::MaskAddInv,
            (true, true, B::Multiplicative) => Self::MaskMulInv,
            (true, true, B::Normal | B::Other(_)) => Self::MaskMixInv,
        }
    }

    pub fn is_masked(self) -> bool {
        !matches!(self, Self::NormAdd | Self::NormMix | Self::NormMul | Self::Mask)
    }
}

/// Opaque handle to a shader program owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ShaderHandle(pub u32);

/// One program handle per [`ShaderVariant`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderLibrary {
    handles: [ShaderHandle; ShaderVariant::COUNT],
}

impl ShaderLibrary {
    pub fn new(handles: [ShaderHandle; ShaderVariant::COUNT]) -> Self {
        Self { handles }
    }

    /// Build from a host-provided list ordered like [`ShaderVariant::ALL`].
    pub fn from_slice(handles: &[ShaderHandle]) -> PuppetryResult<Self> {
        let handles: [ShaderHandle; ShaderVariant::COUNT] = handles.try_into().map_err(|_| {
            PuppetryError::validation(format!(
                "shader library needs {} handles, got {}",
                ShaderVariant::COUNT,
                handles.len()
            ))
        })?;
        Ok(Self { handles })
    }

    /// Handle `i` for variant index `i`.
    pub fn sequential() -> Self {
        Self {
            handles: std::array::from_fn(|i| ShaderHandle(i as u32)),
        }
    }

    pub fn get(&self, variant: ShaderVariant) -> ShaderHandle {
        self.handles[variant.index()]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shader.rs"]
mod tests;
