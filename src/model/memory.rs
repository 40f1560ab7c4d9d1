use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::core::{CanvasInfo, ColorRgba},
    foundation::error::{PuppetryError, PuppetryResult},
    model::runtime::{Drawable, DrawableBlendMode, ModelRuntime, ParameterInfo, ParameterKind},
};

/// A model runtime backed by plain data.
///
/// Geometry does not deform: [`ModelRuntime::update`] only counts calls. Tests and the CLI mutate
/// the public fields directly to simulate what a deforming runtime would report.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct InMemoryModel {
    pub canvas: CanvasInfo,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    #[serde(default)]
    pub parts: Vec<PartDef>,
    #[serde(default)]
    pub drawables: Vec<DrawableDef>,
    #[serde(default)]
    pub model_color: ColorRgba,
    #[serde(skip)]
    pub update_count: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ParameterDef {
    pub id: String,
    #[serde(default)]
    pub value: f32,
    #[serde(default)]
    pub minimum: f32,
    #[serde(default = "default_maximum")]
    pub maximum: f32,
    #[serde(default)]
    pub default: f32,
    #[serde(default)]
    pub kind: ParameterKind,
}

fn default_maximum() -> f32 {
    1.0
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PartDef {
    pub id: String,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DrawableDef {
    pub id: String,
    #[serde(default)]
    pub vertices: Vec<[f32; 2]>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    #[serde(default)]
    pub indices: Vec<u16>,
    #[serde(default)]
    pub texture_index: usize,
    #[serde(default)]
    pub blend_mode: DrawableBlendMode,
    #[serde(default)]
    pub masks: Vec<usize>,
    #[serde(default)]
    pub inverted_mask: bool,
    #[serde(default)]
    pub render_order: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub multiply_color: ColorRgba,
    #[serde(default = "default_screen_color")]
    pub screen_color: ColorRgba,
}

fn default_visible() -> bool {
    true
}

fn default_screen_color() -> ColorRgba {
    ColorRgba::BLACK
}

impl InMemoryModel {
    pub fn from_json_str(s: &str) -> PuppetryResult<Self> {
        let model: Self = serde_json::from_str(s)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PuppetryResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read model '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check cross-references the runtime contract relies on.
    pub fn validate(&self) -> PuppetryResult<()> {
        if !self.canvas.pixels_per_unit.is_finite() || self.canvas.pixels_per_unit <= 0.0 {
            return Err(PuppetryError::validation(
                "canvas pixels_per_unit must be finite and > 0",
            ));
        }
        for p in &self.parameters {
            if p.id.trim().is_empty() {
                return Err(PuppetryError::validation("parameter id must be non-empty"));
            }
            if p.minimum > p.maximum {
                return Err(PuppetryError::validation(format!(
                    "parameter '{}' has minimum > maximum",
                    p.id
                )));
            }
        }
        for (index, d) in self.drawables.iter().enumerate() {
            if d.uvs.len() != d.vertices.len() {
                return Err(PuppetryError::validation(format!(
                    "drawable '{}' has {} uvs for {} vertices",
                    d.id,
                    d.uvs.len(),
                    d.vertices.len()
                )));
            }
            if let Some(bad) = d.indices.iter().find(|&&i| usize::from(i) >= d.vertices.len()) {
                return Err(PuppetryError::validation(format!(
                    "drawable '{}' index {bad} is out of range",
                    d.id
                )));
            }
            if let Some(bad) = d
                .masks
                .iter()
                .find(|&&m| m >= self.drawables.len() || m == index)
            {
                return Err(PuppetryError::validation(format!(
                    "drawable '{}' references invalid mask {bad}",
                    d.id
                )));
            }
        }
        Ok(())
    }
}

impl ModelRuntime for InMemoryModel {
    fn canvas_info(&self) -> CanvasInfo {
        self.canvas
    }

    fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    fn parameter_info(&self, index: usize) -> Option<ParameterInfo<'_>> {
        self.parameters.get(index).map(|p| ParameterInfo {
            id: &p.id,
            minimum: p.minimum,
            maximum: p.maximum,
            default: p.default,
            kind: p.kind,
        })
    }

    fn parameter_value(&self, index: usize) -> f32 {
        self.parameters.get(index).map_or(0.0, |p| p.value)
    }

    fn set_parameter_value(&mut self, index: usize, value: f32) {
        if let Some(p) = self.parameters.get_mut(index) {
            p.value = value;
        }
    }

    fn part_count(&self) -> usize {
        self.parts.len()
    }

    fn part_id(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(|p| p.id.as_str())
    }

    fn part_opacity(&self, index: usize) -> f32 {
        self.parts.get(index).map_or(0.0, |p| p.opacity)
    }

    fn set_part_opacity(&mut self, index: usize, opacity: f32) {
        if let Some(p) = self.parts.get_mut(index) {
            p.opacity = opacity;
        }
    }

    fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    fn drawable(&self, index: usize) -> Option<Drawable<'_>> {
        self.drawables.get(index).map(|d| Drawable {
            id: &d.id,
            vertex_positions: &d.vertices,
            vertex_uvs: &d.uvs,
            indices: &d.indices,
            texture_index: d.texture_index,
            blend_mode: d.blend_mode,
            masks: &d.masks,
            inverted_mask: d.inverted_mask,
            render_order: d.render_order,
            opacity: d.opacity,
            visible: d.visible,
            multiply_color: d.multiply_color,
            screen_color: d.screen_color,
        })
    }

    fn model_color(&self) -> ColorRgba {
        self.model_color
    }

    fn update(&mut self) {
        self.update_count = self.update_count.saturating_add(1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/memory.rs"]
mod tests;
