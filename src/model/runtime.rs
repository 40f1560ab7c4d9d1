use crate::foundation::core::{CanvasInfo, ColorRgba};

/// How a drawable's color combines with what is already on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DrawableBlendMode {
    /// Standard alpha mix.
    #[default]
    Normal,
    /// Additive blending.
    Additive,
    /// Multiplicative blending.
    Multiplicative,
    /// Raw mode the runtime reported but the renderer has no variant for.
    Other(u8),
}

/// Parameter flavour as reported by the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParameterKind {
    #[default]
    Normal,
    BlendShape,
}

/// Static description of one runtime parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterInfo<'a> {
    pub id: &'a str,
    pub minimum: f32,
    pub maximum: f32,
    pub default: f32,
    pub kind: ParameterKind,
}

/// Borrowed view of one drawable for the current frame.
///
/// Vertex positions are in model units with Y pointing up; UVs have V pointing up.
#[derive(Clone, Copy, Debug)]
pub struct Drawable<'a> {
    pub id: &'a str,
    pub vertex_positions: &'a [[f32; 2]],
    pub vertex_uvs: &'a [[f32; 2]],
    pub indices: &'a [u16],
    pub texture_index: usize,
    pub blend_mode: DrawableBlendMode,
    pub masks: &'a [usize],
    pub inverted_mask: bool,
    pub render_order: i32,
    pub opacity: f32,
    pub visible: bool,
    pub multiply_color: ColorRgba,
    pub screen_color: ColorRgba,
}

impl Drawable<'_> {
    /// Zero vertices or zero indices; such drawables never get a node.
    pub fn is_degenerate(&self) -> bool {
        self.vertex_positions.is_empty() || self.indices.is_empty()
    }

    /// Visible flag and a non-zero opacity.
    pub fn is_shown(&self) -> bool {
        self.visible && self.opacity > 0.0
    }
}

/// The model runtime the pipeline drives.
///
/// Owns parameter, part and drawable state. The pipeline mirrors parameter and part values
/// read/write each tick, reads drawables after [`ModelRuntime::update`] has recomputed them.
/// Out-of-range indices must be tolerated: getters return `None`/`0.0`, setters ignore them.
pub trait ModelRuntime {
    fn canvas_info(&self) -> CanvasInfo;

    fn parameter_count(&self) -> usize;
    fn parameter_info(&self, index: usize) -> Option<ParameterInfo<'_>>;
    fn parameter_value(&self, index: usize) -> f32;
    fn set_parameter_value(&mut self, index: usize, value: f32);

    fn part_count(&self) -> usize;
    fn part_id(&self, index: usize) -> Option<&str>;
    fn part_opacity(&self, index: usize) -> f32;
    fn set_part_opacity(&mut self, index: usize, opacity: f32);

    fn drawable_count(&self) -> usize;
    fn drawable(&self, index: usize) -> Option<Drawable<'_>>;

    /// Color multiplied into every drawable's base color.
    fn model_color(&self) -> ColorRgba {
        ColorRgba::WHITE
    }

    /// Recompute drawable geometry, opacity and visibility from the current parameters.
    fn update(&mut self);

    fn parameter_index(&self, id: &str) -> Option<usize> {
        (0..self.parameter_count()).find(|&i| self.parameter_info(i).is_some_and(|p| p.id == id))
    }
}
