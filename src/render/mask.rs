use smallvec::SmallVec;

use crate::foundation::core::{Affine, CanvasInfo, Rect, Size, Vec2};
use crate::foundation::math::{rect_encloses, rects_intersect};
use crate::render::geometry::MeshGeometry;
use crate::render::material::Material;

/// Size an offscreen mask target is shrunk to while its owner is culled.
pub const MASK_PLACEHOLDER_SIZE: (u32, u32) = (2, 2);

/// Handle of the offscreen target a [`MaskViewport`] renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RenderTargetId(pub u32);

/// Where the host is looking this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameView {
    /// Visible rect of the containing viewport, in its own pixels.
    pub view_rect: Rect,
    /// Maps model pixel space into the containing viewport.
    pub canvas_transform: Affine,
    /// Editor previews never cull mask targets.
    pub editor_hint: bool,
}

impl FrameView {
    /// The whole canvas, with the model origin placed at the canvas origin.
    pub fn for_canvas(canvas: &CanvasInfo) -> Self {
        Self {
            view_rect: Rect::from_origin_size((0.0, 0.0), canvas.size_in_pixels),
            canvas_transform: Affine::translate(canvas.origin_in_pixels.to_vec2()),
            editor_hint: false,
        }
    }
}

/// A mask drawable rendered into its owner's offscreen target.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MaskMesh {
    pub drawable: usize,
    /// Position within the owner's mask list.
    pub slot: usize,
    pub material: Material,
    pub geometry: MeshGeometry,
    pub z_index: i32,
    pub visible: bool,
}

/// Offscreen target holding the masks of one drawable.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MaskViewport {
    /// Index of the owning mesh in the render graph.
    pub owner: usize,
    pub target: RenderTargetId,
    pub size: (u32, u32),
    pub canvas_transform: Affine,
    pub masks: SmallVec<[MaskMesh; 2]>,
    /// Set while the owner is culled and the target holds the placeholder size.
    pub culled: bool,
}

impl MaskViewport {
    pub(crate) fn apply_fit(&mut self, fit: &MaskFit) {
        self.size = fit.target_size();
        self.canvas_transform = fit.transform;
        self.culled = false;
    }

    pub(crate) fn shrink_to_placeholder(&mut self) {
        self.size = MASK_PLACEHOLDER_SIZE;
        self.culled = true;
    }
}

/// Result of sizing a mask target against the current view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskFit {
    pub size: Size,
    pub scalar: f64,
    pub viewport_scale: Vec2,
    pub transform: Affine,
}

impl MaskFit {
    /// Scale the owning material samples the mask with.
    pub fn mask_scale(&self) -> f64 {
        self.scalar * self.viewport_scale.x
    }

    /// Integer target size, truncated and at least one pixel per axis.
    pub fn target_size(&self) -> (u32, u32) {
        let axis = |v: f64| (v as u32).max(1);
        (axis(self.size.width), axis(self.size.height))
    }
}

/// Size a mask target for a drawable with pixel-space bounds `local`, seen as `in_view`.
///
/// The target never exceeds what is visible on screen or the mesh's own pixel size, and with
/// `limit > 0` its longer axis is clamped to `limit` keeping the aspect ratio.
pub fn fit_mask(local: Rect, in_view: Rect, limit: u32) -> MaskFit {
    let raw = Size::new(
        in_view.width().abs().min(local.width()),
        in_view.height().abs().min(local.height()),
    );
    let viewport_scale = Vec2::new(raw.width / local.width(), raw.height / local.height());
    let limit_f = f64::from(limit);
    let (scalar, size) = if limit > 0 && raw.max_side() > limit_f {
        let ratio = Vec2::new(
            (raw.width / raw.height).min(1.0),
            (raw.height / raw.width).min(1.0),
        );
        (
            limit_f / raw.max_side(),
            Size::new(limit_f * ratio.x, limit_f * ratio.y),
        )
    } else {
        (1.0, raw)
    };
    let transform = Affine::scale_non_uniform(scalar * viewport_scale.x, scalar * viewport_scale.y)
        * Affine::translate(-local.origin().to_vec2());
    MaskFit {
        size,
        scalar,
        viewport_scale,
        transform,
    }
}

/// Hidden, zero-area, or (outside editor previews) entirely off screen.
pub fn is_culled(visible: bool, local: Rect, in_view: Rect, view: &FrameView) -> bool {
    if !visible || local.width() <= 0.0 || local.height() <= 0.0 {
        return true;
    }
    !view.editor_hint
        && !(rects_intersect(view.view_rect, in_view) || rect_encloses(view.view_rect, in_view))
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
