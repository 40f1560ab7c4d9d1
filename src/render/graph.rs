use std::collections::HashMap;

use smallvec::SmallVec;

use crate::foundation::core::{Affine, CanvasInfo, ColorRgba, Rect, Vec2};
use crate::foundation::error::{PuppetryError, PuppetryResult};
use crate::model::runtime::{Drawable, ModelRuntime};
use crate::render::geometry::MeshGeometry;
use crate::render::mask::{
    FrameView, MASK_PLACEHOLDER_SIZE, MaskMesh, MaskViewport, RenderTargetId, fit_mask, is_culled,
};
use crate::render::material::{
    CANVAS_SIZE, CHANNEL, MASK_SCALE, MESH_OFFSET, Material, MaterialParam, TEX_MAIN, TEX_MASK,
    TextureHandle,
};
use crate::render::shader::{ShaderLibrary, ShaderVariant};

/// Host resources a render graph binds to.
#[derive(Clone, Copy, Debug)]
pub struct RenderResources<'a> {
    pub shaders: &'a ShaderLibrary,
    /// Indexed by drawable texture index.
    pub textures: &'a [TextureHandle],
}

/// One drawable as a scene mesh.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MeshNode {
    pub drawable: usize,
    pub id: String,
    pub material: Material,
    pub geometry: MeshGeometry,
    /// Custom cull rect the host should use for this mesh.
    pub local_bounds: Rect,
    pub z_index: i32,
    pub visible: bool,
    /// Index into [`RenderGraph::viewports`] when the drawable is masked.
    pub viewport: Option<usize>,
}

/// Mesh, material and mask-target graph built once per model and refreshed every frame.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct RenderGraph {
    canvas: CanvasInfo,
    meshes: Vec<MeshNode>,
    viewports: Vec<MaskViewport>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

const CHANNEL_DEFAULT: ColorRgba = ColorRgba::new(0.0, 0.0, 0.0, 1.0);

fn base_color(model: &dyn ModelRuntime, d: &Drawable<'_>) -> ColorRgba {
    model.model_color().with_opacity(d.opacity)
}

fn texture_for(textures: &[TextureHandle], d: &Drawable<'_>) -> PuppetryResult<TextureHandle> {
    textures.get(d.texture_index).copied().ok_or_else(|| {
        PuppetryError::validation(format!(
            "drawable '{}' uses texture {} but only {} textures were supplied",
            d.id,
            d.texture_index,
            textures.len()
        ))
    })
}

/// Create one mesh per non-degenerate drawable, plus a mask target for each masked one.
#[tracing::instrument(skip_all, fields(drawables = model.drawable_count()))]
pub fn build_render_graph(
    model: &dyn ModelRuntime,
    resources: &RenderResources<'_>,
) -> PuppetryResult<RenderGraph> {
    let canvas = model.canvas_info();
    let ppu = canvas.pixels_per_unit;
    if !ppu.is_finite() || ppu <= 0.0 {
        return Err(PuppetryError::model(format!(
            "runtime reported pixels_per_unit {ppu}"
        )));
    }
    let mut graph = RenderGraph {
        canvas,
        ..RenderGraph::default()
    };

    for index in 0..model.drawable_count() {
        let Some(d) = model.drawable(index) else {
            continue;
        };
        if d.is_degenerate() {
            tracing::trace!(drawable = d.id, "skip degenerate drawable");
            continue;
        }

        let variant = ShaderVariant::classify(d.masks.len(), d.inverted_mask, d.blend_mode);
        let mut material = Material::new(variant, resources.shaders.get(variant));
        material.set(CHANNEL, MaterialParam::Color(CHANNEL_DEFAULT));
        material.set(
            TEX_MAIN,
            MaterialParam::Texture(texture_for(resources.textures, &d)?),
        );
        material.set_colors(base_color(model, &d), d.screen_color, d.multiply_color);

        let geometry = MeshGeometry::from_drawable(&d, ppu);
        let local_bounds = geometry.local_bounds();
        let mesh_index = graph.meshes.len();

        let viewport = if d.masks.is_empty() {
            None
        } else {
            let target = RenderTargetId(graph.viewports.len() as u32);
            material.set(CANVAS_SIZE, MaterialParam::Size(canvas.size_in_pixels));
            material.set(
                MESH_OFFSET,
                MaterialParam::Vec2(local_bounds.origin().to_vec2()),
            );
            material.set(TEX_MASK, MaterialParam::Target(target));

            let mut masks = SmallVec::new();
            for (slot, &mask_index) in d.masks.iter().enumerate() {
                let Some(m) = model.drawable(mask_index) else {
                    continue;
                };
                if m.is_degenerate() {
                    tracing::trace!(drawable = d.id, mask = m.id, "skip degenerate mask");
                    continue;
                }
                let mut mask_material = Material::new(
                    ShaderVariant::Mask,
                    resources.shaders.get(ShaderVariant::Mask),
                );
                mask_material.set(CHANNEL, MaterialParam::Color(CHANNEL_DEFAULT));
                mask_material.set(
                    TEX_MAIN,
                    MaterialParam::Texture(texture_for(resources.textures, &m)?),
                );
                masks.push(MaskMesh {
                    drawable: mask_index,
                    slot,
                    material: mask_material,
                    geometry: MeshGeometry::from_drawable(&m, ppu),
                    z_index: m.render_order,
                    visible: true,
                });
            }

            let mut vp = MaskViewport {
                owner: mesh_index,
                target,
                size: MASK_PLACEHOLDER_SIZE,
                canvas_transform: Affine::IDENTITY,
                masks,
                culled: true,
            };
            if local_bounds.width() > 0.0 && local_bounds.height() > 0.0 {
                vp.apply_fit(&fit_mask(local_bounds, local_bounds, 0));
            }
            graph.viewports.push(vp);
            Some(graph.viewports.len() - 1)
        };

        graph.by_name.insert(d.id.to_owned(), mesh_index);
        graph.meshes.push(MeshNode {
            drawable: index,
            id: d.id.to_owned(),
            material,
            geometry,
            local_bounds,
            z_index: d.render_order,
            visible: d.is_shown(),
            viewport,
        });
    }

    tracing::debug!(
        meshes = graph.meshes.len(),
        viewports = graph.viewports.len(),
        "built render graph"
    );
    Ok(graph)
}

impl RenderGraph {
    pub fn canvas(&self) -> &CanvasInfo {
        &self.canvas
    }

    pub fn meshes(&self) -> &[MeshNode] {
        &self.meshes
    }

    pub fn viewports(&self) -> &[MaskViewport] {
        &self.viewports
    }

    /// Mesh for the drawable with id `name`.
    pub fn mesh(&self, name: &str) -> Option<&MeshNode> {
        self.by_name.get(name).map(|&i| &self.meshes[i])
    }

    pub fn viewport_of(&self, mesh: &MeshNode) -> Option<&MaskViewport> {
        mesh.viewport.and_then(|i| self.viewports.get(i))
    }

    /// Pull this frame's drawable state into every mesh and resize mask targets.
    ///
    /// `mask_limit` caps the longer side of a mask target in pixels; `0` leaves it unbounded.
    pub fn update(&mut self, model: &dyn ModelRuntime, mask_limit: u32, view: &FrameView) {
        let ppu = model.canvas_info().pixels_per_unit;

        for mesh in &mut self.meshes {
            let Some(d) = model.drawable(mesh.drawable) else {
                continue;
            };
            let visible = d.is_shown();
            mesh.visible = visible;
            mesh.geometry.refresh(&d, ppu);
            mesh.local_bounds = mesh.geometry.local_bounds();
            mesh.material
                .set_colors(base_color(model, &d), d.screen_color, d.multiply_color);
            mesh.z_index = d.render_order;

            let Some(vp) = mesh.viewport.and_then(|i| self.viewports.get_mut(i)) else {
                continue;
            };

            let local = mesh.local_bounds;
            let in_view = view.canvas_transform.transform_rect_bbox(local);
            if is_culled(visible, local, in_view, view) {
                tracing::trace!(drawable = d.id, "mask target culled");
                vp.shrink_to_placeholder();
                continue;
            }

            let fit = fit_mask(local, in_view, mask_limit);
            vp.apply_fit(&fit);
            mesh.material
                .set(TEX_MASK, MaterialParam::Target(vp.target));
            mesh.material
                .set(MASK_SCALE, MaterialParam::Float(fit.mask_scale()));
            mesh.material.set(
                MESH_OFFSET,
                MaterialParam::Vec2(Vec2::new(local.x0, local.y0)),
            );

            for mask in &mut vp.masks {
                let Some(m) = model.drawable(mask.drawable) else {
                    continue;
                };
                mask.visible = true;
                mask.geometry.refresh(&m, ppu);
                mask.z_index = m.render_order;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/graph.rs"]
mod tests;
