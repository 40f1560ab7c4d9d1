//! Puppetry drives a rigged 2D avatar model and turns it into a scene graph a host can draw.
//!
//! A host supplies a [`ModelRuntime`] (parameters, parts and drawables), shader and texture
//! handles, and calls [`UserModel::advance`] once per frame.
//!
//! # Frame overview
//!
//! 1. **Values**: user-edited parameter values are pushed into the runtime
//! 2. **Motion / expressions**: a [`MotionPlayer`] advances, otherwise [`ExpressionController`]
//!    blends active expressions over the parameters with cross-fades
//! 3. **Effects**: registered [`ModelEffect`]s run their prologue and process phases
//! 4. **Simulation**: part opacities are applied, physics and pose run, the runtime recomputes
//!    drawables, effects run their epilogue
//! 5. **Render graph**: every [`MeshNode`] is refreshed and each masked drawable's
//!    [`MaskViewport`] is resized to what is on screen
//!
//! The render graph is built once by [`build_render_graph`]; per-frame paths never fail.
#![forbid(unsafe_code)]

mod effects;
mod expression;
mod foundation;
mod model;
mod render;
mod session;

pub use effects::pipeline::{EffectId, EffectList, ModelEffect};
pub use expression::controller::ExpressionController;
pub use expression::model::{EXPRESSION_FILE_SUFFIX, Expression, ExpressionBlend, ParameterEffect};
pub use foundation::core::{Affine, CanvasInfo, ColorRgba, Point, Rect, Size, Vec2};
pub use foundation::error::{PuppetryError, PuppetryResult};
pub use model::external::{ModelSimulation, MotionPlayer};
pub use model::memory::{DrawableDef, InMemoryModel, ParameterDef, PartDef};
pub use model::runtime::{Drawable, DrawableBlendMode, ModelRuntime, ParameterInfo, ParameterKind};
pub use model::value::{ModelValue, ValueKind};
pub use render::geometry::MeshGeometry;
pub use render::graph::{MeshNode, RenderGraph, RenderResources, build_render_graph};
pub use render::mask::{
    FrameView, MASK_PLACEHOLDER_SIZE, MaskFit, MaskMesh, MaskViewport, RenderTargetId, fit_mask,
    is_culled,
};
pub use render::material::{
    CANVAS_SIZE, CHANNEL, COLOR_BASE, COLOR_MULTIPLY, COLOR_SCREEN, MASK_SCALE, MESH_OFFSET,
    Material, MaterialParam, TEX_MAIN, TEX_MASK, TextureHandle,
};
pub use render::shader::{ShaderHandle, ShaderLibrary, ShaderVariant};
pub use session::opts::{MAX_MASK_VIEWPORT_SIZE, ModelOpts};
pub use session::user_model::{PropertyGroup, PropertyInfo, PropertyValue, UserModel};
