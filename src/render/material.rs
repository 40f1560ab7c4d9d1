use std::collections::BTreeMap;

use crate::foundation::core::{ColorRgba, Size, Vec2};
use crate::render::mask::RenderTargetId;
use crate::render::shader::{ShaderHandle, ShaderVariant};

pub const COLOR_BASE: &str = "color_base";
pub const COLOR_SCREEN: &str = "color_screen";
pub const COLOR_MULTIPLY: &str = "color_multiply";
pub const TEX_MAIN: &str = "tex_main";
pub const TEX_MASK: &str = "tex_mask";
pub const MASK_SCALE: &str = "mask_scale";
pub const MESH_OFFSET: &str = "mesh_offset";
pub const CANVAS_SIZE: &str = "canvas_size";
pub const CHANNEL: &str = "channel";

/// Opaque handle to a texture owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureHandle(pub u32);

/// Value of one named shader parameter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MaterialParam {
    Float(f64),
    Vec2(Vec2),
    Size(Size),
    Color(ColorRgba),
    Texture(TextureHandle),
    Target(RenderTargetId),
}

/// Shader program plus its named parameters, as handed to the host scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Material {
    pub variant: ShaderVariant,
    pub shader: ShaderHandle,
    params: BTreeMap<&'static str, MaterialParam>,
}

impl Material {
    pub fn new(variant: ShaderVariant, shader: ShaderHandle) -> Self {
        Self {
            variant,
            shader,
            params: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, name: &'static str, value: MaterialParam) {
        self.params.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&MaterialParam> {
        self.params.get(name)
    }

    pub fn params(&self) -> impl Iterator<Item = (&'static str, &MaterialParam)> {
        self.params.iter().map(|(k, v)| (*k, v))
    }

    pub(crate) fn set_colors(&mut self, base: ColorRgba, screen: ColorRgba, multiply: ColorRgba) {
        self.set(COLOR_BASE, MaterialParam::Color(base));
        self.set(COLOR_SCREEN, MaterialParam::Color(screen));
        self.set(COLOR_MULTIPLY, MaterialParam::Color(multiply));
    }
}
