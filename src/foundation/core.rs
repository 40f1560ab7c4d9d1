pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Canvas metadata reported by the model runtime.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasInfo {
    /// Canvas size in pixels.
    pub size_in_pixels: Size,
    /// Canvas origin in pixels.
    pub origin_in_pixels: Point,
    /// Scale from model units to pixels.
    pub pixels_per_unit: f32,
}

impl Default for CanvasInfo {
    fn default() -> Self {
        Self {
            size_in_pixels: Size::ZERO,
            origin_in_pixels: Point::ZERO,
            pixels_per_unit: 1.0,
        }
    }
}

/// Straight-alpha RGBA color with float channels, as exchanged with shaders.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Scale alpha by `opacity`, leaving the straight color channels untouched.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity,
            ..self
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for ColorRgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for ColorRgba {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}
