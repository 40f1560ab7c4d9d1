use crate::foundation::core::{Point, Rect};
use crate::foundation::math::bounds_of_points;
use crate::model::runtime::Drawable;

/// Triangle mesh in pixel space with Y pointing down.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct MeshGeometry {
    pub vertices: Vec<Point>,
    pub uvs: Vec<Point>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn from_drawable(drawable: &Drawable<'_>, pixels_per_unit: f32) -> Self {
        let mut out = Self::default();
        out.refresh(drawable, pixels_per_unit);
        out
    }

    /// Re-project `drawable`'s current buffers, reusing allocations.
    pub fn refresh(&mut self, drawable: &Drawable<'_>, pixels_per_unit: f32) {
        let ppu = f64::from(pixels_per_unit);
        self.vertices.clear();
        self.vertices.extend(
            drawable
                .vertex_positions
                .iter()
                .map(|[x, y]| Point::new(f64::from(*x) * ppu, -f64::from(*y) * ppu)),
        );
        self.uvs.clear();
        self.uvs.extend(
            drawable
                .vertex_uvs
                .iter()
                .map(|[u, v]| Point::new(f64::from(*u), 1.0 - f64::from(*v))),
        );
        self.indices.clear();
        self.indices
            .extend(drawable.indices.iter().map(|&i| u32::from(i)));
    }

    pub fn local_bounds(&self) -> Rect {
        bounds_of_points(&self.vertices)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
