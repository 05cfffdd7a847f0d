//! Procedural geometry
//!
//! Deterministic generators that build vertex and index buffers for the
//! scene graph's geometry leaves. Every generator keeps its vertex count
//! addressable by a 16-bit index buffer; oversized requests are clamped
//! rather than rejected.

mod export;
mod extrude;
mod lathe;
mod surface;

use glam::{Vec2, Vec3};

pub use export::{export_obj, write_obj};
pub use extrude::{Extrusion, PathStep};
pub use lathe::{conic, lathe};
pub use surface::{textured_unit_square, textured_unit_triangle, unit_square, unit_triangle};

/// Largest subdivision count accepted by the grid generators.
///
/// `(250 + 1)^2 = 63001` vertices, which still fits a 16-bit index buffer.
pub const MAX_SUBDIVISIONS: u32 = 250;

/// Number of distinct vertices a 16-bit index buffer can address.
pub const MAX_INDEXED_VERTICES: usize = u16::MAX as usize + 1;

/// Clamp a subdivision count into `[1, MAX_SUBDIVISIONS]`.
pub(crate) fn clamp_subdivisions(n: u32) -> u32 {
    let clamped = n.clamp(1, MAX_SUBDIVISIONS);
    if clamped != n {
        tracing::debug!(requested = n, clamped, "subdivision count clamped");
    }
    clamped
}

/// A vertex with position, normal, and texture coordinates
///
/// Untextured generators leave `uv` at zero; whether the coordinate is bound
/// at draw time is decided by the surface's attribute slots.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// A triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with room for the given number of vertices and triangles
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Append one triangle
    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Axis-aligned bounds of all vertex positions, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position();
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = v.position();
            (min.min(p), max.max(p))
        }))
    }

    /// Whether every index fits in a 16-bit index buffer
    pub fn fits_u16_indices(&self) -> bool {
        self.vertices.len() <= MAX_INDEXED_VERTICES
    }

    /// Face normal of triangle `tri` (unnormalized, counter-clockwise winding)
    pub fn face_normal(&self, tri: usize) -> Vec3 {
        let i = &self.indices[tri * 3..tri * 3 + 3];
        let p0 = self.vertices[i[0] as usize].position();
        let p1 = self.vertices[i[1] as usize].position();
        let p2 = self.vertices[i[2] as usize].position();
        (p1 - p0).cross(p2 - p0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_subdivisions() {
        assert_eq!(clamp_subdivisions(0), 1);
        assert_eq!(clamp_subdivisions(10), 10);
        assert_eq!(clamp_subdivisions(1000), MAX_SUBDIVISIONS);
    }

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * 4);
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Z, Vec2::new(0.5, 0.25));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.5, 0.25]);
    }

    #[test]
    fn test_bounds() {
        assert!(Mesh::new().bounds().is_none());
        let mesh = unit_square(2);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-0.5, -0.5, 0.0));
        assert_eq!(max, Vec3::new(0.5, 0.5, 0.0));
    }
}
