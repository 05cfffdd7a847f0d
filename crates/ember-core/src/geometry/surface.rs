//! Subdivided unit surfaces lying in the XY plane and facing +Z

use super::{Mesh, Vertex, clamp_subdivisions};
use glam::{Vec2, Vec3};

/// Unit square subdivided `n` times along x and y
///
/// Vertices span `[-0.5, 0.5]^2` at `z = 0` with normal `+Z`, stored in row
/// order (y outer, x inner). Produces `(n+1)^2` vertices and `2n^2`
/// counter-clockwise triangles. `n` is clamped to `[1, MAX_SUBDIVISIONS]`.
pub fn unit_square(n: u32) -> Mesh {
    build_square(n, 0.0)
}

/// Unit square with texture coordinates running `0..texture_scale` in s and t
///
/// A scale above 1 repeats the texture across the surface (ground planes).
pub fn textured_unit_square(n: u32, texture_scale: f32) -> Mesh {
    build_square(n, texture_scale)
}

fn build_square(n: u32, texture_scale: f32) -> Mesh {
    let n = clamp_subdivisions(n);
    let cols = n + 1;
    let mut mesh = Mesh::with_capacity((cols * cols) as usize, (2 * n * n) as usize);

    // Positions come from the integer grid index so the outer rows land
    // exactly on +/-0.5 regardless of n.
    let span = n as f32;
    for row in 0..cols {
        for col in 0..cols {
            let s = col as f32 / span;
            let t = row as f32 / span;
            mesh.vertices.push(Vertex::new(
                Vec3::new(s - 0.5, t - 0.5, 0.0),
                Vec3::Z,
                Vec2::new(s, t) * texture_scale,
            ));
        }
    }

    let index = |row: u32, col: u32| row * cols + col;
    for row in 0..n {
        for col in 0..n {
            let a = index(row, col);
            let b = index(row, col + 1);
            let c = index(row + 1, col + 1);
            let d = index(row + 1, col);
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }

    mesh
}

/// Unit triangle subdivided `n` times along each edge
///
/// Corners are `(-0.5, -0.5)`, `(0.5, -0.5)` and `(0, 0.5)`. Produces
/// `(n+1)(n+2)/2` vertices and `n^2` counter-clockwise triangles.
pub fn unit_triangle(n: u32) -> Mesh {
    build_triangle(n, 0.0)
}

/// Unit triangle with planar texture coordinates scaled by `texture_scale`
pub fn textured_unit_triangle(n: u32, texture_scale: f32) -> Mesh {
    build_triangle(n, texture_scale)
}

fn build_triangle(n: u32, texture_scale: f32) -> Mesh {
    const A: Vec2 = Vec2::new(-0.5, -0.5);
    const B: Vec2 = Vec2::new(0.5, -0.5);
    const C: Vec2 = Vec2::new(0.0, 0.5);

    let n = clamp_subdivisions(n);
    let vertex_count = ((n + 1) * (n + 2) / 2) as usize;
    let mut mesh = Mesh::with_capacity(vertex_count, (n * n) as usize);

    let span = n as f32;
    for row in 0..=n {
        for k in 0..=(n - row) {
            let p = A + (B - A) * (k as f32 / span) + (C - A) * (row as f32 / span);
            mesh.vertices.push(Vertex::new(
                p.extend(0.0),
                Vec3::Z,
                (p + Vec2::splat(0.5)) * texture_scale,
            ));
        }
    }

    // Row r holds n - r + 1 vertices
    let row_start = |row: u32| row * (n + 1) - row * row.saturating_sub(1) / 2;
    for row in 0..n {
        let lower = row_start(row);
        let upper = row_start(row + 1);
        let width = n - row;
        for k in 0..width {
            mesh.push_triangle(lower + k, lower + k + 1, upper + k);
            if k + 1 < width {
                mesh.push_triangle(lower + k + 1, upper + k + 1, upper + k);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MAX_SUBDIVISIONS;

    #[test]
    fn test_square_counts() {
        for n in [1, 2, 7, 50] {
            let mesh = unit_square(n);
            assert_eq!(mesh.vertex_count(), ((n + 1) * (n + 1)) as usize);
            assert_eq!(mesh.triangle_count(), (2 * n * n) as usize);
        }
    }

    #[test]
    fn test_square_vertices_in_plane() {
        let mesh = unit_square(13);
        for v in &mesh.vertices {
            assert!((-0.5..=0.5).contains(&v.position[0]));
            assert!((-0.5..=0.5).contains(&v.position[1]));
            assert_eq!(v.position[2], 0.0);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_square_winding_faces_up() {
        let mesh = unit_square(5);
        for tri in 0..mesh.triangle_count() {
            assert!(mesh.face_normal(tri).z > 0.0);
        }
    }

    #[test]
    fn test_square_clamped() {
        let clamped = unit_square(1000);
        let max = unit_square(MAX_SUBDIVISIONS);
        assert_eq!(clamped.vertex_count(), max.vertex_count());
        assert_eq!(clamped.triangle_count(), max.triangle_count());
        assert!(clamped.fits_u16_indices());
    }

    #[test]
    fn test_zero_subdivisions_is_one_cell() {
        let mesh = unit_square(0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_textured_square_uv_range() {
        let mesh = textured_unit_square(4, 200.0);
        let max_s = mesh.vertices.iter().map(|v| v.uv[0]).fold(0.0, f32::max);
        let max_t = mesh.vertices.iter().map(|v| v.uv[1]).fold(0.0, f32::max);
        assert_eq!(max_s, 200.0);
        assert_eq!(max_t, 200.0);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn test_triangle_counts() {
        for n in [1, 2, 3, 10] {
            let mesh = unit_triangle(n);
            assert_eq!(mesh.vertex_count(), ((n + 1) * (n + 2) / 2) as usize);
            assert_eq!(mesh.triangle_count(), (n * n) as usize);
        }
    }

    #[test]
    fn test_triangle_corners_and_winding() {
        let mesh = unit_triangle(1);
        let corners: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            corners,
            vec![[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]
        );

        let mesh = unit_triangle(6);
        for tri in 0..mesh.triangle_count() {
            assert!(mesh.face_normal(tri).z > 0.0, "triangle {tri} faces down");
        }
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_triangle_clamped() {
        let clamped = unit_triangle(5000);
        assert_eq!(
            clamped.triangle_count(),
            (MAX_SUBDIVISIONS * MAX_SUBDIVISIONS) as usize
        );
    }
}
