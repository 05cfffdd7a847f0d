//! Surfaces of revolution about the +Z axis

use super::{MAX_INDEXED_VERTICES, MAX_SUBDIVISIONS, Mesh, Vertex};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Revolve a profile curve about +Z
///
/// Each profile point is `(radius, height)`. The seam column is duplicated so
/// texture coordinates run cleanly from 0 to 1 around the surface. Normals
/// come from the profile's tangent, so the surface is smooth-shaded.
///
/// `slices` is clamped to `[3, MAX_SUBDIVISIONS]` and lowered further if the
/// profile is long enough to overflow a 16-bit index buffer.
pub fn lathe(profile: &[Vec2], slices: u32) -> Mesh {
    if profile.len() < 2 {
        tracing::debug!(points = profile.len(), "lathe profile too short");
        return Mesh::new();
    }

    let mut slices = slices.clamp(3, MAX_SUBDIVISIONS) as usize;
    let max_columns = MAX_INDEXED_VERTICES / profile.len();
    if slices + 1 > max_columns {
        let fitted = max_columns.saturating_sub(1).max(3);
        tracing::debug!(requested = slices, fitted, "lathe slices reduced to fit 16-bit indices");
        slices = fitted;
    }
    let profile = &profile[..profile.len().min(MAX_INDEXED_VERTICES / (slices + 1))];

    let columns = slices + 1;
    let rows = profile.len();
    let mut mesh = Mesh::with_capacity(rows * columns, (rows - 1) * slices * 2);

    for (i, point) in profile.iter().enumerate() {
        let normal = profile_normal(profile, i);
        let v = i as f32 / (rows - 1) as f32;
        for s in 0..columns {
            let u = s as f32 / slices as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            mesh.vertices.push(Vertex::new(
                Vec3::new(point.x * cos, point.x * sin, point.y),
                Vec3::new(normal.x * cos, normal.x * sin, normal.y),
                Vec2::new(u, v),
            ));
        }
    }

    for i in 0..rows - 1 {
        for s in 0..slices {
            let a = (i * columns + s) as u32;
            let b = a + 1;
            let d = a + columns as u32;
            let c = d + 1;
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }

    mesh
}

/// Outward normal of the profile at point `i` in the (radius, height) plane
fn profile_normal(profile: &[Vec2], i: usize) -> Vec2 {
    let prev = profile[i.saturating_sub(1)];
    let next = profile[(i + 1).min(profile.len() - 1)];
    let tangent = next - prev;
    let normal = Vec2::new(tangent.y, -tangent.x).normalize_or_zero();
    if normal == Vec2::ZERO { Vec2::X } else { normal }
}

/// Unit-height conic frustum centred on the origin
///
/// Covers cylinders (equal radii) and cones (a zero top radius). The open
/// ends are not capped.
pub fn conic(bottom_radius: f32, top_radius: f32, slices: u32, stacks: u32) -> Mesh {
    let stacks = stacks.clamp(1, MAX_SUBDIVISIONS);
    let profile: Vec<Vec2> = (0..=stacks)
        .map(|j| {
            let t = j as f32 / stacks as f32;
            Vec2::new(bottom_radius + (top_radius - bottom_radius) * t, t - 0.5)
        })
        .collect();
    lathe(&profile, slices)
}
