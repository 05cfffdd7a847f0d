//! Extrusion of a cross-section along a path

use super::{MAX_INDEXED_VERTICES, Mesh, Vertex};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// One step of an extrusion path
///
/// `direction` offsets the cross-section in x/y and orients the ring normals;
/// `length` is the cumulative distance along +Z at which the ring sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub direction: Vec3,
    pub length: f32,
}

impl PathStep {
    pub fn new(direction: Vec3, length: f32) -> Self {
        Self { direction, length }
    }

    fn normal(&self) -> Vec3 {
        let n = self.direction.normalize_or_zero();
        if n == Vec3::ZERO { Vec3::Z } else { n }
    }
}

/// Builder for a tube-like mesh swept along a path
///
/// ```rust
/// use ember_core::geometry::{Extrusion, PathStep};
/// use glam::Vec3;
///
/// let mesh = Extrusion::new(vec![
///     PathStep::new(Vec3::new(0.0, 0.0, 1.0), 2.0),
///     PathStep::new(Vec3::new(0.0, 1.0, 1.0), 4.0),
/// ])
/// .build();
///
/// // One ring at the origin plus one per step, four corners each
/// assert_eq!(mesh.vertex_count(), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Extrusion {
    /// Cross-section corners in counter-clockwise order
    pub profile: Vec<Vec2>,
    /// Path steps, in sweep order
    pub steps: Vec<PathStep>,
    /// Close the first and last rings with triangle fans
    pub capped: bool,
}

impl Extrusion {
    /// Extrude the unit square along `steps`
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self {
            profile: vec![
                Vec2::new(-0.5, -0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(-0.5, 0.5),
            ],
            steps,
            capped: false,
        }
    }

    pub fn with_profile(mut self, profile: Vec<Vec2>) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_caps(mut self, capped: bool) -> Self {
        self.capped = capped;
        self
    }

    /// Number of path steps that fit a 16-bit index buffer for this profile
    pub fn max_steps(&self) -> usize {
        if self.profile.is_empty() {
            return 0;
        }
        (MAX_INDEXED_VERTICES / self.profile.len()).saturating_sub(1)
    }

    /// Generate the mesh
    ///
    /// Ring 0 is the bare profile at `z = 0` facing +Z. Each step adds a ring
    /// whose normals point along the step direction, and consecutive rings
    /// are stitched with two triangles per profile edge (the last corner
    /// wraps back to the first). Steps beyond [`Extrusion::max_steps`] are
    /// dropped.
    pub fn build(&self) -> Mesh {
        let corners = self.profile.len();
        if corners < 2 {
            tracing::debug!(corners, "extrusion profile too small, no geometry emitted");
            return Mesh::new();
        }

        let steps = if self.steps.len() > self.max_steps() {
            tracing::debug!(
                requested = self.steps.len(),
                kept = self.max_steps(),
                "extrusion path truncated to fit 16-bit indices"
            );
            &self.steps[..self.max_steps()]
        } else {
            &self.steps[..]
        };

        let rings = steps.len() + 1;
        let side_triangles = steps.len() * corners * 2;
        let cap_triangles = if self.capped && corners >= 3 {
            2 * (corners - 2)
        } else {
            0
        };
        let mut mesh = Mesh::with_capacity(rings * corners, side_triangles + cap_triangles);

        self.push_ring(&mut mesh, Vec2::ZERO, 0.0, Vec3::Z, 0.0);
        for (i, step) in steps.iter().enumerate() {
            let t = (i + 1) as f32 / steps.len() as f32;
            self.push_ring(&mut mesh, step.direction.truncate(), step.length, step.normal(), t);
        }

        let ring = |i: usize, j: usize| (i * corners + j % corners) as u32;
        for i in 0..steps.len() {
            for j in 0..corners {
                let a = ring(i, j);
                let b = ring(i, j + 1);
                let c = ring(i + 1, j + 1);
                let d = ring(i + 1, j);
                mesh.push_triangle(a, b, c);
                mesh.push_triangle(a, c, d);
            }
        }

        if cap_triangles > 0 {
            // Start cap faces back down the path, end cap faces along it
            let last = steps.len();
            for j in 1..corners - 1 {
                mesh.push_triangle(ring(0, 0), ring(0, j + 1), ring(0, j));
                mesh.push_triangle(ring(last, 0), ring(last, j), ring(last, j + 1));
            }
        }

        mesh
    }

    fn push_ring(&self, mesh: &mut Mesh, offset: Vec2, z: f32, normal: Vec3, t: f32) {
        let corners = self.profile.len() as f32;
        for (j, corner) in self.profile.iter().enumerate() {
            let p = *corner + offset;
            mesh.vertices.push(Vertex::new(
                p.extend(z),
                normal,
                Vec2::new(j as f32 / corners, t),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Vec<PathStep> {
        vec![
            PathStep::new(Vec3::new(0.0, 2.5, 1.0), 2.5),
            PathStep::new(Vec3::new(0.0, 5.0, 1.0), 5.0),
            PathStep::new(Vec3::new(0.0, 2.5, 1.0), 7.5),
            PathStep::new(Vec3::new(0.0, 0.0, 1.0), 10.0),
        ]
    }

    #[test]
    fn test_ring_and_quad_counts() {
        let mesh = Extrusion::new(path()).build();
        assert_eq!(mesh.vertex_count(), 5 * 4);
        assert_eq!(mesh.triangle_count(), 4 * 4 * 2);
    }

    #[test]
    fn test_ring_placement_and_normals() {
        let mesh = Extrusion::new(path()).build();

        // Ring 0 is the bare profile
        assert_eq!(mesh.vertices[0].position, [-0.5, -0.5, 0.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);

        // Ring 1 is offset by the first step's direction and sits at its length
        let v = mesh.vertices[4];
        assert_eq!(v.position, [-0.5, 2.0, 2.5]);
        let expected = Vec3::new(0.0, 2.5, 1.0).normalize();
        approx::assert_relative_eq!(v.normal().x, expected.x);
        approx::assert_relative_eq!(v.normal().y, expected.y);
        approx::assert_relative_eq!(v.normal().z, expected.z);
    }

    #[test]
    fn test_straight_sides_face_outward() {
        let mesh = Extrusion::new(vec![PathStep::new(Vec3::Z, 1.0)]).build();
        for tri in 0..mesh.triangle_count() {
            let n = mesh.face_normal(tri);
            assert_eq!(n.z, 0.0);
            let i = mesh.indices[tri * 3] as usize;
            let centre_dir = mesh.vertices[i].position().truncate();
            assert!(n.truncate().dot(centre_dir) > 0.0, "side {tri} faces inward");
        }
    }

    #[test]
    fn test_wraparound_closes_tube() {
        let mesh = Extrusion::new(vec![PathStep::new(Vec3::Z, 1.0)]).build();
        // Last quad joins corner 3 back to corner 0
        let last_quad = &mesh.indices[mesh.indices.len() - 6..];
        assert_eq!(last_quad, &[3, 0, 4, 3, 4, 7]);
    }

    #[test]
    fn test_caps() {
        let mesh = Extrusion::new(path()).with_caps(true).build();
        assert_eq!(mesh.triangle_count(), 4 * 4 * 2 + 2 * 2);

        let start_cap = mesh.triangle_count() - 4;
        assert!(mesh.face_normal(start_cap).z < 0.0);
        assert!(mesh.face_normal(start_cap + 1).z > 0.0);
    }

    #[test]
    fn test_empty_path_is_base_ring_only() {
        let mesh = Extrusion::new(Vec::new()).build();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_degenerate_profile() {
        let mesh = Extrusion::new(path()).with_profile(vec![Vec2::ZERO]).build();
        assert_eq!(mesh, Mesh::new());
    }

    #[test]
    fn test_long_path_truncated() {
        let steps = vec![PathStep::new(Vec3::Z, 1.0); 20_000];
        let extrusion = Extrusion::new(steps);
        let mesh = extrusion.build();
        assert_eq!(extrusion.max_steps(), 16_383);
        assert_eq!(mesh.vertex_count(), (16_383 + 1) * 4);
        assert!(mesh.fits_u16_indices());
    }

    #[test]
    fn test_zero_direction_falls_back_to_z() {
        let mesh = Extrusion::new(vec![PathStep::new(Vec3::ZERO, 1.0)]).build();
        assert_eq!(mesh.vertices[4].normal, [0.0, 0.0, 1.0]);
    }
}
