//! Render backend seam
//!
//! Traversal never talks to a graphics API directly. Each geometry leaf
//! becomes one [`DrawCommand`] handed to a [`Renderer`]; [`DrawList`] is the
//! in-memory backend used by tests and headless runs.

use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3};

use super::light::LightSet;
use super::material::Material;
use super::state::Lighting;
use crate::geometry::Mesh;

/// Backend attribute locations a surface's vertex streams bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeSlots {
    pub position: u32,
    pub normal: u32,
    /// `None` for untextured surfaces
    pub texcoord: Option<u32>,
}

impl AttributeSlots {
    pub const fn untextured(position: u32, normal: u32) -> Self {
        Self {
            position,
            normal,
            texcoord: None,
        }
    }

    pub const fn textured(position: u32, normal: u32, texcoord: u32) -> Self {
        Self {
            position,
            normal,
            texcoord: Some(texcoord),
        }
    }
}

/// Immutable triangle surface ready for drawing
///
/// Share one surface between several parents with `Arc`; it is drawn once
/// per parent path.
#[derive(Debug, Clone, PartialEq)]
pub struct TriSurface {
    mesh: Mesh,
    slots: AttributeSlots,
}

impl TriSurface {
    pub fn new(mesh: Mesh, slots: AttributeSlots) -> Self {
        Self { mesh, slots }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn slots(&self) -> AttributeSlots {
        self.slots
    }

    /// Whether texture coordinates are bound
    pub fn is_textured(&self) -> bool {
        self.slots.texcoord.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

/// Everything a backend needs to draw one surface
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub surface: Arc<TriSurface>,
    /// Accumulated model transform (billboarding already applied)
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// Eye position in world space
    pub camera_position: Vec3,
    pub material: Material,
    /// Lights registered before this surface in traversal order
    pub lights: LightSet,
    pub lighting: Lighting,
}

impl DrawCommand {
    /// Inverse-transpose of the model matrix's upper 3x3, for normals
    pub fn normal_matrix(&self) -> Mat3 {
        let linear = Mat3::from_mat4(self.model);
        if linear.determinant().abs() <= f32::EPSILON {
            return linear;
        }
        linear.inverse().transpose()
    }

    /// `projection * view * model`
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    /// Whether this command and `other` draw the same surface instance
    pub fn same_surface(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.surface, &other.surface)
    }
}

impl PartialEq for DrawCommand {
    fn eq(&self, other: &Self) -> bool {
        self.same_surface(other)
            && self.model == other.model
            && self.view == other.view
            && self.projection == other.projection
            && self.camera_position == other.camera_position
            && self.material == other.material
            && self.lights == other.lights
            && self.lighting == other.lighting
    }
}

/// Receives draw commands in traversal order
pub trait Renderer {
    fn draw(&mut self, command: DrawCommand);
}

/// Renderer that records every command it receives
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Total triangles across all recorded commands
    pub fn triangle_count(&self) -> usize {
        self.commands.iter().map(|c| c.surface.triangle_count()).sum()
    }
}

impl Renderer for DrawList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::unit_square;
    use approx::assert_relative_eq;

    fn command(model: Mat4) -> DrawCommand {
        DrawCommand {
            surface: Arc::new(TriSurface::new(unit_square(1), AttributeSlots::untextured(0, 1))),
            model,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            material: Material::default(),
            lights: LightSet::new(),
            lighting: Lighting::default(),
        }
    }

    #[test]
    fn test_slots() {
        assert!(!TriSurface::new(Mesh::new(), AttributeSlots::untextured(0, 1)).is_textured());
        assert!(TriSurface::new(Mesh::new(), AttributeSlots::textured(0, 1, 2)).is_textured());
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let cmd = command(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        let n = cmd.normal_matrix();
        assert_relative_eq!(n.x_axis.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(n.y_axis.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.draw(command(Mat4::IDENTITY));
        list.draw(command(Mat4::from_scale(Vec3::splat(3.0))));
        assert_eq!(list.len(), 2);
        assert_eq!(list.triangle_count(), 4);
        assert_eq!(list.commands()[1].model, Mat4::from_scale(Vec3::splat(3.0)));

        list.clear();
        assert!(list.is_empty());
    }
}
