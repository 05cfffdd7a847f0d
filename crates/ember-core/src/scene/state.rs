//! Per-traversal accumulator
//!
//! [`SceneState`] is threaded through a draw by mutable reference. Scoped
//! fields (transform, material, billboard, lighting, camera) are saved with
//! [`SceneState::scope`] before a subtree and put back with
//! [`SceneState::restore`] afterwards. The light list is not scoped: a light
//! stays registered for everything drawn after it.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::light::{Light, LightSet};
use super::material::{Billboard, Material};
use super::render::{DrawCommand, TriSurface};

/// Linear fog between two eye distances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Vec4,
    pub start: f32,
    pub end: f32,
}

impl Fog {
    /// Fog contribution at `distance`, 0 before `start` and 1 past `end`
    pub fn factor(&self, distance: f32) -> f32 {
        if self.end <= self.start {
            return if distance >= self.end { 1.0 } else { 0.0 };
        }
        ((distance - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// Scene-wide lighting environment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    pub global_ambient: Vec4,
    pub fog: Option<Fog>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            global_ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            fog: None,
        }
    }
}

/// Saved copy of the scoped part of a [`SceneState`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scope {
    pub transform: Mat4,
    pub material: Material,
    pub billboard: Billboard,
    pub lighting: Lighting,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
}

/// State accumulated while drawing a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneState {
    /// Maps the current node's coordinates into world space
    pub transform: Mat4,
    pub material: Material,
    pub billboard: Billboard,
    pub lighting: Lighting,
    /// Lights registered so far, in world space
    pub lights: LightSet,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            material: Material::default(),
            billboard: Billboard::Off,
            lighting: Lighting::default(),
            lights: LightSet::new(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
        }
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> Scope {
        Scope {
            transform: self.transform,
            material: self.material,
            billboard: self.billboard,
            lighting: self.lighting,
            view: self.view,
            projection: self.projection,
            camera_position: self.camera_position,
        }
    }

    pub fn restore(&mut self, scope: Scope) {
        self.transform = scope.transform;
        self.material = scope.material;
        self.billboard = scope.billboard;
        self.lighting = scope.lighting;
        self.view = scope.view;
        self.projection = scope.projection;
        self.camera_position = scope.camera_position;
    }

    /// Register `light` in world space
    ///
    /// Returns `false` when the light is disabled or every slot is taken;
    /// either way the traversal carries on.
    pub fn register_light(&mut self, light: &Light) -> bool {
        if !light.enabled {
            return false;
        }
        let registered = self.lights.push(light.transformed(&self.transform));
        if !registered {
            tracing::debug!(capacity = self.lights.len(), "light list full, ignoring light");
        }
        registered
    }

    pub fn active_lights(&self) -> &[Light] {
        self.lights.as_slice()
    }

    /// Load view, projection and eye position from `camera`
    pub fn set_camera(&mut self, camera: &Camera) {
        self.view = camera.view_matrix();
        self.projection = camera.projection_matrix();
        self.camera_position = camera.position();
    }

    /// Model matrix for the current node with billboarding applied
    pub fn model_matrix(&self) -> Mat4 {
        match self.billboard {
            Billboard::Off => self.transform,
            Billboard::Spherical => self.face_camera(None),
            Billboard::Upright(axis) => self.face_camera(Some(axis)),
        }
    }

    pub fn draw_command(&self, surface: Arc<TriSurface>) -> DrawCommand {
        DrawCommand {
            surface,
            model: self.model_matrix(),
            view: self.view,
            projection: self.projection,
            camera_position: self.camera_position,
            material: self.material,
            lights: self.lights,
            lighting: self.lighting,
        }
    }

    // Turn the geometry's local +Z toward the eye, pivoting about its world origin.
    fn face_camera(&self, axis: Option<Vec3>) -> Mat4 {
        let model = self.transform;
        let origin = model.w_axis.truncate();
        let facing = model.transform_vector3(Vec3::Z).normalize_or_zero();
        let to_camera = (self.camera_position - origin).normalize_or_zero();
        if facing == Vec3::ZERO || to_camera == Vec3::ZERO {
            return model;
        }

        let rotation = match axis.map(Vec3::normalize_or_zero) {
            None => Quat::from_rotation_arc(facing, to_camera),
            Some(axis) if axis == Vec3::ZERO => return model,
            Some(axis) => {
                let f = (facing - axis * facing.dot(axis)).normalize_or_zero();
                let c = (to_camera - axis * to_camera.dot(axis)).normalize_or_zero();
                if f == Vec3::ZERO || c == Vec3::ZERO {
                    return model;
                }
                let angle = axis.dot(f.cross(c)).atan2(f.dot(c));
                Quat::from_axis_angle(axis, angle)
            }
        };

        Mat4::from_translation(origin)
            * Mat4::from_quat(rotation)
            * Mat4::from_translation(-origin)
            * model
    }
}
