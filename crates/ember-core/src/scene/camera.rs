//! Navigable perspective camera

use glam::{Mat4, Quat, Vec3};
use parking_lot::RwLock;
use std::sync::Arc;

/// Camera shared between the scene graph and the code steering it
pub type CameraHandle = Arc<RwLock<Camera>>;

/// Scale applied to screen offsets in [`Camera::move_and_turn`]
pub const TURN_RATE: f32 = 0.05;

/// A perspective camera with a u/v/n view frame
///
/// `n` is the view-plane normal and points from the look-at point back toward
/// the eye, `u` points right and `v` up. All angle arguments are degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    look_at: Vec3,
    view_up: Vec3,
    u: Vec3,
    v: Vec3,
    n: Vec3,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, -10.0, 0.0),
            look_at: Vec3::ZERO,
            view_up: Vec3::Z,
            u: Vec3::X,
            v: Vec3::Z,
            n: Vec3::NEG_Y,
            fov: 50.0,
            aspect: 1.0,
            near: 1.0,
            far: 1000.0,
        };
        camera.update_frame();
        camera
    }
}

impl Camera {
    /// Create a new camera with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera looking from `position` at `look_at` with `view_up` up
    pub fn look_at(position: Vec3, look_at: Vec3, view_up: Vec3) -> Self {
        let mut camera = Self {
            position,
            look_at,
            view_up,
            ..Self::default()
        };
        camera.update_frame();
        camera
    }

    /// Wrap the camera in a shareable handle
    pub fn into_handle(self) -> CameraHandle {
        Arc::new(RwLock::new(self))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at_point(&self) -> Vec3 {
        self.look_at
    }

    pub fn view_up(&self) -> Vec3 {
        self.view_up
    }

    /// Right axis
    pub fn u(&self) -> Vec3 {
        self.u
    }

    /// Up axis
    pub fn v(&self) -> Vec3 {
        self.v
    }

    /// View-plane normal (points away from the view direction)
    pub fn view_plane_normal(&self) -> Vec3 {
        self.n
    }

    /// Unit vector the camera looks along
    pub fn view_direction(&self) -> Vec3 {
        -self.n
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// World-to-eye transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - self.n, self.v)
    }

    /// OpenGL-style perspective projection
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    // ========================================================================
    // Placement
    // ========================================================================

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_frame();
    }

    pub fn set_look_at(&mut self, look_at: Vec3) {
        self.look_at = look_at;
        self.update_frame();
    }

    pub fn set_view_up(&mut self, view_up: Vec3) {
        self.view_up = view_up;
        self.update_frame();
    }

    /// Set the projection; rejected as a whole unless `0 < fov < 180`,
    /// `aspect > 0` and `0 < near < far`, all finite
    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        let valid = [fov, aspect, near, far].iter().all(|x| x.is_finite())
            && fov > 0.0
            && fov < 180.0
            && aspect > 0.0
            && near > 0.0
            && far > near;
        if !valid {
            tracing::debug!(fov, aspect, near, far, "ignoring invalid perspective");
            return;
        }
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
    }

    /// Recompute the projection for a new viewport shape
    pub fn change_aspect_ratio(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Translate eye and look-at point along the camera axes
    pub fn slide(&mut self, du: f32, dv: f32, dn: f32) {
        let delta = self.u * du + self.v * dv + self.n * dn;
        self.position += delta;
        self.look_at += delta;
    }

    /// Rotate about the view-plane normal
    pub fn roll(&mut self, degrees: f32) {
        let q = Quat::from_axis_angle(self.n, degrees.to_radians());
        self.u = (q * self.u).normalize();
        self.v = (q * self.v).normalize();
        self.view_up = self.v;
    }

    /// Rotate about the right axis (nose up for positive angles)
    pub fn pitch(&mut self, degrees: f32) {
        let q = Quat::from_axis_angle(self.u, degrees.to_radians());
        self.v = (q * self.v).normalize();
        self.n = (q * self.n).normalize();
        self.view_up = self.v;
        self.refocus();
    }

    /// Rotate about the up axis (turn left for positive angles)
    pub fn heading(&mut self, degrees: f32) {
        let q = Quat::from_axis_angle(self.v, degrees.to_radians());
        self.u = (q * self.u).normalize();
        self.n = (q * self.n).normalize();
        self.refocus();
    }

    /// Turn toward a screen-space offset and move along the new direction
    ///
    /// `dx`/`dy` are offsets from the view centre in camera units (right/up);
    /// `dz` is the distance travelled, positive moving forward.
    pub fn move_and_turn(&mut self, dx: f32, dy: f32, dz: f32) {
        let direction = (-self.n + (self.u * dx + self.v * dy) * TURN_RATE).normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        let focus = self.focus_distance();
        self.position += direction * dz;
        self.look_at = self.position + direction * focus;
        self.update_frame();
    }

    fn focus_distance(&self) -> f32 {
        let distance = self.position.distance(self.look_at);
        if distance > f32::EPSILON { distance } else { 1.0 }
    }

    /// Keep the look-at point in front of the eye after a rotation
    fn refocus(&mut self) {
        self.look_at = self.position - self.n * self.focus_distance();
    }

    /// Rebuild the u/v/n frame from position, look-at and view-up
    ///
    /// Degenerate inputs (eye on the look-at point, up parallel to the view
    /// direction) keep the previous axes as far as they stay orthogonal.
    fn update_frame(&mut self) {
        let n = (self.position - self.look_at).normalize_or_zero();
        if n != Vec3::ZERO {
            self.n = n;
        }
        let u = self.view_up.cross(self.n).normalize_or_zero();
        self.u = if u == Vec3::ZERO {
            // Old right axis squared up against the new normal
            let kept = (self.u - self.n * self.u.dot(self.n)).normalize_or_zero();
            if kept == Vec3::ZERO { self.n.any_orthonormal_vector() } else { kept }
        } else {
            u
        };
        self.v = self.n.cross(self.u).normalize();
    }
}
