//! Local transform held by transform nodes

use glam::{Mat4, Vec3};

/// A node-local affine matrix
///
/// Mutators post-multiply, so calls accumulate in the order made and the
/// last call is the first applied to child geometry:
/// `translate` then `rotate_x` then `scale` yields `T * Rx * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformNode {
    matrix: Mat4,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformNode {
    /// Identity transform
    pub fn new() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    pub fn set_identity(&mut self) -> &mut Self {
        self.matrix = Mat4::IDENTITY;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.apply(Mat4::from_translation(Vec3::new(x, y, z)))
    }

    /// Rotate about the local X axis by `degrees`
    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.apply(Mat4::from_rotation_x(degrees.to_radians()))
    }

    /// Rotate about the local Y axis by `degrees`
    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.apply(Mat4::from_rotation_y(degrees.to_radians()))
    }

    /// Rotate about the local Z axis by `degrees`
    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.apply(Mat4::from_rotation_z(degrees.to_radians()))
    }

    /// Rotate about an arbitrary axis; a zero axis leaves the matrix untouched
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) -> &mut Self {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return self;
        }
        self.apply(Mat4::from_axis_angle(axis, degrees.to_radians()))
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.apply(Mat4::from_scale(Vec3::new(x, y, z)))
    }

    fn apply(&mut self, m: Mat4) -> &mut Self {
        self.matrix *= m;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_order_matters() {
        let mut translate_first = TransformNode::new();
        translate_first.translate(1.0, 0.0, 0.0).rotate_z(90.0);

        let mut rotate_first = TransformNode::new();
        rotate_first.rotate_z(90.0).translate(1.0, 0.0, 0.0);

        // T * R keeps the origin at (1, 0, 0); R * T swings it to (0, 1, 0)
        let a = translate_first.matrix().transform_point3(Vec3::ZERO);
        let b = rotate_first.matrix().transform_point3(Vec3::ZERO);
        assert_relative_eq!(a.x, 1.0);
        assert_relative_eq!(a.y, 0.0);
        assert_relative_eq!(b.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(b.y, 1.0);
    }

    #[test]
    fn test_last_call_applies_first() {
        let mut t = TransformNode::new();
        t.translate(0.0, 0.0, 6.0).scale(15.0, 15.0, 1.0);
        let p = t.matrix().transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(p, Vec3::new(7.5, 7.5, 6.0));
    }

    #[test]
    fn test_rotate_x_quarter_turn() {
        let mut t = TransformNode::new();
        t.rotate_x(90.0);
        let n = t.matrix().transform_vector3(Vec3::Z);
        assert_relative_eq!(n.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(n.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_axis_rotation_is_noop() {
        let mut t = TransformNode::new();
        t.rotate(45.0, Vec3::ZERO);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_set_identity() {
        let mut t = TransformNode::new();
        t.scale(2.0, 2.0, 2.0).set_identity();
        assert_eq!(t, TransformNode::default());
    }
}
