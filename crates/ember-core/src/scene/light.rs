//! Light sources and the bounded active-light set

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Maximum number of lights a single draw call can see
pub const MAX_LIGHTS: usize = 3;

/// Distance attenuation coefficients: `1 / (constant + linear*d + quadratic*d^2)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

/// Spotlight cone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spotlight {
    pub direction: Vec3,
    /// Half-angle of the cone in degrees
    pub cutoff: f32,
    /// Falloff exponent toward the cone edge
    pub exponent: f32,
}

/// A light source
///
/// `position` is homogeneous: `w = 1` is a point light, `w = 0` a directional
/// light shining from `position.xyz` toward the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec4,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub attenuation: Attenuation,
    pub spotlight: Option<Spotlight>,
    pub enabled: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 1.0, 0.0),
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::new(1.0, 1.0, 1.0, 1.0),
            attenuation: Attenuation::default(),
            spotlight: None,
            enabled: false,
        }
    }
}

impl Light {
    /// Enabled point light at `position`
    pub fn point(position: Vec3) -> Self {
        Self {
            position: position.extend(1.0),
            enabled: true,
            ..Self::default()
        }
    }

    /// Enabled directional light shining from `from` toward the origin
    pub fn directional(from: Vec3) -> Self {
        Self {
            position: from.extend(0.0),
            enabled: true,
            ..Self::default()
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }

    pub fn set_position(&mut self, position: Vec4) {
        self.position = position;
    }

    pub fn set_diffuse(&mut self, color: Vec4) {
        self.diffuse = color;
    }

    pub fn set_specular(&mut self, color: Vec4) {
        self.specular = color;
    }

    pub fn set_ambient(&mut self, color: Vec4) {
        self.ambient = color;
    }

    pub fn set_attenuation(&mut self, constant: f32, linear: f32, quadratic: f32) {
        self.attenuation = Attenuation {
            constant,
            linear,
            quadratic,
        };
    }

    /// Turn this light into a spotlight
    pub fn set_spotlight(&mut self, direction: Vec3, exponent: f32, cutoff: f32) {
        self.spotlight = Some(Spotlight {
            direction,
            cutoff,
            exponent,
        });
    }

    /// Re-aim an existing spotlight; ignored for other lights
    pub fn set_spotlight_direction(&mut self, direction: Vec3) {
        if let Some(spot) = &mut self.spotlight {
            spot.direction = direction;
        }
    }

    pub fn with_diffuse(mut self, color: Vec4) -> Self {
        self.diffuse = color;
        self
    }

    pub fn with_specular(mut self, color: Vec4) -> Self {
        self.specular = color;
        self
    }

    pub fn with_spotlight(mut self, direction: Vec3, exponent: f32, cutoff: f32) -> Self {
        self.set_spotlight(direction, exponent, cutoff);
        self
    }

    /// Copy of this light expressed in the space `transform` maps into
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let mut light = *self;
        light.position = *transform * self.position;
        if let Some(spot) = &mut light.spotlight {
            spot.direction = transform.transform_vector3(spot.direction).normalize_or_zero();
        }
        light
    }
}

/// Fixed-capacity, insertion-ordered set of lights active during a traversal
#[derive(Debug, Clone, Copy, Default)]
pub struct LightSet {
    lights: [Light; MAX_LIGHTS],
    len: usize,
}

impl LightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a light; returns `false` and drops it when the set is full
    pub fn push(&mut self, light: Light) -> bool {
        if self.len == MAX_LIGHTS {
            return false;
        }
        self.lights[self.len] = light;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_LIGHTS
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_slice(&self) -> &[Light] {
        &self.lights[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Light> {
        self.as_slice().iter()
    }
}

impl PartialEq for LightSet {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'a> IntoIterator for &'a LightSet {
    type Item = &'a Light;
    type IntoIter = std::slice::Iter<'a, Light>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_light_set_capacity() {
        let mut set = LightSet::new();
        for i in 0..MAX_LIGHTS {
            assert!(set.push(Light::point(Vec3::splat(i as f32))));
        }
        assert!(set.is_full());
        assert!(!set.push(Light::point(Vec3::ONE * 10.0)));
        assert_eq!(set.len(), MAX_LIGHTS);
        assert_eq!(set.as_slice()[0].position, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_light_set_equality_ignores_stale_slots() {
        let mut a = LightSet::new();
        a.push(Light::point(Vec3::X));
        a.clear();
        assert_eq!(a, LightSet::new());
    }

    #[test]
    fn test_transformed_point_light() {
        let light = Light::point(Vec3::new(1.0, 0.0, 0.0));
        let moved = light.transformed(&Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(moved.position, Vec4::new(1.0, 5.0, 0.0, 1.0));
    }

    #[test]
    fn test_transformed_directional_ignores_translation() {
        let light = Light::directional(Vec3::Z);
        let moved = light.transformed(&Mat4::from_translation(Vec3::splat(3.0)));
        assert_eq!(moved.position, Vec4::new(0.0, 0.0, 1.0, 0.0));
        assert!(moved.is_directional());
    }

    #[test]
    fn test_transformed_spot_direction() {
        let light = Light::point(Vec3::ZERO).with_spotlight(Vec3::X, 32.0, 30.0);
        let turned = light.transformed(&Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let dir = turned.spotlight.map(|s| s.direction).unwrap_or_default();
        assert_relative_eq!(dir.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(dir.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_enable_toggle() {
        let mut light = Light::default();
        assert!(!light.enabled);
        light.enable();
        assert!(light.enabled);
        light.disable();
        assert!(!light.enabled);
    }

    #[test]
    fn test_spot_direction_ignored_for_point_light() {
        let mut light = Light::point(Vec3::ZERO);
        light.set_spotlight_direction(Vec3::X);
        assert!(light.spotlight.is_none());
    }
}
