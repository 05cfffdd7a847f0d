//! Material attributes and texture bindings for presentation nodes

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Texture coordinate wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureWrap {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
    LinearMipmapLinear,
}

/// Opaque reference to a texture owned by the render backend
///
/// The id is whatever the backend handed out when it loaded the image;
/// Ember never resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub id: u32,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}

impl TextureBinding {
    /// Repeat-wrapped, linearly filtered binding
    pub fn new(id: u32) -> Self {
        Self {
            id,
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
        }
    }

    pub fn with_wrap(mut self, s: TextureWrap, t: TextureWrap) -> Self {
        self.wrap_s = s;
        self.wrap_t = t;
        self
    }

    pub fn with_filter(mut self, min: TextureFilter, mag: TextureFilter) -> Self {
        self.min_filter = min;
        self.mag_filter = mag;
        self
    }
}

/// Phong material
///
/// Colors are RGBA in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emissive: Vec4,
    /// Specular exponent
    pub shininess: f32,
    pub texture: Option<TextureBinding>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emissive: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 1.0,
            texture: None,
        }
    }
}

impl Material {
    /// Create an untextured material from opaque RGB colors
    pub fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, emissive: Vec3, shininess: f32) -> Self {
        Self {
            ambient: ambient.extend(1.0),
            diffuse: diffuse.extend(1.0),
            specular: specular.extend(1.0),
            emissive: emissive.extend(1.0),
            shininess,
            texture: None,
        }
    }

    /// Emissive-only material, unaffected by scene lights
    pub fn emissive(color: Vec3) -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, color, 0.0)
    }

    pub fn with_texture(mut self, texture: TextureBinding) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// Camera-facing reorientation applied to geometry under a presentation node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Billboard {
    /// Geometry is drawn as transformed
    #[default]
    Off,
    /// Facing axis points straight at the camera
    Spherical,
    /// Facing axis turns toward the camera about a fixed world axis
    /// (keeps sprites such as trees upright)
    Upright(Vec3),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_builders() {
        let m = Material::new(Vec3::splat(0.5), Vec3::ONE, Vec3::ZERO, Vec3::ZERO, 25.0)
            .with_texture(TextureBinding::new(7).with_wrap(TextureWrap::ClampToEdge, TextureWrap::ClampToEdge));

        assert_eq!(m.ambient, Vec4::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(m.shininess, 25.0);
        let tex = m.texture.map(|t| (t.id, t.wrap_s, t.min_filter));
        assert_eq!(tex, Some((7, TextureWrap::ClampToEdge, TextureFilter::Linear)));
    }

    #[test]
    fn test_emissive_material() {
        let m = Material::emissive(Vec3::new(1.0, 0.5, 0.1));
        assert_eq!(m.diffuse, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(m.emissive, Vec4::new(1.0, 0.5, 0.1, 1.0));
    }
}
