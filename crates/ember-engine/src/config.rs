//! Engine configuration
//!
//! Loaded from JSON. Every field has a default, so a config file only needs
//! to name the values it changes:
//!
//! ```json
//! { "fps": 60.0, "light_mode": "orbiting", "particles": { "count": 200 } }
//! ```

use std::path::Path;

use anyhow::Context;
use ember_core::scene::SpawnRanges;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// How the world light moves between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightMode {
    /// Stays where the scene put it
    #[default]
    FixedWorld,
    /// Circles the +Z axis, `orbit_degrees` per update
    Orbiting,
    /// Rides along with the camera eye
    MinersLight,
}

/// Initial camera placement and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub view_up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -100.0, 5.0),
            look_at: Vec3::new(0.0, 0.0, 5.0),
            view_up: Vec3::Z,
            fov: 50.0,
            near: 1.0,
            // Outdoor scene, keep the far plane beyond the skybox
            far: 25000.0,
        }
    }
}

/// Fire particle pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub seed: u64,
    pub spawn: SpawnRanges,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 0x00e3_b3e7,
            spawn: SpawnRanges::default(),
        }
    }
}

/// Top-level engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewport size in pixels; drives the aspect ratio and steering offsets
    pub width: u32,
    pub height: u32,
    /// Simulation ticks per second
    pub fps: f32,
    pub camera: CameraConfig,
    pub particles: ParticleConfig,
    pub light_mode: LightMode,
    /// Initial world light position
    pub world_light: Vec3,
    /// Rotation per update in `Orbiting` mode, degrees
    pub orbit_degrees: f32,
    /// Distance moved per steering step
    pub step: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 72.0,
            camera: CameraConfig::default(),
            particles: ParticleConfig::default(),
            light_mode: LightMode::FixedWorld,
            world_light: Vec3::new(50.0, -50.0, 50.0),
            orbit_degrees: 2.0,
            step: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_json(&text).with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(EngineError::InvalidConfig(format!("fps must be positive, got {}", self.fps)));
        }
        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(EngineError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(EngineError::InvalidConfig(format!("fov must be in (0, 180), got {}", camera.fov)));
        }
        if camera.position == camera.look_at {
            return Err(EngineError::InvalidConfig("camera position equals look-at point".to_string()));
        }
        let facing = (camera.look_at - camera.position).normalize_or_zero();
        if facing.cross(camera.view_up.normalize_or_zero()).length_squared() < 1e-8 {
            return Err(EngineError::InvalidConfig(format!(
                "camera view_up {} is zero or parallel to the view direction",
                camera.view_up
            )));
        }
        Ok(())
    }
}
