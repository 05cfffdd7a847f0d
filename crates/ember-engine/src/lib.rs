//! Ember Engine - application context for running a scene
//!
//! The [`Engine`] owns everything a frame needs: the scene root, the shared
//! camera, the frame clock and the light animation. A frame is one
//! [`Engine::update`] followed by one [`Engine::draw`].
//!
//! ## Example
//!
//! ```rust
//! use ember_engine::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! let stats = engine.frame();
//! assert!(stats.draw_calls > 0);
//!
//! // Walk toward the upper right of the screen
//! engine.steer(600.0, 100.0, true);
//! # Ok::<(), ember_engine::EngineError>(())
//! ```

pub mod clock;
pub mod config;
pub mod demo;

use std::path::Path;

use ember_core::scene::{Camera, CameraHandle, DrawCommand, NodeKind, Renderer, SceneNode, SceneState};
use glam::{Quat, Vec3};
use thiserror::Error;

pub use clock::FrameClock;
pub use config::{CameraConfig, EngineConfig, LightMode, ParticleConfig};

/// Errors raised while setting up or steering the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be parsed or holds unusable values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A node the engine needs is not in the scene
    #[error("Scene has no node named '{0}'")]
    MissingNode(String),
}

/// Totals for one drawn frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub draw_calls: usize,
    pub triangles: usize,
    pub textured_draws: usize,
    /// Largest active light count seen by any draw
    pub max_lights: usize,
}

/// Renderer that only counts what it is given
#[derive(Debug, Default)]
pub struct CountingRenderer {
    stats: FrameStats,
}

impl CountingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

impl Renderer for CountingRenderer {
    fn draw(&mut self, command: DrawCommand) {
        self.stats.draw_calls += 1;
        self.stats.triangles += command.surface.triangle_count();
        if command.surface.is_textured() {
            self.stats.textured_draws += 1;
        }
        self.stats.max_lights = self.stats.max_lights.max(command.lights.len());
    }
}

/// The application context
pub struct Engine {
    config: EngineConfig,
    camera: CameraHandle,
    root: SceneNode,
    clock: FrameClock,
    /// Threaded through update passes; nothing reads it back yet
    update_state: SceneState,
    light_mode: LightMode,
    world_light: Vec3,
}

impl Engine {
    /// Create an engine running the demo scene
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let camera = camera_from_config(&config).into_handle();
        let root = demo::build(&config, &camera);
        Ok(Self::assemble(config, camera, root))
    }

    /// Create an engine around a caller-built scene
    ///
    /// `camera` should be the handle the scene's camera node refers to.
    /// Light animation and spotlight tracking apply only if the scene has
    /// nodes named [`demo::names::WORLD_LIGHT`] and [`demo::names::SPOTLIGHT`].
    pub fn with_scene(config: EngineConfig, camera: CameraHandle, root: SceneNode) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::assemble(config, camera, root))
    }

    /// Create an engine from a JSON config file
    pub fn from_config_file(path: &Path) -> anyhow::Result<Self> {
        let config = EngineConfig::load(path)?;
        Ok(Self::new(config)?)
    }

    fn assemble(config: EngineConfig, camera: CameraHandle, root: SceneNode) -> Self {
        tracing::info!(nodes = root.node_count(), fps = config.fps, "engine ready");
        Self {
            clock: FrameClock::new(config.fps),
            light_mode: config.light_mode,
            world_light: config.world_light,
            update_state: SceneState::new(),
            config,
            camera,
            root,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraHandle {
        &self.camera
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn light_mode(&self) -> LightMode {
        self.light_mode
    }

    pub fn set_light_mode(&mut self, mode: LightMode) {
        tracing::debug!(?mode, "light mode changed");
        self.light_mode = mode;
    }

    /// Current world light position
    pub fn world_light(&self) -> Vec3 {
        self.world_light
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Advance one simulation tick
    pub fn update(&mut self) {
        self.clock.tick();
        self.animate_world_light();
        self.root.update(&mut self.update_state);
    }

    /// Draw the scene into `renderer` with a fresh state
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        let mut state = SceneState::new();
        self.root.draw(&mut state, renderer);
    }

    /// Update, then draw into a counting renderer
    pub fn frame(&mut self) -> FrameStats {
        self.update();

        let mut counter = CountingRenderer::new();
        self.draw(&mut counter);
        let stats = FrameStats {
            frame: self.clock.frame(),
            ..counter.stats()
        };

        // One summary per simulated second, per-frame detail below that
        let per_second = (self.clock.fps().round() as u64).max(1);
        if stats.frame % per_second == 0 {
            tracing::info!(
                frame = stats.frame,
                draw_calls = stats.draw_calls,
                triangles = stats.triangles,
                measured_fps = self.clock.measured_fps(),
                "frame summary"
            );
        } else {
            tracing::debug!(
                frame = stats.frame,
                draw_calls = stats.draw_calls,
                triangles = stats.triangles,
                "frame drawn"
            );
        }
        stats
    }

    // ========================================================================
    // Camera
    // ========================================================================

    /// Track a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.camera.write().change_aspect_ratio(width as f32 / height as f32);
    }

    /// Move along the view direction while turning toward a screen position
    ///
    /// `x`/`y` are pixel coordinates with the origin at the top left; the
    /// further from the center, the sharper the turn.
    pub fn steer(&mut self, x: f32, y: f32, forward: bool) {
        let width = self.config.width as f32;
        let height = self.config.height as f32;
        let step = self.config.step;

        let dx = 4.0 * (x - width * 0.5) / width;
        let dy = 4.0 * (height * 0.5 - y) / height;
        let dz = if forward { step } else { -step };

        self.navigate(|camera| camera.move_and_turn(dx * step, dy * step, dz));
    }

    /// Apply `f` to the camera, then keep camera-bound lights in step
    pub fn navigate<F: FnOnce(&mut Camera)>(&mut self, f: F) {
        {
            let mut camera = self.camera.write();
            f(&mut *camera);
        }
        self.sync_spotlight();
        if self.light_mode == LightMode::MinersLight {
            self.world_light = self.camera.read().position();
            self.place_world_light();
        }
    }

    // ========================================================================
    // Scene steering
    // ========================================================================

    /// Pick which showcase shape is drawn
    ///
    /// Returns `Ok(false)` for an out-of-range index; the current shape stays.
    pub fn select(&mut self, index: usize) -> Result<bool, EngineError> {
        let showcase = self
            .root
            .find_mut(demo::names::SHOWCASE)
            .ok_or_else(|| EngineError::MissingNode(demo::names::SHOWCASE.to_string()))?;
        Ok(showcase.set_current(index))
    }

    fn animate_world_light(&mut self) {
        match self.light_mode {
            LightMode::FixedWorld => return,
            LightMode::Orbiting => {
                let step = Quat::from_rotation_z(self.config.orbit_degrees.to_radians());
                self.world_light = step * self.world_light;
            }
            LightMode::MinersLight => {
                self.world_light = self.camera.read().position();
            }
        }
        self.place_world_light();
    }

    fn place_world_light(&mut self) {
        let position = self.world_light;
        if let Some(NodeKind::Light(light)) = self.root.find_mut(demo::names::WORLD_LIGHT).map(SceneNode::kind_mut) {
            light.set_position(position.extend(1.0));
        }
    }

    /// Keep the camera spotlight at the eye, shining along the view direction
    fn sync_spotlight(&mut self) {
        let (eye, forward) = {
            let camera = self.camera.read();
            (camera.position(), camera.view_direction())
        };
        if let Some(NodeKind::Light(light)) = self.root.find_mut(demo::names::SPOTLIGHT).map(SceneNode::kind_mut) {
            light.set_position(eye.extend(1.0));
            light.set_spotlight_direction(forward);
        }
    }
}

fn camera_from_config(config: &EngineConfig) -> Camera {
    let c = &config.camera;
    let mut camera = Camera::look_at(c.position, c.look_at, c.view_up);
    camera.set_perspective(c.fov, config.aspect_ratio(), c.near, c.far);
    camera
}
