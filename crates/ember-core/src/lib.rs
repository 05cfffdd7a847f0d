//! # Ember Core
//!
//! Scene-graph traversal and procedural geometry for real-time 3D scenes.
//!
//! A scene is a tree of [`SceneNode`](scene::SceneNode)s. Each frame the tree is
//! walked twice: `update` advances simulation state (particles), then `draw`
//! composes transforms, materials and lights into a [`SceneState`](scene::SceneState)
//! and hands one [`DrawCommand`](scene::DrawCommand) per geometry leaf to a
//! [`Renderer`](scene::Renderer).
//!
//! ## Quick Start
//!
//! ```rust
//! use ember_core::prelude::*;
//! use std::sync::Arc;
//!
//! let quad = Arc::new(TriSurface::new(unit_square(4), AttributeSlots::untextured(0, 1)));
//!
//! let mut transform = TransformNode::new();
//! transform.scale(2.0, 2.0, 2.0);
//!
//! let mut root = SceneNode::group();
//! root.add_child(SceneNode::transform(transform).with_child(SceneNode::geometry(quad)));
//!
//! let mut draws = DrawList::new();
//! root.draw(&mut SceneState::new(), &mut draws);
//! assert_eq!(draws.len(), 1);
//! ```
//!
//! ## Units and Conventions
//!
//! - **Angles**: node and camera mutators take **degrees**
//! - **Precision**: `f32` throughout
//! - **Coordinate system**: Right-handed, Z-up for generated surfaces (unit
//!   surfaces lie in the XY plane facing +Z)
//! - **Matrix order**: column vectors; child coordinates map into parent space
//!   via `parent * local`

pub mod geometry;
pub mod scene;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Geometry generators
    pub use crate::geometry::{
        Extrusion, MAX_SUBDIVISIONS, Mesh, PathStep, Vertex, conic, lathe, textured_unit_square,
        textured_unit_triangle, unit_square, unit_triangle,
    };

    // Scene graph
    pub use crate::scene::{
        AttributeSlots, Billboard, Camera, CameraHandle, DrawCommand, DrawList, Light, LightSet,
        Lighting, MAX_LIGHTS, Material, NodeKind, Particle, ParticleSystem, Renderer, SceneNode,
        SceneState, SpawnRanges, TextureBinding, TextureFilter, TextureWrap, TransformNode,
        TriSurface,
    };

    // Math (re-export glam)
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

    // Error handling
    pub use crate::{Error, Result};
}
