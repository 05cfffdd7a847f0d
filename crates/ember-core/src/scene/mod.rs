//! Scene graph and its two traversals
//!
//! A scene is a tree of [`SceneNode`]s. Each node owns its children and
//! carries a [`NodeKind`] that decides what happens when the traversal
//! reaches it:
//!
//! - **Draw** composes transforms, materials and lights into a
//!   [`SceneState`] and emits one [`DrawCommand`] per geometry leaf
//! - **Update** advances simulation state (particles) without drawing
//!
//! ## Example
//!
//! ```rust
//! use ember_core::prelude::*;
//! use std::sync::Arc;
//!
//! let tri = Arc::new(TriSurface::new(unit_triangle(2), AttributeSlots::untextured(0, 1)));
//!
//! let mut spin = TransformNode::new();
//! spin.rotate_z(45.0);
//!
//! let root = SceneNode::group()
//!     .with_child(SceneNode::light(Light::point(Vec3::new(0.0, 0.0, 5.0))))
//!     .with_child(SceneNode::transform(spin).with_child(SceneNode::geometry(tri)));
//!
//! let mut draws = DrawList::new();
//! root.draw(&mut SceneState::new(), &mut draws);
//! assert_eq!(draws.commands()[0].lights.len(), 1);
//! ```

mod camera;
mod light;
mod material;
mod particle;
mod render;
mod state;
mod transform;

use std::sync::Arc;

pub use camera::{Camera, CameraHandle, TURN_RATE};
pub use light::{Attenuation, Light, LightSet, MAX_LIGHTS, Spotlight};
pub use material::{Billboard, Material, TextureBinding, TextureFilter, TextureWrap};
pub use particle::{Particle, ParticleSystem, SizeBand, Span, SpawnRanges};
pub use render::{AttributeSlots, DrawCommand, DrawList, Renderer, TriSurface};
pub use state::{Fog, Lighting, SceneState, Scope};
pub use transform::TransformNode;

/// What a node does during traversal
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain container
    Group,
    /// Local transform composed onto everything below
    Transform(TransformNode),
    /// Material (and billboard mode) for everything below
    Presentation {
        material: Material,
        billboard: Billboard,
    },
    /// Global ambient and fog for everything below
    Lighting(Lighting),
    /// Registers a light for everything drawn afterwards
    Light(Light),
    /// Loads view and projection from a shared camera for everything below
    Camera(CameraHandle),
    /// Drawable leaf
    Geometry(Arc<TriSurface>),
    /// Draws its children once per live particle
    Particles(ParticleSystem),
    /// Traverses only the child at `current`
    Selector { current: usize },
}

impl NodeKind {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Transform(_) => "transform",
            NodeKind::Presentation { .. } => "presentation",
            NodeKind::Lighting(_) => "lighting",
            NodeKind::Light(_) => "light",
            NodeKind::Camera(_) => "camera",
            NodeKind::Geometry(_) => "geometry",
            NodeKind::Particles(_) => "particles",
            NodeKind::Selector { .. } => "selector",
        }
    }
}

/// A node in the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: Option<String>,
    kind: NodeKind,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn transform(transform: TransformNode) -> Self {
        Self::new(NodeKind::Transform(transform))
    }

    pub fn presentation(material: Material) -> Self {
        Self::new(NodeKind::Presentation {
            material,
            billboard: Billboard::Off,
        })
    }

    pub fn billboard(material: Material, billboard: Billboard) -> Self {
        Self::new(NodeKind::Presentation { material, billboard })
    }

    pub fn lighting(lighting: Lighting) -> Self {
        Self::new(NodeKind::Lighting(lighting))
    }

    pub fn light(light: Light) -> Self {
        Self::new(NodeKind::Light(light))
    }

    pub fn camera(camera: CameraHandle) -> Self {
        Self::new(NodeKind::Camera(camera))
    }

    pub fn geometry(surface: Arc<TriSurface>) -> Self {
        Self::new(NodeKind::Geometry(surface))
    }

    pub fn particles(system: ParticleSystem) -> Self {
        Self::new(NodeKind::Particles(system))
    }

    /// Selector starting on its first child
    pub fn selector() -> Self {
        Self::new(NodeKind::Selector { current: 0 })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.add_child(child);
        self
    }

    /// Append `child`; children are traversed in insertion order
    ///
    /// Geometry leaves never have children, so the child is dropped there.
    pub fn add_child(&mut self, child: SceneNode) {
        if matches!(self.kind, NodeKind::Geometry(_)) {
            tracing::warn!(child = child.kind.label(), "geometry nodes cannot have children");
            return;
        }
        self.children.push(child);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// First node named `name` in depth-first order
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Select which child a selector traverses
    ///
    /// Returns `false` (leaving the selection alone) if this is not a
    /// selector or `index` is out of range.
    pub fn set_current(&mut self, index: usize) -> bool {
        let count = self.children.len();
        match &mut self.kind {
            NodeKind::Selector { current } if index < count => {
                *current = index;
                true
            }
            NodeKind::Selector { current } => {
                tracing::debug!(index, count, current = *current, "selector index out of range");
                false
            }
            _ => false,
        }
    }

    /// Currently selected child index, if this is a selector
    pub fn current(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Selector { current } => Some(current),
            _ => None,
        }
    }

    /// Draw this subtree
    ///
    /// Scoped state in `state` is the same on return as on entry; lights
    /// registered inside the subtree remain registered.
    pub fn draw<R: Renderer + ?Sized>(&self, state: &mut SceneState, renderer: &mut R) {
        match &self.kind {
            NodeKind::Group => self.draw_children(state, renderer),
            NodeKind::Transform(transform) => {
                let saved = state.scope();
                state.transform *= transform.matrix();
                self.draw_children(state, renderer);
                state.restore(saved);
            }
            NodeKind::Presentation { material, billboard } => {
                let saved = state.scope();
                state.material = *material;
                state.billboard = *billboard;
                self.draw_children(state, renderer);
                state.restore(saved);
            }
            NodeKind::Lighting(lighting) => {
                let saved = state.scope();
                state.lighting = *lighting;
                self.draw_children(state, renderer);
                state.restore(saved);
            }
            NodeKind::Light(light) => {
                state.register_light(light);
                self.draw_children(state, renderer);
            }
            NodeKind::Camera(camera) => {
                let saved = state.scope();
                state.set_camera(&camera.read());
                self.draw_children(state, renderer);
                state.restore(saved);
            }
            NodeKind::Geometry(surface) => {
                renderer.draw(state.draw_command(Arc::clone(surface)));
            }
            NodeKind::Particles(system) => {
                for particle in system.particles() {
                    let saved = state.scope();
                    state.transform *= particle.transform();
                    self.draw_children(state, renderer);
                    state.restore(saved);
                }
            }
            NodeKind::Selector { current } => {
                if let Some(child) = self.children.get(*current) {
                    child.draw(state, renderer);
                }
            }
        }
    }

    /// Advance simulation state in this subtree
    pub fn update(&mut self, state: &mut SceneState) {
        match &mut self.kind {
            NodeKind::Particles(system) => {
                system.update();
            }
            NodeKind::Selector { current } => {
                let current = *current;
                if let Some(child) = self.children.get_mut(current) {
                    child.update(state);
                }
                return;
            }
            _ => {}
        }
        for child in &mut self.children {
            child.update(state);
        }
    }

    fn draw_children<R: Renderer + ?Sized>(&self, state: &mut SceneState, renderer: &mut R) {
        for child in &self.children {
            child.draw(state, renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::unit_square;
    use glam::{Mat4, Vec3};

    fn quad() -> Arc<TriSurface> {
        Arc::new(TriSurface::new(unit_square(1), AttributeSlots::untextured(0, 1)))
    }

    fn draw(root: &SceneNode) -> DrawList {
        let mut list = DrawList::new();
        root.draw(&mut SceneState::new(), &mut list);
        list
    }

    #[test]
    fn test_transform_scoped_to_subtree() {
        let mut t = TransformNode::new();
        t.translate(1.0, 0.0, 0.0);
        let surface = quad();
        let root = SceneNode::group()
            .with_child(SceneNode::transform(t).with_child(SceneNode::geometry(Arc::clone(&surface))))
            .with_child(SceneNode::geometry(surface));

        let list = draw(&root);
        assert_eq!(list.commands()[0].model, Mat4::from_translation(Vec3::X));
        assert_eq!(list.commands()[1].model, Mat4::IDENTITY);
    }

    #[test]
    fn test_nested_transforms_compose_parent_first() {
        let mut outer = TransformNode::new();
        outer.translate(0.0, 0.0, 2.0);
        let mut inner = TransformNode::new();
        inner.scale(3.0, 3.0, 3.0);

        let root = SceneNode::transform(outer)
            .with_child(SceneNode::transform(inner).with_child(SceneNode::geometry(quad())));

        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)) * Mat4::from_scale(Vec3::splat(3.0));
        assert_eq!(draw(&root).commands()[0].model, expected);
    }

    #[test]
    fn test_material_scoped_to_subtree() {
        let red = Material::emissive(Vec3::X);
        let root = SceneNode::group()
            .with_child(SceneNode::presentation(red).with_child(SceneNode::geometry(quad())))
            .with_child(SceneNode::geometry(quad()));

        let list = draw(&root);
        assert_eq!(list.commands()[0].material, red);
        assert_eq!(list.commands()[1].material, Material::default());
    }

    #[test]
    fn test_light_visible_to_later_siblings() {
        let root = SceneNode::group()
            .with_child(SceneNode::geometry(quad()))
            .with_child(SceneNode::group().with_child(SceneNode::light(Light::point(Vec3::ZERO))))
            .with_child(SceneNode::geometry(quad()));

        let list = draw(&root);
        assert!(list.commands()[0].lights.is_empty());
        assert_eq!(list.commands()[1].lights.len(), 1);
    }

    #[test]
    fn test_geometry_rejects_children() {
        let mut leaf = SceneNode::geometry(quad());
        leaf.add_child(SceneNode::group());
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_selector_draws_current_only() {
        let mut a = TransformNode::new();
        a.translate(1.0, 0.0, 0.0);
        let mut b = TransformNode::new();
        b.translate(2.0, 0.0, 0.0);

        let mut selector = SceneNode::selector()
            .with_child(SceneNode::transform(a).with_child(SceneNode::geometry(quad())))
            .with_child(SceneNode::transform(b).with_child(SceneNode::geometry(quad())));

        let list = draw(&selector);
        assert_eq!(list.len(), 1);
        assert_eq!(list.commands()[0].model.w_axis.x, 1.0);

        assert!(!selector.set_current(2));
        assert_eq!(selector.current(), Some(0));

        assert!(selector.set_current(1));
        assert_eq!(draw(&selector).commands()[0].model.w_axis.x, 2.0);
    }

    #[test]
    fn test_set_current_on_non_selector() {
        let mut group = SceneNode::group().with_child(SceneNode::group());
        assert!(!group.set_current(0));
        assert_eq!(group.current(), None);
    }

    #[test]
    fn test_selector_updates_current_only() {
        let particles =
            |seed| SceneNode::particles(ParticleSystem::new(4, 72.0, SpawnRanges::default(), seed));
        let pool = |node: &SceneNode| {
            let NodeKind::Particles(system) = node.kind() else {
                panic!("expected particles");
            };
            system.particles().to_vec()
        };

        let mut selector = SceneNode::selector()
            .with_child(particles(1))
            .with_child(particles(2));
        let first = pool(&selector.children()[0]);
        let second = pool(&selector.children()[1]);

        selector.update(&mut SceneState::new());
        assert_ne!(pool(&selector.children()[0]), first);
        assert_eq!(pool(&selector.children()[1]), second);

        assert!(selector.set_current(1));
        selector.update(&mut SceneState::new());
        assert_ne!(pool(&selector.children()[1]), second);
    }

    #[test]
    fn test_particles_draw_children_per_slot() {
        let system = ParticleSystem::new(8, 72.0, SpawnRanges::default(), 5);
        let mut root = SceneNode::particles(system).with_child(SceneNode::geometry(quad()));

        root.update(&mut SceneState::new());
        let list = draw(&root);
        assert_eq!(list.len(), 8);

        let NodeKind::Particles(system) = root.kind() else {
            panic!("expected particles");
        };
        for (cmd, particle) in list.iter().zip(system.particles()) {
            assert_eq!(cmd.model, particle.transform());
        }
    }

    #[test]
    fn test_camera_scoped() {
        let camera = Camera::look_at(Vec3::new(0.0, -5.0, 0.0), Vec3::ZERO, Vec3::Z).into_handle();
        let root = SceneNode::group()
            .with_child(SceneNode::camera(Arc::clone(&camera)).with_child(SceneNode::geometry(quad())))
            .with_child(SceneNode::geometry(quad()));

        let list = draw(&root);
        assert_eq!(list.commands()[0].view, camera.read().view_matrix());
        assert_eq!(list.commands()[0].camera_position, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(list.commands()[1].view, Mat4::IDENTITY);
    }

    #[test]
    fn test_find_mut_by_name() {
        let mut root = SceneNode::group()
            .with_child(SceneNode::group().with_child(SceneNode::light(Light::point(Vec3::ZERO)).with_name("lamp")))
            .with_child(SceneNode::geometry(quad()));

        assert_eq!(root.node_count(), 4);
        assert_eq!(draw(&root).commands()[0].lights.len(), 1);

        let Some(lamp) = root.find_mut("lamp") else {
            panic!("lamp not found");
        };
        if let NodeKind::Light(light) = lamp.kind_mut() {
            light.disable();
        }

        assert!(draw(&root).commands()[0].lights.is_empty());
        assert!(root.find("missing").is_none());
    }
}
