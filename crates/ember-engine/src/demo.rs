//! Demo scene: an outdoor clearing with a skybox, billboard trees, a
//! campfire and a turntable of generated shapes

use std::sync::Arc;

use ember_core::geometry::{
    Extrusion, Mesh, PathStep, conic, lathe, textured_unit_square, unit_square, unit_triangle,
};
use ember_core::scene::{
    AttributeSlots, Billboard, CameraHandle, Fog, Light, Lighting, Material, ParticleSystem, SceneNode,
    TextureBinding, TextureFilter, TextureWrap, TransformNode, TriSurface,
};
use glam::{Vec2, Vec3, Vec4};

use crate::config::EngineConfig;

/// Node names the engine looks up between frames
pub mod names {
    pub const SPOTLIGHT: &str = "spotlight";
    pub const WORLD_LIGHT: &str = "world-light";
    pub const SHOWCASE: &str = "showcase";
    pub const FIRE: &str = "fire";
}

const POSITION_SLOT: u32 = 0;
const NORMAL_SLOT: u32 = 1;
const TEXCOORD_SLOT: u32 = 2;

// Texture ids handed to the backend
const GRASS_TEXTURE: u32 = 1;
const SKY_BACK_TEXTURE: u32 = 2;
const SKY_LEFT_TEXTURE: u32 = 3;
const SKY_RIGHT_TEXTURE: u32 = 4;
const SKY_FRONT_TEXTURE: u32 = 5;
const SKY_CEILING_TEXTURE: u32 = 6;
const TREE_TEXTURE: u32 = 7;
const FIRE_TEXTURE: u32 = 8;

/// Half the skybox edge length
const SKY_EXTENT: f32 = 10000.0;

/// Number of shapes on the showcase selector
pub const SHOWCASE_SHAPES: usize = 5;

fn untextured(mesh: Mesh) -> Arc<TriSurface> {
    Arc::new(TriSurface::new(mesh, AttributeSlots::untextured(POSITION_SLOT, NORMAL_SLOT)))
}

fn textured(mesh: Mesh) -> Arc<TriSurface> {
    Arc::new(TriSurface::new(
        mesh,
        AttributeSlots::textured(POSITION_SLOT, NORMAL_SLOT, TEXCOORD_SLOT),
    ))
}

/// Presentation -> transform -> geometry under `parent`
fn add_subtree(parent: &mut SceneNode, material: SceneNode, transform: TransformNode, surface: &Arc<TriSurface>) {
    parent.add_child(material.with_child(SceneNode::transform(transform).with_child(SceneNode::geometry(Arc::clone(surface)))));
}

/// Build the full demo scene, rooted above the camera
pub fn build(config: &EngineConfig, camera: &CameraHandle) -> SceneNode {
    let mut world = SceneNode::group().with_name("world");
    world.add_child(skybox());
    world.add_child(ground());
    world.add_child(trees());
    world.add_child(campfire(config));
    world.add_child(showcase());

    let (eye, forward) = {
        let cam = camera.read();
        (cam.position(), cam.view_direction())
    };

    let world_light = Light::point(config.world_light)
        .with_diffuse(Vec4::new(0.5, 0.5, 0.5, 1.0))
        .with_specular(Vec4::new(0.5, 0.5, 0.5, 1.0));

    // Reddish spotlight riding on the camera, shining where it looks
    let spotlight = Light::point(eye)
        .with_diffuse(Vec4::new(0.5, 0.1, 0.1, 1.0))
        .with_specular(Vec4::new(0.5, 0.1, 0.1, 1.0))
        .with_spotlight(forward, 32.0, 30.0);

    let sky_light = Light::directional(Vec3::new(1.0, 0.0, 0.5))
        .with_diffuse(Vec4::new(0.4, 0.4, 0.4, 1.0))
        .with_specular(Vec4::new(0.4, 0.4, 0.4, 1.0));

    // Everything in the world sits under all three lights
    let lights = SceneNode::light(sky_light).with_name("sky-light").with_child(
        SceneNode::light(spotlight)
            .with_name(names::SPOTLIGHT)
            .with_child(SceneNode::light(world_light).with_name(names::WORLD_LIGHT).with_child(world)),
    );

    let lighting = Lighting {
        global_ambient: Vec4::new(0.4, 0.4, 0.4, 1.0),
        fog: Some(Fog {
            color: Vec4::new(0.25, 0.25, 0.25, 1.0),
            start: 500.0,
            end: SKY_EXTENT,
        }),
    };

    SceneNode::group().with_name("root").with_child(
        SceneNode::lighting(lighting)
            .with_child(SceneNode::camera(Arc::clone(camera)).with_name("camera").with_child(lights)),
    )
}

fn sky_material(texture: u32) -> SceneNode {
    let material = Material::new(Vec3::splat(0.5), Vec3::ZERO, Vec3::ZERO, Vec3::splat(0.3), 0.0).with_texture(
        TextureBinding::new(texture)
            .with_wrap(TextureWrap::ClampToEdge, TextureWrap::ClampToEdge)
            .with_filter(TextureFilter::LinearMipmapLinear, TextureFilter::Linear),
    );
    SceneNode::presentation(material)
}

fn skybox() -> SceneNode {
    let square = textured(textured_unit_square(2, 1.0));
    let size = 2.0 * SKY_EXTENT;

    let mut back = TransformNode::new();
    back.translate(0.0, SKY_EXTENT, 0.0).rotate_x(90.0).scale(size, size, 1.0);

    let mut front = TransformNode::new();
    front
        .translate(0.0, -SKY_EXTENT, 0.0)
        .rotate_x(-90.0)
        .rotate_z(-180.0)
        .scale(size, size, 1.0);

    let mut left = TransformNode::new();
    left.translate(-SKY_EXTENT, 0.0, 0.0).rotate_y(90.0).rotate_z(90.0).scale(size, size, 1.0);

    let mut right = TransformNode::new();
    right.translate(SKY_EXTENT, 0.0, 0.0).rotate_y(-90.0).rotate_z(-90.0).scale(size, size, 1.0);

    // Flipped so it faces inwards
    let mut ceiling = TransformNode::new();
    ceiling.translate(0.0, 0.0, SKY_EXTENT).rotate_x(180.0).scale(size, size, 1.0);

    let mut skybox = SceneNode::group().with_name("skybox");
    add_subtree(&mut skybox, sky_material(SKY_BACK_TEXTURE), back, &square);
    add_subtree(&mut skybox, sky_material(SKY_LEFT_TEXTURE), left, &square);
    add_subtree(&mut skybox, sky_material(SKY_RIGHT_TEXTURE), right, &square);
    add_subtree(&mut skybox, sky_material(SKY_FRONT_TEXTURE), front, &square);
    add_subtree(&mut skybox, sky_material(SKY_CEILING_TEXTURE), ceiling, &square);
    skybox
}

fn ground() -> SceneNode {
    // Texture repeats 200 times across the ground plane
    let square = textured(textured_unit_square(2, 200.0));

    let mut transform = TransformNode::new();
    transform.scale(2.0 * SKY_EXTENT, 2.0 * SKY_EXTENT, 1.0);

    let material = Material::new(Vec3::splat(0.45), Vec3::splat(0.4), Vec3::splat(0.2), Vec3::ZERO, 25.0)
        .with_texture(TextureBinding::new(GRASS_TEXTURE).with_filter(TextureFilter::LinearMipmapLinear, TextureFilter::Linear));

    let mut ground = SceneNode::group().with_name("ground");
    add_subtree(&mut ground, SceneNode::presentation(material), transform, &square);
    ground
}

fn trees() -> SceneNode {
    let square = textured(textured_unit_square(1, 1.0));
    let material = Material::new(Vec3::splat(0.5), Vec3::splat(0.75), Vec3::splat(0.1), Vec3::ZERO, 5.0).with_texture(
        TextureBinding::new(TREE_TEXTURE)
            .with_wrap(TextureWrap::ClampToEdge, TextureWrap::ClampToEdge)
            .with_filter(TextureFilter::Nearest, TextureFilter::Nearest),
    );

    let mut sprites = SceneNode::billboard(material, Billboard::Upright(Vec3::Z));
    for (x, y) in [(0.0, 0.0), (-40.0, 60.0), (35.0, 80.0), (-70.0, -10.0)] {
        let mut transform = TransformNode::new();
        transform.translate(x, y, 6.0).rotate_x(90.0).scale(15.0, 15.0, 1.0);
        sprites.add_child(SceneNode::transform(transform).with_child(SceneNode::geometry(Arc::clone(&square))));
    }

    SceneNode::group().with_name("trees").with_child(sprites)
}

fn campfire(config: &EngineConfig) -> SceneNode {
    let flame = textured(textured_unit_square(1, 1.0));
    let material = Material::emissive(Vec3::new(1.0, 0.55, 0.1)).with_texture(
        TextureBinding::new(FIRE_TEXTURE).with_wrap(TextureWrap::ClampToEdge, TextureWrap::ClampToEdge),
    );

    let particles = &config.particles;
    let system = ParticleSystem::new(particles.count, config.fps, particles.spawn.clone(), particles.seed);

    let mut placement = TransformNode::new();
    placement.translate(15.0, -30.0, 0.0).scale(2.0, 2.0, 4.0);

    SceneNode::transform(placement).with_child(
        SceneNode::particles(system)
            .with_name(names::FIRE)
            .with_child(SceneNode::billboard(material, Billboard::Spherical).with_child(SceneNode::geometry(flame))),
    )
}

/// Generated shapes on a selector, one visible at a time
fn showcase() -> SceneNode {
    let vase_profile = [
        Vec2::new(0.0, -0.5),
        Vec2::new(0.35, -0.5),
        Vec2::new(0.5, -0.25),
        Vec2::new(0.25, 0.2),
        Vec2::new(0.3, 0.5),
    ];
    let trough = Extrusion::new(vec![
        PathStep::new(Vec3::Z, 0.5),
        PathStep::new(Vec3::new(0.2, 0.0, 1.0), 1.0),
        PathStep::new(Vec3::new(0.4, 0.0, 1.0), 1.5),
    ])
    .with_caps(true)
    .build();

    let shapes = [
        untextured(conic(0.5, 0.5, 18, 4)),
        untextured(conic(0.5, 0.0, 18, 4)),
        untextured(lathe(&vase_profile, 36)),
        untextured(trough),
        untextured(unit_triangle(8)),
    ];

    let mut selector = SceneNode::selector().with_name(names::SHOWCASE);
    for shape in &shapes {
        selector.add_child(SceneNode::geometry(Arc::clone(shape)));
    }

    let material = Material::new(Vec3::new(0.2, 0.1, 0.05), Vec3::new(0.7, 0.4, 0.2), Vec3::splat(0.3), Vec3::ZERO, 16.0);

    let mut pedestal = TransformNode::new();
    pedestal.translate(-20.0, 0.0, 5.0).scale(8.0, 8.0, 8.0);

    let mut base = TransformNode::new();
    base.translate(0.0, 0.0, -0.55).scale(1.4, 1.4, 1.0);

    SceneNode::presentation(material).with_child(
        SceneNode::transform(pedestal)
            .with_child(selector)
            .with_child(SceneNode::transform(base).with_child(SceneNode::geometry(untextured(unit_square(4))))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::scene::{Camera, DrawList, NodeKind, SceneState};

    fn scene() -> SceneNode {
        let config = EngineConfig::default();
        let camera = Camera::look_at(config.camera.position, config.camera.look_at, config.camera.view_up).into_handle();
        build(&config, &camera)
    }

    #[test]
    fn test_named_nodes_present() {
        let root = scene();
        for name in [names::SPOTLIGHT, names::WORLD_LIGHT, names::SHOWCASE, names::FIRE] {
            assert!(root.find(name).is_some(), "missing {name}");
        }
        assert_eq!(root.find(names::SHOWCASE).map(|s| s.children().len()), Some(SHOWCASE_SHAPES));
        assert!(matches!(root.find(names::FIRE).map(SceneNode::kind), Some(NodeKind::Particles(_))));
    }

    #[test]
    fn test_every_draw_sees_all_lights() {
        let root = scene();
        let mut draws = DrawList::new();
        root.draw(&mut SceneState::new(), &mut draws);

        // 5 sky walls + ground + 4 trees + 100 flames + 1 shape + base
        assert_eq!(draws.len(), 5 + 1 + 4 + 100 + 1 + 1);
        for cmd in &draws {
            assert_eq!(cmd.lights.len(), 3);
            assert!(cmd.lighting.fog.is_some());
        }
    }
}
