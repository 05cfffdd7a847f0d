//! Ember CLI - generate meshes and run scenes headless

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ember_core::geometry::{
    Extrusion, Mesh, PathStep, conic, export_obj, lathe, textured_unit_square, textured_unit_triangle, unit_square,
    unit_triangle,
};
use ember_engine::{Engine, EngineConfig, FrameStats, LightMode};
use glam::{Vec2, Vec3};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Scene-graph traversal and procedural geometry", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a primitive and print its stats (or export it)
    Mesh {
        /// Shape to generate
        #[arg(value_enum)]
        shape: Shape,

        /// Subdivisions (grids) or slices (revolution surfaces)
        #[arg(short = 'n', long, default_value = "8")]
        subdivisions: u32,

        /// Include texture coordinates (grids only)
        #[arg(long)]
        textured: bool,

        /// Write a Wavefront OBJ file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the demo scene headless for a number of frames
    Run {
        /// Frames to simulate
        #[arg(short, long, default_value = "72")]
        frames: u32,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured light mode
        #[arg(long, value_enum)]
        light: Option<LightArg>,

        /// Showcase shape to display
        #[arg(long)]
        select: Option<usize>,
    },

    /// Print the default configuration as JSON
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Square,
    Triangle,
    Extrusion,
    Cylinder,
    Cone,
    Vase,
}

#[derive(Clone, Copy, ValueEnum)]
enum LightArg {
    Fixed,
    Orbiting,
    Miners,
}

impl From<LightArg> for LightMode {
    fn from(arg: LightArg) -> Self {
        match arg {
            LightArg::Fixed => LightMode::FixedWorld,
            LightArg::Orbiting => LightMode::Orbiting,
            LightArg::Miners => LightMode::MinersLight,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh {
            shape,
            subdivisions,
            textured,
            output,
        } => {
            run_mesh(shape, subdivisions, textured, output.as_deref())?;
        }
        Commands::Run {
            frames,
            config,
            light,
            select,
        } => {
            run_frames(frames, config.as_deref(), light, select)?;
        }
        Commands::Config => {
            println!("{}", EngineConfig::default().to_json()?);
        }
    }

    Ok(())
}

fn build_mesh(shape: Shape, n: u32, textured: bool) -> Mesh {
    match shape {
        Shape::Square if textured => textured_unit_square(n, 1.0),
        Shape::Square => unit_square(n),
        Shape::Triangle if textured => textured_unit_triangle(n, 1.0),
        Shape::Triangle => unit_triangle(n),
        Shape::Extrusion => {
            // Gentle S-bend, one step per subdivision
            let steps = (1..=n.max(1))
                .map(|i| {
                    let t = i as f32 / n.max(1) as f32;
                    let sway = (t * std::f32::consts::TAU).sin() * 0.5;
                    PathStep::new(Vec3::new(sway, 0.0, 1.0), t * 4.0)
                })
                .collect();
            Extrusion::new(steps).with_caps(true).build()
        }
        Shape::Cylinder => conic(0.5, 0.5, n, n.div_ceil(4)),
        Shape::Cone => conic(0.5, 0.0, n, n.div_ceil(4)),
        Shape::Vase => lathe(
            &[
                Vec2::new(0.0, -0.5),
                Vec2::new(0.35, -0.5),
                Vec2::new(0.5, -0.25),
                Vec2::new(0.25, 0.2),
                Vec2::new(0.3, 0.5),
            ],
            n,
        ),
    }
}

fn run_mesh(shape: Shape, subdivisions: u32, textured: bool, output: Option<&Path>) -> Result<()> {
    let mesh = build_mesh(shape, subdivisions, textured);

    println!("Vertices:  {}", mesh.vertex_count());
    println!("Triangles: {}", mesh.triangle_count());
    if let Some((min, max)) = mesh.bounds() {
        println!("Bounds:    {min} .. {max}");
    }
    println!("16-bit indices: {}", if mesh.fits_u16_indices() { "yes" } else { "no" });

    if let Some(path) = output {
        export_obj(&mesh, path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_frames(frames: u32, config: Option<&Path>, light: Option<LightArg>, select: Option<usize>) -> Result<()> {
    let mut engine = match config {
        Some(path) => Engine::from_config_file(path)?,
        None => Engine::new(EngineConfig::default())?,
    };

    if let Some(mode) = light {
        engine.set_light_mode(mode.into());
    }
    if let Some(index) = select {
        if !engine.select(index)? {
            tracing::warn!(index, "no such showcase shape, keeping the current one");
        }
    }

    let mut total = FrameStats::default();
    let mut last = FrameStats::default();
    for _ in 0..frames {
        last = engine.frame();
        total.draw_calls += last.draw_calls;
        total.triangles += last.triangles;
    }

    tracing::info!(frames, sim_seconds = engine.clock().sim_time(), "run finished");
    println!("Frames:          {}", last.frame);
    println!("Draws per frame: {}", last.draw_calls);
    println!("Tris per frame:  {}", last.triangles);
    println!("Textured draws:  {}", last.textured_draws);
    println!("Active lights:   {}", last.max_lights);
    println!("Total draws:     {}", total.draw_calls);
    println!("Total triangles: {}", total.triangles);
    println!("{}", engine.clock().display_string());
    Ok(())
}
