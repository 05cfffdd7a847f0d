//! Headless frame loop tests

#![allow(clippy::unwrap_used)]

use std::io;
use std::sync::Arc;

use ember_core::scene::DrawList;
use ember_engine::{Engine, EngineConfig, LightMode};
use parking_lot::Mutex;
use tracing::Level;

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `frames` frames with a subscriber capped at `level`
fn logs_for_frames(level: Level, frames: usize) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        for _ in 0..frames {
            engine.frame();
        }
    });
    logs.text()
}

#[test]
fn frames_report_stable_counts() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();

    let first = engine.frame();
    assert_eq!(first.frame, 1);
    assert_eq!(first.max_lights, 3);

    for _ in 0..100 {
        let stats = engine.frame();
        // Particles respawn in place, so the pool never changes size
        assert_eq!(stats.draw_calls, first.draw_calls);
        assert_eq!(stats.triangles, first.triangles);
    }
    assert_eq!(engine.clock().frame(), 101);
}

#[test]
fn same_config_same_frames() {
    let mut config = EngineConfig::default();
    config.light_mode = LightMode::Orbiting;
    config.particles.seed = 17;

    let mut a = Engine::new(config.clone()).unwrap();
    let mut b = Engine::new(config).unwrap();
    for _ in 0..30 {
        a.update();
        b.update();
    }

    let mut draws_a = DrawList::new();
    let mut draws_b = DrawList::new();
    a.draw(&mut draws_a);
    b.draw(&mut draws_b);

    assert_eq!(draws_a.len(), draws_b.len());
    for (x, y) in draws_a.iter().zip(draws_b.iter()) {
        assert_eq!(x.model, y.model);
        assert_eq!(x.lights, y.lights);
    }
}

#[test]
fn selecting_shapes_changes_triangle_count() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let cylinder = engine.frame().triangles;

    assert!(engine.select(4).unwrap());
    let triangle = engine.frame().triangles;
    assert_ne!(cylinder, triangle);

    assert!(!engine.select(99).unwrap());
    assert_eq!(engine.frame().triangles, triangle);
}

#[test]
fn loads_config_from_file() {
    let path = std::env::temp_dir().join(format!("ember_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "fps": 30.0, "particles": { "count": 10 } }"#).unwrap();

    let mut engine = Engine::from_config_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(engine.config().fps, 30.0);
    assert_eq!(engine.frame().draw_calls, 5 + 1 + 4 + 10 + 1 + 1);
}

#[test]
fn frame_summary_logged_once_per_second() {
    // Default config runs at 72 fps
    let info = logs_for_frames(Level::INFO, 144);
    assert_eq!(info.matches("frame summary").count(), 2);
    assert!(!info.contains("frame drawn"));
    assert!(!info.contains("particles respawned"));

    let debug = logs_for_frames(Level::DEBUG, 144);
    assert_eq!(debug.matches("frame drawn").count(), 142);
    assert!(debug.contains("particles respawned"));
}
