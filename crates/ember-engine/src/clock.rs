//! Frame clock
//!
//! Simulation advances in fixed ticks of `1 / fps` seconds regardless of how
//! fast frames are actually produced; wall-clock rate is measured alongside
//! for reporting.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Counts simulation ticks and measures the real frame rate
#[derive(Debug, Clone)]
pub struct FrameClock {
    fps: f32,
    frame: u64,
    frame_times: VecDeque<Instant>,
    last_frame: Instant,
    measured_fps: f32,
    frame_time_ms: f32,
}

impl FrameClock {
    pub fn new(fps: f32) -> Self {
        Self {
            fps,
            frame: 0,
            frame_times: VecDeque::with_capacity(120),
            last_frame: Instant::now(),
            measured_fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Record a new frame
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.frame_time_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.frame += 1;

        self.frame_times.push_back(now);
        // Keep only frames from the last second
        while let Some(front) = self.frame_times.front() {
            if now.duration_since(*front) > Duration::from_secs(1) {
                self.frame_times.pop_front();
            } else {
                break;
            }
        }
        self.measured_fps = self.frame_times.len() as f32;
    }

    /// Ticks recorded so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Target simulation rate
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Simulated seconds elapsed, `frame / fps`
    pub fn sim_time(&self) -> f32 {
        self.frame as f32 / self.fps
    }

    /// Frames produced during the last wall-clock second
    pub fn measured_fps(&self) -> f32 {
        self.measured_fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }

    pub fn display_string(&self) -> String {
        format!(
            "frame {} ({:.0} FPS, {:.1}ms)",
            self.frame, self.measured_fps, self.frame_time_ms
        )
    }
}
