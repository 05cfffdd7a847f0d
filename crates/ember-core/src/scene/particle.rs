//! Particle simulation for fire-like effects
//!
//! A [`ParticleSystem`] is a fixed pool of [`Particle`] slots. Expired slots
//! are respawned in place, so the pool never grows or reallocates after
//! construction.

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Closed interval sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        rng.gen_range(lo..=hi)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min.min(self.max) && value <= self.max.max(self.min)
    }

    /// Both ends multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}

/// Speed and lifetime ranges for one particle size class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBand {
    /// Units per second
    pub speed: Span,
    /// Seconds
    pub lifetime: Span,
}

/// Spawn distribution for new and respawned particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRanges {
    /// Lower corner of the spawn box
    pub position_min: Vec3,
    /// Upper corner of the spawn box
    pub position_max: Vec3,
    /// Maximum sideways tilt of the initial direction (x and y before normalizing)
    pub spread: f32,
    pub size: Span,
    /// Sizes above this use the `large` band
    pub large_above: f32,
    /// Sizes below this use the `small` band
    pub small_below: f32,
    pub large: SizeBand,
    pub medium: SizeBand,
    pub small: SizeBand,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            position_min: Vec3::new(-1.0, -1.0, 0.0),
            position_max: Vec3::new(1.0, 1.0, 0.2),
            spread: 0.3,
            size: Span::new(0.1, 1.0),
            large_above: 0.5,
            small_below: 0.2,
            // Big embers rise slowly and burn out quickly
            large: SizeBand {
                speed: Span::new(5.0, 7.0),
                lifetime: Span::new(0.2, 0.6),
            },
            medium: SizeBand {
                speed: Span::new(6.5, 8.0),
                lifetime: Span::new(0.4, 1.0),
            },
            small: SizeBand {
                speed: Span::new(8.0, 10.0),
                lifetime: Span::new(0.4, 1.0),
            },
        }
    }
}

impl SpawnRanges {
    /// Speed/lifetime band for a particle of the given size
    pub fn band(&self, size: f32) -> &SizeBand {
        if size > self.large_above {
            &self.large
        } else if size < self.small_below {
            &self.small
        } else {
            &self.medium
        }
    }

    /// Whether `position` lies inside the spawn box
    pub fn contains_position(&self, position: Vec3) -> bool {
        let lo = self.position_min.min(self.position_max);
        let hi = self.position_min.max(self.position_max);
        position.cmpge(lo).all() && position.cmple(hi).all()
    }
}

/// One particle slot
///
/// `age` and `lifetime` are measured in update ticks; `speed` is distance per
/// tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub size: f32,
    pub age: u32,
    pub lifetime: f32,
    transform: Mat4,
}

impl Particle {
    /// Draw a fresh particle from `ranges`
    pub fn spawn<R: Rng>(rng: &mut R, ranges: &SpawnRanges, fps: f32) -> Self {
        let mut particle = Self {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            speed: 0.0,
            size: 1.0,
            age: 0,
            lifetime: 0.0,
            transform: Mat4::IDENTITY,
        };
        particle.respawn(rng, ranges, fps);
        particle
    }

    /// Reinitialize this slot in place
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, ranges: &SpawnRanges, fps: f32) {
        let lo = ranges.position_min;
        let hi = ranges.position_max;
        self.position = Vec3::new(
            Span::new(lo.x, hi.x).sample(rng),
            Span::new(lo.y, hi.y).sample(rng),
            Span::new(lo.z, hi.z).sample(rng),
        );

        let tilt = Span::new(-ranges.spread, ranges.spread);
        self.direction = Vec3::new(tilt.sample(rng), tilt.sample(rng), 1.0).normalize();

        self.size = ranges.size.sample(rng);
        let band = ranges.band(self.size);
        self.speed = band.speed.sample(rng) / fps;
        self.lifetime = band.lifetime.sample(rng) * fps;
        self.age = 0;
        self.refresh_transform();
    }

    /// Advance one tick; returns `true` if the slot was respawned
    pub fn tick<R: Rng>(&mut self, rng: &mut R, ranges: &SpawnRanges, fps: f32) -> bool {
        self.age = self.age.saturating_add(1);
        let expired = self.is_expired();
        if expired {
            self.respawn(rng, ranges, fps);
        } else {
            self.position += self.direction * self.speed;
            self.refresh_transform();
        }
        expired
    }

    pub fn is_expired(&self) -> bool {
        self.age as f32 > self.lifetime
    }

    /// `translate(position) * scale(size)`
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    fn refresh_transform(&mut self) {
        self.transform = Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.size));
    }
}

/// Fixed pool of particles sharing one spawn distribution
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    ranges: SpawnRanges,
    fps: f32,
    rng: StdRng,
}

impl ParticleSystem {
    /// Spawn `count` particles simulated at `fps` ticks per second
    ///
    /// The same seed always produces the same simulation.
    pub fn new(count: usize, fps: f32, ranges: SpawnRanges, seed: u64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| Particle::spawn(&mut rng, &ranges, fps))
            .collect();
        Self {
            particles,
            ranges,
            fps,
            rng,
        }
    }

    /// Advance every slot one tick; returns the number of respawns
    pub fn update(&mut self) -> usize {
        let mut respawned = 0;
        for particle in &mut self.particles {
            if particle.tick(&mut self.rng, &self.ranges, self.fps) {
                respawned += 1;
            }
        }
        if respawned > 0 {
            tracing::debug!(respawned, "particles respawned");
        }
        respawned
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the slots (the pool size is fixed)
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn ranges(&self) -> &SpawnRanges {
        &self.ranges
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
