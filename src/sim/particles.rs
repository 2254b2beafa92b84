//! Decorative particle engine
//!
//! Particles never affect gameplay. Each one integrates
//! `vel.y += gravity; pos += vel` per frame, fades out over the second half
//! of its life and is dropped once it outlives `lifetime_ms`.

use glam::Vec2;
use rand::Rng;

/// Default particle budget per engine
pub const MAX_PARTICLES: usize = 200;

/// Lifetime fraction after which fading starts
pub const FADE_START: f32 = 0.5;

/// A single decorative particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    pub size: f32,
    pub color: u32,
    pub created_ms: f64,
    pub lifetime_ms: f64,
    pub fade: bool,
}

impl Particle {
    /// Fraction of lifetime used, clamped to [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.lifetime_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.created_ms) / self.lifetime_ms).clamp(0.0, 1.0) as f32
    }

    /// Opacity in [0, 1]: opaque until `FADE_START`, then linear to 0
    pub fn opacity(&self, now_ms: f64) -> f32 {
        if !self.fade {
            return 1.0;
        }
        let progress = self.progress(now_ms);
        if progress <= FADE_START {
            1.0
        } else {
            (1.0 - (progress - FADE_START) / (1.0 - FADE_START)).clamp(0.0, 1.0)
        }
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.created_ms > self.lifetime_ms
    }
}

/// Explicit parameters for one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleOptions {
    pub color: u32,
    pub size: f32,
    pub vel: Vec2,
    pub gravity: f32,
    pub lifetime_ms: f64,
    pub fade: bool,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            size: 3.0,
            vel: Vec2::ZERO,
            gravity: 0.1,
            lifetime_ms: 1000.0,
            fade: true,
        }
    }
}

/// Named effect categories with fixed parameter ranges
///
/// | preset    | size   | velocity                         | gravity | lifetime (ms) |
/// |-----------|--------|----------------------------------|---------|---------------|
/// | Explosion | 3..9   | 2..6 px/frame, any direction     | 0.2     | 600..900      |
/// | Trail     | 1..3   | x -2.5..-1, y -0.4..0.4          | -0.03   | 300..450      |
/// | Sparkle   | 2..6   | x, y -0.75..0.75                 | 0       | 400..600      |
/// | JumpBurst | 2..5   | x -2..-1, y -1..1                | 0.1     | 300..500      |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticlePreset {
    Explosion,
    Trail,
    Sparkle,
    JumpBurst,
}

impl ParticlePreset {
    /// Draw one particle's parameters from this preset's ranges
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, color: u32) -> ParticleOptions {
        match self {
            ParticlePreset::Explosion => {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let speed: f32 = rng.random_range(2.0..6.0);
                ParticleOptions {
                    color,
                    size: rng.random_range(3.0..9.0),
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    gravity: 0.2,
                    lifetime_ms: rng.random_range(600.0..900.0),
                    fade: true,
                }
            }
            ParticlePreset::Trail => ParticleOptions {
                color,
                size: rng.random_range(1.0..3.0),
                vel: Vec2::new(rng.random_range(-2.5..-1.0), rng.random_range(-0.4..0.4)),
                gravity: -0.03,
                lifetime_ms: rng.random_range(300.0..450.0),
                fade: true,
            },
            ParticlePreset::Sparkle => ParticleOptions {
                color,
                size: rng.random_range(2.0..6.0),
                vel: Vec2::new(rng.random_range(-0.75..0.75), rng.random_range(-0.75..0.75)),
                gravity: 0.0,
                lifetime_ms: rng.random_range(400.0..600.0),
                fade: true,
            },
            ParticlePreset::JumpBurst => ParticleOptions {
                color,
                size: rng.random_range(2.0..5.0),
                vel: Vec2::new(rng.random_range(-2.0..-1.0), rng.random_range(-1.0..1.0)),
                gravity: 0.1,
                lifetime_ms: rng.random_range(300.0..500.0),
                fade: true,
            },
        }
    }
}

/// Bounded pool of particles
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    particles: Vec<Particle>,
    capacity: usize,
}

impl Default for ParticleEngine {
    fn default() -> Self {
        Self::new(MAX_PARTICLES)
    }
}

impl ParticleEngine {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(MAX_PARTICLES)),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Add one particle. Returns false (and does nothing) when full.
    pub fn spawn(&mut self, pos: Vec2, options: ParticleOptions, now_ms: f64) -> bool {
        if self.particles.len() >= self.capacity {
            return false;
        }
        self.particles.push(Particle {
            pos,
            vel: options.vel,
            gravity: options.gravity,
            size: options.size,
            color: options.color,
            created_ms: now_ms,
            lifetime_ms: options.lifetime_ms,
            fade: options.fade,
        });
        true
    }

    /// Spawn `count` particles from `preset` at `pos`; returns how many fit
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        preset: ParticlePreset,
        pos: Vec2,
        count: usize,
        color: u32,
        now_ms: f64,
    ) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if self.particles.len() >= self.capacity {
                break;
            }
            let options = preset.sample(rng, color);
            if self.spawn(pos, options, now_ms) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Integrate one frame and drop expired particles
    pub fn update(&mut self, now_ms: f64) {
        for particle in &mut self.particles {
            particle.vel.y += particle.gravity;
            particle.pos += particle.vel;
        }
        self.particles.retain(|p| !p.is_expired(now_ms));
    }
}
