//! Non-player entities and their per-frame motion
//!
//! Every scrolling object is an `Entity` tagged with an `EntityKind`. Motion
//! is integrated once per frame in pixels/frame; the world scrolls right to
//! left so everything drifts toward negative x.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Velocity retained (and flipped) when a drifting entity hits the top or bottom
pub const BOUNCE_RESTITUTION: f32 = -0.8;

/// Powerup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// +20 score
    Coin,
    /// Temporary invincibility
    Shield,
    /// +1 health (capped)
    Health,
}

impl PowerupKind {
    /// Pickup box edge length
    pub fn size(&self) -> f32 {
        match self {
            PowerupKind::Coin => 20.0,
            PowerupKind::Shield | PowerupKind::Health => 25.0,
        }
    }

    /// Burst colour used when collected
    pub fn color(&self) -> u32 {
        match self {
            PowerupKind::Coin => 0xffcc00,
            PowerupKind::Shield => 0x4da6ff,
            PowerupKind::Health => 0x4caf50,
        }
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast UFO drifting vertically, bouncing off the screen edges
    Drone,
    /// Slower UFO weaving on a sine path
    Weaver,
}

/// Hazard variants (level 3+)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Floating mine bobbing up and down
    Mine,
    /// Low, fast missile
    Missile,
}

/// Entity discriminant with per-variant payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Powerup(PowerupKind),
    Enemy(EnemyKind),
    Hazard(HazardKind),
    /// Decorative, never collides
    Cloud,
}

impl EntityKind {
    /// Score awarded once when the plane gets past this entity
    pub fn pass_score(&self) -> Option<f64> {
        match self {
            EntityKind::Obstacle => Some(0.5),
            EntityKind::Enemy(_) => Some(2.0),
            EntityKind::Hazard(_) => Some(3.0),
            EntityKind::Powerup(_) | EntityKind::Cloud => None,
        }
    }

    /// Fraction of the world scroll speed this kind moves at
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EntityKind::Obstacle => 1.0,
            EntityKind::Powerup(_) => 0.8,
            EntityKind::Enemy(EnemyKind::Drone) => 1.2,
            EntityKind::Enemy(EnemyKind::Weaver) => 1.0,
            EntityKind::Hazard(HazardKind::Mine) => 1.0,
            EntityKind::Hazard(HazardKind::Missile) => 1.8,
            // Clouds move at their own speed
            EntityKind::Cloud => 0.0,
        }
    }
}

/// Sine-wave vertical motion around a base line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub base_y: f32,
    pub amplitude: f32,
    /// Radians per frame
    pub frequency: f32,
    pub phase: f32,
}

/// A scrolling world object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// x: own drift speed (clouds only), y: vertical drift per frame
    pub vel: Vec2,
    pub speed_mult: f32,
    pub oscillation: Option<Oscillation>,
    /// Plane got past this entity and it has been scored
    pub passed: bool,
    /// Powerup has been picked up
    pub collected: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            vel: Vec2::ZERO,
            speed_mult: kind.speed_multiplier(),
            oscillation: None,
            passed: false,
            collected: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_oscillation(mut self, amplitude: f32, frequency: f32, phase: f32) -> Self {
        self.oscillation = Some(Oscillation {
            base_y: self.pos.y,
            amplitude,
            frequency,
            phase,
        });
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn powerup_kind(&self) -> Option<PowerupKind> {
        match self.kind {
            EntityKind::Powerup(kind) => Some(kind),
            _ => None,
        }
    }

    /// Fully past the left edge of the screen
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }

    /// Trailing edge has crossed `x`
    #[inline]
    pub fn trailing_edge_behind(&self, x: f32) -> bool {
        self.pos.x + self.size.x < x
    }

    /// Advance one frame at world scroll `speed` inside a viewport `height` tall
    pub fn advance(&mut self, speed: f32, height: f32) {
        match self.kind {
            EntityKind::Cloud => self.pos.x -= self.vel.x,
            _ => self.pos.x -= speed * self.speed_mult,
        }

        let max_y = (height - self.size.y).max(0.0);

        if let Some(osc) = self.oscillation.as_mut() {
            osc.phase += osc.frequency;
            self.pos.y = (osc.base_y + osc.amplitude * osc.phase.sin()).clamp(0.0, max_y);
        } else if self.vel.y != 0.0 {
            self.pos.y += self.vel.y;
            if self.pos.y < 0.0 {
                self.pos.y = 0.0;
                self.vel.y *= BOUNCE_RESTITUTION;
            } else if self.pos.y > max_y {
                self.pos.y = max_y;
                self.vel.y *= BOUNCE_RESTITUTION;
            }
        }
    }
}
