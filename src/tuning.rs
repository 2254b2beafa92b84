//! Data-driven game balance
//!
//! Difficulty tiers, speed scaling and the level-dependent spawn formulas.
//! Everything here is a pure function of (tier, level, score) so the
//! simulation can re-derive its parameters at any point.

use serde::{Deserialize, Serialize};

/// Damping applied to the plane's vertical velocity every frame
pub const PLAYER_DAMPING: f32 = 0.95;
/// Upward velocity set by a jump (pixels/frame)
pub const JUMP_VELOCITY: f32 = -9.0;
/// Hard ceiling on scroll speed
pub const MAX_SPEED: f32 = 10.0;
/// Range accepted by the player speed control
pub const SPEED_CONTROL_MIN: f32 = 1.0;
pub const SPEED_CONTROL_MAX: f32 = 10.0;

/// Score per level: level-up fires at `level * LEVEL_SCORE_STEP`
pub const LEVEL_SCORE_STEP: f64 = 1000.0;
/// Bonus granted on level-up
pub const LEVEL_UP_BONUS: f64 = 500.0;
/// Score that ends the run in victory
pub const WIN_SCORE: f64 = 800.0;

/// Difficulty tier chosen before (or during) a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a tier name. Unknown names yield `None` and are ignored by callers.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Downward acceleration (pixels/frame²)
    pub fn gravity(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.4,
        }
    }

    /// Scroll speed at the start of a run (pixels/frame)
    pub fn base_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Medium => 4.0,
            Difficulty::Hard => 5.0,
        }
    }
}

/// How the scroll speed evolves during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPolicy {
    /// Recomputed from score every time an obstacle is passed
    #[default]
    ScoreScaled,
    /// Fixed for the whole level, stepped up when the next level starts
    PerLevel,
}

impl SpeedPolicy {
    /// Speed after passing an obstacle, or `None` if this policy leaves it alone
    pub fn on_obstacle_passed(&self, base: f32, score: f64) -> Option<f32> {
        match self {
            SpeedPolicy::ScoreScaled => {
                let steps = (score / 500.0).floor() as f32;
                Some((base + steps * 0.25).min(MAX_SPEED))
            }
            SpeedPolicy::PerLevel => None,
        }
    }

    /// Speed when a level (re)starts
    pub fn on_level_start(&self, base: f32, level: u32, score: f64) -> f32 {
        match self {
            SpeedPolicy::ScoreScaled => {
                let steps = (score / 500.0).floor() as f32;
                (base + steps * 0.25).min(MAX_SPEED)
            }
            SpeedPolicy::PerLevel => {
                (base + level.saturating_sub(1) as f32 * 0.5).min(MAX_SPEED)
            }
        }
    }
}

/// Whether a requested speed control value is acceptable
pub fn valid_speed_control(value: f32) -> bool {
    value.is_finite() && (SPEED_CONTROL_MIN..=SPEED_CONTROL_MAX).contains(&value)
}

/// Score needed to leave `level`
pub fn level_threshold(level: u32) -> f64 {
    level as f64 * LEVEL_SCORE_STEP
}

// === Spawn intervals (ms) ===

pub fn obstacle_interval_ms(level: u32) -> f64 {
    (2500.0 - level as f64 * 100.0).max(1000.0)
}

pub const POWERUP_INTERVAL_MS: f64 = 3000.0;

pub fn enemy_interval_ms(level: u32) -> f64 {
    (4000.0 - level as f64 * 100.0).max(1500.0)
}

pub fn hazard_interval_ms(level: u32) -> f64 {
    (5000.0 - level as f64 * 150.0).max(2000.0)
}

pub const CLOUD_INTERVAL_MS: f64 = 4000.0;

/// Enemies appear from this level on
pub const ENEMY_MIN_LEVEL: u32 = 2;
/// Hazards appear from this level on
pub const HAZARD_MIN_LEVEL: u32 = 3;

// === Capacity limits ===

/// Obstacle pairs allowed on screen at once
pub fn max_obstacle_pairs(level: u32) -> usize {
    ((level / 2) as usize + 1).min(3)
}

pub const MAX_POWERUPS: usize = 4;

pub fn max_enemies(score: f64) -> usize {
    ((score / 200.0).floor().max(0.0) as usize + 1).min(4)
}

pub fn max_hazards(level: u32) -> usize {
    (level.saturating_sub(HAZARD_MIN_LEVEL - 1) as usize).min(3)
}

pub const MAX_CLOUDS: usize = 8;

// === Obstacle gap geometry ===

pub const OBSTACLE_WIDTH: f32 = 60.0;
pub const OBSTACLE_MIN_HEIGHT: f32 = 80.0;
pub const OBSTACLE_MIN_GAP: f32 = 150.0;

/// (min, max) vertical gap between an obstacle pair at this level
pub fn obstacle_gap_range(level: u32) -> (f32, f32) {
    let shrink = level as f32 * 10.0;
    (200.0 - shrink, 300.0 - shrink)
}
