//! Per-frame render snapshot
//!
//! Flattens `GameState` into boxes with a visual state, particles and a HUD
//! readout. Whatever draws the game (DOM, canvas, a terminal) consumes this
//! and never touches the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::{EnemyKind, Entity, EntityKind, GamePhase, GameState, HazardKind, PowerupKind};

/// Plane tilt per unit of vertical velocity (degrees)
const TILT_PER_VELOCITY: f32 = 1.5;
const MAX_TILT_DEG: f32 = 20.0;

/// Outline glow earned by reaching higher levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelGlow {
    Silver,
    Gold,
}

impl LevelGlow {
    pub fn for_level(level: u32) -> Option<Self> {
        match level {
            0..=2 => None,
            3..=4 => Some(LevelGlow::Silver),
            _ => Some(LevelGlow::Gold),
        }
    }
}

/// How one box should look
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualState {
    Plane {
        /// Nose-up negative, nose-down positive
        tilt_deg: f32,
        invincible: bool,
        glow: Option<LevelGlow>,
    },
    Obstacle,
    Powerup {
        kind: PowerupKind,
        /// Scale factor oscillating around 1.0
        pulse: f32,
    },
    Enemy {
        kind: EnemyKind,
    },
    Hazard {
        kind: HazardKind,
    },
    Cloud,
}

/// A positioned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub visual: VisualState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSprite {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: u32,
    pub opacity: f32,
}

/// Numbers shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub best: u64,
    pub health: u8,
    pub level: u32,
    /// Speed readout (scroll speed × 20)
    pub speed: u32,
    pub phase: GamePhase,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Back to front: clouds, obstacles, powerups, enemies, hazards, plane
    pub sprites: Vec<Sprite>,
    pub particles: Vec<ParticleSprite>,
    pub hud: Hud,
}

fn sprite(entity: &Entity, visual: VisualState) -> Sprite {
    Sprite {
        id: entity.id,
        x: entity.pos.x,
        y: entity.pos.y,
        width: entity.size.x,
        height: entity.size.y,
        visual,
    }
}

fn visual_for(entity: &Entity, pulse: f32) -> VisualState {
    match entity.kind {
        EntityKind::Obstacle => VisualState::Obstacle,
        EntityKind::Powerup(kind) => VisualState::Powerup { kind, pulse },
        EntityKind::Enemy(kind) => VisualState::Enemy { kind },
        EntityKind::Hazard(kind) => VisualState::Hazard { kind },
        EntityKind::Cloud => VisualState::Cloud,
    }
}

/// Plane tilt for a vertical velocity
pub fn plane_tilt(vel_y: f32) -> f32 {
    (vel_y * TILT_PER_VELOCITY).clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
}

/// Powerup scale at clock time `now_ms`
pub fn powerup_pulse(now_ms: f64) -> f32 {
    ((now_ms / 200.0).sin() * 0.2 + 1.0) as f32
}

/// Build the render snapshot for `state`
pub fn snapshot(state: &GameState, best_score: f64) -> Frame {
    let now = state.clock_ms;
    let pulse = powerup_pulse(now);

    let mut sprites = Vec::with_capacity(state.entity_count() + 1);
    for collection in [
        &state.clouds,
        &state.obstacles,
        &state.powerups,
        &state.enemies,
        &state.hazards,
    ] {
        sprites.extend(collection.iter().map(|e| sprite(e, visual_for(e, pulse))));
    }

    let player = &state.player;
    sprites.push(Sprite {
        id: 0,
        x: player.pos.x,
        y: player.pos.y,
        width: player.size.x,
        height: player.size.y,
        visual: VisualState::Plane {
            tilt_deg: plane_tilt(player.vel_y),
            invincible: player.is_invincible(now),
            glow: LevelGlow::for_level(state.level),
        },
    });

    let particles = state
        .trail
        .iter()
        .chain(state.effects.iter())
        .map(|p| ParticleSprite {
            x: p.pos.x,
            y: p.pos.y,
            size: p.size,
            color: p.color,
            opacity: p.opacity(now),
        })
        .collect();

    Frame {
        sprites,
        particles,
        hud: Hud {
            score: state.score.max(0.0).floor() as u64,
            best: best_score.max(state.best_score).max(0.0).floor() as u64,
            health: state.health,
            level: state.level,
            speed: (state.speed * 20.0).floor() as u32,
            phase: state.phase,
        },
    }
}
