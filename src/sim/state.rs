//! Game state and core simulation types
//!
//! One `GameState` per run. It owns the plane, every entity collection, both
//! particle engines, the spawn timers and the seeded RNG, and it is passed by
//! `&mut` to every update function. Nothing here is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::{Entity, PowerupKind};
use super::particles::ParticleEngine;
use super::spawn::{self, Spawners};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::{self, Difficulty, SpeedPolicy};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Paused by the player
    Paused,
    /// Level threshold reached, waiting for the player to continue
    LevelUp,
    /// Out of health
    GameOver,
    /// Reached the win score
    Won,
}

impl GamePhase {
    /// Run has ended; only a restart leaves this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }

    /// Simulation advances this frame
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// One-shot signals for audio and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Run started, engine loop on
    EngineStart,
    /// Engine loop off (pause or end of run)
    EngineStop,
    Jump,
    /// Took a hit; carries remaining health
    Damage { health: u8 },
    PowerupCollected(PowerupKind),
    /// New level reached; UI should offer "continue"
    LevelUp { level: u32 },
    Win { score: f64 },
    GameOver { score: f64 },
    /// Final score beat the stored best
    NewBestScore { score: f64 },
}

/// The player's plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity (pixels/frame, positive = down)
    pub vel_y: f32,
    pub size: Vec2,
    /// Clock time until which damage is ignored
    pub invincible_until_ms: f64,
    /// Clock time of the last trail particle
    pub last_trail_ms: f64,
}

impl Player {
    /// Plane at its start position for a viewport `height` tall
    pub fn new(height: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, height / 2.0),
            vel_y: 0.0,
            size: Vec2::splat(PLAYER_SIZE),
            invincible_until_ms: 0.0,
            last_trail_ms: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn is_invincible(&self, now_ms: f64) -> bool {
        now_ms < self.invincible_until_ms
    }

    /// Start (or extend) an invincibility window of `duration_ms`
    pub fn make_invincible(&mut self, now_ms: f64, duration_ms: f64) {
        self.invincible_until_ms = self.invincible_until_ms.max(now_ms + duration_ms);
    }

    pub fn jump(&mut self) {
        self.vel_y = tuning::JUMP_VELOCITY;
    }

    /// Gravity, damping, then position; clamped to the viewport
    pub fn update(&mut self, gravity: f32, height: f32) {
        self.vel_y += gravity;
        self.vel_y *= tuning::PLAYER_DAMPING;
        self.pos.y += self.vel_y;

        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel_y = 0.0;
        }
        let floor = (height - self.size.y).max(0.0);
        if self.pos.y > floor {
            self.pos.y = floor;
            self.vel_y = 0.0;
        }
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    pub speed_policy: SpeedPolicy,
    /// Downward acceleration from the difficulty tier
    pub gravity: f32,
    /// Scroll speed the tier starts at
    pub base_speed: f32,
    /// Current world scroll speed (pixels/frame)
    pub speed: f32,
    /// Player speed control; pins `speed` while set
    pub speed_override: Option<f32>,
    /// Viewport width/height in pixels
    pub viewport: Vec2,
    pub win_score: f64,
    pub score: f64,
    /// Best score known when the run started (updated at the end of the run)
    pub best_score: f64,
    pub health: u8,
    pub level: u32,
    pub phase: GamePhase,
    /// Virtual clock, advanced only by running ticks
    pub clock_ms: f64,
    /// Running ticks so far
    pub frames: u64,
    pub player: Player,
    /// Entity collections, each in spawn order
    pub obstacles: Vec<Entity>,
    pub powerups: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub hazards: Vec<Entity>,
    pub clouds: Vec<Entity>,
    /// Engine exhaust
    pub trail: ParticleEngine,
    /// Explosions, sparkles, jump bursts
    pub effects: ParticleEngine,
    pub spawners: Spawners,
    /// Signals raised since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh run with the given seed and settings
    pub fn new(seed: u64, settings: &Settings, best_score: f64) -> Self {
        let viewport = Vec2::new(settings.viewport.width, settings.viewport.height);
        let difficulty = settings.difficulty;
        let base_speed = difficulty.base_speed();
        let max_particles = settings.max_particles();

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            speed_policy: settings.speed_policy,
            gravity: difficulty.gravity(),
            base_speed,
            speed: base_speed,
            speed_override: settings.speed_override,
            viewport,
            win_score: settings.win_score,
            score: 0.0,
            best_score,
            health: START_HEALTH,
            level: 1,
            phase: GamePhase::Playing,
            clock_ms: 0.0,
            frames: 0,
            player: Player::new(viewport.y),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            enemies: Vec::new(),
            hazards: Vec::new(),
            clouds: Vec::new(),
            trail: ParticleEngine::new(max_particles),
            effects: ParticleEngine::new(max_particles),
            spawners: Spawners::for_level(1),
            events: Vec::new(),
            next_id: 1,
        };
        state.refresh_speed();
        spawn::scatter_clouds(&mut state, INITIAL_CLOUDS);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Set `speed` to `candidate` unless the speed control pins it
    pub fn apply_speed(&mut self, candidate: f32) {
        self.speed = self.speed_override.unwrap_or(candidate);
    }

    /// Re-derive speed from tier, level and score
    pub fn refresh_speed(&mut self) {
        let candidate = self
            .speed_policy
            .on_level_start(self.base_speed, self.level, self.score);
        self.apply_speed(candidate);
    }

    /// Switch tier mid-run: gravity and base speed follow immediately
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.gravity = difficulty.gravity();
        self.base_speed = difficulty.base_speed();
        self.refresh_speed();
    }

    /// Player speed control. Out-of-range values are ignored.
    pub fn set_speed_override(&mut self, value: f32) -> bool {
        if !tuning::valid_speed_control(value) {
            return false;
        }
        self.speed_override = Some(value);
        self.speed = value;
        true
    }

    /// Put the plane back at its start position
    pub fn reset_player(&mut self) {
        self.player = Player::new(self.viewport.y);
    }

    /// Remove every scrolling hazard and pickup (clouds stay)
    pub fn clear_playfield(&mut self) {
        self.obstacles.clear();
        self.powerups.clear();
        self.enemies.clear();
        self.hazards.clear();
    }

    /// Total live entities across all collections
    pub fn entity_count(&self) -> usize {
        self.obstacles.len()
            + self.powerups.len()
            + self.enemies.len()
            + self.hazards.len()
            + self.clouds.len()
    }
}
