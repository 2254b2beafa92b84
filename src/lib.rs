//! Sky Aviator - a side-scrolling plane arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, scoring, spawning)
//! - `scheduler`: Frame loop registration with cancellable generations
//! - `game`: Session driver tying the simulation to its collaborators
//! - `renderer`: Per-frame snapshot for whatever draws the game
//! - `platform`: Input mapping and the browser host
//! - `persistence`: Best score storage
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, GameCommand};
pub use highscores::BestScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length at 60 Hz (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest frame the simulation will integrate (tab switches, stalls)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Plane defaults
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 80.0;
    pub const START_HEALTH: u8 = 3;
    pub const MAX_HEALTH: u8 = 5;
    /// Time between exhaust particles
    pub const TRAIL_INTERVAL_MS: f64 = 50.0;

    /// Invincibility after a hit
    pub const DAMAGE_INVINCIBILITY_MS: f64 = 2000.0;
    /// Invincibility from a shield pickup
    pub const SHIELD_DURATION_MS: f64 = 5000.0;
    pub const COIN_SCORE: f64 = 20.0;

    /// Clouds placed across the sky at the start of a run
    pub const INITIAL_CLOUDS: usize = 3;

    /// Particle counts
    pub const DAMAGE_BURST: usize = 20;
    pub const GAME_OVER_BURST: usize = 50;
    pub const JUMP_BURST: usize = 5;

    /// Effect colours (0xRRGGBB)
    pub const DAMAGE_COLOR: u32 = 0xff4d4d;
    pub const TRAIL_COLOR: u32 = 0x4da6ff;
    pub const TRAIL_COLOR_HOT: u32 = 0xff9900;
    pub const COIN_COLOR: u32 = 0xffcc00;
}
