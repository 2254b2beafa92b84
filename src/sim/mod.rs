//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Time only advances through `tick` (virtual clock)
//! - Seeded RNG only
//! - Stable iteration order (per-type collections in spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod particles;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, Rect, check_collisions, overlaps};
pub use entity::{EnemyKind, Entity, EntityKind, HazardKind, Oscillation, PowerupKind};
pub use particles::{Particle, ParticleEngine, ParticleOptions, ParticlePreset};
pub use spawn::{SpawnTimer, Spawners, weighted_choice};
pub use state::{GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
