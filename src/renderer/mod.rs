//! Rendering collaborator
//!
//! The core does no drawing. It publishes a serializable snapshot per frame.

pub mod snapshot;

pub use snapshot::{Frame, Hud, LevelGlow, ParticleSprite, Sprite, VisualState, snapshot};
