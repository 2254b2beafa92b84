//! Sound cue mapping
//!
//! The simulation only raises `GameEvent`s; this module turns them into
//! named sound effects and forwards them to whatever can play sound. No
//! synthesis happens here. With no sink attached every cue is dropped.

use crate::sim::{GameEvent, PowerupKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Engine drone starts (looping)
    EngineStart,
    /// Engine drone stops
    EngineStop,
    Jump,
    /// Took a hit
    Crash,
    Coin,
    /// Shield picked up
    ShieldUp,
    /// Health picked up
    Repair,
    LevelUp,
    Victory,
    GameOver,
    /// New best score
    HighScore,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let effect = match event {
            GameEvent::EngineStart => SoundEffect::EngineStart,
            GameEvent::EngineStop => SoundEffect::EngineStop,
            GameEvent::Jump => SoundEffect::Jump,
            GameEvent::Damage { .. } => SoundEffect::Crash,
            GameEvent::PowerupCollected(PowerupKind::Coin) => SoundEffect::Coin,
            GameEvent::PowerupCollected(PowerupKind::Shield) => SoundEffect::ShieldUp,
            GameEvent::PowerupCollected(PowerupKind::Health) => SoundEffect::Repair,
            GameEvent::LevelUp { .. } => SoundEffect::LevelUp,
            GameEvent::Win { .. } => SoundEffect::Victory,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
            GameEvent::NewBestScore { .. } => SoundEffect::HighScore,
        };
        Some(effect)
    }

    /// Looping cue rather than a one-shot
    pub fn is_loop(&self) -> bool {
        matches!(self, SoundEffect::EngineStart)
    }
}

/// Something that can play sound effects
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Routes game events to an optional sink
#[derive(Default)]
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    muted: bool,
    engine_running: bool,
}

impl AudioManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::default()
        }
    }

    pub fn set_sink(&mut self, sink: Option<Box<dyn AudioSink>>) {
        self.sink = sink;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted && self.engine_running {
            self.forward(SoundEffect::EngineStop);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the engine loop is currently playing
    pub fn engine_running(&self) -> bool {
        self.engine_running
    }

    /// Play the cue for each event, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            let Some(effect) = SoundEffect::for_event(event) else {
                continue;
            };
            match effect {
                SoundEffect::EngineStart if self.engine_running => continue,
                SoundEffect::EngineStop if !self.engine_running => continue,
                SoundEffect::EngineStart => self.engine_running = true,
                SoundEffect::EngineStop => self.engine_running = false,
                _ => {}
            }
            if !self.muted {
                self.forward(effect);
            }
        }
    }

    fn forward(&mut self, effect: SoundEffect) {
        if let Some(sink) = self.sink.as_mut() {
            sink.play(effect);
        }
    }
}
