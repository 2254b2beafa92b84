//! Frame loop registration
//!
//! Models a display-refresh callback (`requestAnimationFrame` in the
//! browser, a sleep loop natively). Each `start` opens a new loop
//! generation and hands out a `FrameToken`; a frame callback carrying any
//! older token is refused, so a restarted session can never end up with two
//! loops ticking the same state.

use crate::consts::{FRAME_MS, MAX_FRAME_MS};

/// Proof of registration for one loop generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken {
    generation: u64,
}

impl FrameToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Simulation advanced; schedule the next frame
    Ran,
    /// Nothing to advance (paused, level-up, won); schedule the next frame
    Idle,
    /// Token belongs to a cancelled loop; do not reschedule
    Stale,
}

impl FrameStatus {
    /// Whether the host should request another frame
    pub fn reschedule(&self) -> bool {
        !matches!(self, FrameStatus::Stale)
    }
}

/// Loop generation bookkeeping and frame delta computation
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    generation: u64,
    active: bool,
    last_frame_ms: Option<f64>,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new loop, invalidating any previous one
    pub fn start(&mut self) -> FrameToken {
        self.generation += 1;
        self.active = true;
        self.last_frame_ms = None;
        self.frames = 0;
        log::debug!("frame loop generation {} started", self.generation);
        FrameToken {
            generation: self.generation,
        }
    }

    /// Deregister the current loop
    pub fn cancel(&mut self) {
        if self.active {
            log::debug!("frame loop generation {} cancelled", self.generation);
        }
        self.generation += 1;
        self.active = false;
        self.last_frame_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Token belongs to the live loop
    pub fn is_current(&self, token: FrameToken) -> bool {
        self.active && token.generation == self.generation
    }

    /// Frames accepted by the live loop
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Accept a frame callback at host time `now_ms`.
    ///
    /// Returns the frame delta in ms, or `None` for a stale token. The first
    /// frame of a loop uses the nominal 60 Hz delta; later deltas are
    /// clamped to `[0, MAX_FRAME_MS]` so a stall or a clock jump cannot
    /// teleport the world.
    pub fn begin_frame(&mut self, token: FrameToken, now_ms: f64) -> Option<f64> {
        if !self.is_current(token) {
            return None;
        }
        let dt = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);
        self.frames += 1;
        Some(dt)
    }
}
