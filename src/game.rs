//! Session driver
//!
//! `Game` owns the current run, the frame scheduler and the collaborators
//! (best score, audio). Hosts feed it commands and frame callbacks; it
//! feeds the simulation one tick per accepted frame and forwards the
//! resulting events.

use crate::audio::{AudioManager, AudioSink};
use crate::highscores::BestScore;
use crate::renderer::{self, Frame};
use crate::scheduler::{FrameScheduler, FrameStatus, FrameToken};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, progression, tick};
use crate::tuning::{self, Difficulty};

/// Seed spacing between consecutive sessions without a fixed seed
const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Player/UI intents
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameCommand {
    Jump,
    TogglePause,
    /// Begin a run if none is in progress
    Start,
    /// Abandon the current run and begin a new one
    Restart,
    /// Leave the level-up screen
    Continue,
    SetDifficulty(Difficulty),
    /// Speed control, 1..=10
    SetSpeed(f32),
}

/// One player's game: at most one live run at a time
pub struct Game {
    settings: Settings,
    session: Option<GameState>,
    scheduler: FrameScheduler,
    autopilot: bool,
    best: BestScore,
    audio: AudioManager,
    base_seed: u64,
    sessions: u64,
    /// Events from the last frames, for the host UI
    events: Vec<GameEvent>,
}

impl Game {
    /// `seed` is used when the settings do not pin one
    pub fn new(settings: Settings, best: BestScore, seed: u64) -> Self {
        Self {
            settings: settings.sanitized(),
            session: None,
            scheduler: FrameScheduler::new(),
            autopilot: false,
            best,
            audio: AudioManager::new(),
            base_seed: seed,
            sessions: 0,
            events: Vec::new(),
        }
    }

    pub fn set_audio_sink(&mut self, sink: Option<Box<dyn AudioSink>>) {
        self.audio.set_sink(sink);
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.session.as_mut()
    }

    pub fn best_score(&self) -> f64 {
        self.best.get()
    }

    /// A frame loop is registered
    pub fn is_looping(&self) -> bool {
        self.scheduler.is_active()
    }

    /// Render snapshot of the current run
    pub fn snapshot(&self) -> Option<Frame> {
        self.session
            .as_ref()
            .map(|state| renderer::snapshot(state, self.best.get()))
    }

    /// Events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a command immediately. Commands the current phase does not
    /// allow are dropped. Returns a token when a new frame loop must be
    /// started by the host; any older token is dead from then on.
    pub fn command(&mut self, command: GameCommand) -> Option<FrameToken> {
        match command {
            GameCommand::Start => {
                let in_progress = self
                    .session
                    .as_ref()
                    .is_some_and(|s| !s.phase.is_terminal());
                if in_progress {
                    return None;
                }
                Some(self.begin_session())
            }
            GameCommand::Restart => Some(self.begin_session()),
            GameCommand::Jump => {
                if self.session.as_mut().is_some_and(progression::jump) {
                    self.flush_events();
                }
                None
            }
            GameCommand::TogglePause => {
                if self.session.as_mut().is_some_and(progression::toggle_pause) {
                    self.flush_events();
                }
                None
            }
            GameCommand::Continue => {
                if let Some(state) = self.session.as_mut() {
                    progression::continue_level(state);
                }
                None
            }
            GameCommand::SetDifficulty(difficulty) => {
                self.settings.difficulty = difficulty;
                if let Some(state) = self.live_state() {
                    state.set_difficulty(difficulty);
                }
                log::info!("Difficulty set to {}", difficulty.as_str());
                None
            }
            GameCommand::SetSpeed(speed) => {
                if !tuning::valid_speed_control(speed) {
                    log::debug!("ignoring speed control value {}", speed);
                    return None;
                }
                self.settings.speed_override = Some(speed);
                if let Some(state) = self.live_state() {
                    state.set_speed_override(speed);
                }
                None
            }
        }
    }

    /// Stop the loop and drop the run
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        self.session = None;
    }

    /// The current run, unless it already ended
    fn live_state(&mut self) -> Option<&mut GameState> {
        self.session.as_mut().filter(|s| !s.phase.is_terminal())
    }

    fn begin_session(&mut self) -> FrameToken {
        self.scheduler.cancel();

        let seed = self.settings.seed.unwrap_or_else(|| {
            self.base_seed
                .wrapping_add(self.sessions.wrapping_mul(SEED_STRIDE))
        });
        self.sessions += 1;

        let mut state = GameState::new(seed, &self.settings, self.best.get());
        state.emit(GameEvent::EngineStart);
        log::info!(
            "Session {} started: seed {}, difficulty {}",
            self.sessions,
            seed,
            self.settings.difficulty.as_str()
        );

        self.session = Some(state);
        self.flush_events();
        self.scheduler.start()
    }

    /// Frame callback from the host at host time `now_ms`
    pub fn frame(&mut self, token: FrameToken, now_ms: f64) -> FrameStatus {
        let Some(dt) = self.scheduler.begin_frame(token, now_ms) else {
            return FrameStatus::Stale;
        };
        let Some(state) = self.session.as_mut() else {
            return FrameStatus::Idle;
        };

        let input = TickInput {
            autopilot: self.autopilot,
            ..TickInput::default()
        };
        let ran = tick(state, &input, dt);

        self.flush_events();
        if ran {
            FrameStatus::Ran
        } else {
            FrameStatus::Idle
        }
    }

    /// Route this tick's events to audio, the best score and the host
    fn flush_events(&mut self) {
        let Some(state) = self.session.as_mut() else {
            return;
        };
        let events = state.drain_events();
        if events.is_empty() {
            return;
        }
        self.audio.handle_events(&events);

        for event in &events {
            match event {
                GameEvent::NewBestScore { score } => {
                    self.best.submit(*score);
                }
                GameEvent::GameOver { .. } => {
                    self.scheduler.cancel();
                }
                _ => {}
            }
        }
        self.events.extend(events);
    }
}
