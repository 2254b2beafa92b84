//! Browser host
//!
//! Exposes the game to JavaScript and drives it from
//! `requestAnimationFrame`. Each loop carries the `FrameToken` it was
//! started with and stops rescheduling as soon as the game reports it
//! stale, so restarting never leaves a second loop running.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::game::{Game, GameCommand};
use crate::highscores::BestScore;
use crate::persistence::LocalStore;
use crate::scheduler::FrameToken;
use crate::settings::Settings;

/// Handle owned by the page script
#[wasm_bindgen]
pub struct WebGame {
    inner: Rc<RefCell<Game>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let settings = Settings::load();
        let best = BestScore::new(Box::new(LocalStore::default()));
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            inner: Rc::new(RefCell::new(Game::new(settings, best, seed))),
        }
    }

    /// `keydown` handler; takes `KeyboardEvent.key`
    pub fn key_down(&self, key: &str) {
        let has_session = self
            .inner
            .borrow()
            .state()
            .is_some_and(|s| !s.phase.is_terminal());
        if let Some(command) = super::command_for_key(key, has_session) {
            self.apply(command);
        }
    }

    /// Tap/click on the playfield
    pub fn tap(&self) {
        self.key_down(" ");
    }

    pub fn set_difficulty(&self, value: &str) {
        if let Some(command) = super::difficulty_command(value) {
            self.apply(command);
            self.inner.borrow().settings().save();
        }
    }

    pub fn set_speed(&self, value: &str) {
        if let Some(command) = super::speed_command(value) {
            self.apply(command);
            self.inner.borrow().settings().save();
        }
    }

    pub fn set_autopilot(&self, on: bool) {
        self.inner.borrow_mut().set_autopilot(on);
        log::info!("Autopilot: {}", on);
    }

    pub fn set_muted(&self, muted: bool) {
        self.inner.borrow_mut().audio_mut().set_muted(muted);
    }

    /// Pause if playing (tab hidden, window blur)
    pub fn auto_pause(&self) {
        let playing = self
            .inner
            .borrow()
            .state()
            .is_some_and(|s| s.phase.is_running());
        if playing {
            self.apply(GameCommand::TogglePause);
            log::info!("Auto-paused");
        }
    }

    /// Render snapshot as JSON (`null` before the first run)
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.inner.borrow().snapshot()).unwrap_or_else(|e| {
            log::warn!("Snapshot serialization failed: {}", e);
            "null".to_string()
        })
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&self) -> String {
        let events = self.inner.borrow_mut().drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn best_score(&self) -> f64 {
        self.inner.borrow().best_score()
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

impl WebGame {
    fn apply(&self, command: GameCommand) {
        let token = self.inner.borrow_mut().command(command);
        if let Some(token) = token {
            request_frame(self.inner.clone(), token);
        }
    }
}

fn request_frame(game: Rc<RefCell<Game>>, token: FrameToken) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        on_frame(game, token, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn on_frame(game: Rc<RefCell<Game>>, token: FrameToken, time: f64) {
    let status = game.borrow_mut().frame(token, time);
    if status.reschedule() {
        request_frame(game, token);
    } else {
        log::debug!("frame loop {} stopped", token.generation());
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Sky Aviator starting...");
}
