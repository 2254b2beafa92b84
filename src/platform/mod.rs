//! Platform abstraction layer
//!
//! Maps raw host input (key names, form values) onto `GameCommand`s, and
//! hosts the browser loop on wasm32.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::game::GameCommand;
use crate::tuning::Difficulty;

/// Command for a key press. `key` uses DOM `KeyboardEvent.key` names.
///
/// Jump keys start a run when none is in progress.
pub fn command_for_key(key: &str, has_session: bool) -> Option<GameCommand> {
    match key {
        " " | "Spacebar" | "ArrowUp" | "w" | "W" => {
            if has_session {
                Some(GameCommand::Jump)
            } else {
                Some(GameCommand::Start)
            }
        }
        "Escape" | "p" | "P" => Some(GameCommand::TogglePause),
        "Enter" => Some(GameCommand::Continue),
        "r" | "R" => Some(GameCommand::Restart),
        _ => None,
    }
}

/// Difficulty picker value. Unknown tiers are ignored.
pub fn difficulty_command(value: &str) -> Option<GameCommand> {
    Difficulty::from_str(value).map(GameCommand::SetDifficulty)
}

/// Speed slider value. Non-numeric input is ignored; range checks happen
/// in the game.
pub fn speed_command(value: &str) -> Option<GameCommand> {
    value.trim().parse::<f32>().ok().map(GameCommand::SetSpeed)
}
