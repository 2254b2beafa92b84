//! Scoring and progression state machine
//!
//! ```text
//! Playing ──(score >= level*1000)──> LevelUp ──(continue)──> Playing
//!    │  ▲
//!    ▼  │ (toggle)
//!  Paused
//! any non-terminal ──(health == 0)──> GameOver
//! any non-terminal ──(score >= win_score)──> Won
//! ```
//!
//! Terminal phases absorb every mutation until the session is reset.

use glam::Vec2;

use super::entity::{EntityKind, PowerupKind};
use super::particles::ParticlePreset;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::tuning;

/// Add to the score; ignored once the run is over
pub fn add_score(state: &mut GameState, amount: f64) {
    if state.phase.is_terminal() || amount <= 0.0 {
        return;
    }
    state.score += amount;
}

/// Score a pass of `kind`. Called exactly once per entity, when its
/// `passed` flag flips.
pub fn award_pass(state: &mut GameState, kind: EntityKind) {
    let Some(points) = kind.pass_score() else {
        return;
    };
    add_score(state, points);

    if kind == EntityKind::Obstacle {
        let candidate = state
            .speed_policy
            .on_obstacle_passed(state.base_speed, state.score);
        if let Some(candidate) = candidate {
            state.apply_speed(candidate);
        }
    }
}

/// Apply a collected powerup's effect
pub fn apply_powerup(state: &mut GameState, kind: PowerupKind) {
    if state.phase.is_terminal() {
        return;
    }
    match kind {
        PowerupKind::Coin => add_score(state, COIN_SCORE),
        PowerupKind::Shield => {
            let now = state.clock_ms;
            state.player.make_invincible(now, SHIELD_DURATION_MS);
        }
        PowerupKind::Health => state.health = (state.health + 1).min(MAX_HEALTH),
    }
    state.emit(GameEvent::PowerupCollected(kind));
}

/// One hit: -1 health, a short invincibility window, and game over at 0.
/// No-op once the run has ended.
pub fn take_damage(state: &mut GameState) {
    if state.phase.is_terminal() {
        return;
    }
    state.health = state.health.saturating_sub(1);

    let center = state.player.rect().center();
    let now = state.clock_ms;
    state.effects.burst(
        &mut state.rng,
        ParticlePreset::Explosion,
        center,
        DAMAGE_BURST,
        DAMAGE_COLOR,
        now,
    );
    state.player.make_invincible(now, DAMAGE_INVINCIBILITY_MS);
    state.emit(GameEvent::Damage {
        health: state.health,
    });

    if state.health == 0 {
        game_over(state);
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let center = state.player.rect().center();
    state.effects.burst(
        &mut state.rng,
        ParticlePreset::Explosion,
        center,
        GAME_OVER_BURST,
        DAMAGE_COLOR,
        state.clock_ms,
    );
    log::info!(
        "Game over at level {} with score {}",
        state.level,
        state.score.floor()
    );
    state.emit(GameEvent::GameOver { score: state.score });
    state.emit(GameEvent::EngineStop);
    record_best(state);
}

fn record_best(state: &mut GameState) {
    if state.score > state.best_score {
        state.best_score = state.score;
        state.emit(GameEvent::NewBestScore { score: state.score });
    }
}

/// Enter `LevelUp` when the current level's threshold is reached.
/// Returns true when the transition happened this call.
pub fn check_level_progress(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    if state.score < tuning::level_threshold(state.level) {
        return false;
    }

    state.phase = GamePhase::LevelUp;
    state.level += 1;
    state.score += tuning::LEVEL_UP_BONUS;
    state.spawners.halt();
    log::info!("Level up: now level {} (score {})", state.level, state.score.floor());
    state.emit(GameEvent::LevelUp { level: state.level });
    true
}

/// Enter `Won` once the win score is reached, whatever the level state
pub fn check_win(state: &mut GameState) -> bool {
    if state.phase.is_terminal() || state.score < state.win_score {
        return false;
    }
    state.phase = GamePhase::Won;
    log::info!("Won at level {} with score {}", state.level, state.score.floor());
    state.emit(GameEvent::Win { score: state.score });
    state.emit(GameEvent::EngineStop);
    record_best(state);
    true
}

/// Leave `LevelUp`: clear the field, recentre the plane, restart spawning
pub fn continue_level(state: &mut GameState) -> bool {
    if state.phase != GamePhase::LevelUp {
        return false;
    }
    state.clear_playfield();
    state.reset_player();
    state.spawners.restart(state.level);
    state.refresh_speed();
    state.phase = GamePhase::Playing;
    log::info!("Starting level {}", state.level);
    true
}

/// Flip between Playing and Paused. Other phases ignore the toggle.
pub fn toggle_pause(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused;
            state.emit(GameEvent::EngineStop);
            true
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            state.emit(GameEvent::EngineStart);
            true
        }
        _ => false,
    }
}

/// Jump, only while playing
pub fn jump(state: &mut GameState) -> bool {
    if !state.phase.is_running() {
        return false;
    }
    state.player.jump();

    let nose = Vec2::new(
        state.player.pos.x + state.player.size.x,
        state.player.pos.y + state.player.size.y / 2.0,
    );
    state.effects.burst(
        &mut state.rng,
        ParticlePreset::JumpBurst,
        nose,
        JUMP_BURST,
        TRAIL_COLOR,
        state.clock_ms,
    );
    state.emit(GameEvent::Jump);
    true
}
