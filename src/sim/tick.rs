//! Per-frame simulation tick
//!
//! One call advances the world by one display frame. Order is fixed:
//! player, entities, particles, collisions, level-up check, win check and
//! finally the spawn timers, so spawner output only lands at the tick
//! boundary.

use glam::Vec2;
use rand::Rng;

use super::autopilot;
use super::collision::{self, Rect};
use super::entity::{Entity, EntityKind};
use super::particles::ParticlePreset;
use super::progression;
use super::spawn;
use super::state::GameState;
use crate::consts::*;

/// Chance that passing an obstacle throws off a sparkle
const OBSTACLE_SPARKLE_CHANCE: f32 = 0.3;

/// Trail particles leave the fuselage this far behind the nose edge
const TRAIL_OFFSET_X: f32 = 10.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/up/tap)
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Let the autopilot fly
    pub autopilot: bool,
}

/// Advance the game by one frame of `dt_ms` milliseconds.
///
/// Returns false for an idle tick: paused, waiting at a level-up, or over.
/// Idle ticks leave the state untouched, including the clock.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) -> bool {
    if input.pause {
        progression::toggle_pause(state);
    }

    if !state.phase.is_running() {
        return false;
    }

    if input.jump || (input.autopilot && autopilot::wants_jump(state)) {
        progression::jump(state);
    }

    state.clock_ms += dt_ms;
    state.frames += 1;
    let now = state.clock_ms;

    state.player.update(state.gravity, state.viewport.y);
    emit_trail(state);

    let obstacles = std::mem::take(&mut state.obstacles);
    state.obstacles = update_collection(state, obstacles);
    let powerups = std::mem::take(&mut state.powerups);
    state.powerups = update_collection(state, powerups);
    let enemies = std::mem::take(&mut state.enemies);
    state.enemies = update_collection(state, enemies);
    let hazards = std::mem::take(&mut state.hazards);
    state.hazards = update_collection(state, hazards);
    let clouds = std::mem::take(&mut state.clouds);
    state.clouds = update_collection(state, clouds);

    state.trail.update(now);
    state.effects.update(now);

    collision::check_collisions(state);
    progression::check_level_progress(state);
    progression::check_win(state);

    spawn::run_spawners(state, dt_ms);
    true
}

fn emit_trail(state: &mut GameState) {
    let now = state.clock_ms;
    if now - state.player.last_trail_ms <= TRAIL_INTERVAL_MS {
        return;
    }
    state.player.last_trail_ms = now;

    let color = if state.level >= 3 {
        TRAIL_COLOR_HOT
    } else {
        TRAIL_COLOR
    };
    let tail = Vec2::new(
        state.player.pos.x + TRAIL_OFFSET_X,
        state.player.pos.y + state.player.size.y / 2.0,
    );
    state
        .trail
        .burst(&mut state.rng, ParticlePreset::Trail, tail, 1, color, now);
}

/// Move every entity, score the ones the plane just got past and drop the
/// ones that left the screen. Swept from the tail so removals keep indices
/// valid.
fn update_collection(state: &mut GameState, mut entities: Vec<Entity>) -> Vec<Entity> {
    let speed = state.speed;
    let height = state.viewport.y;
    let player_x = state.player.pos.x;

    for entity in entities.iter_mut() {
        entity.advance(speed, height);
    }

    for i in (0..entities.len()).rev() {
        let entity = &mut entities[i];
        if !entity.passed
            && entity.kind.pass_score().is_some()
            && entity.trailing_edge_behind(player_x)
        {
            entity.passed = true;
            let (kind, rect) = (entity.kind, entity.rect());
            on_passed(state, kind, rect);
        }
        if entities[i].is_offscreen() {
            entities.remove(i);
        }
    }
    entities
}

fn on_passed(state: &mut GameState, kind: EntityKind, rect: Rect) {
    progression::award_pass(state, kind);

    let now = state.clock_ms;
    let at = rect.center();
    match kind {
        EntityKind::Obstacle => {
            if state.rng.random::<f32>() < OBSTACLE_SPARKLE_CHANCE {
                // Off the trailing edge
                let edge = Vec2::new(rect.right(), at.y);
                state
                    .effects
                    .burst(&mut state.rng, ParticlePreset::Sparkle, edge, 1, COIN_COLOR, now);
            }
        }
        EntityKind::Enemy(_) => {
            state
                .effects
                .burst(&mut state.rng, ParticlePreset::Explosion, at, 10, DAMAGE_COLOR, now);
        }
        EntityKind::Hazard(_) => {
            state
                .effects
                .burst(&mut state.rng, ParticlePreset::Explosion, at, 12, TRAIL_COLOR_HOT, now);
        }
        EntityKind::Powerup(_) | EntityKind::Cloud => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::{EnemyKind, HazardKind};
    use crate::sim::state::{GameEvent, GamePhase};
    use crate::tuning;
    use proptest::prelude::*;

    fn column(id: u32, x: f32) -> Entity {
        // Right edge lands just behind the plane after one frame at speed 4
        Entity::new(id, EntityKind::Obstacle, Vec2::new(x, 0.0), Vec2::new(60.0, 100.0))
    }

    fn state_with(win_score: f64) -> GameState {
        let settings = Settings {
            win_score,
            ..Settings::default()
        };
        GameState::new(12345, &settings, 0.0)
    }

    #[test]
    fn test_tick_advances_clock_and_player() {
        let mut state = state_with(tuning::WIN_SCORE);
        assert!(tick(&mut state, &TickInput::default(), FRAME_MS));
        assert_eq!(state.frames, 1);
        assert_eq!(state.clock_ms, FRAME_MS);
        assert!(state.player.vel_y > 0.0);
        assert_eq!(state.trail.len(), 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = state_with(tuning::WIN_SCORE);
        state.obstacles.push(column(1, 600.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert!(!tick(&mut state, &pause, FRAME_MS));
        assert_eq!(state.phase, GamePhase::Paused);

        let clock = state.clock_ms;
        let y = state.player.pos.y;
        let x = state.obstacles[0].pos.x;
        for _ in 0..30 {
            let jump = TickInput {
                jump: true,
                ..Default::default()
            };
            assert!(!tick(&mut state, &jump, FRAME_MS));
        }
        assert_eq!(state.clock_ms, clock);
        assert_eq!(state.player.pos.y, y);
        assert_eq!(state.obstacles[0].pos.x, x);

        assert!(tick(&mut state, &pause, FRAME_MS));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.obstacles[0].pos.x < x);
    }

    #[test]
    fn test_trail_cadence_is_strict() {
        let mut state = state_with(tuning::WIN_SCORE);
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.trail.len(), 1);
        let first = state.trail.iter().next().unwrap().pos.x;
        assert!(first >= PLAYER_X + TRAIL_OFFSET_X - 3.0);

        // Exactly 50 ms later: not yet
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), 10.0);
        }
        assert_eq!(state.trail.len(), 1);
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.trail.len(), 2);
    }

    #[test]
    fn test_obstacle_sparkle_is_single() {
        for seed in 0..40 {
            let mut state = GameState::new(seed, &Settings::default(), 0.0);
            state.obstacles.push(column(1, 42.0));
            tick(&mut state, &TickInput::default(), FRAME_MS);
            assert!(state.effects.len() <= 1);
        }
    }

    #[test]
    fn test_pass_scored_once() {
        let mut state = state_with(tuning::WIN_SCORE);
        state.obstacles.push(column(1, 42.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.score, 0.5);
        assert!(state.obstacles[0].passed);

        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(state.score, 0.5);
    }

    #[test]
    fn test_enemy_and_hazard_pass_scores() {
        let mut state = state_with(tuning::WIN_SCORE);
        state.enemies.push(Entity::new(
            1,
            EntityKind::Enemy(EnemyKind::Weaver),
            Vec2::new(41.0, 0.0),
            Vec2::splat(60.0),
        ));
        state.hazards.push(Entity::new(
            2,
            EntityKind::Hazard(HazardKind::Mine),
            Vec2::new(61.0, 0.0),
            Vec2::splat(40.0),
        ));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.score, 5.0);
        assert_eq!(state.effects.len(), 22);
    }

    #[test]
    fn test_offscreen_removed_same_tick() {
        let mut state = state_with(tuning::WIN_SCORE);
        state.obstacles.push(column(1, -57.0));
        state.obstacles.push(column(2, 500.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, 2);
    }

    #[test]
    fn test_level_up_through_tick() {
        let mut state = state_with(1_000_000.0);
        state.score = 999.5;
        state.obstacles.push(column(1, 42.0));

        assert!(tick(&mut state, &TickInput::default(), FRAME_MS));
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 1500.0);
        assert!(state.spawners.halted);

        assert!(!tick(&mut state, &TickInput::default(), FRAME_MS));
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 1500.0);

        let level_ups = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 1);
    }

    #[test]
    fn test_win_through_tick() {
        let mut state = state_with(tuning::WIN_SCORE);
        state.score = 799.5;
        state.obstacles.push(column(1, 42.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.level, 1);

        state.obstacles.push(column(2, 42.0));
        let frames = state.frames;
        assert!(!tick(&mut state, &TickInput::default(), FRAME_MS));
        assert_eq!(state.score, 800.0);
        assert_eq!(state.frames, frames);
    }

    #[test]
    fn test_collision_damages_through_tick() {
        let mut state = state_with(tuning::WIN_SCORE);
        state.obstacles.push(Entity::new(
            1,
            EntityKind::Obstacle,
            Vec2::new(120.0, 300.0),
            Vec2::new(60.0, 200.0),
        ));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.health, 2);

        // Still overlapping but invincible
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.health, 2);
    }

    #[test]
    fn test_jump_input() {
        let mut state = state_with(tuning::WIN_SCORE);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, FRAME_MS);
        assert!(state.player.vel_y < 0.0);
        assert!(state.player.pos.y < 360.0);
    }

    #[test]
    fn test_spawns_follow_virtual_clock() {
        let mut state = state_with(tuning::WIN_SCORE);
        // 2400 ms obstacle interval at 20 ms frames
        for _ in 0..119 {
            tick(&mut state, &TickInput::default(), 20.0);
        }
        assert!(state.obstacles.is_empty());
        tick(&mut state, &TickInput::default(), 20.0);
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut state = state_with(tuning::WIN_SCORE);
            let input = TickInput {
                autopilot: true,
                ..Default::default()
            };
            for _ in 0..1200 {
                tick(&mut state, &input, FRAME_MS);
            }
            let ys: Vec<f32> = state.obstacles.iter().map(|o| o.size.y).collect();
            (state.score, state.health, state.player.pos, ys, state.phase)
        };
        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn prop_offscreen_entities_never_survive(
            xs in prop::collection::vec(-200.0f32..1400.0, 1..20),
            frames in 1usize..60,
        ) {
            let mut state = state_with(1_000_000.0);
            state.player.make_invincible(0.0, 1e9);
            for (i, x) in xs.iter().enumerate() {
                state.obstacles.push(Entity::new(
                    1000 + i as u32,
                    EntityKind::Obstacle,
                    Vec2::new(*x, 0.0),
                    Vec2::new(60.0, 50.0),
                ));
            }
            for _ in 0..frames {
                tick(&mut state, &TickInput::default(), FRAME_MS);
                prop_assert!(state.obstacles.iter().all(|o| !o.is_offscreen()));
                prop_assert!(state.clouds.iter().all(|c| !c.is_offscreen()));
            }
        }

        #[test]
        fn prop_health_stays_bounded(hits in 0usize..10, heals in 0usize..10) {
            let mut state = state_with(tuning::WIN_SCORE);
            for _ in 0..heals {
                progression::apply_powerup(&mut state, crate::sim::PowerupKind::Health);
            }
            for _ in 0..hits {
                progression::take_damage(&mut state);
            }
            prop_assert!(state.health <= MAX_HEALTH);
            prop_assert_eq!(state.health == 0, state.phase == GamePhase::GameOver);
        }
    }
}
