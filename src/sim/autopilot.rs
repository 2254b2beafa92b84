//! Demo driver that flies the plane
//!
//! Used by the headless host and the attract screen. It aims the plane's
//! centre at the middle of the next obstacle gap (or mid-screen when the
//! sky is clear) and jumps whenever the plane is about to sink below it.

use super::state::GameState;

/// Slack below the target line before the autopilot reacts
const MARGIN: f32 = 24.0;
/// Do not jump again while still climbing faster than this
const CLIMB_LOCKOUT: f32 = -2.0;

/// Vertical extent `(top, bottom)` of the next gap ahead of the plane
pub fn next_gap(state: &GameState) -> Option<(f32, f32)> {
    let px = state.player.pos.x;
    let x = state
        .obstacles
        .iter()
        .filter(|o| o.rect().right() > px)
        .map(|o| o.pos.x)
        .min_by(|a, b| a.total_cmp(b))?;

    let mut top = 0.0_f32;
    let mut bottom = state.viewport.y;
    for column in state.obstacles.iter().filter(|o| o.pos.x == x) {
        if column.pos.y <= 0.0 {
            top = top.max(column.rect().bottom());
        } else {
            bottom = bottom.min(column.pos.y);
        }
    }
    Some((top, bottom))
}

/// Whether the plane should jump this frame
pub fn wants_jump(state: &GameState) -> bool {
    let target = match next_gap(state) {
        Some((top, bottom)) => (top + bottom) / 2.0,
        None => state.viewport.y / 2.0,
    };
    let player = &state.player;
    let center = player.pos.y + player.size.y / 2.0;
    center + player.vel_y > target + MARGIN && player.vel_y > CLIMB_LOCKOUT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::{Entity, EntityKind};
    use glam::Vec2;

    #[test]
    fn test_clear_sky_holds_mid_screen() {
        let mut state = GameState::new(1, &Settings::default(), 0.0);
        state.player.pos.y = 600.0;
        assert!(wants_jump(&state));
        state.player.pos.y = 100.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_targets_next_gap() {
        let mut state = GameState::new(1, &Settings::default(), 0.0);
        state.obstacles.push(Entity::new(
            1,
            EntityKind::Obstacle,
            Vec2::new(400.0, 0.0),
            Vec2::new(60.0, 100.0),
        ));
        state.obstacles.push(Entity::new(
            2,
            EntityKind::Obstacle,
            Vec2::new(400.0, 300.0),
            Vec2::new(60.0, 420.0),
        ));
        assert_eq!(next_gap(&state), Some((100.0, 300.0)));

        // Plane centre at 400 is well under the gap centre at 200
        assert!(wants_jump(&state));
        state.player.vel_y = -5.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_ignores_columns_behind_plane() {
        let mut state = GameState::new(1, &Settings::default(), 0.0);
        state.obstacles.push(Entity::new(
            1,
            EntityKind::Obstacle,
            Vec2::new(0.0, 0.0),
            Vec2::new(60.0, 500.0),
        ));
        assert_eq!(next_gap(&state), None);
    }
}
