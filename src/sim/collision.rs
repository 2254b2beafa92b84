//! Axis-aligned collision detection
//!
//! Everything in the sky is a box: the plane, obstacle columns, enemies,
//! hazards and powerups. Collision is plain AABB overlap with strict
//! inequalities, so boxes that only share an edge do not collide.

use glam::Vec2;

use super::entity::{Entity, PowerupKind};
use super::particles::ParticlePreset;
use super::progression;
use super::state::GameState;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// AABB overlap test. Symmetric: `overlaps(a, b) == overlaps(b, a)`.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}

/// What the collision pass did this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// A damage-causing entity was hit (at most one per frame)
    pub damaged: bool,
    /// Powerups picked up this frame, in pickup order
    pub collected: Vec<PowerupKind>,
}

/// Index of the first entity overlapping `player`, in collection order
fn first_hit(player: &Rect, entities: &[Entity]) -> Option<usize> {
    entities.iter().position(|e| overlaps(player, &e.rect()))
}

/// Player-vs-world collision pass.
///
/// Damage sources are checked obstacles, then enemies, then hazards; the
/// first hit applies one damage event and ends the damage checks. An
/// invincible plane skips the damage checks entirely. Powerups are checked
/// regardless and every overlapping one is collected.
pub fn check_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    let player = state.player.rect();

    if !state.player.is_invincible(state.clock_ms) {
        let hit = first_hit(&player, &state.obstacles)
            .or_else(|| first_hit(&player, &state.enemies))
            .or_else(|| first_hit(&player, &state.hazards));
        if hit.is_some() {
            progression::take_damage(state);
            report.damaged = true;
        }
    }

    // Damage may have ended the run; a dead plane collects nothing
    if state.phase.is_terminal() {
        return report;
    }

    for i in (0..state.powerups.len()).rev() {
        let hit = {
            let powerup = &state.powerups[i];
            !powerup.collected && overlaps(&player, &powerup.rect())
        };
        if !hit {
            continue;
        }
        let mut powerup = state.powerups.remove(i);
        powerup.collected = true;
        let Some(kind) = powerup.powerup_kind() else {
            continue;
        };

        progression::apply_powerup(state, kind);

        let center = powerup.rect().center();
        let color = kind.color();
        state.effects.burst(
            &mut state.rng,
            ParticlePreset::Explosion,
            center,
            15,
            color,
            state.clock_ms,
        );
        report.collected.push(kind);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, EntityKind};
    use crate::sim::state::GamePhase;
    use crate::settings::Settings;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(7, &Settings::default(), 0.0)
    }

    /// Place a box squarely on top of the plane
    fn on_player(state: &mut GameState, kind: EntityKind) -> Entity {
        let p = state.player.rect();
        let id = state.next_entity_id();
        Entity::new(id, kind, p.pos, Vec2::new(30.0, 30.0))
    }

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(20.0, 0.0, 10.0, 10.0)));
        // Shared edges do not count
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
        // Containment does
        assert!(overlaps(&a, &Rect::new(2.0, 2.0, 1.0, 1.0)));
    }

    #[test]
    fn test_obstacle_hit_costs_one_health() {
        let mut s = state();
        assert_eq!(s.health, 3);
        let e = on_player(&mut s, EntityKind::Obstacle);
        s.obstacles.push(e);

        let report = check_collisions(&mut s);
        assert!(report.damaged);
        assert_eq!(s.health, 2);
        assert!(s.player.is_invincible(s.clock_ms));
        assert_eq!(s.effects.len(), 20, "one damage burst");
    }

    #[test]
    fn test_only_one_damage_per_frame() {
        let mut s = state();
        let a = on_player(&mut s, EntityKind::Obstacle);
        let b = on_player(&mut s, EntityKind::Enemy(crate::sim::EnemyKind::Drone));
        let c = on_player(&mut s, EntityKind::Hazard(crate::sim::HazardKind::Mine));
        s.obstacles.push(a);
        s.enemies.push(b);
        s.hazards.push(c);

        check_collisions(&mut s);
        assert_eq!(s.health, 2);
    }

    #[test]
    fn test_invincibility_blocks_damage_but_not_pickups() {
        let mut s = state();
        s.player.make_invincible(s.clock_ms, 1000.0);
        let obstacle = on_player(&mut s, EntityKind::Obstacle);
        let coin = on_player(&mut s, EntityKind::Powerup(PowerupKind::Coin));
        s.obstacles.push(obstacle);
        s.powerups.push(coin);

        let report = check_collisions(&mut s);
        assert!(!report.damaged);
        assert_eq!(s.health, 3);
        assert_eq!(report.collected, vec![PowerupKind::Coin]);
        assert!(s.powerups.is_empty());
    }

    #[test]
    fn test_all_overlapping_powerups_collected() {
        let mut s = state();
        for kind in [PowerupKind::Coin, PowerupKind::Coin, PowerupKind::Health] {
            let p = on_player(&mut s, EntityKind::Powerup(kind));
            s.powerups.push(p);
        }
        let report = check_collisions(&mut s);
        assert_eq!(report.collected.len(), 3);
        assert_eq!(s.score, 40.0);
        assert_eq!(s.health, 4);
    }

    #[test]
    fn test_collected_guard_prevents_double_collection() {
        let mut s = state();
        let mut p = on_player(&mut s, EntityKind::Powerup(PowerupKind::Coin));
        p.collected = true;
        s.powerups.push(p);
        let report = check_collisions(&mut s);
        assert!(report.collected.is_empty());
        assert_eq!(s.score, 0.0);
    }

    #[test]
    fn test_fatal_hit_skips_pickups() {
        let mut s = state();
        s.health = 1;
        let obstacle = on_player(&mut s, EntityKind::Obstacle);
        let coin = on_player(&mut s, EntityKind::Powerup(PowerupKind::Coin));
        s.obstacles.push(obstacle);
        s.powerups.push(coin);

        check_collisions(&mut s);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.score, 0.0);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }
    }
}
