//! Timed entity spawners
//!
//! Each spawner is an elapsed-time accumulator advanced by the tick, so
//! spawning happens only at tick boundaries and runs off the virtual clock.
//! Spawn attempts that hit a gate (wrong phase, level too low, capacity
//! reached, no room for a gap) are silent no-ops.

use glam::Vec2;
use rand::Rng;

use super::entity::{EnemyKind, Entity, EntityKind, HazardKind, PowerupKind};
use super::state::GameState;
use crate::tuning::{self, *};

/// Relative odds for each powerup
pub const POWERUP_WEIGHTS: [(PowerupKind, u32); 3] = [
    (PowerupKind::Coin, 70),
    (PowerupKind::Shield, 20),
    (PowerupKind::Health, 10),
];

pub const ENEMY_WEIGHTS: [(EnemyKind, u32); 2] = [(EnemyKind::Drone, 70), (EnemyKind::Weaver, 30)];

pub const HAZARD_WEIGHTS: [(HazardKind, u32); 2] =
    [(HazardKind::Mine, 60), (HazardKind::Missile, 40)];

/// Cumulative-weight draw: pick `U(0, total)`, walk the table subtracting
/// weights, and return the first entry whose weight exceeds what is left.
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(rng: &mut R, table: &'a [(T, u32)]) -> Option<&'a T> {
    let total: u32 = table.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return None;
    }
    let mut draw = rng.random::<f64>() * total as f64;
    for (item, weight) in table {
        let weight = *weight as f64;
        if draw < weight {
            return Some(item);
        }
        draw -= weight;
    }
    // Only reachable through float rounding
    table.iter().rev().find(|(_, w)| *w > 0).map(|(item, _)| item)
}

/// Uniform draw from `[lo, hi)`. A range squeezed empty by a small
/// viewport collapses to `lo`.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// Periodic trigger driven by elapsed time
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTimer {
    pub interval_ms: f64,
    pub enabled: bool,
    elapsed_ms: f64,
}

impl SpawnTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            enabled: true,
            elapsed_ms: 0.0,
        }
    }

    pub fn disabled(interval_ms: f64) -> Self {
        Self {
            enabled: false,
            ..Self::new(interval_ms)
        }
    }

    /// Accumulate `dt_ms`; returns how many periods completed
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if !self.enabled || self.interval_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            fired += 1;
        }
        fired
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

/// The five spawn timers of a level
#[derive(Debug, Clone, PartialEq)]
pub struct Spawners {
    pub obstacle: SpawnTimer,
    pub powerup: SpawnTimer,
    pub enemy: SpawnTimer,
    pub hazard: SpawnTimer,
    pub cloud: SpawnTimer,
    /// Stopped for a level transition
    pub halted: bool,
}

impl Spawners {
    /// Timers for `level`; enemy and hazard timers exist only once unlocked
    pub fn for_level(level: u32) -> Self {
        let enemy = if level >= ENEMY_MIN_LEVEL {
            SpawnTimer::new(enemy_interval_ms(level))
        } else {
            SpawnTimer::disabled(enemy_interval_ms(level))
        };
        let hazard = if level >= HAZARD_MIN_LEVEL {
            SpawnTimer::new(hazard_interval_ms(level))
        } else {
            SpawnTimer::disabled(hazard_interval_ms(level))
        };
        Self {
            obstacle: SpawnTimer::new(obstacle_interval_ms(level)),
            powerup: SpawnTimer::new(POWERUP_INTERVAL_MS),
            enemy,
            hazard,
            cloud: SpawnTimer::new(CLOUD_INTERVAL_MS),
            halted: false,
        }
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Fresh timers for `level`, running
    pub fn restart(&mut self, level: u32) {
        *self = Self::for_level(level);
    }
}

/// Advance every timer by `dt_ms` and spawn for each completed period
pub fn run_spawners(state: &mut GameState, dt_ms: f64) {
    if state.spawners.halted || !state.phase.is_running() {
        return;
    }

    let obstacles = state.spawners.obstacle.advance(dt_ms);
    let powerups = state.spawners.powerup.advance(dt_ms);
    let enemies = state.spawners.enemy.advance(dt_ms);
    let hazards = state.spawners.hazard.advance(dt_ms);
    let clouds = state.spawners.cloud.advance(dt_ms);

    for _ in 0..obstacles {
        spawn_obstacle_pair(state);
    }
    for _ in 0..powerups {
        spawn_powerup(state);
    }
    for _ in 0..enemies {
        spawn_enemy(state);
    }
    for _ in 0..hazards {
        spawn_hazard(state);
    }
    for _ in 0..clouds {
        spawn_cloud(state);
    }
}

fn can_spawn(state: &GameState) -> bool {
    state.phase.is_running() && !state.spawners.halted
}

/// Top and bottom columns with a random gap between them
pub fn spawn_obstacle_pair(state: &mut GameState) -> bool {
    if !can_spawn(state) {
        return false;
    }
    let level = state.level;
    if state.obstacles.len() >= tuning::max_obstacle_pairs(level) * 2 {
        return false;
    }

    let Vec2 { x: width, y: height } = state.viewport;
    let (min_gap, max_gap) = tuning::obstacle_gap_range(level);
    let gap = sample(&mut state.rng, min_gap, max_gap).max(OBSTACLE_MIN_GAP);
    let max_height = height - gap - OBSTACLE_MIN_HEIGHT;
    if max_height < OBSTACLE_MIN_HEIGHT {
        return false;
    }

    let column = sample(&mut state.rng, 0.0, max_height - OBSTACLE_MIN_HEIGHT).floor()
        + OBSTACLE_MIN_HEIGHT;
    let top_height = sample(&mut state.rng, 0.0, height - gap - column).floor();
    let bottom_y = top_height + gap;

    let top_id = state.next_entity_id();
    let top = Entity::new(
        top_id,
        EntityKind::Obstacle,
        Vec2::new(width, 0.0),
        Vec2::new(OBSTACLE_WIDTH, top_height),
    );
    let bottom_id = state.next_entity_id();
    let bottom = Entity::new(
        bottom_id,
        EntityKind::Obstacle,
        Vec2::new(width, bottom_y),
        Vec2::new(OBSTACLE_WIDTH, height - bottom_y),
    );
    state.obstacles.push(top);
    state.obstacles.push(bottom);

    log::debug!("obstacle pair {}/{}: gap {} at y={}", top_id, bottom_id, gap, top_height);
    true
}

pub fn spawn_powerup(state: &mut GameState) -> bool {
    if !can_spawn(state) || state.powerups.len() >= MAX_POWERUPS {
        return false;
    }
    let Some(&kind) = weighted_choice(&mut state.rng, &POWERUP_WEIGHTS) else {
        return false;
    };

    let Vec2 { x: width, y: height } = state.viewport;
    let y = sample(&mut state.rng, 0.0, height - 60.0).floor() + 30.0;
    let id = state.next_entity_id();
    state.powerups.push(Entity::new(
        id,
        EntityKind::Powerup(kind),
        Vec2::new(width, y),
        Vec2::splat(kind.size()),
    ));
    log::debug!("powerup {} {:?}", id, kind);
    true
}

pub fn spawn_enemy(state: &mut GameState) -> bool {
    if !can_spawn(state) || state.level < ENEMY_MIN_LEVEL {
        return false;
    }
    if state.enemies.len() >= tuning::max_enemies(state.score) {
        return false;
    }
    let Some(&kind) = weighted_choice(&mut state.rng, &ENEMY_WEIGHTS) else {
        return false;
    };

    let Vec2 { x: width, y: height } = state.viewport;
    let size = Vec2::splat(60.0);
    let id = state.next_entity_id();
    let enemy = match kind {
        EnemyKind::Drone => {
            let y = sample(&mut state.rng, 0.0, height - size.y).floor();
            let drift = sample(&mut state.rng, -1.0, 1.0);
            Entity::new(id, EntityKind::Enemy(kind), Vec2::new(width, y), size)
                .with_velocity(Vec2::new(0.0, drift))
        }
        EnemyKind::Weaver => {
            let y = sample(&mut state.rng, 80.0, height - size.y - 80.0).floor();
            let amplitude = sample(&mut state.rng, 40.0, 80.0);
            let frequency = sample(&mut state.rng, 0.04, 0.08);
            let phase = sample(&mut state.rng, 0.0, std::f32::consts::TAU);
            Entity::new(id, EntityKind::Enemy(kind), Vec2::new(width, y), size)
                .with_oscillation(amplitude, frequency, phase)
        }
    };
    state.enemies.push(enemy);
    log::debug!("enemy {} {:?}", id, kind);
    true
}

pub fn spawn_hazard(state: &mut GameState) -> bool {
    if !can_spawn(state) || state.level < HAZARD_MIN_LEVEL {
        return false;
    }
    if state.hazards.len() >= tuning::max_hazards(state.level) {
        return false;
    }
    let Some(&kind) = weighted_choice(&mut state.rng, &HAZARD_WEIGHTS) else {
        return false;
    };

    let Vec2 { x: width, y: height } = state.viewport;
    let id = state.next_entity_id();
    let hazard = match kind {
        HazardKind::Mine => {
            let size = Vec2::splat(40.0);
            let y = sample(&mut state.rng, 0.0, height - size.y).floor();
            let amplitude = sample(&mut state.rng, 20.0, 50.0);
            let frequency = sample(&mut state.rng, 0.05, 0.1);
            Entity::new(id, EntityKind::Hazard(kind), Vec2::new(width, y), size)
                .with_oscillation(amplitude, frequency, 0.0)
        }
        HazardKind::Missile => {
            let size = Vec2::new(50.0, 16.0);
            let y = sample(&mut state.rng, 0.0, height - size.y).floor();
            let drift = sample(&mut state.rng, -0.5, 0.5);
            Entity::new(id, EntityKind::Hazard(kind), Vec2::new(width, y), size)
                .with_velocity(Vec2::new(0.0, drift))
        }
    };
    state.hazards.push(hazard);
    log::debug!("hazard {} {:?}", id, kind);
    true
}

fn make_cloud(state: &mut GameState, x: f32) -> Entity {
    let height = state.viewport.y;
    let size = sample(&mut state.rng, 0.0, 100.0).floor() + 50.0;
    let y = sample(&mut state.rng, 0.0, height).floor();
    let speed = sample(&mut state.rng, 1.0, 3.0);
    let id = state.next_entity_id();
    Entity::new(id, EntityKind::Cloud, Vec2::new(x, y), Vec2::splat(size))
        .with_velocity(Vec2::new(speed, 0.0))
}

pub fn spawn_cloud(state: &mut GameState) -> bool {
    if !can_spawn(state) || state.clouds.len() >= MAX_CLOUDS {
        return false;
    }
    let cloud = make_cloud(state, state.viewport.x);
    state.clouds.push(cloud);
    true
}

/// Spread `count` clouds across the sky so a run does not start empty
pub fn scatter_clouds(state: &mut GameState, count: usize) {
    for _ in 0..count {
        if state.clouds.len() >= MAX_CLOUDS {
            break;
        }
        let x = sample(&mut state.rng, 0.0, state.viewport.x);
        let cloud = make_cloud(state, x);
        state.clouds.push(cloud);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::GamePhase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(11, &Settings::default(), 0.0)
    }

    #[test]
    fn test_sample_ranges() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let v = sample(&mut rng, 40.0, 80.0);
            assert!((40.0..80.0).contains(&v));
        }
        // Empty and inverted ranges pin to the low end
        assert_eq!(sample(&mut rng, 80.0, 80.0), 80.0);
        assert_eq!(sample(&mut rng, 80.0, 60.0), 80.0);
    }

    #[test]
    fn test_weighted_choice_distribution() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match weighted_choice(&mut rng, &POWERUP_WEIGHTS) {
                Some(PowerupKind::Coin) => counts[0] += 1,
                Some(PowerupKind::Shield) => counts[1] += 1,
                Some(PowerupKind::Health) => counts[2] += 1,
                None => panic!("non-empty table"),
            }
        }
        assert!((6500..7500).contains(&counts[0]), "{counts:?}");
        assert!((1500..2500).contains(&counts[1]), "{counts:?}");
        assert!((600..1400).contains(&counts[2]), "{counts:?}");
    }

    #[test]
    fn test_weighted_choice_skips_zero_weights() {
        let mut rng = Pcg32::seed_from_u64(5);
        let table = [("never", 0), ("always", 3)];
        for _ in 0..100 {
            assert_eq!(weighted_choice(&mut rng, &table), Some(&"always"));
        }
        let empty: [(&str, u32); 1] = [("none", 0)];
        assert_eq!(weighted_choice(&mut rng, &empty), None);
    }

    #[test]
    fn test_timer_fires_per_interval() {
        let mut timer = SpawnTimer::new(1000.0);
        assert_eq!(timer.advance(999.0), 0);
        assert_eq!(timer.advance(1.0), 1);
        assert_eq!(timer.advance(2500.0), 2);
        assert!((timer.elapsed_ms() - 500.0).abs() < 1e-9);

        let mut off = SpawnTimer::disabled(1000.0);
        assert_eq!(off.advance(10_000.0), 0);
    }

    #[test]
    fn test_level_gates_timers() {
        let l1 = Spawners::for_level(1);
        assert!(!l1.enemy.enabled);
        assert!(!l1.hazard.enabled);
        let l2 = Spawners::for_level(2);
        assert!(l2.enemy.enabled);
        assert!(!l2.hazard.enabled);
        let l3 = Spawners::for_level(3);
        assert!(l3.hazard.enabled);
        assert_eq!(l3.obstacle.interval_ms, 2200.0);
    }

    #[test]
    fn test_obstacle_pair_geometry() {
        let mut s = state();
        assert!(spawn_obstacle_pair(&mut s));
        assert_eq!(s.obstacles.len(), 2);
        let (top, bottom) = (&s.obstacles[0], &s.obstacles[1]);
        assert_eq!(top.pos, Vec2::new(1280.0, 0.0));
        assert_eq!(top.size.x, OBSTACLE_WIDTH);
        let gap = bottom.pos.y - top.size.y;
        assert!(gap >= OBSTACLE_MIN_GAP && gap <= 290.0, "gap {gap}");
        assert!((bottom.pos.y + bottom.size.y - 720.0).abs() < 1e-3);
    }

    #[test]
    fn test_obstacle_capacity() {
        let mut s = state();
        assert!(spawn_obstacle_pair(&mut s));
        // Level 1 allows a single pair on screen
        assert!(!spawn_obstacle_pair(&mut s));
        assert_eq!(s.obstacles.len(), 2);
    }

    #[test]
    fn test_no_room_for_gap_is_noop() {
        let mut settings = Settings::default();
        settings.viewport.height = 200.0;
        let mut s = GameState::new(1, &settings, 0.0);
        assert!(!spawn_obstacle_pair(&mut s));
        assert!(s.obstacles.is_empty());
    }

    #[test]
    fn test_enemies_locked_until_level_two() {
        let mut s = state();
        assert!(!spawn_enemy(&mut s));
        s.level = 2;
        assert!(spawn_enemy(&mut s));
        // One enemy allowed below 200 points
        assert!(!spawn_enemy(&mut s));
        s.score = 250.0;
        assert!(spawn_enemy(&mut s));
    }

    #[test]
    fn test_hazards_locked_until_level_three() {
        let mut s = state();
        s.level = 2;
        assert!(!spawn_hazard(&mut s));
        s.level = 3;
        assert!(spawn_hazard(&mut s));
        assert!(!spawn_hazard(&mut s));
    }

    #[test]
    fn test_no_spawns_while_paused() {
        let mut s = state();
        s.phase = GamePhase::Paused;
        assert!(!spawn_powerup(&mut s));
        assert!(!spawn_obstacle_pair(&mut s));
        run_spawners(&mut s, 60_000.0);
        assert!(s.powerups.is_empty());
    }

    #[test]
    fn test_halted_spawners_do_nothing() {
        let mut s = state();
        s.spawners.halt();
        run_spawners(&mut s, 10_000.0);
        assert!(s.obstacles.is_empty());
        assert!(s.powerups.is_empty());
    }

    #[test]
    fn test_run_spawners_appends_in_order() {
        let mut s = state();
        run_spawners(&mut s, 3000.0);
        // 2400 ms obstacle interval and 3000 ms powerup interval both elapsed
        assert_eq!(s.obstacles.len(), 2);
        assert_eq!(s.powerups.len(), 1);
        assert!(s.obstacles[0].id < s.obstacles[1].id);
    }

    #[test]
    fn test_powerup_spawn_band() {
        let mut s = state();
        for _ in 0..MAX_POWERUPS {
            assert!(spawn_powerup(&mut s));
        }
        assert!(!spawn_powerup(&mut s));
        for p in &s.powerups {
            assert!(p.pos.y >= 30.0 && p.pos.y <= 690.0);
            assert_eq!(p.size.x, p.powerup_kind().map(|k| k.size()).unwrap_or(0.0));
        }
    }
}
