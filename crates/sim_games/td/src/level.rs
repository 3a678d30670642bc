//! One level: its wave schedule, live entities and the per-tick update.

use crate::bullet::{Bullet, BulletId, BulletStep};
use crate::campaign::LevelDef;
use crate::config::{Settings, TowerKind};
use crate::economy::Economy;
use crate::enemy::{validate_path, DamageOutcome, Enemy, EnemyId, EnemyStep};
use crate::error::ConfigError;
use crate::events::{RejectReason, TdEvent};
use crate::geometry::{circles_overlap, Position};
use crate::grid::Grid;
use crate::tower::{Tower, TowerAction, TowerId};
use crate::wave::Wave;
use rand::Rng;
use sim_core::Millis;
use slotmap::SlotMap;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelPhase {
    /// The current wave still has enemies to release.
    Spawning,
    /// Every enemy of the current wave is out; waiting for the field to clear.
    WaveActive,
    /// Every wave has been released and cleared. Terminal.
    AllWavesComplete,
    /// An enemy reached the end of its path. Terminal.
    Leaked,
}

#[derive(Debug)]
pub struct Level {
    index: usize,
    name: String,
    settings: Arc<Settings>,
    paths: Vec<Arc<[Position]>>,
    waves: Vec<Wave>,
    grid: Grid,

    enemies: Vec<Enemy>,
    towers: SlotMap<TowerId, Tower>,
    bullets: Vec<Bullet>,

    current_wave: usize,
    spawned_count: usize,
    last_spawn: Option<Millis>,
    phase: LevelPhase,

    next_enemy_id: u32,
    next_bullet_id: u32,
}

impl Level {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        paths: Vec<Arc<[Position]>>,
        waves: Vec<Wave>,
        settings: Arc<Settings>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        for path in &paths {
            validate_path(path)?;
        }
        if waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        let grid = Grid::new(settings.cell_size, settings.slots.clone());
        Ok(Self {
            index,
            name: name.into(),
            settings,
            paths,
            waves,
            grid,
            enemies: Vec::new(),
            towers: SlotMap::with_key(),
            bullets: Vec::new(),
            current_wave: 0,
            spawned_count: 0,
            last_spawn: None,
            phase: LevelPhase::Spawning,
            next_enemy_id: 0,
            next_bullet_id: 0,
        })
    }

    /// Build a level from its definition, drawing path choices from `rng`.
    pub fn from_def<R: Rng>(
        index: usize,
        def: &LevelDef,
        settings: Arc<Settings>,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let build = |rng: &mut R| -> Result<Level, ConfigError> {
            let mut paths: Vec<Arc<[Position]>> = Vec::with_capacity(def.paths.len());
            for path in &def.paths {
                validate_path(path)?;
                paths.push(Arc::from(path.as_slice()));
            }
            let waves = def
                .waves
                .iter()
                .enumerate()
                .map(|(i, wave)| wave.resolve(&paths, &mut *rng).map_err(|e| e.in_wave(i)))
                .collect::<Result<Vec<_>, _>>()?;
            Level::new(index, def.name.clone(), paths, waves, settings)
        };
        build(rng).map_err(|e| e.in_level(index, &def.name))
    }

    /// Advance the level by one tick.
    ///
    /// Order: spawn, collisions, enemy movement, towers, bullets, wave
    /// transitions. A leak ends the tick right after movement.
    pub fn update(&mut self, now: Millis, economy: &mut Economy, events: &mut Vec<TdEvent>) {
        if self.is_finished() {
            return;
        }

        self.spawn_due_enemy(now, events);
        self.resolve_collisions(economy, events);

        if let Some(id) = self.move_enemies() {
            self.enemies.retain(|e| e.id() != id);
            self.phase = LevelPhase::Leaked;
            events.push(TdEvent::EnemyLeaked { id });
            tracing::info!(level = self.index, wave = self.current_wave, enemy = id.0, "enemy leaked");
            return;
        }

        self.update_towers(now, economy, events);
        self.move_bullets();
        self.evaluate_wave(events);
    }

    fn spawn_due_enemy(&mut self, now: Millis, events: &mut Vec<TdEvent>) {
        if self.phase != LevelPhase::Spawning {
            return;
        }
        let delay = Millis::from_millis(self.settings.spawn_delay_ms);
        if self.last_spawn.is_some_and(|last| now.since(last) <= delay) {
            return;
        }
        let Some(spec) = self.waves[self.current_wave].get(self.spawned_count) else {
            return;
        };

        if self.spawned_count == 0 {
            events.push(TdEvent::WaveStarted {
                wave: self.current_wave,
            });
            tracing::info!(level = self.index, wave = self.current_wave, "wave started");
        }

        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(Enemy::spawn(id, spec));
        self.spawned_count += 1;
        self.last_spawn = Some(now);
        events.push(TdEvent::EnemySpawned {
            id,
            wave: self.current_wave,
        });
    }

    /// Each bullet is paired with the first overlapping enemy that was alive
    /// when the pass began. Spent bullets and dead enemies are compacted out
    /// afterwards.
    fn resolve_collisions(&mut self, economy: &mut Economy, events: &mut Vec<TdEvent>) {
        let enemies = &mut self.enemies;
        self.bullets.retain(|bullet| {
            let Some(enemy) = enemies.iter_mut().find(|enemy| {
                circles_overlap(bullet.position(), bullet.radius(), enemy.position(), enemy.radius())
            }) else {
                return true;
            };
            if let DamageOutcome::Killed { reward } = enemy.take_damage(bullet.damage()) {
                economy.credit(reward);
                events.push(TdEvent::EnemyKilled {
                    id: enemy.id(),
                    reward,
                });
            }
            false
        });
        enemies.retain(Enemy::is_alive);
    }

    /// Walk every enemy one step. Returns the first one that leaked.
    fn move_enemies(&mut self) -> Option<EnemyId> {
        self.enemies
            .iter_mut()
            .find_map(|enemy| (enemy.advance() == EnemyStep::Leaked).then(|| enemy.id()))
    }

    fn update_towers(&mut self, now: Millis, economy: &mut Economy, events: &mut Vec<TdEvent>) {
        for (tower_id, tower) in self.towers.iter_mut() {
            match tower.update(now, &self.enemies, economy) {
                TowerAction::Idle => {}
                TowerAction::Fired {
                    target,
                    target_position,
                    damage,
                } => {
                    let id = BulletId(self.next_bullet_id);
                    self.next_bullet_id += 1;
                    self.bullets.push(Bullet::fire(
                        id,
                        tower_id,
                        tower.position(),
                        target_position,
                        self.settings.bullet_speed,
                        damage,
                        self.settings.bullet_radius,
                    ));
                    events.push(TdEvent::BulletFired {
                        id,
                        tower: tower_id,
                        target,
                    });
                }
                TowerAction::Paid { amount, .. } => {
                    events.push(TdEvent::IncomeGenerated {
                        tower: tower_id,
                        amount,
                    });
                }
            }
        }
    }

    fn move_bullets(&mut self) {
        let bounds = self.settings.bounds();
        let epsilon = self.settings.arrival_epsilon;
        self.bullets
            .retain_mut(|bullet| bullet.advance(&bounds, epsilon) == BulletStep::InFlight);
    }

    fn evaluate_wave(&mut self, events: &mut Vec<TdEvent>) {
        let wave_len = self.waves[self.current_wave].len();
        if self.spawned_count < wave_len {
            return;
        }
        if !self.enemies.is_empty() {
            self.phase = LevelPhase::WaveActive;
            return;
        }

        events.push(TdEvent::WaveCleared {
            wave: self.current_wave,
        });
        tracing::info!(level = self.index, wave = self.current_wave, "wave cleared");

        if self.current_wave + 1 < self.waves.len() {
            self.current_wave += 1;
            self.spawned_count = 0;
            self.phase = LevelPhase::Spawning;
        } else {
            self.phase = LevelPhase::AllWavesComplete;
            tracing::info!(level = self.index, name = %self.name, "all waves complete");
        }
    }

    /// Place a tower of `kind` on the slot under `point`.
    ///
    /// Non-finite points are rejected outright. Funds are checked before the
    /// slot. On success the cost is debited and
    /// the tower inserted in the same call; on rejection nothing changes.
    pub fn attempt_place_tower(
        &mut self,
        point: Position,
        kind: TowerKind,
        now: Millis,
        economy: &mut Economy,
        events: &mut Vec<TdEvent>,
    ) -> bool {
        if !point.is_finite() {
            return reject_placement(kind, point, RejectReason::SlotUnavailable, events);
        }
        let slot = self.grid.slot_for(point);
        let cost = self.settings.cost(kind);

        if !economy.can_afford(cost) {
            let reason = RejectReason::InsufficientFunds {
                cost,
                have: economy.balance(),
            };
            return reject_placement(kind, slot, reason, events);
        }
        if !self.grid.is_spot_available(slot, self.towers.values()) {
            return reject_placement(kind, slot, RejectReason::SlotUnavailable, events);
        }
        if let Err(err) = economy.try_spend(cost) {
            return reject_placement(kind, slot, err.into(), events);
        }

        let tower = Tower::new(kind, self.settings.spec(kind), slot, now);
        let id = self.towers.insert(tower);
        events.push(TdEvent::TowerPlaced {
            id,
            kind,
            position: slot,
            cost,
        });
        tracing::debug!(%kind, x = slot.x, y = slot.y, balance = economy.balance(), "tower placed");
        true
    }

    /// Upgrade the first tower whose footprint contains `point`.
    pub fn upgrade_tower_at(&mut self, point: Position, economy: &mut Economy, events: &mut Vec<TdEvent>) -> bool {
        let grid = &self.grid;
        let Some((id, tower)) = self
            .towers
            .iter_mut()
            .find(|(_, tower)| grid.footprint(tower.position()).contains(point))
        else {
            return reject_upgrade(point, RejectReason::NoTower, events);
        };
        if !tower.can_upgrade() {
            return reject_upgrade(point, RejectReason::MaxLevel, events);
        }

        let cost = self.settings.upgrade_cost(tower.level());
        if let Err(err) = economy.try_spend(cost) {
            return reject_upgrade(point, err.into(), events);
        }
        let Some(level) = tower.upgrade() else {
            economy.credit(cost);
            return reject_upgrade(point, RejectReason::MaxLevel, events);
        };
        events.push(TdEvent::TowerUpgraded { id, level, cost });
        tracing::debug!(kind = %tower.kind(), level, cost, "tower upgraded");
        true
    }

    pub fn toggle_slot_overlay(&mut self) -> bool {
        self.grid.toggle_slots()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn paths(&self) -> &[Arc<[Position]>] {
        &self.paths
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn towers(&self) -> &SlotMap<TowerId, Tower> {
        &self.towers
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn current_wave_index(&self) -> usize {
        self.current_wave
    }

    pub fn waves_total(&self) -> usize {
        self.waves.len()
    }

    pub fn current_wave_size(&self) -> usize {
        self.waves[self.current_wave].len()
    }

    /// Enemies of the current wave released so far.
    pub fn spawned_count(&self) -> usize {
        self.spawned_count
    }

    /// Waves not yet cleared, counting the current one.
    pub fn waves_remaining(&self) -> usize {
        self.waves.len() - self.current_wave - usize::from(self.all_waves_complete())
    }

    pub fn all_waves_complete(&self) -> bool {
        self.phase == LevelPhase::AllWavesComplete
    }

    pub fn has_leaked(&self) -> bool {
        self.phase == LevelPhase::Leaked
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, LevelPhase::AllWavesComplete | LevelPhase::Leaked)
    }
}

fn reject_placement(kind: TowerKind, slot: Position, reason: RejectReason, events: &mut Vec<TdEvent>) -> bool {
    tracing::debug!(%kind, x = slot.x, y = slot.y, ?reason, "tower placement rejected");
    events.push(TdEvent::PlacementRejected {
        kind,
        position: slot,
        reason,
    });
    false
}

fn reject_upgrade(point: Position, reason: RejectReason, events: &mut Vec<TdEvent>) -> bool {
    tracing::debug!(x = point.x, y = point.y, ?reason, "tower upgrade rejected");
    events.push(TdEvent::UpgradeRejected {
        position: point,
        reason,
    });
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::SpawnSpec;

    // Horizontal path through row 4 of the default slot grid.
    fn path() -> Arc<[Position]> {
        vec![Position::new(0.0, 300.0), Position::new(1200.0, 300.0)].into()
    }

    fn spec(health: i32, reward: u32) -> SpawnSpec {
        SpawnSpec::new(path(), 1.0, health, reward, 16.0, "basic_enemy").unwrap()
    }

    fn wave(count: usize, health: i32) -> Wave {
        Wave::new(vec![spec(health, 10); count]).unwrap()
    }

    fn level_with(settings: Settings, waves: Vec<Wave>) -> Level {
        Level::new(0, "test", vec![path()], waves, Arc::new(settings)).unwrap()
    }

    fn level(waves: Vec<Wave>) -> Level {
        let settings = Settings {
            spawn_delay_ms: 100,
            ..Settings::default()
        };
        level_with(settings, waves)
    }

    fn bullet_at(level: &mut Level, position: Position, damage: i32) {
        let id = BulletId(level.next_bullet_id);
        level.next_bullet_id += 1;
        level.bullets.push(Bullet::fire(
            id,
            TowerId::default(),
            position,
            position + Position::new(0.0, -400.0),
            5.0,
            damage,
            4.0,
        ));
    }

    fn ms(v: u64) -> Millis {
        Millis::from_millis(v)
    }

    #[test]
    fn rejects_level_without_waves() {
        let err = Level::new(0, "empty", vec![path()], Vec::new(), Arc::new(Settings::default())).unwrap_err();
        assert_eq!(err, ConfigError::NoWaves);
    }

    #[test]
    fn first_enemy_spawns_on_first_tick_then_waits_for_delay() {
        let mut level = level(vec![wave(3, 10)]);
        let mut economy = Economy::new(0);
        let mut events = Vec::new();

        level.update(ms(5000), &mut economy, &mut events);
        assert_eq!(level.enemies().len(), 1);
        assert_eq!(events[0], TdEvent::WaveStarted { wave: 0 });

        level.update(ms(5100), &mut economy, &mut events);
        assert_eq!(level.enemies().len(), 1);
        level.update(ms(5101), &mut economy, &mut events);
        assert_eq!(level.enemies().len(), 2);
        assert_eq!(level.spawned_count(), 2);
        assert_eq!(level.phase(), LevelPhase::Spawning);
    }

    #[test]
    fn two_hits_in_one_tick_kill_once() {
        let mut level = level(vec![wave(1, 20)]);
        let mut economy = Economy::new(0);
        let mut events = Vec::new();
        level.update(ms(0), &mut economy, &mut events);
        let at = level.enemies()[0].position();

        bullet_at(&mut level, at, 15);
        bullet_at(&mut level, at, 15);
        bullet_at(&mut level, at, 15);
        events.clear();
        level.update(ms(16), &mut economy, &mut events);

        assert!(level.enemies().is_empty());
        assert!(level.bullets().is_empty());
        assert_eq!(economy.balance(), 10);
        let kills = events
            .iter()
            .filter(|e| matches!(e, TdEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn bullet_damages_only_first_overlapping_enemy() {
        let mut level = level(vec![wave(2, 100)]);
        let mut economy = Economy::new(0);
        let mut events = Vec::new();
        level.update(ms(0), &mut economy, &mut events);
        level.update(ms(101), &mut economy, &mut events);
        assert_eq!(level.enemies().len(), 2);

        // The enemies are a pixel apart; a wide bullet overlaps both.
        let first = level.enemies()[0].position();
        let second = level.enemies()[1].position();
        let between = (first + second) / 2.0;
        level.bullets.push(Bullet::fire(
            BulletId(99),
            TowerId::default(),
            between,
            between + Position::new(0.0, -400.0),
            5.0,
            30,
            60.0,
        ));
        level.update(ms(102), &mut economy, &mut events);

        assert_eq!(level.enemies()[0].health(), 70);
        assert_eq!(level.enemies()[1].health(), 100);
        assert!(level.bullets().is_empty());
    }

    #[test]
    fn leak_fails_the_level_instead_of_clearing_it() {
        let short: Arc<[Position]> = vec![Position::new(0.0, 300.0), Position::new(3.0, 300.0)].into();
        let spec = SpawnSpec::new(short.clone(), 1.0, 10, 10, 16.0, "basic_enemy").unwrap();
        let mut level = Level::new(
            0,
            "short",
            vec![short],
            vec![Wave::new(vec![spec]).unwrap()],
            Arc::new(Settings::default()),
        )
        .unwrap();
        let mut economy = Economy::new(50);
        let mut events = Vec::new();

        let mut now = 0;
        while !level.is_finished() {
            level.update(ms(now), &mut economy, &mut events);
            now += 16;
            assert!(now < 1000);
        }
        assert_eq!(level.phase(), LevelPhase::Leaked);
        assert!(!level.all_waves_complete());
        assert!(level.enemies().is_empty());
        assert!(events.iter().any(|e| matches!(e, TdEvent::EnemyLeaked { .. })));
        assert!(!events.iter().any(|e| matches!(e, TdEvent::WaveCleared { .. })));
        assert_eq!(economy.balance(), 50);

        // Finished levels ignore further ticks.
        events.clear();
        level.update(ms(now + 5000), &mut economy, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn waves_advance_only_when_released_and_cleared() {
        let mut level = level(vec![wave(2, 10), wave(1, 10)]);
        let mut economy = Economy::new(0);
        let mut events = Vec::new();

        level.update(ms(0), &mut economy, &mut events);
        assert_eq!(level.waves_remaining(), 2);

        // Clear the field before the second enemy has been released.
        level.enemies[0].take_damage(100);
        level.update(ms(50), &mut economy, &mut events);
        assert!(level.enemies().is_empty());
        assert_eq!(level.current_wave_index(), 0);
        assert_eq!(level.phase(), LevelPhase::Spawning);

        level.update(ms(151), &mut economy, &mut events);
        assert_eq!(level.spawned_count(), 2);
        assert_eq!(level.phase(), LevelPhase::WaveActive);

        level.enemies[0].take_damage(100);
        level.update(ms(160), &mut economy, &mut events);
        assert_eq!(level.current_wave_index(), 1);
        assert_eq!(level.waves_remaining(), 1);
        assert!(!level.all_waves_complete());

        level.update(ms(300), &mut economy, &mut events);
        assert_eq!(level.enemies().len(), 1);
        level.enemies[0].take_damage(100);
        level.update(ms(316), &mut economy, &mut events);
        assert!(level.all_waves_complete());
        assert_eq!(level.current_wave_index(), 1);
        assert_eq!(level.waves_remaining(), 0);

        let cleared: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                TdEvent::WaveCleared { wave } => Some(*wave),
                _ => None,
            })
            .collect();
        assert_eq!(cleared, vec![0, 1]);
    }

    #[test]
    fn exact_funds_allow_one_placement() {
        let settings = Settings {
            starting_money: 100,
            ..Settings::default()
        };
        let mut level = level_with(settings, vec![wave(1, 10)]);
        let mut economy = Economy::new(100);
        let mut events = Vec::new();

        assert!(level.attempt_place_tower(Position::new(100.0, 250.0), TowerKind::Basic, ms(0), &mut economy, &mut events));
        assert_eq!(economy.balance(), 0);
        assert_eq!(level.towers().len(), 1);
        assert_eq!(level.towers().values().next().unwrap().position(), Position::new(96.0, 224.0));

        assert!(!level.attempt_place_tower(Position::new(300.0, 250.0), TowerKind::Basic, ms(0), &mut economy, &mut events));
        assert_eq!(economy.balance(), 0);
        assert_eq!(level.towers().len(), 1);
        assert_eq!(
            events.last(),
            Some(&TdEvent::PlacementRejected {
                kind: TowerKind::Basic,
                position: Position::new(288.0, 224.0),
                reason: RejectReason::InsufficientFunds { cost: 100, have: 0 },
            })
        );
    }

    #[test]
    fn repeated_placements_debit_each_cost() {
        let mut level = level(vec![wave(1, 10)]);
        let mut economy = Economy::new(1000);
        let mut events = Vec::new();
        for col in 1..5 {
            let point = Position::new(col as f32 * 64.0 + 10.0, 500.0);
            assert!(level.attempt_place_tower(point, TowerKind::Sniper, ms(0), &mut economy, &mut events));
        }
        assert_eq!(economy.balance(), 1000 - 4 * 150);
    }

    #[test]
    fn occupied_or_unconfigured_slots_are_rejected() {
        let mut level = level(vec![wave(1, 10)]);
        let mut economy = Economy::new(1000);
        let mut events = Vec::new();

        assert!(level.attempt_place_tower(Position::new(200.0, 300.0), TowerKind::Basic, ms(0), &mut economy, &mut events));
        assert!(!level.attempt_place_tower(Position::new(220.0, 310.0), TowerKind::Money, ms(0), &mut economy, &mut events));
        assert!(!level.attempt_place_tower(Position::new(10.0, 10.0), TowerKind::Basic, ms(0), &mut economy, &mut events));
        assert_eq!(economy.balance(), 900);
        assert_eq!(level.towers().len(), 1);
        assert!(matches!(
            events.last(),
            Some(TdEvent::PlacementRejected {
                reason: RejectReason::SlotUnavailable,
                ..
            })
        ));
    }

    fn fast_level() -> Level {
        let spec = SpawnSpec::new(path(), 30.0, 100, 10, 2.0, "fast_enemy").unwrap();
        level(vec![Wave::new(vec![spec]).unwrap()])
    }

    #[test]
    fn collisions_resolve_before_enemies_move() {
        let mut level = fast_level();
        let mut economy = Economy::new(0);
        let mut events = Vec::new();
        level.update(ms(0), &mut economy, &mut events);
        assert_eq!(level.enemies()[0].position(), Position::new(30.0, 300.0));

        // Overlaps the enemy where it stands now, but not after its next
        // 30 px step or after the bullet's own step.
        bullet_at(&mut level, Position::new(30.0, 295.0), 15);
        level.update(ms(16), &mut economy, &mut events);

        assert!(level.bullets().is_empty());
        assert_eq!(level.enemies()[0].health(), 85);
        assert_eq!(level.enemies()[0].position(), Position::new(60.0, 300.0));
    }

    #[test]
    fn bullets_fired_this_tick_take_their_first_step() {
        let mut level = fast_level();
        let mut economy = Economy::new(1000);
        let mut events = Vec::new();
        assert!(level.attempt_place_tower(Position::new(96.0, 288.0), TowerKind::Basic, ms(0), &mut economy, &mut events));

        level.update(ms(0), &mut economy, &mut events);
        assert!(level.bullets().is_empty());
        level.update(ms(1001), &mut economy, &mut events);

        assert_eq!(level.bullets().len(), 1);
        let bullet = &level.bullets()[0];
        assert_eq!(bullet.origin(), Position::new(96.0, 288.0));
        assert_eq!(bullet.target(), Position::new(60.0, 300.0));
        let travelled = bullet.position().distance(bullet.origin());
        assert!((travelled - level.settings().bullet_speed).abs() < 1e-4);
    }

    #[test]
    fn non_finite_points_never_place() {
        let settings = Settings {
            slots: vec![Position::new(32.0, 32.0)],
            ..Settings::default()
        };
        let mut level = level_with(settings, vec![wave(1, 10)]);
        let mut economy = Economy::new(1000);
        let mut events = Vec::new();

        for point in [
            Position::new(f32::NAN, f32::NAN),
            Position::new(f32::NAN, 40.0),
            Position::new(f32::INFINITY, 40.0),
        ] {
            assert!(!level.attempt_place_tower(point, TowerKind::Basic, ms(0), &mut economy, &mut events));
            assert!(matches!(
                events.last(),
                Some(TdEvent::PlacementRejected {
                    reason: RejectReason::SlotUnavailable,
                    ..
                })
            ));
        }
        assert!(level.towers().is_empty());
        assert_eq!(economy.balance(), 1000);

        assert!(level.attempt_place_tower(Position::new(10.0, 10.0), TowerKind::Basic, ms(0), &mut economy, &mut events));
        assert_eq!(level.towers().values().next().unwrap().position(), Position::new(32.0, 32.0));
    }

    #[test]
    fn upgrade_needs_a_tower_and_funds() {
        let mut level = level(vec![wave(1, 10)]);
        let mut economy = Economy::new(250);
        let mut events = Vec::new();

        assert!(!level.upgrade_tower_at(Position::new(96.0, 224.0), &mut economy, &mut events));
        assert!(level.attempt_place_tower(Position::new(96.0, 224.0), TowerKind::Basic, ms(0), &mut economy, &mut events));

        // Any point inside the footprint selects the tower.
        assert!(level.upgrade_tower_at(Position::new(70.0, 250.0), &mut economy, &mut events));
        assert_eq!(economy.balance(), 50);
        let tower = level.towers().values().next().unwrap();
        assert_eq!(tower.level(), 2);
        assert_eq!(tower.damage(), 30);

        // Level 2 -> 3 costs 200.
        assert!(!level.upgrade_tower_at(Position::new(96.0, 224.0), &mut economy, &mut events));
        assert_eq!(economy.balance(), 50);
        assert_eq!(level.towers().values().next().unwrap().level(), 2);
    }

    #[test]
    fn towers_fire_and_pay_during_update() {
        let mut level = level(vec![wave(1, 1000)]);
        let mut economy = Economy::new(1000);
        let mut events = Vec::new();

        // Cell (1, 4) sits just below the path.
        assert!(level.attempt_place_tower(Position::new(96.0, 288.0), TowerKind::Basic, ms(0), &mut economy, &mut events));
        assert!(level.attempt_place_tower(Position::new(96.0, 608.0), TowerKind::Money, ms(0), &mut economy, &mut events));
        let balance = economy.balance();

        level.update(ms(0), &mut economy, &mut events);
        level.update(ms(1001), &mut economy, &mut events);

        assert_eq!(level.bullets().len(), 1);
        assert_eq!(economy.balance(), balance + 5);
        assert!(events.iter().any(|e| matches!(e, TdEvent::BulletFired { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, TdEvent::IncomeGenerated { amount: 5, .. })));
    }
}
