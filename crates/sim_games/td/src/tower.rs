use crate::config::{TargetingPolicy, TowerKind, TowerRole, TowerSpec};
use crate::economy::Economy;
use crate::enemy::{Enemy, EnemyId};
use crate::geometry::{heading_towards, Position};
use sim_core::Millis;
use slotmap::new_key_type;

new_key_type! { pub struct TowerId; }

/// Per-variant state. Income towers carry no range or damage at all.
#[derive(Clone, Debug, PartialEq)]
pub enum TowerBehavior {
    Combat {
        range: f32,
        base_damage: i32,
        damage_per_level: i32,
        fire_interval: Millis,
        last_fire: Millis,
        policy: TargetingPolicy,
    },
    Income {
        base_amount: u32,
        income_per_level: u32,
        interval: Millis,
        last_payout: Millis,
    },
}

/// What a tower did during one update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TowerAction {
    /// Cooling down, or nothing in range.
    Idle,
    Fired {
        target: EnemyId,
        target_position: Position,
        damage: i32,
    },
    Paid {
        amount: u32,
        balance: u32,
    },
}

#[derive(Clone, Debug)]
pub struct Tower {
    kind: TowerKind,
    position: Position,
    level: u8,
    heading: f32,
    behavior: TowerBehavior,
}

impl Tower {
    /// Build a tower whose timers start at `now`.
    pub fn new(kind: TowerKind, spec: &TowerSpec, position: Position, now: Millis) -> Self {
        let behavior = match &spec.role {
            TowerRole::Combat {
                range,
                damage,
                damage_per_level,
                fire_interval_ms,
                policy,
            } => TowerBehavior::Combat {
                range: *range,
                base_damage: *damage,
                damage_per_level: *damage_per_level,
                fire_interval: Millis::from_millis(*fire_interval_ms),
                last_fire: now,
                policy: *policy,
            },
            TowerRole::Income {
                amount,
                income_per_level,
                interval_ms,
            } => TowerBehavior::Income {
                base_amount: *amount,
                income_per_level: *income_per_level,
                interval: Millis::from_millis(*interval_ms),
                last_payout: now,
            },
        };
        Self {
            kind,
            position,
            level: 1,
            heading: 0.0,
            behavior,
        }
    }

    /// Run one frame: fire at a target or pay out income when the timer allows.
    ///
    /// A combat tower with nothing in range keeps its cooldown expired and
    /// retries next frame.
    pub fn update(&mut self, now: Millis, enemies: &[Enemy], economy: &mut Economy) -> TowerAction {
        let level = self.level;
        match &mut self.behavior {
            TowerBehavior::Combat {
                range,
                base_damage,
                damage_per_level,
                fire_interval,
                last_fire,
                policy,
            } => {
                if now.since(*last_fire) <= *fire_interval {
                    return TowerAction::Idle;
                }
                let Some(target) = select_target(self.position, *range, *policy, enemies) else {
                    return TowerAction::Idle;
                };
                self.heading = heading_towards(self.position, target.position());
                *last_fire = now;
                TowerAction::Fired {
                    target: target.id(),
                    target_position: target.position(),
                    damage: scaled_damage(*base_damage, *damage_per_level, level),
                }
            }
            TowerBehavior::Income {
                base_amount,
                income_per_level,
                interval,
                last_payout,
            } => {
                if now.since(*last_payout) <= *interval {
                    return TowerAction::Idle;
                }
                *last_payout = now;
                let amount = scaled_income(*base_amount, *income_per_level, level);
                let balance = economy.credit(amount);
                TowerAction::Paid { amount, balance }
            }
        }
    }

    pub fn can_upgrade(&self) -> bool {
        self.level < u8::MAX
    }

    /// Raise the tower one level in place.
    pub fn upgrade(&mut self) -> Option<u8> {
        self.level = self.level.checked_add(1)?;
        Some(self.level)
    }

    pub fn kind(&self) -> TowerKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Facing towards the last target, in radians. Cosmetic.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn behavior(&self) -> &TowerBehavior {
        &self.behavior
    }

    /// Detection radius; zero for towers that never target.
    pub fn range(&self) -> f32 {
        match &self.behavior {
            TowerBehavior::Combat { range, .. } => *range,
            TowerBehavior::Income { .. } => 0.0,
        }
    }

    /// Damage per bullet at the current level; zero for towers that never fire.
    pub fn damage(&self) -> i32 {
        match &self.behavior {
            TowerBehavior::Combat {
                base_damage,
                damage_per_level,
                ..
            } => scaled_damage(*base_damage, *damage_per_level, self.level),
            TowerBehavior::Income { .. } => 0,
        }
    }

    pub fn income(&self) -> u32 {
        match &self.behavior {
            TowerBehavior::Income {
                base_amount,
                income_per_level,
                ..
            } => scaled_income(*base_amount, *income_per_level, self.level),
            TowerBehavior::Combat { .. } => 0,
        }
    }
}

fn scaled_damage(base: i32, per_level: i32, level: u8) -> i32 {
    base.saturating_add(per_level.saturating_mul(i32::from(level) - 1))
}

fn scaled_income(base: u32, per_level: u32, level: u8) -> u32 {
    base.saturating_add(per_level.saturating_mul(u32::from(level) - 1))
}

/// Pick one live enemy within `range` of `origin`.
///
/// Candidates are scanned in slice order and only a strictly better candidate
/// replaces the current pick, so ties go to the earliest enemy.
pub fn select_target(
    origin: Position,
    range: f32,
    policy: TargetingPolicy,
    enemies: &[Enemy],
) -> Option<&Enemy> {
    let in_range = enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| (e, origin.distance(e.position())))
        .filter(|&(_, distance)| distance <= range);

    let mut best: Option<(&Enemy, f32)> = None;
    for (enemy, distance) in in_range {
        let better = match (policy, best) {
            (_, None) => true,
            (TargetingPolicy::Nearest, Some((_, best_distance))) => distance < best_distance,
            (TargetingPolicy::HighestHealth, Some((current, _))) => enemy.health() > current.health(),
        };
        if better {
            best = Some((enemy, distance));
        }
    }
    best.map(|(enemy, _)| enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::enemy::SpawnSpec;
    use std::sync::Arc;

    fn enemy_at(id: u32, x: f32, y: f32, health: i32) -> Enemy {
        let path: Arc<[Position]> = vec![Position::new(x, y), Position::new(x + 1000.0, y)].into();
        let spec = SpawnSpec::new(path, 1.0, health, 10, 16.0, "basic_enemy").unwrap();
        Enemy::spawn(EnemyId(id), &spec)
    }

    fn basic_at(x: f32, y: f32) -> Tower {
        let settings = Settings::default();
        Tower::new(TowerKind::Basic, &settings.basic, Position::new(x, y), Millis::ZERO)
    }

    #[test]
    fn nearest_policy_prefers_closer_enemy() {
        let origin = Position::new(0.0, 0.0);
        let enemies = vec![enemy_at(0, 120.0, 0.0, 10), enemy_at(1, 0.0, 50.0, 10)];
        let target = select_target(origin, 150.0, TargetingPolicy::Nearest, &enemies).unwrap();
        assert_eq!(target.id(), EnemyId(1));
    }

    #[test]
    fn highest_health_policy_prefers_tougher_enemy() {
        let origin = Position::new(0.0, 0.0);
        let enemies = vec![
            enemy_at(0, 10.0, 0.0, 50),
            enemy_at(1, 200.0, 0.0, 400),
            enemy_at(2, 250.0, 0.0, 300),
            enemy_at(3, 400.0, 0.0, 900),
        ];
        let target = select_target(origin, 300.0, TargetingPolicy::HighestHealth, &enemies).unwrap();
        assert_eq!(target.id(), EnemyId(1));
    }

    #[test]
    fn ties_go_to_earliest_enemy() {
        let origin = Position::new(0.0, 0.0);
        let enemies = vec![enemy_at(4, 0.0, 60.0, 30), enemy_at(5, 60.0, 0.0, 30)];
        for policy in [TargetingPolicy::Nearest, TargetingPolicy::HighestHealth] {
            let target = select_target(origin, 100.0, policy, &enemies).unwrap();
            assert_eq!(target.id(), EnemyId(4));
        }
    }

    #[test]
    fn range_is_inclusive() {
        let origin = Position::new(0.0, 0.0);
        let enemies = vec![enemy_at(0, 150.0, 0.0, 10)];
        assert!(select_target(origin, 150.0, TargetingPolicy::Nearest, &enemies).is_some());
        assert!(select_target(origin, 149.9, TargetingPolicy::Nearest, &enemies).is_none());
    }

    #[test]
    fn dead_enemies_are_not_targeted() {
        let mut dead = enemy_at(0, 10.0, 0.0, 10);
        dead.take_damage(10);
        let enemies = vec![dead, enemy_at(1, 100.0, 0.0, 10)];
        let target = select_target(Position::ZERO, 150.0, TargetingPolicy::Nearest, &enemies).unwrap();
        assert_eq!(target.id(), EnemyId(1));
    }

    #[test]
    fn cooldown_must_strictly_elapse() {
        let mut tower = basic_at(0.0, 0.0);
        let mut economy = Economy::new(0);
        let enemies = vec![enemy_at(0, 30.0, 40.0, 100)];

        assert_eq!(
            tower.update(Millis::from_millis(1000), &enemies, &mut economy),
            TowerAction::Idle
        );
        let action = tower.update(Millis::from_millis(1001), &enemies, &mut economy);
        assert_eq!(
            action,
            TowerAction::Fired {
                target: EnemyId(0),
                target_position: Position::new(30.0, 40.0),
                damage: 20,
            }
        );
        assert!((tower.heading() - 40.0f32.atan2(30.0)).abs() < 1e-6);
        assert_eq!(
            tower.update(Millis::from_millis(2001), &enemies, &mut economy),
            TowerAction::Idle
        );
        assert!(matches!(
            tower.update(Millis::from_millis(2002), &enemies, &mut economy),
            TowerAction::Fired { .. }
        ));
    }

    #[test]
    fn no_target_keeps_cooldown_expired() {
        let mut tower = basic_at(0.0, 0.0);
        let mut economy = Economy::new(0);
        assert_eq!(
            tower.update(Millis::from_millis(5000), &[], &mut economy),
            TowerAction::Idle
        );
        // An enemy arriving one frame later is engaged immediately.
        let enemies = vec![enemy_at(0, 10.0, 0.0, 100)];
        assert!(matches!(
            tower.update(Millis::from_millis(5016), &enemies, &mut economy),
            TowerAction::Fired { .. }
        ));
    }

    #[test]
    fn money_tower_pays_on_its_own_timer() {
        let settings = Settings::default();
        let mut tower = Tower::new(TowerKind::Money, &settings.money, Position::ZERO, Millis::from_millis(100));
        let mut economy = Economy::new(0);
        let enemies = vec![enemy_at(0, 1.0, 0.0, 100)];

        assert_eq!(tower.range(), 0.0);
        assert_eq!(tower.damage(), 0);
        assert_eq!(
            tower.update(Millis::from_millis(600), &enemies, &mut economy),
            TowerAction::Idle
        );
        assert_eq!(
            tower.update(Millis::from_millis(601), &enemies, &mut economy),
            TowerAction::Paid {
                amount: 5,
                balance: 5
            }
        );
        assert_eq!(economy.balance(), 5);
    }

    #[test]
    fn upgrade_scales_output_in_place() {
        let settings = Settings::default();
        let mut tower = basic_at(96.0, 224.0);
        assert_eq!(tower.upgrade(), Some(2));
        assert_eq!(tower.level(), 2);
        assert_eq!(tower.damage(), 30);
        assert_eq!(tower.position(), Position::new(96.0, 224.0));

        let mut money = Tower::new(TowerKind::Money, &settings.money, Position::ZERO, Millis::ZERO);
        money.upgrade();
        money.upgrade();
        assert_eq!(money.income(), 15);
    }
}
