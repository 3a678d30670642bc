use crate::campaign::{default_campaign, LevelDef};
use crate::error::ConfigError;
use crate::geometry::{cell_center, Bounds, CellCoord, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    Basic,
    Sniper,
    Money,
}

impl TowerKind {
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Sniper, TowerKind::Money];

    pub fn as_str(self) -> &'static str {
        match self {
            TowerKind::Basic => "basic",
            TowerKind::Sniper => "sniper",
            TowerKind::Money => "money",
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule a combat tower uses to pick one enemy among those in range.
/// Ties always go to the enemy that entered the field first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingPolicy {
    Nearest,
    HighestHealth,
}

/// What a tower does once placed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum TowerRole {
    Combat {
        range: f32,
        damage: i32,
        /// Added to `damage` for every upgrade past level 1.
        #[serde(default)]
        damage_per_level: i32,
        fire_interval_ms: u64,
        policy: TargetingPolicy,
    },
    Income {
        amount: u32,
        /// Added to `amount` for every upgrade past level 1.
        #[serde(default)]
        income_per_level: u32,
        interval_ms: u64,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    pub cost: u32,
    #[serde(flatten)]
    pub role: TowerRole,
}

impl TowerSpec {
    pub fn validate(&self, kind: TowerKind) -> Result<(), ConfigError> {
        match &self.role {
            TowerRole::Combat {
                range,
                damage,
                fire_interval_ms,
                ..
            } => {
                if !range.is_finite() || *range < 0.0 {
                    return Err(ConfigError::InvalidRange {
                        kind,
                        range: *range,
                    });
                }
                if *damage <= 0 {
                    return Err(ConfigError::NonPositiveDamage {
                        kind,
                        damage: *damage,
                    });
                }
                if *fire_interval_ms == 0 {
                    return Err(ConfigError::ZeroFireInterval { kind });
                }
            }
            TowerRole::Income { interval_ms, .. } => {
                if *interval_ms == 0 {
                    return Err(ConfigError::ZeroIncomeInterval { kind });
                }
            }
        }
        Ok(())
    }
}

/// Static configuration shared by every level of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Side of a placement cell; towers occupy exactly one cell.
    pub cell_size: f32,

    pub starting_money: u32,
    /// Upgrading a tower at level `n` costs `upgrade_cost_base * n`.
    pub upgrade_cost_base: u32,
    /// Minimum gap between two enemy releases.
    pub spawn_delay_ms: u64,

    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// A bullet closer than this to its captured target is spent.
    pub arrival_epsilon: f32,

    /// Cell centres where towers may be placed.
    pub slots: Vec<Position>,

    pub basic: TowerSpec,
    pub sniper: TowerSpec,
    pub money: TowerSpec,
}

impl Settings {
    pub fn spec(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Basic => &self.basic,
            TowerKind::Sniper => &self.sniper,
            TowerKind::Money => &self.money,
        }
    }

    pub fn cost(&self, kind: TowerKind) -> u32 {
        self.spec(kind).cost
    }

    pub fn upgrade_cost(&self, level: u8) -> u32 {
        self.upgrade_cost_base.saturating_mul(u32::from(level))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.screen_width, self.screen_height)
    }

    /// Centres of every cell in `cols` × `rows`, column-major.
    pub fn grid_slots(
        cols: std::ops::Range<i32>,
        rows: std::ops::Range<i32>,
        cell_size: f32,
    ) -> Vec<Position> {
        cols.flat_map(|col| rows.clone().map(move |row| CellCoord { col, row }))
            .map(|cell| cell_center(cell, cell_size))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size_ok = |v: f32| v.is_finite() && v > 0.0;
        if !size_ok(self.screen_width) || !size_ok(self.screen_height) {
            return Err(ConfigError::InvalidBounds {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if !size_ok(self.cell_size) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !size_ok(self.bullet_speed) {
            return Err(ConfigError::InvalidBulletSpeed(self.bullet_speed));
        }
        for (what, value) in [
            ("bullet radius", self.bullet_radius),
            ("arrival epsilon", self.arrival_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRadius { what, value });
            }
        }
        if self.spawn_delay_ms == 0 {
            return Err(ConfigError::ZeroSpawnDelay);
        }
        if let Some(index) = self.slots.iter().position(|s| !s.is_finite()) {
            return Err(ConfigError::NonFiniteSlot { index });
        }
        for kind in TowerKind::ALL {
            self.spec(kind).validate(kind)?;
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        let cell_size = 64.0;
        Self {
            screen_width: 1200.0,
            screen_height: 800.0,
            cell_size,

            starting_money: 3000,
            upgrade_cost_base: 100,
            spawn_delay_ms: 1000,

            bullet_speed: 5.0,
            bullet_radius: 4.0,
            arrival_epsilon: 10.0,

            slots: Settings::grid_slots(1..15, 3..10, cell_size),

            basic: TowerSpec {
                cost: 100,
                role: TowerRole::Combat {
                    range: 150.0,
                    damage: 20,
                    damage_per_level: 10,
                    fire_interval_ms: 1000,
                    policy: TargetingPolicy::Nearest,
                },
            },
            sniper: TowerSpec {
                cost: 150,
                role: TowerRole::Combat {
                    range: 300.0,
                    damage: 40,
                    damage_per_level: 20,
                    fire_interval_ms: 2000,
                    policy: TargetingPolicy::HighestHealth,
                },
            },
            money: TowerSpec {
                cost: 200,
                role: TowerRole::Income {
                    amount: 5,
                    income_per_level: 5,
                    interval_ms: 500,
                },
            },
        }
    }
}

/// Everything needed to start a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TdConfig {
    #[serde(default)]
    pub settings: Settings,
    pub levels: Vec<LevelDef>,
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            levels: default_campaign(),
        }
    }
}
