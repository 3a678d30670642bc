//! Configuration errors.
//!
//! The simulation has no recovery path for a degenerate entity (a path with
//! no next vertex, a tower that could fire every frame forever), so these are
//! raised while building settings, waves and levels and never during a tick.

use crate::config::TowerKind;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("playfield must have a positive, finite size, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),

    #[error("bullet speed must be positive and finite, got {0}")]
    InvalidBulletSpeed(f32),

    #[error("{what} must be non-negative and finite, got {value}")]
    InvalidRadius { what: &'static str, value: f32 },

    #[error("spawn delay must be positive")]
    ZeroSpawnDelay,

    #[error("placement slot {index} is not finite")]
    NonFiniteSlot { index: usize },

    #[error("{kind} tower range must be non-negative and finite, got {range}")]
    InvalidRange { kind: TowerKind, range: f32 },

    #[error("{kind} tower damage must be positive, got {damage}")]
    NonPositiveDamage { kind: TowerKind, damage: i32 },

    #[error("{kind} tower fire interval must be positive")]
    ZeroFireInterval { kind: TowerKind },

    #[error("{kind} tower income interval must be positive")]
    ZeroIncomeInterval { kind: TowerKind },

    #[error("path must have at least two vertices, got {0}")]
    PathTooShort(usize),

    #[error("path vertex {index} is not finite")]
    NonFiniteVertex { index: usize },

    #[error("spawn references path {index}, but the level defines {available}")]
    UnknownPath { index: usize, available: usize },

    #[error("enemy speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),

    #[error("enemy health must be positive, got {0}")]
    NonPositiveHealth(i32),

    #[error("wave contains no enemies")]
    EmptyWave,

    #[error("level defines no waves")]
    NoWaves,

    #[error("campaign defines no levels")]
    NoLevels,

    #[error("wave {wave}: {source}")]
    InWave {
        wave: usize,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("level {level} ({name}): {source}")]
    InLevel {
        level: usize,
        name: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn in_wave(self, wave: usize) -> Self {
        ConfigError::InWave {
            wave,
            source: Box::new(self),
        }
    }

    pub(crate) fn in_level(self, level: usize, name: &str) -> Self {
        ConfigError::InLevel {
            level,
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}
