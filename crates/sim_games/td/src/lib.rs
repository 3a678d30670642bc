pub mod actions;
pub mod bullet;
pub mod campaign;
pub mod config;
pub mod economy;
pub mod enemy;
pub mod error;
pub mod events;
pub mod game;
pub mod geometry;
pub mod grid;
pub mod level;
pub mod observe;
pub mod tower;
pub mod wave;

pub use actions::TdAction;
pub use campaign::{default_campaign, EnemyArchetype, LevelDef, SpawnDef, SpawnGroup, WaveDef};
pub use config::{Settings, TargetingPolicy, TdConfig, TowerKind, TowerRole, TowerSpec};
pub use economy::{Economy, InsufficientFunds};
pub use error::ConfigError;
pub use events::{RejectReason, TdEvent};
pub use game::{SessionState, TdGame};
pub use geometry::Position;
pub use level::{Level, LevelPhase};
pub use tower::{Tower, TowerId};
