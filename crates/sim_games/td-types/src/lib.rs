//! Canonical serializable snapshot types for the Tower Defense game.
//!
//! Produced by `sim_td` once per frame and handed to rendering/input
//! collaborators. Coordinates are playfield pixels.

use serde::{Deserialize, Serialize};

/// Position on the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Overall session status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionStatus {
    Running,
    Won,
    Lost,
}

/// Wave progression of the active level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WaveStatus {
    /// Current wave still has enemies to release.
    Spawning {
        /// Number of enemies spawned so far this wave.
        spawned: u32,
        /// Total enemies in this wave.
        wave_size: u32,
    },
    /// Every enemy of the current wave has been released; some are still alive.
    Active { alive: u32 },
    /// Every wave of the level has been cleared.
    AllWavesComplete,
    /// An enemy reached the end of its path.
    Leaked,
}

/// Information about a placement slot, present only while the overlay is shown.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlotInfo {
    pub x: f32,
    pub y: f32,
    pub available: bool,
}

/// Information about a tower.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TowerInfo {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub tower_type: String,
    pub level: u8,
    pub range: f32,
    pub damage: i32,
    /// Facing in radians, for sprite rotation only.
    pub heading: f32,
    pub upgrade_cost: u32,
}

/// Information about an enemy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyInfo {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub max_health: i32,
    pub sprite: String,
}

/// Information about a projectile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulletInfo {
    pub x: f32,
    pub y: f32,
}

/// Full game state observation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TdObservation {
    pub tick: u64,
    pub time_ms: u64,
    pub status: SessionStatus,

    pub screen_width: f32,
    pub screen_height: f32,

    pub level_index: u32,
    pub levels_total: u32,
    pub level_name: String,
    /// Waypoint polylines of the active level.
    pub paths: Vec<Vec<Position>>,

    pub money: u32,
    pub tower_costs: Vec<(String, u32)>,

    pub current_wave: u32,
    pub waves_total: u32,
    pub waves_remaining: u32,
    pub wave_status: WaveStatus,

    pub slot_overlay: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotInfo>,

    pub towers: Vec<TowerInfo>,
    pub enemies: Vec<EnemyInfo>,
    pub bullets: Vec<BulletInfo>,
}
