use crate::config::TowerKind;
use serde::{Deserialize, Serialize};

/// Player command. Coordinates are playfield pixels; placement snaps them to
/// the cell under the point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TdAction {
    PlaceTower { x: f32, y: f32, kind: TowerKind },
    UpgradeTower { x: f32, y: f32 },
    ToggleSlotOverlay,
}
