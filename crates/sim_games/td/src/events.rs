use crate::bullet::BulletId;
use crate::config::TowerKind;
use crate::economy::InsufficientFunds;
use crate::enemy::EnemyId;
use crate::geometry::Position;
use crate::tower::TowerId;

/// Why a placement or upgrade request changed nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    InsufficientFunds { cost: u32, have: u32 },
    /// The snapped cell is not a slot, or a tower already covers it.
    SlotUnavailable,
    /// No tower footprint contains the point.
    NoTower,
    MaxLevel,
    /// The session already ended.
    SessionOver,
}

impl From<InsufficientFunds> for RejectReason {
    fn from(err: InsufficientFunds) -> Self {
        RejectReason::InsufficientFunds {
            cost: err.cost,
            have: err.balance,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TdEvent {
    TowerPlaced {
        id: TowerId,
        kind: TowerKind,
        position: Position,
        cost: u32,
    },
    TowerUpgraded {
        id: TowerId,
        level: u8,
        cost: u32,
    },
    PlacementRejected {
        kind: TowerKind,
        position: Position,
        reason: RejectReason,
    },
    UpgradeRejected {
        position: Position,
        reason: RejectReason,
    },
    EnemySpawned {
        id: EnemyId,
        wave: usize,
    },
    EnemyKilled {
        id: EnemyId,
        reward: u32,
    },
    EnemyLeaked {
        id: EnemyId,
    },
    BulletFired {
        id: BulletId,
        tower: TowerId,
        target: EnemyId,
    },
    IncomeGenerated {
        tower: TowerId,
        amount: u32,
    },
    WaveStarted {
        wave: usize,
    },
    WaveCleared {
        wave: usize,
    },
    LevelStarted {
        level: usize,
        name: String,
    },
    LevelCompleted {
        level: usize,
    },
    GameWon,
    GameLost,
}
