use crate::geometry::{Bounds, Position};
use crate::tower::TowerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletStep {
    InFlight,
    /// Within the arrival epsilon of the captured target.
    Arrived,
    OutOfBounds,
}

/// Projectile flying in a straight line towards a position captured when it
/// was fired. It never re-targets.
#[derive(Clone, Debug)]
pub struct Bullet {
    id: BulletId,
    source: TowerId,
    origin: Position,
    position: Position,
    target: Position,
    velocity: Position,
    damage: i32,
    radius: f32,
}

impl Bullet {
    pub fn fire(
        id: BulletId,
        source: TowerId,
        origin: Position,
        target: Position,
        speed: f32,
        damage: i32,
        radius: f32,
    ) -> Self {
        let velocity = (target - origin).normalize_or_zero() * speed;
        Self {
            id,
            source,
            origin,
            position: origin,
            target,
            velocity,
            damage,
            radius,
        }
    }

    pub fn advance(&mut self, bounds: &Bounds, arrival_epsilon: f32) -> BulletStep {
        self.position += self.velocity;
        if self.position.distance(self.target) < arrival_epsilon {
            BulletStep::Arrived
        } else if !bounds.contains(self.position) {
            BulletStep::OutOfBounds
        } else {
            BulletStep::InFlight
        }
    }

    pub fn id(&self) -> BulletId {
        self.id
    }

    pub fn source(&self) -> TowerId {
        self.source
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn velocity(&self) -> Position {
        self.velocity
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}
