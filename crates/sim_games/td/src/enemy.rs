use crate::error::ConfigError;
use crate::geometry::Position;
use std::sync::Arc;

/// Identifier of an enemy, unique within a level and increasing in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

/// Validated description of one enemy release.
///
/// Construction is the only place enemy parameters are checked, so an
/// [`Enemy`] spawned from a `SpawnSpec` always has a next vertex to walk to.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnSpec {
    path: Arc<[Position]>,
    speed: f32,
    health: i32,
    reward: u32,
    radius: f32,
    sprite: Arc<str>,
}

impl SpawnSpec {
    pub fn new(
        path: Arc<[Position]>,
        speed: f32,
        health: i32,
        reward: u32,
        radius: f32,
        sprite: impl Into<Arc<str>>,
    ) -> Result<Self, ConfigError> {
        validate_path(&path)?;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        if health <= 0 {
            return Err(ConfigError::NonPositiveHealth(health));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::InvalidRadius {
                what: "enemy radius",
                value: radius,
            });
        }
        Ok(Self {
            path,
            speed,
            health,
            reward,
            radius,
            sprite: sprite.into(),
        })
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn reward(&self) -> u32 {
        self.reward
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }
}

/// A walkable path has a start and at least one more vertex, all finite.
pub fn validate_path(path: &[Position]) -> Result<(), ConfigError> {
    if path.len() < 2 {
        return Err(ConfigError::PathTooShort(path.len()));
    }
    if let Some(index) = path.iter().position(|v| !v.is_finite()) {
        return Err(ConfigError::NonFiniteVertex { index });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStep {
    Moving,
    /// Reached the final vertex alive.
    Leaked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Wounded { remaining: i32 },
    /// This hit took health to zero or below. Reported once per enemy.
    Killed { reward: u32 },
    /// The enemy was already dead; the hit has no effect.
    AlreadyDead,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    path: Arc<[Position]>,
    path_index: usize,
    position: Position,
    speed: f32,
    health: i32,
    max_health: i32,
    reward: u32,
    radius: f32,
    sprite: Arc<str>,
}

impl Enemy {
    pub fn spawn(id: EnemyId, spec: &SpawnSpec) -> Self {
        Self {
            id,
            path: Arc::clone(&spec.path),
            path_index: 0,
            position: spec.path[0],
            speed: spec.speed,
            health: spec.health,
            max_health: spec.health,
            reward: spec.reward,
            radius: spec.radius,
            sprite: Arc::clone(&spec.sprite),
        }
    }

    /// Walk one frame towards the next vertex.
    ///
    /// The leg advances once the enemy is closer to the vertex than one
    /// frame's travel, so arrival is tolerance-based rather than exact.
    pub fn advance(&mut self) -> EnemyStep {
        let last = self.path.len() - 1;
        if self.path_index >= last {
            return EnemyStep::Leaked;
        }

        let next_vertex = self.path[self.path_index + 1];
        let direction = (next_vertex - self.position).normalize_or_zero();
        self.position += direction * self.speed;

        if self.position.distance(next_vertex) < self.speed {
            self.path_index += 1;
        }

        if self.path_index >= last {
            EnemyStep::Leaked
        } else {
            EnemyStep::Moving
        }
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::AlreadyDead;
        }
        self.health -= amount;
        if self.health <= 0 {
            DamageOutcome::Killed {
                reward: self.reward,
            }
        } else {
            DamageOutcome::Wounded {
                remaining: self.health,
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn reward(&self) -> u32 {
        self.reward
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }
}
