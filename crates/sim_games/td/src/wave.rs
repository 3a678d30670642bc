use crate::enemy::SpawnSpec;
use crate::error::ConfigError;

/// Ordered, immutable list of enemy releases. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    spawns: Vec<SpawnSpec>,
}

impl Wave {
    pub fn new(spawns: Vec<SpawnSpec>) -> Result<Self, ConfigError> {
        if spawns.is_empty() {
            return Err(ConfigError::EmptyWave);
        }
        Ok(Self { spawns })
    }

    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SpawnSpec> {
        self.spawns.get(index)
    }

    pub fn spawns(&self) -> &[SpawnSpec] {
        &self.spawns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use std::sync::Arc;

    #[test]
    fn rejects_empty_wave() {
        assert_eq!(Wave::new(Vec::new()), Err(ConfigError::EmptyWave));
    }

    #[test]
    fn keeps_release_order() {
        let path: Arc<[Position]> = vec![Position::ZERO, Position::X].into();
        let first = SpawnSpec::new(Arc::clone(&path), 1.0, 10, 1, 16.0, "basic_enemy").unwrap();
        let second = SpawnSpec::new(path, 2.0, 50, 15, 14.0, "fast_enemy").unwrap();
        let wave = Wave::new(vec![first.clone(), second]).unwrap();
        assert_eq!(wave.len(), 2);
        assert_eq!(wave.get(0), Some(&first));
        assert_eq!(wave.get(1).map(|s| s.sprite()), Some("fast_enemy"));
        assert!(wave.get(2).is_none());
    }
}
