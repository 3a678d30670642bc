//! Level definitions as plain data, plus the built-in three-level campaign.
//!
//! A [`LevelDef`] is what a host hands to the engine (or deserialises from a
//! campaign file). It is turned into validated [`Wave`]s once, when the level
//! is built, so nothing here is consulted during a tick.

use crate::enemy::SpawnSpec;
use crate::error::ConfigError;
use crate::geometry::Position;
use crate::wave::Wave;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Visual family of an enemy. Decides the sprite label and the default
/// collision radius; speed, health and reward are set per spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    Basic,
    Fast,
    Strong,
    Boss,
}

impl EnemyArchetype {
    pub fn sprite(self) -> &'static str {
        match self {
            EnemyArchetype::Basic => "basic_enemy",
            EnemyArchetype::Fast => "fast_enemy",
            EnemyArchetype::Strong => "strong_enemy",
            EnemyArchetype::Boss => "boss_enemy",
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            EnemyArchetype::Basic => 16.0,
            EnemyArchetype::Fast => 14.0,
            EnemyArchetype::Strong => 20.0,
            EnemyArchetype::Boss => 28.0,
        }
    }
}

/// One kind of enemy release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnDef {
    /// Indices into the level's paths to pick from. Empty means any path.
    #[serde(default)]
    pub path_choices: Vec<usize>,
    pub speed: f32,
    pub health: i32,
    pub reward: u32,
    pub archetype: EnemyArchetype,
    /// Overrides the archetype's radius.
    #[serde(default)]
    pub radius: Option<f32>,
}

impl SpawnDef {
    pub fn new(archetype: EnemyArchetype, speed: f32, health: i32, reward: u32) -> Self {
        Self {
            path_choices: Vec::new(),
            speed,
            health,
            reward,
            archetype,
            radius: None,
        }
    }

    pub fn on_paths(mut self, choices: impl IntoIterator<Item = usize>) -> Self {
        self.path_choices = choices.into_iter().collect();
        self
    }

    /// Every listed choice must name an existing path, whichever one the
    /// draw would land on.
    fn pick_path<R: Rng>(&self, paths: &[Arc<[Position]>], rng: &mut R) -> Result<Arc<[Position]>, ConfigError> {
        let unknown = |index| ConfigError::UnknownPath {
            index,
            available: paths.len(),
        };
        if let Some(&bad) = self.path_choices.iter().find(|&&index| index >= paths.len()) {
            return Err(unknown(bad));
        }
        let index = if self.path_choices.is_empty() {
            if paths.is_empty() {
                return Err(unknown(0));
            }
            rng.gen_range(0..paths.len())
        } else {
            self.path_choices[rng.gen_range(0..self.path_choices.len())]
        };
        paths.get(index).cloned().ok_or_else(|| unknown(index))
    }
}

/// `count` identical releases sharing one path choice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnGroup {
    pub count: u32,
    #[serde(flatten)]
    pub spawn: SpawnDef,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveDef {
    pub groups: Vec<SpawnGroup>,
}

impl WaveDef {
    pub fn repeated(count: u32, spawn: SpawnDef) -> Self {
        Self {
            groups: vec![SpawnGroup { count, spawn }],
        }
    }

    /// Expand the groups into a validated wave. The path of each group is
    /// drawn once from `rng`.
    pub fn resolve<R: Rng>(&self, paths: &[Arc<[Position]>], rng: &mut R) -> Result<Wave, ConfigError> {
        let mut spawns = Vec::new();
        for group in &self.groups {
            let def = &group.spawn;
            let path = def.pick_path(paths, rng)?;
            let spec = SpawnSpec::new(
                path,
                def.speed,
                def.health,
                def.reward,
                def.radius.unwrap_or_else(|| def.archetype.radius()),
                def.archetype.sprite(),
            )?;
            spawns.extend(std::iter::repeat(spec).take(group.count as usize));
        }
        Wave::new(spawns)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub paths: Vec<Vec<Position>>,
    pub waves: Vec<WaveDef>,
}

fn path(points: &[(f32, f32)]) -> Vec<Position> {
    points.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

/// The three stock levels.
pub fn default_campaign() -> Vec<LevelDef> {
    use EnemyArchetype::{Basic, Boss, Fast, Strong};
    let wave = |count, archetype, speed, health, reward| {
        WaveDef::repeated(count, SpawnDef::new(archetype, speed, health, reward))
    };

    vec![
        LevelDef {
            name: "Level 1".to_string(),
            paths: vec![path(&[
                (50.0, 400.0),
                (300.0, 400.0),
                (300.0, 200.0),
                (600.0, 200.0),
                (600.0, 600.0),
                (900.0, 600.0),
                (900.0, 300.0),
                (1150.0, 300.0),
            ])],
            waves: vec![
                wave(5, Basic, 1.0, 100, 10),
                wave(10, Fast, 2.0, 50, 15),
                wave(4, Strong, 1.0, 200, 30),
                wave(3, Strong, 1.0, 300, 40),
                wave(1, Boss, 0.5, 500, 100),
            ],
        },
        LevelDef {
            name: "Level 2".to_string(),
            paths: vec![path(&[
                (50.0, 400.0),
                (300.0, 300.0),
                (300.0, 50.0),
                (400.0, 50.0),
                (600.0, 50.0),
                (600.0, 600.0),
                (900.0, 300.0),
                (1150.0, 300.0),
            ])],
            waves: vec![
                wave(8, Fast, 3.0, 50, 15),
                wave(6, Strong, 1.0, 200, 30),
                wave(5, Strong, 1.5, 150, 25),
                wave(2, Boss, 0.8, 400, 100),
            ],
        },
        LevelDef {
            name: "Level 3".to_string(),
            paths: vec![path(&[
                (50.0, 400.0),
                (600.0, 400.0),
                (600.0, 50.0),
                (300.0, 100.0),
                (600.0, 300.0),
                (600.0, 600.0),
                (900.0, 300.0),
                (1150.0, 300.0),
            ])],
            waves: vec![
                wave(5, Basic, 1.3, 100, 10),
                wave(6, Fast, 3.0, 50, 15),
                wave(4, Strong, 1.5, 200, 30),
                wave(1, Boss, 0.5, 500, 100),
                wave(5, Fast, 2.0, 150, 20),
            ],
        },
    ]
}
