use sim_td::geometry::distance_to_polyline;
use sim_td::{Position, TdAction, TdGame, TowerKind};
use std::collections::VecDeque;

/// Scripted player: fills the slots closest to the enemy paths, then spends
/// the rest of its money upgrading what it built.
pub struct Autoplayer {
    plan: VecDeque<(Position, TowerKind)>,
    placed: Vec<Position>,
    next_upgrade: usize,
}

impl Autoplayer {
    /// Plan up to `max_towers` placements for the game's active level.
    pub fn for_level(game: &TdGame, max_towers: usize, reach: f32) -> Self {
        let paths = game.level().paths();
        let mut candidates: Vec<(f32, Position)> = game
            .settings()
            .slots
            .iter()
            .map(|&slot| {
                let distance = paths
                    .iter()
                    .map(|path| distance_to_polyline(slot, path))
                    .fold(f32::INFINITY, f32::min);
                (distance, slot)
            })
            .filter(|(distance, _)| *distance <= reach)
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let plan = candidates
            .into_iter()
            .take(max_towers)
            .enumerate()
            .map(|(i, (_, slot))| {
                let kind = if i % 3 == 2 {
                    TowerKind::Sniper
                } else {
                    TowerKind::Basic
                };
                (slot, kind)
            })
            .collect();

        Self {
            plan,
            placed: Vec::new(),
            next_upgrade: 0,
        }
    }

    pub fn planned(&self) -> usize {
        self.plan.len()
    }

    /// The next affordable action, if any.
    pub fn next_action(&mut self, game: &TdGame) -> Option<TdAction> {
        if let Some(&(slot, kind)) = self.plan.front() {
            if game.money() < game.settings().cost(kind) {
                return None;
            }
            self.plan.pop_front();
            self.placed.push(slot);
            return Some(TdAction::PlaceTower {
                x: slot.x,
                y: slot.y,
                kind,
            });
        }

        if self.placed.is_empty() {
            return None;
        }
        let slot = self.placed[self.next_upgrade % self.placed.len()];
        let tower = game.towers().values().find(|t| t.position() == slot)?;
        if game.money() < game.settings().upgrade_cost(tower.level()) {
            return None;
        }
        self.next_upgrade += 1;
        Some(TdAction::UpgradeTower {
            x: slot.x,
            y: slot.y,
        })
    }
}
