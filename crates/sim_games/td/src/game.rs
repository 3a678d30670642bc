use crate::actions::TdAction;
use crate::bullet::Bullet;
use crate::config::{Settings, TdConfig, TowerKind};
use crate::economy::Economy;
use crate::enemy::Enemy;
use crate::error::ConfigError;
use crate::events::{RejectReason, TdEvent};
use crate::geometry::Position;
use crate::level::Level;
use crate::observe::build_observation;
use crate::tower::{Tower, TowerId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::{ActionEnvelope, Game, Millis, TerminalOutcome, Tick};
use slotmap::SlotMap;
use std::collections::VecDeque;
use std::sync::Arc;
use td_types::TdObservation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Won,
    Lost,
}

/// A whole play session: the ordered levels, the money counter and the
/// terminal state.
///
/// Every level is built up front, so a bad campaign is rejected before the
/// first tick and advancing to the next level cannot fail.
#[derive(Debug)]
pub struct TdGame {
    settings: Arc<Settings>,
    active: Level,
    upcoming: VecDeque<Level>,
    levels_total: usize,
    economy: Economy,
    state: SessionState,
    tick: Tick,
    now: Millis,
    events: Vec<TdEvent>,
}

impl TdGame {
    /// Run one tick of the active level at frame time `now`.
    pub fn update(&mut self, now: Millis) {
        if self.state != SessionState::Running {
            return;
        }
        self.tick += 1;
        self.advance(now);
    }

    fn advance(&mut self, now: Millis) {
        self.now = now;
        self.active.update(now, &mut self.economy, &mut self.events);
        self.check_progress();
    }

    fn check_progress(&mut self) {
        if self.active.has_leaked() {
            self.state = SessionState::Lost;
            self.events.push(TdEvent::GameLost);
            tracing::info!(level = self.active.index(), money = self.economy.balance(), "game lost");
            return;
        }
        if !self.active.all_waves_complete() || !self.active.enemies().is_empty() {
            return;
        }

        let finished = self.active.index();
        self.events.push(TdEvent::LevelCompleted { level: finished });
        tracing::info!(level = finished, name = self.active.name(), "level completed");

        match self.upcoming.pop_front() {
            Some(next) => {
                self.active = next;
                self.events.push(TdEvent::LevelStarted {
                    level: self.active.index(),
                    name: self.active.name().to_string(),
                });
                tracing::info!(level = self.active.index(), name = self.active.name(), "level started");
            }
            None => {
                self.state = SessionState::Won;
                self.events.push(TdEvent::GameWon);
                tracing::info!(money = self.economy.balance(), "game won");
            }
        }
    }

    /// Place a tower on the slot under `point`. False when rejected.
    pub fn attempt_place_tower(&mut self, point: Position, kind: TowerKind) -> bool {
        if self.state != SessionState::Running {
            tracing::debug!(%kind, state = ?self.state, "placement after session end");
            self.events.push(TdEvent::PlacementRejected {
                kind,
                position: point,
                reason: RejectReason::SessionOver,
            });
            return false;
        }
        self.active
            .attempt_place_tower(point, kind, self.now, &mut self.economy, &mut self.events)
    }

    /// Upgrade the tower covering `point`. False when rejected.
    pub fn upgrade_tower_at(&mut self, point: Position) -> bool {
        if self.state != SessionState::Running {
            tracing::debug!(state = ?self.state, "upgrade after session end");
            self.events.push(TdEvent::UpgradeRejected {
                position: point,
                reason: RejectReason::SessionOver,
            });
            return false;
        }
        self.active
            .upgrade_tower_at(point, &mut self.economy, &mut self.events)
    }

    /// Flip the slot overlay. Returns the new visibility.
    pub fn toggle_slot_overlay(&mut self) -> bool {
        self.active.toggle_slot_overlay()
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<TdEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> TdObservation {
        build_observation(self, self.tick)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level(&self) -> &Level {
        &self.active
    }

    pub fn level_index(&self) -> usize {
        self.active.index()
    }

    pub fn levels_total(&self) -> usize {
        self.levels_total
    }

    pub fn enemies(&self) -> &[Enemy] {
        self.active.enemies()
    }

    pub fn towers(&self) -> &SlotMap<TowerId, Tower> {
        self.active.towers()
    }

    pub fn bullets(&self) -> &[Bullet] {
        self.active.bullets()
    }

    pub fn current_wave_index(&self) -> usize {
        self.active.current_wave_index()
    }

    pub fn waves_remaining(&self) -> usize {
        self.active.waves_remaining()
    }

    pub fn money(&self) -> u32 {
        self.economy.balance()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == SessionState::Won
    }

    pub fn is_lost(&self) -> bool {
        self.state == SessionState::Lost
    }

    /// Frame time of the most recent tick.
    pub fn now(&self) -> Millis {
        self.now
    }
}

impl Game for TdGame {
    type Config = TdConfig;
    type Action = TdAction;
    type Observation = TdObservation;
    type Event = TdEvent;
    type Error = ConfigError;

    fn new(config: Self::Config, seed: u64) -> Result<Self, Self::Error> {
        let TdConfig { settings, levels } = config;
        settings.validate()?;
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        let settings = Arc::new(settings);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut upcoming = levels
            .iter()
            .enumerate()
            .map(|(i, def)| Level::from_def(i, def, Arc::clone(&settings), &mut rng))
            .collect::<Result<VecDeque<_>, _>>()?;
        let levels_total = upcoming.len();
        let active = upcoming.pop_front().ok_or(ConfigError::NoLevels)?;

        tracing::info!(levels = levels_total, seed, "session created");
        let events = vec![TdEvent::LevelStarted {
            level: active.index(),
            name: active.name().to_string(),
        }];

        Ok(Self {
            economy: Economy::new(settings.starting_money),
            settings,
            active,
            upcoming,
            levels_total,
            state: SessionState::Running,
            tick: 0,
            now: Millis::ZERO,
            events,
        })
    }

    fn step(
        &mut self,
        tick: Tick,
        now: Millis,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        if self.state == SessionState::Running {
            self.tick = tick;
            self.now = now;
        }

        for action in actions {
            match &action.payload {
                TdAction::PlaceTower { x, y, kind } => {
                    self.attempt_place_tower(Position::new(*x, *y), *kind);
                }
                TdAction::UpgradeTower { x, y } => {
                    self.upgrade_tower_at(Position::new(*x, *y));
                }
                TdAction::ToggleSlotOverlay => {
                    self.toggle_slot_overlay();
                }
            }
        }

        if self.state == SessionState::Running {
            self.advance(now);
        }
        out_events.append(&mut self.events);
    }

    fn observe(&self, tick: Tick) -> Self::Observation {
        build_observation(self, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        match self.state {
            SessionState::Running => None,
            SessionState::Won => Some(TerminalOutcome::Win),
            SessionState::Lost => Some(TerminalOutcome::Lose),
        }
    }
}
