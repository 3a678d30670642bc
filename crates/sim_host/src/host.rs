use sim_core::{ActionEnvelope, Clock, Game, Millis, TerminalOutcome, Tick};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub events: Vec<G::Event>,
}

/// Drives a single game one frame at a time, stamping every frame with the clock's time.
pub struct MatchHost<G: Game, C: Clock> {
    game: G,
    clock: C,
    current_tick: Tick,
    now: Millis,
    next_action_id: u64,
    pending_actions: BTreeMap<Tick, Vec<ActionEnvelope<G::Action>>>,
}

impl<G: Game, C: Clock> MatchHost<G, C> {
    pub fn new(config: G::Config, seed: u64, clock: C) -> Result<Self, G::Error> {
        Ok(Self {
            game: G::new(config, seed)?,
            clock,
            current_tick: 0,
            now: Millis::ZERO,
            next_action_id: 0,
            pending_actions: BTreeMap::new(),
        })
    }

    /// Submit an action to be executed at the given tick.
    /// If `intended_tick` is in the past or current, schedules for the next tick.
    /// Returns the actual tick the action was scheduled for.
    pub fn submit(&mut self, mut action: ActionEnvelope<G::Action>) -> Tick {
        let scheduled_tick = if action.intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            action.intended_tick
        };

        action.intended_tick = scheduled_tick;
        self.next_action_id = self.next_action_id.max(action.action_id + 1);
        self.pending_actions
            .entry(scheduled_tick)
            .or_default()
            .push(action);

        scheduled_tick
    }

    /// Schedule an action for the next tick with a fresh action id.
    pub fn submit_next(&mut self, payload: G::Action) -> Tick {
        let action_id = self.next_action_id;
        self.submit(ActionEnvelope::new(action_id, self.current_tick + 1, payload))
    }

    pub fn run_for_ticks(&mut self, max_ticks: Tick) -> RunResult<G> {
        let mut all_events = Vec::new();

        for _ in 0..max_ticks {
            match self.step_one_tick() {
                Some(events) => all_events.extend(events),
                None => break,
            }
        }

        RunResult {
            outcome: self.game.is_terminal(),
            final_tick: self.current_tick,
            events: all_events,
        }
    }

    /// Advance by one tick. Returns None if the game is already terminal, otherwise the events from this tick.
    pub fn step_one_tick(&mut self) -> Option<Vec<G::Event>> {
        if self.game.is_terminal().is_some() {
            return None;
        }

        self.current_tick += 1;
        self.now = self.clock.frame_time();

        let mut actions = self
            .pending_actions
            .remove(&self.current_tick)
            .unwrap_or_default();

        // Same-tick actions run in submission-id order.
        actions.sort_by_key(|a| a.action_id);

        let mut tick_events = Vec::new();
        self.game
            .step(self.current_tick, self.now, &actions, &mut tick_events);

        Some(tick_events)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn observe(&self) -> G::Observation {
        self.game.observe(self.current_tick)
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Time stamp of the most recent tick.
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending_action_count(&self) -> usize {
        self.pending_actions.values().map(Vec::len).sum()
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}
