use crate::envelope::ActionEnvelope;
use crate::time::Millis;
use crate::types::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Win,
    Lose,
}

pub trait Game: Sized {
    type Config: Clone + Send + Sync + 'static;
    type Action: Clone + Send + Sync + 'static;
    type Observation: Clone + Send + Sync + 'static;
    type Event: Clone + Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build a game from its configuration. Degenerate configurations are rejected here.
    fn new(config: Self::Config, seed: u64) -> Result<Self, Self::Error>;

    /// Advance one frame. `now` is the monotonic frame time supplied by the host clock.
    fn step(
        &mut self,
        tick: Tick,
        now: Millis,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    );

    fn observe(&self, tick: Tick) -> Self::Observation;

    fn is_terminal(&self) -> Option<TerminalOutcome>;
}
