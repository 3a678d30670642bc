pub mod clock;
pub mod envelope;
pub mod game;
pub mod time;
pub mod types;

pub use clock::{Clock, FixedStepClock, SystemClock};
pub use envelope::ActionEnvelope;
pub use game::{Game, TerminalOutcome};
pub use time::Millis;
pub use types::{ActionId, Tick};
