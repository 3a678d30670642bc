/// Index of a simulation step. The first stepped tick is 1.
pub type Tick = u64;

/// Caller-assigned identifier used to order actions scheduled for the same tick.
pub type ActionId = u64;
