use crate::time::Millis;
use std::time::{Duration, Instant};

/// Source of monotonic frame timestamps. Each call marks the start of a new frame.
pub trait Clock {
    fn frame_time(&mut self) -> Millis;
}

/// Deterministic clock that advances by a fixed interval per frame.
#[derive(Clone, Debug)]
pub struct FixedStepClock {
    now: Millis,
    step: Millis,
}

impl FixedStepClock {
    pub fn new(step: Millis) -> Self {
        Self::starting_at(Millis::ZERO, step)
    }

    pub fn starting_at(start: Millis, step: Millis) -> Self {
        Self { now: start, step }
    }

    /// Frame interval for the given frame rate, rounded down to whole milliseconds.
    pub fn from_hz(hz: u32) -> Self {
        Self::new(Millis::from_millis(1_000 / u64::from(hz.max(1))))
    }

    pub fn step(&self) -> Millis {
        self.step
    }
}

impl Clock for FixedStepClock {
    fn frame_time(&mut self) -> Millis {
        self.now += self.step;
        self.now
    }
}

/// Wall-clock time since construction.
#[derive(Clone, Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn frame_time(&mut self) -> Millis {
        let millis = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Millis::from_millis(millis)
    }
}
