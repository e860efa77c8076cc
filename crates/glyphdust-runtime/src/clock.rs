//! Virtual clock with a fixed timestep, for headless and deterministic runs

use std::time::{Duration, Instant};

/// A clock that only moves when told to.
///
/// Drives the controller at a steady rate (default 60 Hz) without sleeping,
/// so rendering to files and tests produce the same frames every run.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    origin: Instant,
    elapsed: Duration,
    /// Fixed timestep interval (default: 1/60 second)
    pub timestep: Duration,
    ticks: u64,
}

impl VirtualClock {
    /// Create a new clock at `origin` with the default 60 Hz timestep
    pub fn new(origin: Instant) -> Self {
        Self::with_hz(origin, 60.0)
    }

    /// Create a clock with a custom rate
    pub fn with_hz(origin: Instant, hz: f64) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
            timestep: Duration::from_secs_f64(1.0 / hz),
            ticks: 0,
        }
    }

    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    /// Advance one timestep and return the new time
    pub fn tick(&mut self) -> Instant {
        self.ticks += 1;
        self.advance(self.timestep)
    }

    /// Advance by an arbitrary amount (e.g. to let a debounce settle)
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.elapsed += by;
        self.now()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of `tick` calls so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
