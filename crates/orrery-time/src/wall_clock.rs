use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Source of real time for real-time sync.
pub trait WallClock {
    /// Monotonic time since an arbitrary fixed origin.
    fn elapsed(&self) -> Duration;

    /// Current civil time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// The process clock.
#[derive(Clone, Copy, Debug)]
pub struct SystemWallClock {
    origin: Instant,
}

impl SystemWallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemWallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemWallClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock that only moves when told to. Used for deterministic tests and
/// replays.
#[derive(Clone, Copy, Debug)]
pub struct ManualWallClock {
    elapsed: Duration,
    utc: DateTime<Utc>,
}

impl ManualWallClock {
    /// Start at `utc` with zero elapsed time.
    pub fn new(utc: DateTime<Utc>) -> Self {
        Self {
            elapsed: Duration::ZERO,
            utc,
        }
    }

    /// Move both the monotonic and the civil time forward.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
        if let Ok(delta) = chrono::TimeDelta::from_std(by) {
            self.utc += delta;
        }
    }
}

impl WallClock for ManualWallClock {
    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.utc
    }
}
