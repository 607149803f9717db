use chrono::{DateTime, TimeDelta, Utc};

use crate::error::TimeError;

/// Simulated instant plus the epoch it started from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulatedClock {
    instant: DateTime<Utc>,
    epoch: DateTime<Utc>,
}

impl SimulatedClock {
    /// Start at `epoch`.
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            instant: epoch,
            epoch,
        }
    }

    /// Current simulated instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Instant the simulation started at.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Move the simulated instant by `ms` milliseconds (negative goes back).
    ///
    /// A step that would leave chrono's representable range is dropped.
    pub fn advance_ms(&mut self, ms: f64) {
        if !ms.is_finite() {
            log::warn!("Ignoring non-finite simulated step of {ms} ms");
            return;
        }
        let step = TimeDelta::microseconds((ms * 1_000.0).round() as i64);
        match self.instant.checked_add_signed(step) {
            Some(next) => self.instant = next,
            None => log::warn!("Simulated step of {ms} ms leaves the representable range"),
        }
    }

    /// Jump to `instant`, keeping the epoch.
    pub fn set_instant(&mut self, instant: DateTime<Utc>) {
        self.instant = instant;
    }
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_start_time(input: &str) -> Result<DateTime<Utc>, TimeError> {
    DateTime::parse_from_rfc3339(input)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| TimeError::InvalidTimestamp {
            input: input.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> DateTime<Utc> {
        parse_start_time("2024-01-01T00:00:00Z").unwrap()
    }

    #[test]
    fn test_advance_forwards_and_backwards() {
        let mut clock = SimulatedClock::new(epoch());
        clock.advance_ms(86_400_000.0);
        assert_eq!(clock.instant(), epoch() + TimeDelta::days(1));
        clock.advance_ms(-2.0 * 86_400_000.0);
        assert_eq!(clock.instant(), epoch() - TimeDelta::days(1));
        assert!((clock.elapsed_days() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sub_millisecond_steps_accumulate() {
        let mut clock = SimulatedClock::new(epoch());
        for _ in 0..1_000 {
            clock.advance_ms(0.5);
        }
        assert_eq!(clock.instant(), epoch() + TimeDelta::milliseconds(500));
    }

    #[test]
    fn test_non_finite_step_is_ignored() {
        let mut clock = SimulatedClock::new(epoch());
        clock.advance_ms(f64::NAN);
        clock.advance_ms(f64::INFINITY);
        assert_eq!(clock.instant(), epoch());
    }

    #[test]
    fn test_jump_keeps_epoch() {
        let mut clock = SimulatedClock::new(epoch());
        clock.advance_ms(1e12);
        assert!(clock.instant() > epoch() + chrono::TimeDelta::days(11_000));
        clock.set_instant(clock.epoch());
        assert_eq!(clock.instant(), epoch());
    }

    #[test]
    fn test_parse_start_time_offsets() {
        let t = parse_start_time("2024-01-01T08:00:00+08:00").unwrap();
        assert_eq!(t, epoch());
        let err = parse_start_time("yesterday").unwrap_err();
        assert!(matches!(err, TimeError::InvalidTimestamp { .. }));
    }
}
