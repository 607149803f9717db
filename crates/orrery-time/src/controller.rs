//! Time controller: speed ladder position, play state and real-time sync.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::SimulatedClock;
use crate::error::TimeError;
use crate::ladder::{SpeedLadder, describe_rate};
use crate::wall_clock::{SystemWallClock, WallClock};

/// Ladder step direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward faster reverse.
    Back,
    /// Toward faster forward.
    Forward,
}

/// Largest simulated step per tick, in milliseconds, for a rate.
///
/// A slow frame at a fast rate would otherwise jump the orbits visibly. The
/// ceiling grows with the rate: a minute for rates up to 60×, an hour up to
/// 3600×, a day up to 86400× and a week beyond.
pub fn step_ceiling_ms(rate: f64) -> f64 {
    let magnitude = rate.abs();
    if magnitude <= 60.0 {
        60_000.0
    } else if magnitude <= 3_600.0 {
        3_600_000.0
    } else if magnitude <= 86_400.0 {
        86_400_000.0
    } else {
        604_800_000.0
    }
}

/// Drives the simulated clock from real frame time.
///
/// While real-time sync is on, the ladder and play state are ignored and the
/// clock advances by exactly the wall-clock time elapsed between steps.
#[derive(Debug)]
pub struct TimeController<W: WallClock = SystemWallClock> {
    ladder: SpeedLadder,
    index: usize,
    playing: bool,
    realtime_sync: bool,
    clock: SimulatedClock,
    wall: W,
    last_wall: Duration,
}

impl TimeController<SystemWallClock> {
    /// Controller on the process clock, starting at `epoch` at the stopped
    /// centre preset and playing.
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self::with_wall_clock(epoch, SystemWallClock::new())
    }
}

impl<W: WallClock> TimeController<W> {
    /// Controller on a custom wall clock.
    pub fn with_wall_clock(epoch: DateTime<Utc>, wall: W) -> Self {
        let ladder = SpeedLadder::standard();
        let last_wall = wall.elapsed();
        Self {
            index: ladder.centre(),
            ladder,
            playing: true,
            realtime_sync: false,
            clock: SimulatedClock::new(epoch),
            wall,
            last_wall,
        }
    }

    /// The speed ladder.
    pub fn ladder(&self) -> &SpeedLadder {
        &self.ladder
    }

    /// Current preset index.
    pub fn preset_index(&self) -> usize {
        self.index
    }

    /// Current rate in simulated seconds per real second.
    pub fn rate(&self) -> f64 {
        self.ladder.get(self.index).map_or(0.0, |p| p.rate)
    }

    /// Short label of the current preset.
    pub fn label(&self) -> &str {
        self.ladder.get(self.index).map_or("", |p| p.label.as_str())
    }

    /// Human description of the current rate.
    pub fn describe(&self) -> String {
        if self.realtime_sync {
            return "real time".to_string();
        }
        describe_rate(self.rate())
    }

    /// Whether time flows (ignoring sync).
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the clock is locked to wall-clock time.
    pub fn is_realtime_sync(&self) -> bool {
        self.realtime_sync
    }

    /// The simulated clock.
    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    /// Mutable access to the simulated clock, for jumps and drift resets.
    pub fn clock_mut(&mut self) -> &mut SimulatedClock {
        &mut self.clock
    }

    /// Current simulated instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.clock.instant()
    }

    /// The wall clock.
    pub fn wall_clock(&self) -> &W {
        &self.wall
    }

    /// Mutable access to the wall clock.
    pub fn wall_clock_mut(&mut self) -> &mut W {
        &mut self.wall
    }

    /// Select a preset. Does not leave real-time sync.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::PresetOutOfRange`] and leaves the state unchanged
    /// if `index` is past the end of the ladder.
    pub fn set_preset_index(&mut self, index: usize) -> Result<(), TimeError> {
        if index >= self.ladder.len() {
            return Err(TimeError::PresetOutOfRange {
                index,
                len: self.ladder.len(),
            });
        }
        self.index = index;
        log::debug!("Speed preset {index} ({})", self.label());
        Ok(())
    }

    /// Move one rung. Returns `false` at either end of the ladder.
    pub fn step(&mut self, direction: Direction) -> bool {
        let next = match direction {
            Direction::Back => self.index.checked_sub(1),
            Direction::Forward => Some(self.index + 1).filter(|&i| i < self.ladder.len()),
        };
        match next {
            Some(index) => {
                self.index = index;
                log::debug!("Speed preset {index} ({})", self.label());
                true
            }
            None => false,
        }
    }

    /// Flip play/pause. Ignored during real-time sync.
    pub fn toggle_play(&mut self) {
        if self.realtime_sync {
            log::debug!("Play toggle ignored during real-time sync");
            return;
        }
        self.playing = !self.playing;
        log::debug!("Playing: {}", self.playing);
    }

    /// Set play state directly.
    pub fn set_playing(&mut self, playing: bool) {
        if self.playing == playing {
            return;
        }
        self.playing = playing;
        log::debug!("Playing: {playing}");
    }

    /// Enter or leave real-time sync.
    ///
    /// Entering snaps the simulated instant to the current civil time, moves
    /// the ladder to its centre and pauses ladder playback. Leaving resumes
    /// playback at the centre preset.
    pub fn toggle_realtime_sync(&mut self, on: bool) {
        if on == self.realtime_sync {
            return;
        }
        self.realtime_sync = on;
        if on {
            self.index = self.ladder.centre();
            self.playing = false;
            self.last_wall = self.wall.elapsed();
            self.clock.set_instant(self.wall.now_utc());
        } else {
            self.playing = true;
        }
        log::debug!("Real-time sync: {on}");
    }

    /// Return to the centre preset, playing.
    pub fn reset(&mut self) {
        self.index = self.ladder.centre();
        self.playing = true;
        log::debug!("Time controller reset");
    }

    /// Simulated milliseconds for a frame of `real_dt` seconds.
    ///
    /// In sync mode this is the wall-clock time since the previous call,
    /// measured independently of `real_dt`. Paused gives 0. Otherwise
    /// `rate × real_dt × 1000`, with the magnitude capped by
    /// [`step_ceiling_ms`].
    pub fn compute_step(&mut self, real_dt: f64) -> f64 {
        if self.realtime_sync {
            let now = self.wall.elapsed();
            let elapsed = now.saturating_sub(self.last_wall);
            self.last_wall = now;
            return elapsed.as_micros() as f64 / 1_000.0;
        }
        if !self.playing {
            return 0.0;
        }
        if !real_dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta {real_dt}");
            return 0.0;
        }
        let rate = self.rate();
        let scaled = rate * real_dt * 1_000.0;
        scaled.signum() * scaled.abs().min(step_ceiling_ms(rate))
    }

    /// Compute the step for `real_dt` and apply it to the clock. Returns the
    /// simulated milliseconds applied.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        let step = self.compute_step(real_dt);
        if step != 0.0 {
            self.clock.advance_ms(step);
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wall_clock::ManualWallClock;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn controller() -> TimeController<ManualWallClock> {
        let wall_start = DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        TimeController::with_wall_clock(start(), ManualWallClock::new(wall_start))
    }

    #[test]
    fn test_initial_state() {
        let tc = controller();
        assert_eq!(tc.preset_index(), 28);
        assert_eq!(tc.rate(), 0.0);
        assert!(tc.is_playing());
        assert!(!tc.is_realtime_sync());
        assert_eq!(tc.instant(), start());
    }

    #[test]
    fn test_step_from_centre_gives_slowest_forward_rate() {
        let mut tc = controller();
        assert!(tc.step(Direction::Forward));
        assert_eq!(tc.rate(), 6.0);
        assert_eq!(tc.compute_step(1.0), 6_000.0);
    }

    #[test]
    fn test_step_stops_at_ends() {
        let mut tc = controller();
        tc.set_preset_index(0).unwrap();
        assert!(!tc.step(Direction::Back));
        assert_eq!(tc.preset_index(), 0);
        tc.set_preset_index(56).unwrap();
        assert!(!tc.step(Direction::Forward));
        assert_eq!(tc.preset_index(), 56);
        assert!(tc.step(Direction::Back));
        assert_eq!(tc.preset_index(), 55);
    }

    #[test]
    fn test_out_of_range_preset_is_rejected() {
        let mut tc = controller();
        tc.set_preset_index(40).unwrap();
        let err = tc.set_preset_index(57).unwrap_err();
        assert!(matches!(err, TimeError::PresetOutOfRange { index: 57, len: 57 }));
        assert_eq!(tc.preset_index(), 40);
    }

    #[test]
    fn test_paused_step_is_zero() {
        let mut tc = controller();
        tc.set_preset_index(50).unwrap();
        tc.toggle_play();
        assert!(!tc.is_playing());
        assert_eq!(tc.compute_step(0.016), 0.0);
        assert_eq!(tc.advance(0.016), 0.0);
        assert_eq!(tc.instant(), start());
    }

    #[test]
    fn test_step_ceiling_tiers() {
        assert_eq!(step_ceiling_ms(60.0), 60_000.0);
        assert_eq!(step_ceiling_ms(-120.0), 3_600_000.0);
        assert_eq!(step_ceiling_ms(86_400.0), 86_400_000.0);
        assert_eq!(step_ceiling_ms(31_536_000.0), 604_800_000.0);
    }

    #[test]
    fn test_slow_frame_is_clamped() {
        let mut tc = controller();
        // 1 hour/s over a 5 s hitch would be 5 h; the tier caps it at 1 h.
        tc.set_preset_index(43).unwrap();
        assert_eq!(tc.compute_step(5.0), 3_600_000.0);
        // 1 year/s reverse, one frame: capped at one week backwards.
        tc.set_preset_index(0).unwrap();
        assert_eq!(tc.compute_step(0.5), -604_800_000.0);
    }

    #[test]
    fn test_unclamped_step_is_linear() {
        let mut tc = controller();
        tc.set_preset_index(48).unwrap(); // 1 day/s
        let step = tc.compute_step(0.25);
        assert!((step - 21_600_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_entering_sync_snaps_and_pauses_ladder() {
        let mut tc = controller();
        tc.set_preset_index(50).unwrap();
        tc.toggle_realtime_sync(true);
        assert!(tc.is_realtime_sync());
        assert_eq!(tc.preset_index(), 28);
        assert!(!tc.is_playing());
        assert_eq!(tc.instant(), tc.wall_clock().now_utc());
    }

    #[test]
    fn test_sync_step_is_wall_clock_delta() {
        let mut tc = controller();
        tc.toggle_realtime_sync(true);
        tc.set_preset_index(56).unwrap();
        tc.wall_clock_mut().advance(Duration::from_millis(250));
        // The frame delta passed in is ignored.
        assert_eq!(tc.advance(10.0), 250.0);
        assert_eq!(tc.compute_step(10.0), 0.0);

        tc.wall_clock_mut().advance(Duration::from_millis(40));
        let before = tc.instant();
        assert_eq!(tc.advance(0.016), 40.0);
        assert_eq!(tc.instant(), before + chrono::TimeDelta::milliseconds(40));
        assert_eq!(tc.instant(), tc.wall_clock().now_utc());
    }

    #[test]
    fn test_toggle_play_ignored_in_sync() {
        let mut tc = controller();
        tc.toggle_realtime_sync(true);
        tc.toggle_play();
        assert!(!tc.is_playing());
    }

    #[test]
    fn test_leaving_sync_resumes_playback() {
        let mut tc = controller();
        tc.toggle_realtime_sync(true);
        tc.toggle_realtime_sync(false);
        assert!(!tc.is_realtime_sync());
        assert!(tc.is_playing());
        assert_eq!(tc.rate(), 0.0);
    }

    #[test]
    fn test_reset_and_set_playing() {
        let mut tc = controller();
        tc.set_preset_index(10).unwrap();
        tc.set_playing(false);
        assert!(!tc.is_playing());
        tc.reset();
        assert_eq!(tc.preset_index(), 28);
        assert!(tc.is_playing());
    }

    #[test]
    fn test_describe() {
        let mut tc = controller();
        assert_eq!(tc.describe(), "stopped");
        tc.set_preset_index(45).unwrap();
        assert_eq!(tc.label(), "3hr/s");
        assert_eq!(tc.describe(), "3 hours/s");
        tc.toggle_realtime_sync(true);
        assert_eq!(tc.describe(), "real time");
    }
}
