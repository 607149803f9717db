//! Variable-timestep frame driver.
//!
//! The orrery scales each frame's real duration by the simulation rate, so
//! there is no accumulator: every frame produces exactly one update with the
//! frame's own (clamped) delta.

use std::time::Instant;
use tracing::warn;

/// Longest real frame time passed to an update, in seconds. A stall (debugger,
/// window drag) becomes one long-but-bounded step instead of a jump.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Measures real frame time and hands it to an update function.
pub struct FrameLoop {
    previous_time: Instant,
    total_real_time: f64,
    frame_count: u64,
}

impl FrameLoop {
    /// Start measuring from now.
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            total_real_time: 0.0,
            frame_count: 0,
        }
    }

    /// Measure the time since the previous call and run `update_fn` with it.
    pub fn tick<R>(&mut self, update_fn: impl FnOnce(f64) -> R) -> R {
        let current_time = Instant::now();
        let frame_time = current_time
            .duration_since(self.previous_time)
            .as_secs_f64();
        self.previous_time = current_time;
        self.advance(frame_time, update_fn)
    }

    /// Run `update_fn` with an explicit frame time, for headless runs and
    /// replays.
    pub fn advance<R>(&mut self, frame_time: f64, update_fn: impl FnOnce(f64) -> R) -> R {
        let dt = clamp_frame_time(frame_time);
        self.total_real_time += dt;
        self.frame_count += 1;
        update_fn(dt)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sum of the clamped frame times, in seconds.
    pub fn total_real_time(&self) -> f64 {
        self.total_real_time
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_frame_time(frame_time: f64) -> f64 {
    if !frame_time.is_finite() || frame_time < 0.0 {
        warn!("Invalid frame time {frame_time}, using 0");
        return 0.0;
    }
    if frame_time > MAX_FRAME_TIME {
        warn!(
            "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
            frame_time * 1000.0,
            MAX_FRAME_TIME * 1000.0
        );
        return MAX_FRAME_TIME;
    }
    frame_time
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_passes_frame_time() {
        let mut frames = FrameLoop::new();
        let dt = frames.advance(1.0 / 60.0, |dt| dt);
        assert!((dt - 1.0 / 60.0).abs() < 1e-15);
        assert_eq!(frames.frame_count(), 1);
    }

    #[test]
    fn test_max_frame_time_clamp() {
        let mut frames = FrameLoop::new();
        let dt = frames.advance(3.0, |dt| dt);
        assert_eq!(dt, MAX_FRAME_TIME);
        assert_eq!(frames.total_real_time(), MAX_FRAME_TIME);
    }

    #[test]
    fn test_invalid_frame_time_is_zero() {
        let mut frames = FrameLoop::new();
        assert_eq!(frames.advance(-0.1, |dt| dt), 0.0);
        assert_eq!(frames.advance(f64::NAN, |dt| dt), 0.0);
        assert_eq!(frames.frame_count(), 2);
    }

    #[test]
    fn test_total_real_time_accumulates() {
        let mut frames = FrameLoop::new();
        let frame_times = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018];
        for &ft in &frame_times {
            frames.advance(ft, |_| ());
        }
        let expected: f64 = frame_times.iter().sum();
        assert!((frames.total_real_time() - expected).abs() < 1e-12);
        assert_eq!(frames.frame_count(), frame_times.len() as u64);
    }

    #[test]
    fn test_tick_measures_elapsed_time() {
        let mut frames = FrameLoop::default();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let dt = frames.tick(|dt| dt);
        assert!(dt > 0.0 && dt <= MAX_FRAME_TIME);
    }
}
