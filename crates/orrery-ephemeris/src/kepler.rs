//! Newton-Raphson solver for Kepler's equation `E - e·sin(E) = M`.

use std::f64::consts::{PI, TAU};

/// Iteration cap. Bounds the per-tick cost of a single solve.
pub const MAX_ITERATIONS: u32 = 100;

/// Convergence threshold on successive estimates of `E`.
pub const TOLERANCE: f64 = 1e-12;

/// Below this magnitude the derivative `1 - e·cos(E)` is treated as zero.
const DERIVATIVE_EPSILON: f64 = 1e-10;

/// Nudge applied to `E` when the derivative vanishes.
const DERIVATIVE_NUDGE: f64 = 0.1;

/// Eccentricity above which the series initial guess is abandoned.
const SERIES_GUESS_LIMIT: f64 = 0.8;

/// Outcome of a Kepler solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly in radians. `NaN` if the inputs were not finite.
    pub eccentric_anomaly: f64,
    /// Newton iterations performed.
    pub iterations: u32,
    /// Whether the step size fell below [`TOLERANCE`] before the cap.
    pub converged: bool,
}

/// Solve Kepler's equation for the eccentric anomaly.
///
/// `mean_anomaly` may be any real value; it is reduced into `[0, 2π)` before
/// iterating, so the returned `E` satisfies `E - e·sin(E) = M mod 2π`.
/// `eccentricity` is expected in `[0, 0.99]`; callers clamp before invoking.
///
/// Non-convergence is logged and the best estimate is returned. Non-finite
/// inputs yield a `NaN` anomaly for the caller's finiteness check.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    if !mean_anomaly.is_finite() || !eccentricity.is_finite() {
        log::warn!("Kepler solve with non-finite input: M={mean_anomaly}, e={eccentricity}");
        return KeplerSolution {
            eccentric_anomaly: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let m = mean_anomaly.rem_euclid(TAU);
    let e = eccentricity;

    let mut ea = if e < SERIES_GUESS_LIMIT {
        m + e * m.sin() + e * e * (2.0 * m).sin() / 2.0
    } else if m > PI {
        PI
    } else {
        0.0
    };

    // f(E) = E - e·sin(E) - M is increasing, with f(0) ≤ 0 and f(2π) > 0, so the
    // root stays inside [lo, hi]. Newton steps that leave it are replaced by
    // bisection.
    let mut lo = 0.0;
    let mut hi = TAU;

    let mut iterations = 0;
    let mut converged = false;
    while iterations < MAX_ITERATIONS {
        let previous = ea;
        let f = previous - e * previous.sin() - m;
        if f == 0.0 {
            converged = true;
            break;
        }
        if f < 0.0 {
            lo = previous;
        } else {
            hi = previous;
        }
        let f_prime = 1.0 - e * previous.cos();

        let candidate = if f_prime.abs() < DERIVATIVE_EPSILON {
            log::debug!("Kepler derivative vanished at E={previous}, e={e}; nudging");
            previous + DERIVATIVE_NUDGE
        } else {
            previous - f / f_prime
        };
        ea = if candidate > lo && candidate < hi {
            candidate
        } else {
            0.5 * (lo + hi)
        };
        iterations += 1;

        if (ea - previous).abs() <= TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "Kepler solver hit {MAX_ITERATIONS} iterations without converging (M={m}, e={e}); \
             returning best estimate"
        );
    }

    KeplerSolution {
        eccentric_anomaly: ea,
        iterations,
        converged,
    }
}
