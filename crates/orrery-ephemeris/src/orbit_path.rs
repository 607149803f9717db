//! Orbit path sampling and in-place refresh.
//!
//! A path traces the geometric ellipse at uniformly spaced true-anomaly
//! angles. It is a shape, not a trajectory: consecutive points are not equally
//! spaced in time. Positions along the orbit come from the resolver, which
//! solves Kepler's equation.

use std::f64::consts::TAU;

use chrono::{DateTime, TimeDelta, Utc};
use glam::DVec3;

use crate::elements::OrbitalElements;
use crate::epoch::centuries_at;
use crate::error::EphemerisError;
use crate::resolver::Ephemeris;

/// Number of points sampled per orbit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathSampling {
    /// Points for bodies orbiting the primary.
    pub primary: usize,
    /// Points for satellites.
    pub satellite: usize,
}

impl Default for PathSampling {
    fn default() -> Self {
        Self {
            primary: 40_000,
            satellite: 5_000,
        }
    }
}

impl PathSampling {
    /// Sample count for a body, by whether it is a satellite.
    pub fn for_body(&self, is_satellite: bool) -> usize {
        if is_satellite { self.satellite } else { self.primary }
    }
}

/// Closed polyline describing one body's orbit, relative to its central body,
/// together with the parameters needed to refresh it without resampling.
#[derive(Clone, Debug)]
pub struct OrbitPath {
    body: String,
    points: Vec<DVec3>,
    angles: Vec<f64>,
    snapshot: Option<OrbitalElements>,
    distance_scale: f64,
    generated_at: Option<DateTime<Utc>>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl OrbitPath {
    /// Wrap externally produced geometry. Such a path carries no angle list
    /// or element snapshot, so [`Ephemeris::refresh_path`] refuses it and the
    /// caller must regenerate.
    pub fn from_points(body: impl Into<String>, points: Vec<DVec3>) -> Self {
        Self {
            body: body.into(),
            points,
            angles: Vec::new(),
            snapshot: None,
            distance_scale: 1.0,
            generated_at: None,
            refreshed_at: None,
        }
    }

    /// Owning body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Sampled points, in angle order. The path closes from last to first.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// True anomaly of each point, in radians.
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Instant the path was sampled at, if generated by the ephemeris.
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    /// Instant the point coordinates were last computed for.
    pub fn last_computed(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at.or(self.generated_at)
    }

    /// Whether the path retains what an in-place refresh needs.
    pub fn is_refreshable(&self) -> bool {
        self.snapshot.is_some() && !self.angles.is_empty() && self.angles.len() == self.points.len()
    }
}

/// Minimum simulated-time drift between two path refreshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
    interval: TimeDelta,
}

impl RefreshPolicy {
    /// Refresh once simulated time has moved by at least `interval` either way.
    pub fn new(interval: TimeDelta) -> Self {
        Self {
            interval: interval.abs(),
        }
    }

    /// Policy with the interval given in days.
    pub fn every_days(days: f64) -> Self {
        let micros = (days.abs() * 86_400_000_000.0).round() as i64;
        Self::new(TimeDelta::microseconds(micros))
    }

    /// Configured interval.
    pub fn interval(&self) -> TimeDelta {
        self.interval
    }

    /// Whether `now` is far enough from `last` (forwards or backwards).
    pub fn is_due(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - last).abs() >= self.interval
    }

    /// Whether `path` should be refreshed at `now`. Paths without a
    /// computation time are always due.
    pub fn path_is_due(&self, path: &OrbitPath, now: DateTime<Utc>) -> bool {
        path.last_computed()
            .is_none_or(|last| self.is_due(last, now))
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(TimeDelta::weeks(1))
    }
}

impl Ephemeris {
    /// Sample the orbit of `body` at `instant`.
    ///
    /// Points are placed at `N` uniformly spaced true anomalies using
    /// `r(v) = a(1 - e²) / (1 + e·cos v)` and the same orbital-plane rotation
    /// as the resolver, with elements evaluated once at `instant`.
    ///
    /// # Errors
    ///
    /// Returns [`EphemerisError::UnknownBody`] if the body is not cataloged.
    pub fn generate_path(
        &self,
        body: &str,
        instant: &DateTime<Utc>,
    ) -> Result<OrbitPath, EphemerisError> {
        let def = self
            .store()
            .get(body)
            .ok_or_else(|| EphemerisError::UnknownBody(body.to_string()))?;

        let count = self.sampling().for_body(def.is_satellite());
        let angles: Vec<f64> = (0..count)
            .map(|i| TAU * i as f64 / count as f64)
            .collect();

        let mut path = OrbitPath {
            body: def.name.clone(),
            points: vec![DVec3::ZERO; count],
            angles,
            snapshot: Some(def.elements),
            distance_scale: self.distance_scale(),
            generated_at: Some(*instant),
            refreshed_at: None,
        };
        if !write_points(&mut path, instant) {
            log::warn!("Orbit path of '{body}' has non-finite points at {instant}");
        }
        log::debug!("Generated {count}-point orbit path for '{body}' at {instant}");
        Ok(path)
    }

    /// Recompute the path's points for `instant` in place, reusing its stored
    /// angle list and element snapshot.
    ///
    /// Returns `false` when the path lacks those (the caller should regenerate
    /// with [`generate_path`](Self::generate_path)) or when the recomputed
    /// geometry is not finite.
    pub fn refresh_path(&self, path: &mut OrbitPath, instant: &DateTime<Utc>) -> bool {
        if !path.is_refreshable() {
            log::warn!(
                "Orbit path of '{}' lacks its angle list or element snapshot; cannot refresh",
                path.body
            );
            return false;
        }
        if !write_points(path, instant) {
            log::warn!("Orbit path refresh of '{}' produced non-finite points", path.body);
            return false;
        }
        path.refreshed_at = Some(*instant);
        log::debug!("Refreshed orbit path of '{}' at {instant}", path.body);
        true
    }
}

/// Overwrite every point from the snapshot evaluated at `instant`. Returns
/// whether all points are finite.
fn write_points(path: &mut OrbitPath, instant: &DateTime<Utc>) -> bool {
    let Some(snapshot) = path.snapshot else {
        return false;
    };
    let el = snapshot.at(centuries_at(instant));
    let scale = path.distance_scale;

    let mut finite = true;
    for (point, &angle) in path.points.iter_mut().zip(&path.angles) {
        *point = el.point_at_true_anomaly(angle, scale);
        finite &= point.is_finite();
    }
    finite
}
