//! Spin angles and body orientation.

use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use glam::{DMat4, DQuat, DVec3};
use orrery_ephemeris::SpinSpec;

/// Rotation phase of a body at `instant`, in radians, counted from `epoch`.
///
/// `direction × 2π × (t − epoch) / |period|`. Unbounded; callers that need a
/// wrapped angle reduce it themselves.
pub fn spin_phase(spin: &SpinSpec, epoch: &DateTime<Utc>, instant: &DateTime<Utc>) -> f64 {
    let period = spin.period_seconds();
    if period == 0.0 || !period.is_finite() {
        return 0.0;
    }
    let elapsed = (*instant - *epoch).num_milliseconds() as f64 / 1_000.0;
    spin.direction() * TAU * elapsed / period
}

/// Fixed tilt of the spin axis: tip the +Y axis toward +X (ecliptic longitude
/// 90°) by the axial tilt, then turn the tipped axis by the reference azimuth
/// about Y.
///
/// With azimuth 0 the north pole leans toward the June solstice sun.
pub fn axial_tilt(spin: &SpinSpec) -> DQuat {
    DQuat::from_rotation_y(spin.reference_azimuth_deg.to_radians())
        * DQuat::from_rotation_z(-spin.axial_tilt_deg.to_radians())
}

/// Body orientation for a spin angle.
///
/// The spin about the body's own Y axis is applied first and the axial tilt
/// second. Swapping the order would spin the body about the world Y axis.
pub fn orientation(spin: &SpinSpec, angle: f64) -> DQuat {
    axial_tilt(spin) * DQuat::from_rotation_y(angle)
}

/// World transform of a body: uniform scale, then orientation, then translation.
pub fn body_transform(position: DVec3, orientation: DQuat, scale: f64) -> DMat4 {
    DMat4::from_scale_rotation_translation(DVec3::splat(scale), orientation, position)
}

/// Calibrated rotation of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationState {
    offset: f64,
    anchor_phase: f64,
    calibrated_at: DateTime<Utc>,
}

impl RotationState {
    pub(crate) fn new(offset: f64, anchor_phase: f64, calibrated_at: DateTime<Utc>) -> Self {
        Self {
            offset,
            anchor_phase,
            calibrated_at,
        }
    }

    /// Calibration offset in radians, in `[0, 2π)`.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Spin phase captured at the calibration instant.
    pub fn anchor_phase(&self) -> f64 {
        self.anchor_phase
    }

    /// Instant the calibration was computed for.
    pub fn calibrated_at(&self) -> DateTime<Utc> {
        self.calibrated_at
    }

    /// Rotation angle for the current phase: `(phase − anchor) + offset`.
    pub fn angle(&self, phase: f64) -> f64 {
        (phase - self.anchor_phase) + self.offset
    }
}

/// Spin model of one body: its configuration and, once calibrated, its
/// rotation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySpin {
    spec: SpinSpec,
    calibration: Option<RotationState>,
}

impl BodySpin {
    /// Uncalibrated spin.
    pub fn new(spec: SpinSpec) -> Self {
        Self {
            spec,
            calibration: None,
        }
    }

    /// Spin configuration.
    pub fn spec(&self) -> &SpinSpec {
        &self.spec
    }

    /// Install a calibration. Replaces any previous one.
    pub fn set_calibration(&mut self, state: RotationState) {
        self.calibration = Some(state);
    }

    /// Calibration state, if calibrated.
    pub fn calibration(&self) -> Option<&RotationState> {
        self.calibration.as_ref()
    }

    /// Whether a calibration has been installed.
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Rotation angle at `instant`. Uncalibrated bodies add their fixed
    /// offset to the phase; calibrated ones rotate from their anchor.
    pub fn angle(&self, epoch: &DateTime<Utc>, instant: &DateTime<Utc>) -> f64 {
        let phase = spin_phase(&self.spec, epoch, instant);
        match &self.calibration {
            Some(state) => state.angle(phase),
            None => phase + self.spec.offset_rad,
        }
    }

    /// Orientation at `instant`.
    pub fn orientation(&self, epoch: &DateTime<Utc>, instant: &DateTime<Utc>) -> DQuat {
        orientation(&self.spec, self.angle(epoch, instant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn spec(period_hours: f64) -> SpinSpec {
        SpinSpec {
            period_hours,
            ..SpinSpec::default()
        }
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-20T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_one_period_is_one_turn() {
        let t0 = epoch();
        let t1 = t0 + TimeDelta::hours(24);
        assert!((spin_phase(&spec(24.0), &t0, &t1) - TAU).abs() < 1e-12);
        assert!((spin_phase(&spec(-24.0), &t0, &t1) + TAU).abs() < 1e-12);
    }

    #[test]
    fn test_phase_runs_backwards_before_epoch() {
        let t0 = epoch();
        let t1 = t0 - TimeDelta::hours(6);
        assert!((spin_phase(&spec(24.0), &t0, &t1) + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_period_does_not_spin() {
        let t0 = epoch();
        assert_eq!(spin_phase(&spec(0.0), &t0, &(t0 + TimeDelta::hours(5))), 0.0);
    }

    #[test]
    fn test_fixed_offset_applies_to_free_bodies() {
        let moon = BodySpin::new(SpinSpec {
            period_hours: 655.72,
            offset_rad: PI,
            ..SpinSpec::default()
        });
        assert!((moon.angle(&epoch(), &epoch()) - PI).abs() < 1e-12);
        assert!(!moon.is_calibrated());
    }

    #[test]
    fn test_calibrated_angle_tracks_from_anchor() {
        let t0 = epoch();
        let mut body = BodySpin::new(spec(24.0));
        let anchor = spin_phase(body.spec(), &t0, &(t0 + TimeDelta::hours(3)));
        body.set_calibration(RotationState::new(1.0, anchor, t0 + TimeDelta::hours(3)));

        assert!((body.angle(&t0, &(t0 + TimeDelta::hours(3))) - 1.0).abs() < 1e-12);
        let later = body.angle(&t0, &(t0 + TimeDelta::hours(9)));
        assert!((later - (1.0 + FRAC_PI_2)).abs() < 1e-12, "angle {later}");
    }

    #[test]
    fn test_spin_is_applied_before_tilt() {
        let tilted = SpinSpec {
            axial_tilt_deg: 23.44,
            ..SpinSpec::default()
        };
        let q = orientation(&tilted, 1.3);
        // The spin axis is the tilted body Y axis, unchanged by spinning.
        let axis = q * DVec3::Y;
        let expected = axial_tilt(&tilted) * DVec3::Y;
        assert!((axis - expected).length() < 1e-12);
        assert!((axis.y - 23.44_f64.to_radians().cos()).abs() < 1e-12);

        // The opposite order would leave the axis tilted but move it with spin.
        let swapped = DQuat::from_rotation_y(1.3) * axial_tilt(&tilted);
        assert!(((swapped * DVec3::Y) - expected).length() > 1e-3);
    }

    #[test]
    fn test_zero_azimuth_leans_toward_positive_x() {
        let tilted = SpinSpec {
            axial_tilt_deg: 23.44,
            ..SpinSpec::default()
        };
        let pole = axial_tilt(&tilted) * DVec3::Y;
        assert!((pole.x - 23.44_f64.to_radians().sin()).abs() < 1e-12, "{pole}");
        assert!(pole.z.abs() < 1e-12, "{pole}");

        let turned = SpinSpec {
            reference_azimuth_deg: 90.0,
            ..tilted
        };
        // A quarter turn about Y carries +X to -Z.
        let pole = axial_tilt(&turned) * DVec3::Y;
        assert!((pole.z + 23.44_f64.to_radians().sin()).abs() < 1e-12, "{pole}");
    }

    #[test]
    fn test_body_transform_places_and_orients() {
        let q = DQuat::from_rotation_y(FRAC_PI_2);
        let m = body_transform(DVec3::new(5.0, 0.0, 0.0), q, 2.0);
        let p = m.transform_point3(DVec3::X);
        assert!((p - DVec3::new(5.0, 0.0, -2.0)).length() < 1e-12, "{p}");
    }
}
