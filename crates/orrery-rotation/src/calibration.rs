//! One-shot subsolar calibration.
//!
//! Measure where the model currently puts the subsolar point, compute where it
//! really is, and rotate the body about its spin axis by the difference.

use chrono::{DateTime, Utc};
use glam::{DMat4, DVec3};
use orrery_ephemeris::SpinSpec;

use crate::error::CalibrationError;
use crate::spin::{RotationState, spin_phase};
use crate::subsolar::{measure_model_subsolar_longitude, normalize_longitude, true_subsolar_longitude};

/// Residual above which a calibration is reported as suspect, in degrees.
pub const DEFAULT_TOLERANCE_DEG: f64 = 5.0;

/// Spin rotation in radians that moves the subsolar point from `model_lon` to
/// `true_lon` (both in degrees).
///
/// Spinning a body by `θ` about its axis lowers the measured longitude by
/// `θ`, hence `(360° − normalize(true − model)) mod 360°`.
pub fn calibration_angle(model_lon: f64, true_lon: f64) -> f64 {
    let delta = normalize_longitude(true_lon - model_lon);
    (360.0 - delta).rem_euclid(360.0).to_radians()
}

/// Diagnostics of a calibration. Longitudes in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationReport {
    /// Instant calibrated for.
    pub instant: DateTime<Utc>,
    /// Subsolar longitude of the uncalibrated model.
    pub model_longitude: f64,
    /// Real subsolar longitude at the instant.
    pub true_longitude: f64,
    /// `true − model`, wrapped.
    pub delta: f64,
    /// Subsolar longitude re-measured with the calibration applied.
    pub calibrated_longitude: f64,
    /// `calibrated − true`, wrapped.
    pub error: f64,
}

impl CalibrationReport {
    /// Whether the residual is within `tolerance_deg`.
    pub fn within(&self, tolerance_deg: f64) -> bool {
        self.error.abs() <= tolerance_deg
    }
}

/// Result of [`calibrate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// Rotation state to install on the body.
    pub state: RotationState,
    /// What was measured.
    pub report: CalibrationReport,
}

/// Calibrate a body's rotation against the real subsolar point at `instant`.
///
/// `body_world` must be the body's current world transform with its axial tilt
/// applied and no spin. The calibration is verified by re-measuring with the
/// offset applied; a residual above `tolerance_deg` is logged but not
/// corrected, since it points at a frame convention mismatch.
///
/// # Errors
///
/// Fails if the light direction cannot be measured (light at the body centre
/// or a non-finite transform).
pub fn calibrate(
    spin: &SpinSpec,
    epoch: &DateTime<Utc>,
    instant: &DateTime<Utc>,
    light_position: DVec3,
    body_world: &DMat4,
    tolerance_deg: f64,
) -> Result<Calibration, CalibrationError> {
    if !body_world.is_finite() {
        return Err(CalibrationError::NonFiniteTransform);
    }
    let model_longitude = measure_model_subsolar_longitude(light_position, body_world)
        .ok_or(CalibrationError::DegenerateGeometry)?;
    let true_longitude = true_subsolar_longitude(instant);
    let offset = calibration_angle(model_longitude, true_longitude);

    let calibrated = *body_world * DMat4::from_rotation_y(offset);
    let calibrated_longitude = measure_model_subsolar_longitude(light_position, &calibrated)
        .ok_or(CalibrationError::DegenerateGeometry)?;

    let report = CalibrationReport {
        instant: *instant,
        model_longitude,
        true_longitude,
        delta: normalize_longitude(true_longitude - model_longitude),
        calibrated_longitude,
        error: normalize_longitude(calibrated_longitude - true_longitude),
    };

    if report.within(tolerance_deg) {
        log::info!(
            "Subsolar calibration at {instant}: model {:.3}°, true {:.3}°, offset {:.3}°",
            report.model_longitude,
            report.true_longitude,
            offset.to_degrees()
        );
    } else {
        log::warn!(
            "Subsolar calibration residual {:.3}° exceeds {tolerance_deg}°: \
             model {:.3}°, true {:.3}°, calibrated {:.3}°",
            report.error,
            report.model_longitude,
            report.true_longitude,
            report.calibrated_longitude
        );
    }

    Ok(Calibration {
        state: RotationState::new(offset, spin_phase(spin, epoch, instant), *instant),
        report,
    })
}
