//! Subsolar longitude: where the light source is overhead, in the model and
//! in reality.
//!
//! Longitudes are in degrees, east positive, in `(−180, 180]`. In a body's
//! local frame the prime meridian lies along +X and 90° east along −Z.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Timelike, Utc};
use glam::{DMat4, DVec3};

/// Length of Earth's sidereal day in seconds.
pub const SIDEREAL_DAY_SECONDS: f64 = 86_164.090_5;

/// Earth's sidereal rotation rate in radians per second.
pub const SIDEREAL_RATE: f64 = TAU / SIDEREAL_DAY_SECONDS;

/// Wrap a longitude into `(−180, 180]`.
pub fn normalize_longitude(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// One-based day of the UTC year.
pub fn day_of_year(instant: &DateTime<Utc>) -> u32 {
    instant.ordinal()
}

/// Fractional UTC hours since midnight.
fn utc_hours(instant: &DateTime<Utc>) -> f64 {
    let seconds = instant.num_seconds_from_midnight() as f64
        + f64::from(instant.nanosecond() % 1_000_000_000) / 1e9;
    seconds / 3_600.0
}

/// Equation of time in minutes; positive when the true sun runs ahead of the
/// mean sun.
///
/// `9.87·sin 2B − 7.53·cos B − 1.5·sin B` with `B = 360/365 · (day − 81)`
/// degrees.
pub fn equation_of_time(instant: &DateTime<Utc>) -> f64 {
    let b = (360.0 / 365.0 * (f64::from(day_of_year(instant)) - 81.0)).to_radians();
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// Real subsolar longitude at `instant`.
///
/// The mean sun is overhead at 0° at 12:00 UTC and moves west 15° per hour;
/// the equation of time shifts it by one degree per four minutes.
pub fn true_subsolar_longitude(instant: &DateTime<Utc>) -> f64 {
    let mean = (12.0 - utc_hours(instant)) * 15.0;
    normalize_longitude(mean + equation_of_time(instant) / 4.0)
}

/// Subsolar longitude of a body as currently posed in the model.
///
/// `body_world` is the body's world transform. Only its rotation is used to
/// bring the light direction into the body frame; translation gives the body
/// centre and scale is discarded. Returns `None` when the light sits at the
/// body centre or the transform is not finite.
pub fn measure_model_subsolar_longitude(light_position: DVec3, body_world: &DMat4) -> Option<f64> {
    if !body_world.is_finite() || !light_position.is_finite() {
        return None;
    }
    let (_, rotation, centre) = body_world.to_scale_rotation_translation();
    let direction = (light_position - centre).try_normalize()?;
    let local = rotation.inverse() * direction;
    let longitude = -local.z.atan2(local.x).to_degrees();
    longitude.is_finite().then(|| normalize_longitude(longitude))
}

/// Approximate Earth rotation angle in radians from UTC time of day with a
/// seasonal correction. Kept as a diagnostic alongside the calibrated model.
pub fn earth_rotation_angle(instant: &DateTime<Utc>) -> f64 {
    let d = f64::from(day_of_year(instant)) - 81.0;
    let seasonal = 2.466 * (360.0 * d / 365.0).to_radians().sin()
        - 1.26 * (720.0 * d / 365.0).to_radians().sin();
    let hours = utc_hours(instant) + seasonal / 60.0;
    (hours * 15.0).to_radians()
}
