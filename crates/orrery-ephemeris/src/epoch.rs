//! Julian date conversions for simulated instants.

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};

/// Julian date of the J2000.0 epoch (2000-01-01 12:00 TT, treated as UTC).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian date of the Unix epoch.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Days in a Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Milliseconds in a day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Unix timestamp of J2000.0 in seconds.
const J2000_UNIX_SECONDS: i64 = 946_728_000;

/// The J2000.0 epoch as a UTC instant.
pub fn j2000() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(J2000_UNIX_SECONDS)
}

/// Julian date of `instant`, with sub-millisecond precision.
pub fn julian_date(instant: &DateTime<Utc>) -> f64 {
    instant.timestamp_micros() as f64 / (MS_PER_DAY * 1000.0) + UNIX_EPOCH_JD
}

/// Julian centuries elapsed since J2000.0 for a Julian date.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Julian centuries elapsed since J2000.0 at `instant`.
pub fn centuries_at(instant: &DateTime<Utc>) -> f64 {
    centuries_since_j2000(julian_date(instant))
}

/// Julian date from the civil calendar fields of a UTC instant.
///
/// Uses the integer Julian day number formula (truncating division), then adds
/// the fraction of the day. Agrees with [`julian_date`] to within rounding of
/// the sub-second part.
pub fn utc_to_julian_date(instant: &DateTime<Utc>) -> f64 {
    let y = i64::from(instant.year());
    let m = i64::from(instant.month());
    let d = i64::from(instant.day());
    let a = (m - 14) / 12;

    let jdn = (1461 * (y + 4800 + a)) / 4 + (367 * (m - 2 - 12 * a)) / 12
        - (3 * ((y + 4900 + a) / 100)) / 4
        + d
        - 32075;

    let h = f64::from(instant.hour());
    let min = f64::from(instant.minute());
    let s = f64::from(instant.second()) + f64::from(instant.nanosecond()) / 1e9;

    jdn as f64 + (h - 12.0) / 24.0 + min / 1440.0 + s / 86_400.0
}
