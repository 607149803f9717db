//! Body self-rotation and subsolar calibration.
//!
//! Free bodies spin at a constant rate from the simulation epoch. A calibrated
//! body (Earth) additionally carries a one-time offset that lines its modelled
//! subsolar point up with the real one; see [`calibrate`].

mod calibration;
mod error;
pub mod spin;
pub mod subsolar;

pub use calibration::{Calibration, CalibrationReport, DEFAULT_TOLERANCE_DEG, calibrate, calibration_angle};
pub use error::CalibrationError;
pub use spin::{BodySpin, RotationState, axial_tilt, body_transform, orientation, spin_phase};
pub use subsolar::{
    SIDEREAL_DAY_SECONDS, SIDEREAL_RATE, day_of_year, earth_rotation_angle, equation_of_time,
    measure_model_subsolar_longitude, normalize_longitude, true_subsolar_longitude,
};
