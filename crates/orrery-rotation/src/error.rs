use thiserror::Error;

/// Calibration could not measure the body's current subsolar longitude.
#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    #[error("light source coincides with the body; no illumination direction")]
    DegenerateGeometry,
    #[error("body transform is not finite")]
    NonFiniteTransform,
}
