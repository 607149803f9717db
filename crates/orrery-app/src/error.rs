use orrery_config::ConfigError;
use orrery_ephemeris::EphemerisError;
use orrery_rotation::CalibrationError;
use orrery_time::TimeError;
use thiserror::Error;

/// Errors surfaced by the driver. None of them occur inside `tick`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] EphemerisError),
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error("calibration of '{body}' failed: {source}")]
    Calibration {
        body: String,
        #[source]
        source: CalibrationError,
    },
    #[error("body '{0}' is not in the catalog")]
    UnknownBody(String),
    #[error("body '{0}' is not present in the scene")]
    NotInScene(String),
    #[error("body '{0}' is not flagged for calibration")]
    NotCalibratable(String),
    #[error("body '{0}' is already calibrated")]
    AlreadyCalibrated(String),
}
