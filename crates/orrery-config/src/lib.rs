//! Configuration for the orrery.
//!
//! Settings persist to disk as `config.ron`. Every section is optional in the
//! file and falls back to defaults, so old files keep loading as fields are
//! added. CLI flags override what was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, CalibrationConfig, Config, DebugConfig, EphemerisConfig, SimulationConfig,
};
pub use error::ConfigError;
