//! Configuration sections, defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub ephemeris: EphemerisConfig,
    pub calibration: CalibrationConfig,
    pub debug: DebugConfig,
}

/// Simulated clock settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// RFC 3339 start instant. `None` starts at the current time.
    pub start_time: Option<String>,
    /// Speed ladder index to start at. `None` is the stopped centre.
    pub initial_preset: Option<usize>,
    /// Whether the clock starts playing.
    pub start_playing: bool,
    /// Start locked to wall-clock time.
    pub realtime_sync: bool,
    /// Simulated years after which the clock returns to its start instant.
    pub reset_after_years: f64,
    /// Simulated days between orbit path refreshes.
    pub orbit_refresh_days: f64,
}

/// Ephemeris and orbit path settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EphemerisConfig {
    /// World units per astronomical unit.
    pub distance_scale: f64,
    /// Points per orbit path for bodies orbiting the primary.
    pub planet_path_samples: usize,
    /// Points per orbit path for satellites.
    pub satellite_path_samples: usize,
    /// RON catalog replacing the built-in bodies.
    pub catalog_path: Option<PathBuf>,
}

/// Subsolar calibration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Body to calibrate.
    pub body: String,
    /// Residual in degrees above which calibration is reported as suspect.
    pub tolerance_deg: f64,
    /// Run calibration at startup.
    pub enabled: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log every body's position each frame.
    pub log_positions: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_time: None,
            initial_preset: None,
            start_playing: true,
            realtime_sync: false,
            reset_after_years: 200.0,
            orbit_refresh_days: 7.0,
        }
    }
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            distance_scale: 1.0,
            planet_path_samples: 40_000,
            satellite_path_samples: 5_000,
            catalog_path: None,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            body: "earth".to_string(),
            tolerance_deg: 5.0,
            enabled: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_positions: false,
        }
    }
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there if the
    /// file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Write `config.ron` into `config_dir`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-read `config.ron`. Returns the new config only if it differs.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Check that numeric settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::InvalidValue {
            field,
            reason: reason.to_string(),
        };
        let eph = &self.ephemeris;
        if !(eph.distance_scale.is_finite() && eph.distance_scale > 0.0) {
            return Err(invalid("ephemeris.distance_scale", "must be positive"));
        }
        if eph.planet_path_samples == 0 || eph.satellite_path_samples == 0 {
            return Err(invalid("ephemeris.*_path_samples", "must be at least 1"));
        }
        let sim = &self.simulation;
        if !(sim.reset_after_years.is_finite() && sim.reset_after_years > 0.0) {
            return Err(invalid("simulation.reset_after_years", "must be positive"));
        }
        if !(sim.orbit_refresh_days.is_finite() && sim.orbit_refresh_days >= 0.0) {
            return Err(invalid("simulation.orbit_refresh_days", "must not be negative"));
        }
        if !(self.calibration.tolerance_deg.is_finite() && self.calibration.tolerance_deg > 0.0) {
            return Err(invalid("calibration.tolerance_deg", "must be positive"));
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(2))
                .unwrap();
        assert!(ron_str.contains("planet_path_samples: 40000"));
        assert!(ron_str.contains("body: \"earth\""));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(simulation: (realtime_sync: true))").unwrap();
        assert!(config.simulation.realtime_sync);
        assert_eq!(config.simulation.reset_after_years, 200.0);
        assert_eq!(config.ephemeris, EphemerisConfig::default());
        assert_eq!(config.calibration.tolerance_deg, 5.0);
    }

    #[test]
    fn test_unknown_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(render: (msaa: 4))");
        assert!(result.is_ok());
    }

    #[test]
    fn test_optional_fields_parse() {
        let config: Config = ron::from_str(
            r#"(
                simulation: (start_time: Some("2000-01-01T12:00:00Z"), initial_preset: Some(43)),
                ephemeris: (catalog_path: Some("bodies.ron")),
            )"#,
        )
        .unwrap();
        assert_eq!(config.simulation.start_time.as_deref(), Some("2000-01-01T12:00:00Z"));
        assert_eq!(config.simulation.initial_preset, Some(43));
        assert_eq!(config.ephemeris.catalog_path, Some(PathBuf::from("bodies.ron")));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.simulation.start_time = Some("2024-03-20T03:06:00Z".to_string());
        config.ephemeris.distance_scale = 500.0;
        config.debug.log_positions = true;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.calibration.enabled = false;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap().unwrap();
        assert!(!reloaded.calibration.enabled);
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.ephemeris.satellite_path_samples = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        let mut config = Config::default();
        config.ephemeris.distance_scale = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ephemeris.distance_scale"));
    }
}
