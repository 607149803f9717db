//! Command-line arguments for the headless orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// Simulation flags override settings loaded from `config.ron`; `--frames`
/// and `--frame-dt` only control the run.
#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Solar-system ephemeris and time simulation")]
pub struct CliArgs {
    /// Simulated start instant (RFC 3339).
    #[arg(long)]
    pub start: Option<String>,

    /// Speed ladder index to start at.
    #[arg(long)]
    pub preset: Option<usize>,

    /// Lock simulated time to the wall clock.
    #[arg(long)]
    pub realtime: bool,

    /// Start paused.
    #[arg(long)]
    pub paused: bool,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Real seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub frame_dt: f64,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref start) = args.start {
            self.simulation.start_time = Some(start.clone());
        }
        if let Some(preset) = args.preset {
            self.simulation.initial_preset = Some(preset);
        }
        if args.realtime {
            self.simulation.realtime_sync = true;
        }
        if args.paused {
            self.simulation.start_playing = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
