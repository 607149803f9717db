//! Headless orrery: runs the simulation for a number of frames and prints the
//! final frame as JSON.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::platform::PlatformDirs;
use orrery_app::{FrameLoop, ModelScene, Orrery};
use orrery_config::{CliArgs, Config};
use tracing::{debug, error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => PlatformDirs::with_root(root),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
    }

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let debug_build = cfg!(debug_assertions);
    if let Err(e) = orrery_log::init_logging(Some(&dirs.log_dir), debug_build, Some(&config)) {
        eprintln!("Logging unavailable: {e}");
    }

    let mut orrery = match Orrery::from_config(&config) {
        Ok(orrery) => orrery,
        Err(e) => {
            error!("Cannot start: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Starting at {} ({})",
        orrery.instant(),
        orrery.controller().describe()
    );

    if config.calibration.enabled {
        let scene = ModelScene::capture(&orrery);
        let calibration = &config.calibration;
        match orrery.calibrate(&scene, &calibration.body, calibration.tolerance_deg) {
            Ok(report) => debug!("Calibration residual {:.3} degrees", report.error),
            Err(e) => warn!("Running uncalibrated: {e}"),
        }
    }

    let mut frames = FrameLoop::new();
    let mut last = None;
    for _ in 0..args.frames {
        let snapshot = frames.advance(args.frame_dt, |dt| orrery.tick(dt));
        if config.debug.log_positions {
            for body in &snapshot.bodies {
                debug!(
                    "{} {}: ({:.6}, {:.6}, {:.6})",
                    snapshot.instant,
                    body.name,
                    body.position.x,
                    body.position.y,
                    body.position.z
                );
            }
        }
        last = Some(snapshot);
    }
    let snapshot = last.unwrap_or_else(|| orrery.tick(0.0));
    info!(
        "Simulated {} frames ({:.2} s real) to {}",
        frames.frame_count(),
        frames.total_real_time(),
        snapshot.instant
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Cannot serialize frame: {e}");
            ExitCode::FAILURE
        }
    }
}
