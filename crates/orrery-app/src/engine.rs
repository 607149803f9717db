//! The per-frame driver.

use chrono::{DateTime, Utc};
use orrery_config::Config;
use orrery_ephemeris::{
    ElementStore, Ephemeris, OrbitPath, PathSampling, RefreshPolicy, solar_system,
};
use orrery_rotation::{BodySpin, CalibrationReport, calibrate};
use orrery_time::{Direction, SystemWallClock, TimeController, WallClock, parse_start_time};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::scene::SceneView;
use crate::snapshot::{BodyFrame, FrameSnapshot};

const DAYS_PER_YEAR: f64 = 365.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// A change to the time controller, applied between ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeCommand {
    SetPreset(usize),
    Step(Direction),
    TogglePlay,
    SetPlaying(bool),
    RealtimeSync(bool),
    Reset,
    /// Jump the simulated clock to an instant, keeping its epoch.
    JumpTo(DateTime<Utc>),
}

/// Owns the simulation state and advances it once per frame.
///
/// Orbit paths and spins are kept in catalog order, one per body.
pub struct Orrery<W: WallClock = SystemWallClock> {
    ephemeris: Ephemeris,
    controller: TimeController<W>,
    paths: Vec<OrbitPath>,
    spins: Vec<BodySpin>,
    refresh: RefreshPolicy,
    reset_after_days: f64,
    /// Instant the drift guard measures from and resets to. Follows the clock
    /// while synced to the wall clock.
    drift_anchor: DateTime<Utc>,
    calibration: Option<CalibrationReport>,
    frame: u64,
}

impl Orrery<SystemWallClock> {
    /// Build from configuration on the process wall clock.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::from_config_with_wall_clock(config, SystemWallClock::new())
    }
}

impl<W: WallClock> Orrery<W> {
    /// Build from configuration on a custom wall clock.
    ///
    /// Loads the catalog (the built-in one unless `ephemeris.catalog_path` is
    /// set), starts the clock at `simulation.start_time` or the wall clock's
    /// current time, and applies the initial preset, play and sync settings.
    pub fn from_config_with_wall_clock(config: &Config, wall: W) -> Result<Self, AppError> {
        config.validate()?;

        let store = match &config.ephemeris.catalog_path {
            Some(path) => ElementStore::load_ron(path)?,
            None => solar_system::element_store()?,
        };
        let ephemeris = Ephemeris::new(store)
            .with_distance_scale(config.ephemeris.distance_scale)
            .with_sampling(PathSampling {
                primary: config.ephemeris.planet_path_samples,
                satellite: config.ephemeris.satellite_path_samples,
            });

        let sim = &config.simulation;
        let epoch = match &sim.start_time {
            Some(text) => parse_start_time(text)?,
            None => wall.now_utc(),
        };
        let mut controller = TimeController::with_wall_clock(epoch, wall);
        if let Some(index) = sim.initial_preset {
            controller.set_preset_index(index)?;
        }
        controller.set_playing(sim.start_playing);
        if sim.realtime_sync {
            controller.toggle_realtime_sync(true);
        }

        Ok(Self::new(ephemeris, controller)
            .with_refresh_policy(RefreshPolicy::every_days(sim.orbit_refresh_days))
            .with_reset_after_years(sim.reset_after_years))
    }

    /// Wrap an ephemeris and a controller. Generates every orbit path at the
    /// controller's current instant.
    pub fn new(ephemeris: Ephemeris, controller: TimeController<W>) -> Self {
        let instant = controller.instant();
        let mut paths = Vec::with_capacity(ephemeris.store().len());
        for body in ephemeris.store().iter() {
            match ephemeris.generate_path(&body.name, &instant) {
                Ok(path) => paths.push(path),
                Err(e) => {
                    warn!("No orbit path for '{}': {e}", body.name);
                    paths.push(OrbitPath::from_points(body.name.clone(), Vec::new()));
                }
            }
        }
        let spins = ephemeris.store().iter().map(|b| BodySpin::new(b.spin)).collect();
        let drift_anchor = controller.clock().epoch();
        info!(
            "Orrery ready with {} bodies at {instant}",
            ephemeris.store().len()
        );
        Self {
            ephemeris,
            controller,
            paths,
            spins,
            refresh: RefreshPolicy::default(),
            reset_after_days: 200.0 * DAYS_PER_YEAR,
            drift_anchor,
            calibration: None,
            frame: 0,
        }
    }

    /// Set the orbit path refresh cadence.
    pub fn with_refresh_policy(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    /// Set how far simulated time may drift from the epoch before it is reset.
    pub fn with_reset_after_years(mut self, years: f64) -> Self {
        self.reset_after_days = years * DAYS_PER_YEAR;
        self
    }

    pub fn ephemeris(&self) -> &Ephemeris {
        &self.ephemeris
    }

    pub fn controller(&self) -> &TimeController<W> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TimeController<W> {
        &mut self.controller
    }

    /// Current simulated instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.controller.instant()
    }

    /// Orbit path of a body.
    pub fn path(&self, body: &str) -> Option<&OrbitPath> {
        self.paths.iter().find(|p| p.body() == body)
    }

    /// Spin model of a body.
    pub fn spin(&self, body: &str) -> Option<&BodySpin> {
        self.index_of(body).map(|idx| &self.spins[idx])
    }

    /// Report of the startup calibration, once run.
    pub fn calibration_report(&self) -> Option<&CalibrationReport> {
        self.calibration.as_ref()
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn index_of(&self, body: &str) -> Option<usize> {
        self.ephemeris.store().iter().position(|b| b.name == body)
    }

    /// Calibrate `body`'s rotation against the real subsolar point at the
    /// current instant. Runs once, before the first tick.
    ///
    /// Only bodies whose catalog spin is flagged `calibrated` qualify. The
    /// scene must pose the body with its tilt applied and no spin.
    pub fn calibrate(
        &mut self,
        scene: &impl SceneView,
        body: &str,
        tolerance_deg: f64,
    ) -> Result<CalibrationReport, AppError> {
        let idx = self
            .index_of(body)
            .ok_or_else(|| AppError::UnknownBody(body.to_string()))?;
        if !self.spins[idx].spec().calibrated {
            return Err(AppError::NotCalibratable(body.to_string()));
        }
        if self.spins[idx].is_calibrated() {
            return Err(AppError::AlreadyCalibrated(body.to_string()));
        }
        let world = scene
            .body_world_transform(body)
            .ok_or_else(|| AppError::NotInScene(body.to_string()))?;

        let epoch = self.controller.clock().epoch();
        let instant = self.instant();
        let result = calibrate(
            self.spins[idx].spec(),
            &epoch,
            &instant,
            scene.light_position(),
            &world,
            tolerance_deg,
        )
        .map_err(|source| AppError::Calibration {
            body: body.to_string(),
            source,
        })?;

        self.spins[idx].set_calibration(result.state);
        self.calibration = Some(result.report);
        Ok(result.report)
    }

    /// Apply a time command.
    pub fn apply(&mut self, command: TimeCommand) -> Result<(), AppError> {
        debug!("Time command {command:?}");
        let tc = &mut self.controller;
        match command {
            TimeCommand::SetPreset(index) => tc.set_preset_index(index)?,
            TimeCommand::Step(direction) => {
                if !tc.step(direction) {
                    debug!("Speed ladder end reached");
                }
            }
            TimeCommand::TogglePlay => tc.toggle_play(),
            TimeCommand::SetPlaying(playing) => tc.set_playing(playing),
            TimeCommand::RealtimeSync(on) => tc.toggle_realtime_sync(on),
            TimeCommand::Reset => tc.reset(),
            TimeCommand::JumpTo(instant) => tc.clock_mut().set_instant(instant),
        }
        Ok(())
    }

    /// Advance one frame of `real_dt` seconds.
    ///
    /// The clock moves first; the drift guard, orbit paths, positions and
    /// rotations all then observe the same instant.
    pub fn tick(&mut self, real_dt: f64) -> FrameSnapshot {
        let step_ms = self.controller.advance(real_dt);
        let drift_reset = self.guard_drift();
        let instant = self.instant();

        let (paths_refreshed, paths_regenerated) = self.update_paths(&instant);

        let epoch = self.controller.clock().epoch();
        let bodies = self
            .ephemeris
            .store()
            .iter()
            .zip(&self.spins)
            .map(|(body, spin)| {
                let resolved = self.ephemeris.resolve(&body.name, &instant);
                let relative = self.ephemeris.relative_position(&body.name, &instant);
                let rotation_angle = spin.angle(&epoch, &instant);
                BodyFrame {
                    name: body.name.clone(),
                    position: resolved.position,
                    relative_position: relative.position,
                    status: resolved.status,
                    rotation_angle,
                    orientation: orrery_rotation::orientation(spin.spec(), rotation_angle),
                }
            })
            .collect();

        self.frame += 1;
        FrameSnapshot {
            frame: self.frame,
            instant,
            step_ms,
            drift_reset,
            paths_refreshed,
            paths_regenerated,
            bodies,
        }
    }

    /// Return the clock to the drift anchor once it has drifted past the
    /// bound. While locked to the wall clock the anchor moves with the clock
    /// instead, so leaving sync does not snap back to a distant start time.
    fn guard_drift(&mut self) -> bool {
        let instant = self.instant();
        if self.controller.is_realtime_sync() {
            self.drift_anchor = instant;
            return false;
        }
        let elapsed = (instant - self.drift_anchor).num_milliseconds() as f64 / MS_PER_DAY;
        if elapsed.abs() <= self.reset_after_days {
            return false;
        }
        self.controller.clock_mut().set_instant(self.drift_anchor);
        info!(
            "Simulated time drifted {elapsed:.0} days from {}; reset",
            self.drift_anchor
        );
        true
    }

    fn update_paths(&mut self, instant: &DateTime<Utc>) -> (usize, usize) {
        let mut refreshed = 0;
        let mut regenerated = 0;
        for path in &mut self.paths {
            if !self.refresh.path_is_due(path, *instant) {
                continue;
            }
            if self.ephemeris.refresh_path(path, instant) {
                refreshed += 1;
                continue;
            }
            match self.ephemeris.generate_path(path.body(), instant) {
                Ok(fresh) => {
                    debug!("Regenerated orbit path of '{}'", fresh.body());
                    *path = fresh;
                    regenerated += 1;
                }
                Err(e) => warn!("Cannot regenerate orbit path of '{}': {e}", path.body()),
            }
        }
        (refreshed, regenerated)
    }
}
