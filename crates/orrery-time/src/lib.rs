//! Simulated time: the speed ladder, the simulated clock and the controller
//! state machine that turns real frame time into simulated time.

mod clock;
mod controller;
mod error;
mod ladder;
mod wall_clock;

pub use clock::{SimulatedClock, parse_start_time};
pub use controller::{Direction, TimeController, step_ceiling_ms};
pub use error::TimeError;
pub use ladder::{SpeedLadder, SpeedPreset, describe_rate};
pub use wall_clock::{ManualWallClock, SystemWallClock, WallClock};
