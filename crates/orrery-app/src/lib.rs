//! The orrery driver: owns the simulated clock, the ephemeris and every
//! body's orbit path and spin, and advances them once per frame.

mod engine;
mod error;
pub mod frame_loop;
pub mod platform;
mod scene;
mod snapshot;

pub use engine::{Orrery, TimeCommand};
pub use error::AppError;
pub use frame_loop::FrameLoop;
pub use scene::{ModelScene, SceneView};
pub use snapshot::{BodyFrame, FrameSnapshot};
