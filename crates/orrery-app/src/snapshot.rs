//! Per-frame output consumed by a renderer.

use chrono::{DateTime, Utc};
use glam::{DQuat, DVec3};
use orrery_ephemeris::ResolveStatus;
use serde::{Serialize, Serializer};

/// State of one body for one frame.
#[derive(Clone, Debug, Serialize)]
pub struct BodyFrame {
    pub name: String,
    /// World-space position.
    pub position: DVec3,
    /// Offset from the central body (equal to `position` for root bodies).
    pub relative_position: DVec3,
    /// How `position` was obtained.
    #[serde(serialize_with = "serialize_status")]
    pub status: ResolveStatus,
    /// Spin angle about the body's own axis, in radians.
    pub rotation_angle: f64,
    /// Spin followed by axial tilt.
    pub orientation: DQuat,
}

/// Everything the renderer needs after a tick.
#[derive(Clone, Debug, Serialize)]
pub struct FrameSnapshot {
    /// Ticks since start, counting this one.
    pub frame: u64,
    /// Simulated instant all values refer to.
    pub instant: DateTime<Utc>,
    /// Simulated milliseconds applied this tick.
    pub step_ms: f64,
    /// Whether the drift guard returned the clock to its epoch this tick.
    pub drift_reset: bool,
    /// Orbit paths refreshed in place this tick.
    pub paths_refreshed: usize,
    /// Orbit paths rebuilt from scratch this tick.
    pub paths_regenerated: usize,
    pub bodies: Vec<BodyFrame>,
}

impl FrameSnapshot {
    /// Frame of the named body.
    pub fn body(&self, name: &str) -> Option<&BodyFrame> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Bodies whose position is a fallback.
    pub fn fallbacks(&self) -> impl Iterator<Item = &BodyFrame> {
        self.bodies.iter().filter(|b| !b.status.is_exact())
    }
}

fn serialize_status<S: Serializer>(status: &ResolveStatus, s: S) -> Result<S::Ok, S::Error> {
    match status {
        ResolveStatus::Exact => s.serialize_str("exact"),
        ResolveStatus::Fallback(reason) => s.serialize_str(&format!("fallback: {reason}")),
    }
}
