//! What calibration needs from the scene.

use std::collections::HashMap;

use glam::{DMat4, DVec3};
use orrery_ephemeris::solar_system::KM_PER_AU;
use orrery_rotation::{axial_tilt, body_transform};
use orrery_time::WallClock;

use crate::engine::Orrery;

/// Read access to the rendered scene.
pub trait SceneView {
    /// World position of the primary light source.
    fn light_position(&self) -> DVec3;

    /// World transform of a body as currently posed, or `None` if the body
    /// has not been instantiated.
    fn body_world_transform(&self, body: &str) -> Option<DMat4>;
}

/// Scene posed from the orrery itself: light at the origin, each body at its
/// resolved position with its axial tilt applied and no spin.
///
/// Stands in for a renderer's scene graph in headless runs and tests.
#[derive(Clone, Debug)]
pub struct ModelScene {
    light: DVec3,
    transforms: HashMap<String, DMat4>,
}

impl ModelScene {
    /// Pose every body at the orrery's current instant.
    pub fn capture<W: WallClock>(orrery: &Orrery<W>) -> Self {
        let instant = orrery.instant();
        let ephemeris = orrery.ephemeris();
        let transforms = ephemeris
            .store()
            .iter()
            .map(|body| {
                let position = ephemeris.resolve(&body.name, &instant).position;
                let scale = body.radius_km / KM_PER_AU * ephemeris.distance_scale();
                let world = body_transform(position, axial_tilt(&body.spin), scale);
                (body.name.clone(), world)
            })
            .collect();
        Self {
            light: DVec3::ZERO,
            transforms,
        }
    }
}

impl SceneView for ModelScene {
    fn light_position(&self) -> DVec3 {
        self.light
    }

    fn body_world_transform(&self, body: &str) -> Option<DMat4> {
        self.transforms.get(body).copied()
    }
}
