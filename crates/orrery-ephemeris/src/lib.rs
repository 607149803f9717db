//! Celestial ephemeris: orbital element catalog, Kepler solver, recursive
//! position resolution through central-body chains, and orbit path sampling
//! with in-place refresh.

mod catalog;
pub mod elements;
pub mod epoch;
mod error;
pub mod kepler;
mod orbit_path;
mod resolver;
pub mod solar_system;

pub use catalog::{CatalogIssue, ElementStore};
pub use elements::{
    BodyDef, ElementsAt, MAX_ECCENTRICITY, OrbitalElements, SecularElement, SpinSpec,
    plane_to_reference,
};
pub use epoch::{centuries_at, centuries_since_j2000, j2000, julian_date, utc_to_julian_date};
pub use error::EphemerisError;
pub use kepler::{KeplerSolution, solve_kepler};
pub use orbit_path::{OrbitPath, PathSampling, RefreshPolicy};
pub use resolver::{Ephemeris, FallbackReason, ResolveStatus, Resolved};
