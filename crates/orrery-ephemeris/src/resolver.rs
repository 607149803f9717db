//! World-space position resolution through central-body chains.

use chrono::{DateTime, Utc};
use glam::DVec3;

use crate::catalog::ElementStore;
use crate::elements::{BodyDef, plane_to_reference};
use crate::epoch::centuries_at;
use crate::kepler::{KeplerSolution, solve_kepler};
use crate::orbit_path::PathSampling;

/// Why a resolved position is a fallback rather than a full solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The requested body is not in the catalog.
    UnknownBody(String),
    /// The body's central body is not in the catalog.
    MissingCentralBody {
        /// The orbiting body.
        body: String,
        /// The absent central body.
        central: String,
    },
    /// The central-body chain is cyclic or deeper than the catalog.
    CycleOrTooDeep(String),
    /// An intermediate quantity was NaN or infinite.
    NonFinite(String),
    /// Kepler's equation did not converge within the iteration cap.
    NotConverged(String),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBody(body) => write!(f, "unknown body '{body}'"),
            Self::MissingCentralBody { body, central } => {
                write!(f, "central body '{central}' of '{body}' is missing")
            }
            Self::CycleOrTooDeep(body) => write!(f, "central-body chain of '{body}' does not terminate"),
            Self::NonFinite(body) => write!(f, "non-finite orbit quantities for '{body}'"),
            Self::NotConverged(body) => write!(f, "Kepler solve for '{body}' did not converge"),
        }
    }
}

/// Quality of a resolved position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveStatus {
    /// Every body on the chain was solved.
    Exact,
    /// A fallback position was substituted somewhere on the chain.
    Fallback(FallbackReason),
}

impl ResolveStatus {
    /// Whether the position was fully solved.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact)
    }
}

/// A position together with how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// Position in world units.
    pub position: DVec3,
    /// Exact, or which fallback was used.
    pub status: ResolveStatus,
}

impl Resolved {
    fn exact(position: DVec3) -> Self {
        Self {
            position,
            status: ResolveStatus::Exact,
        }
    }

    fn fallback(position: DVec3, reason: FallbackReason) -> Self {
        log::warn!("Position fallback: {reason}");
        Self {
            position,
            status: ResolveStatus::Fallback(reason),
        }
    }
}

/// Ephemeris engine over an element store.
///
/// Positions are pure functions of the catalog and the instant: resolving the
/// same body at the same instant always yields the same vector.
#[derive(Clone, Debug)]
pub struct Ephemeris {
    store: ElementStore,
    distance_scale: f64,
    sampling: PathSampling,
}

impl Ephemeris {
    /// Wrap a store. Distances are reported in AU until a scale is set.
    pub fn new(store: ElementStore) -> Self {
        for issue in store.validate() {
            log::warn!("Catalog issue: {issue}");
        }
        Self {
            store,
            distance_scale: 1.0,
            sampling: PathSampling::default(),
        }
    }

    /// Set world units per AU.
    pub fn with_distance_scale(mut self, distance_scale: f64) -> Self {
        self.distance_scale = distance_scale;
        self
    }

    /// Set orbit path sample counts.
    pub fn with_sampling(mut self, sampling: PathSampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// The underlying catalog.
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// World units per AU.
    pub fn distance_scale(&self) -> f64 {
        self.distance_scale
    }

    /// Orbit path sample counts.
    pub fn sampling(&self) -> PathSampling {
        self.sampling
    }

    /// World-space position of `body` at `instant`.
    ///
    /// Satellites are placed relative to their central body, which is resolved
    /// first at the same instant. Never fails: missing data and numerical
    /// trouble degrade to the origin or the central body's position, and the
    /// returned status says which.
    pub fn resolve(&self, body: &str, instant: &DateTime<Utc>) -> Resolved {
        self.resolve_chain(body, centuries_at(instant), 0)
    }

    /// Offset of `body` from its central body at `instant` (the two-body
    /// solution alone, without recursing).
    pub fn relative_position(&self, body: &str, instant: &DateTime<Utc>) -> Resolved {
        let Some(def) = self.store.get(body) else {
            return Resolved::fallback(DVec3::ZERO, FallbackReason::UnknownBody(body.to_string()));
        };
        match self.two_body_offset(def, centuries_at(instant)) {
            Ok(offset) => Resolved::exact(offset),
            Err(reason) => Resolved::fallback(DVec3::ZERO, reason),
        }
    }

    fn resolve_chain(&self, body: &str, t_centuries: f64, depth: usize) -> Resolved {
        let Some(def) = self.store.get(body) else {
            return Resolved::fallback(DVec3::ZERO, FallbackReason::UnknownBody(body.to_string()));
        };
        if depth > self.store.len() {
            return Resolved::fallback(DVec3::ZERO, FallbackReason::CycleOrTooDeep(body.to_string()));
        }

        let (central_position, inherited) = match def.central_body.as_deref() {
            None => (DVec3::ZERO, ResolveStatus::Exact),
            Some(central) if !self.store.contains(central) => {
                return Resolved::fallback(
                    DVec3::ZERO,
                    FallbackReason::MissingCentralBody {
                        body: body.to_string(),
                        central: central.to_string(),
                    },
                );
            }
            Some(central) => {
                let parent = self.resolve_chain(central, t_centuries, depth + 1);
                (parent.position, parent.status)
            }
        };

        match self.two_body_offset(def, t_centuries) {
            Ok(offset) => Resolved {
                position: central_position + offset,
                status: inherited,
            },
            Err(reason) => Resolved::fallback(central_position, reason),
        }
    }

    /// Two-body offset from the central body. Fails on non-finite
    /// intermediates and on an unconverged Kepler solve.
    fn two_body_offset(&self, def: &BodyDef, t_centuries: f64) -> Result<DVec3, FallbackReason> {
        let non_finite = || FallbackReason::NonFinite(def.name.clone());
        let el = def.elements.at(t_centuries);
        if !el.is_finite() {
            return Err(non_finite());
        }

        let a = el.semi_major_axis * self.distance_scale;
        let e = el.eccentricity;
        let w = el.argument_of_perihelion();

        let ea = accept_solution(&def.name, solve_kepler(el.mean_anomaly(), e))?;

        let (sin_e, cos_e) = ea.sin_cos();
        let x = a * (cos_e - e);
        let y = a * (1.0 - e * e).sqrt() * sin_e;
        let r = x.hypot(y);
        let v = y.atan2(x);

        let offset = plane_to_reference(r, v + w, el.longitude_of_node, el.inclination);
        if offset.is_finite() { Ok(offset) } else { Err(non_finite()) }
    }
}

/// Eccentric anomaly of a usable solve.
fn accept_solution(body: &str, solution: KeplerSolution) -> Result<f64, FallbackReason> {
    if !solution.eccentric_anomaly.is_finite() {
        return Err(FallbackReason::NonFinite(body.to_string()));
    }
    if !solution.converged {
        return Err(FallbackReason::NotConverged(body.to_string()));
    }
    Ok(solution.eccentric_anomaly)
}
