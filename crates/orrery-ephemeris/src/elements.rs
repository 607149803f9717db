//! Keplerian orbital elements with linear secular drift, and the per-body
//! definitions stored in the catalog.

use std::f64::consts::TAU;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Upper bound applied to eccentricity before solving Kepler's equation.
///
/// Keeps the Newton iteration inside its convergence regime and the path
/// radius formula away from the parabolic singularity.
pub const MAX_ECCENTRICITY: f64 = 0.99;

/// An element that drifts linearly over time: `value + rate * T`, where `T` is
/// measured in Julian centuries since J2000.
///
/// Serialized as a `(value, rate)` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct SecularElement {
    /// Value at the J2000 epoch.
    pub value: f64,
    /// Change per Julian century.
    pub rate: f64,
}

impl SecularElement {
    /// Create an element from its epoch value and per-century rate.
    pub const fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    /// An element that does not drift.
    pub const fn fixed(value: f64) -> Self {
        Self { value, rate: 0.0 }
    }

    /// Evaluate at `t_centuries` Julian centuries from J2000.
    pub fn at(&self, t_centuries: f64) -> f64 {
        self.value + self.rate * t_centuries
    }
}

impl From<(f64, f64)> for SecularElement {
    fn from((value, rate): (f64, f64)) -> Self {
        Self { value, rate }
    }
}

impl From<SecularElement> for (f64, f64) {
    fn from(element: SecularElement) -> Self {
        (element.value, element.rate)
    }
}

/// Osculating Keplerian elements at J2000 with per-century rates.
///
/// Distances are in AU, angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis `a` (AU).
    pub semi_major_axis: SecularElement,
    /// Eccentricity `e`.
    pub eccentricity: SecularElement,
    /// Inclination `I` (degrees).
    pub inclination: SecularElement,
    /// Mean longitude `L` (degrees).
    pub mean_longitude: SecularElement,
    /// Longitude of perihelion (degrees).
    pub longitude_of_perihelion: SecularElement,
    /// Longitude of the ascending node (degrees).
    pub longitude_of_node: SecularElement,
}

impl OrbitalElements {
    /// Evaluate every element at `t_centuries`.
    ///
    /// Angles are converted to radians and normalized into `[0, 2π)` so that the
    /// large century-scaled mean longitude does not lose precision when the
    /// perihelion longitude is subtracted from it. Eccentricity is clamped to
    /// `[0, MAX_ECCENTRICITY]`; the unclamped value is kept for diagnostics.
    pub fn at(&self, t_centuries: f64) -> ElementsAt {
        let raw_eccentricity = self.eccentricity.at(t_centuries);
        ElementsAt {
            semi_major_axis: self.semi_major_axis.at(t_centuries),
            eccentricity: raw_eccentricity.clamp(0.0, MAX_ECCENTRICITY),
            raw_eccentricity,
            inclination: self.inclination.at(t_centuries).to_radians(),
            mean_longitude: normalize_angle(self.mean_longitude.at(t_centuries).to_radians()),
            longitude_of_perihelion: normalize_angle(
                self.longitude_of_perihelion.at(t_centuries).to_radians(),
            ),
            longitude_of_node: normalize_angle(
                self.longitude_of_node.at(t_centuries).to_radians(),
            ),
        }
    }
}

/// Orbital elements evaluated at a specific instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementsAt {
    /// Semi-major axis in AU.
    pub semi_major_axis: f64,
    /// Eccentricity clamped to `[0, MAX_ECCENTRICITY]`.
    pub eccentricity: f64,
    /// Eccentricity as evaluated, before clamping.
    pub raw_eccentricity: f64,
    /// Inclination in radians.
    pub inclination: f64,
    /// Mean longitude in radians, `[0, 2π)`.
    pub mean_longitude: f64,
    /// Longitude of perihelion in radians, `[0, 2π)`.
    pub longitude_of_perihelion: f64,
    /// Longitude of the ascending node in radians, `[0, 2π)`.
    pub longitude_of_node: f64,
}

impl ElementsAt {
    /// Argument of perihelion `w = longPeri - longNode`, in `[0, 2π)`.
    pub fn argument_of_perihelion(&self) -> f64 {
        normalize_angle(self.longitude_of_perihelion - self.longitude_of_node)
    }

    /// Mean anomaly `M = L - longPeri` (not normalized; the solver does that).
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_longitude - self.longitude_of_perihelion
    }

    /// True when every evaluated quantity is a finite number.
    pub fn is_finite(&self) -> bool {
        self.semi_major_axis.is_finite()
            && self.raw_eccentricity.is_finite()
            && self.inclination.is_finite()
            && self.mean_longitude.is_finite()
            && self.longitude_of_perihelion.is_finite()
            && self.longitude_of_node.is_finite()
    }

    /// Orbit radius at true anomaly `v` from the conic equation
    /// `r(v) = a(1 - e²) / (1 + e·cos v)`, scaled by `distance_scale`.
    pub fn radius_at_true_anomaly(&self, true_anomaly: f64, distance_scale: f64) -> f64 {
        let e = self.eccentricity;
        let a = self.semi_major_axis * distance_scale;
        a * (1.0 - e * e) / (1.0 + e * true_anomaly.cos())
    }

    /// Point on the orbit at true anomaly `v`, relative to the central body.
    pub fn point_at_true_anomaly(&self, true_anomaly: f64, distance_scale: f64) -> DVec3 {
        let r = self.radius_at_true_anomaly(true_anomaly, distance_scale);
        plane_to_reference(
            r,
            true_anomaly + self.argument_of_perihelion(),
            self.longitude_of_node,
            self.inclination,
        )
    }
}

/// Rotate a point at distance `r` and argument of latitude `u = v + w` from the
/// orbital plane into the reference frame (node, inclination, argument of
/// perihelion).
///
/// The reference frame is Y-up: the ecliptic lies in the XZ plane and ecliptic
/// north is +Y. Ecliptic x maps to +Z and ecliptic y maps to +X.
pub fn plane_to_reference(r: f64, argument_of_latitude: f64, node: f64, inclination: f64) -> DVec3 {
    let (sin_node, cos_node) = node.sin_cos();
    let (sin_u, cos_u) = argument_of_latitude.sin_cos();
    let (sin_i, cos_i) = inclination.sin_cos();

    DVec3::new(
        r * (sin_node * cos_u + cos_node * sin_u * cos_i),
        r * sin_u * sin_i,
        r * (cos_node * cos_u - sin_node * sin_u * cos_i),
    )
}

/// Normalize an angle in radians into `[0, 2π)`.
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Self-rotation description for a body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinSpec {
    /// Rotation period in hours. A negative period means retrograde rotation.
    pub period_hours: f64,
    /// Obliquity of the spin axis in degrees.
    pub axial_tilt_deg: f64,
    /// Azimuth of the tilt direction about the reference north axis, in
    /// degrees. At 0 the north pole leans toward ecliptic longitude 90°.
    pub reference_azimuth_deg: f64,
    /// Fixed rotation added on top of the spin angle, in radians.
    pub offset_rad: f64,
    /// Whether the body's rotation may be calibrated against the real subsolar
    /// point. Calibration of any other body is refused.
    pub calibrated: bool,
}

impl Default for SpinSpec {
    fn default() -> Self {
        Self {
            period_hours: 24.0,
            axial_tilt_deg: 0.0,
            reference_azimuth_deg: 0.0,
            offset_rad: 0.0,
            calibrated: false,
        }
    }
}

impl SpinSpec {
    /// `+1.0` for prograde, `-1.0` for retrograde rotation.
    pub fn direction(&self) -> f64 {
        if self.period_hours < 0.0 { -1.0 } else { 1.0 }
    }

    /// Absolute rotation period in seconds.
    pub fn period_seconds(&self) -> f64 {
        self.period_hours.abs() * 3600.0
    }
}

/// One entry of the element catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    /// Unique lookup name (lowercase by convention).
    pub name: String,
    /// Orbital elements relative to the central body.
    pub elements: OrbitalElements,
    /// Physical mean radius in kilometres.
    pub radius_km: f64,
    /// Body this one orbits. `None` means it orbits the primary at the origin.
    #[serde(default)]
    pub central_body: Option<String>,
    /// Self-rotation parameters.
    #[serde(default)]
    pub spin: SpinSpec,
}

impl BodyDef {
    /// Whether this body orbits another catalog body.
    pub fn is_satellite(&self) -> bool {
        self.central_body.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circular(a: f64) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: SecularElement::fixed(a),
            eccentricity: SecularElement::fixed(0.0),
            inclination: SecularElement::fixed(0.0),
            mean_longitude: SecularElement::fixed(0.0),
            longitude_of_perihelion: SecularElement::fixed(0.0),
            longitude_of_node: SecularElement::fixed(0.0),
        }
    }

    #[test]
    fn test_secular_element_drifts_linearly() {
        let element = SecularElement::new(100.0, 36000.0);
        assert_eq!(element.at(0.0), 100.0);
        assert_eq!(element.at(0.5), 18100.0);
        assert_eq!(element.at(-1.0), -35900.0);
    }

    #[test]
    fn test_angles_are_normalized() {
        let mut elements = circular(1.0);
        elements.mean_longitude = SecularElement::new(100.0, 35999.0);
        let at = elements.at(10.0);
        assert!((0.0..TAU).contains(&at.mean_longitude));

        elements.longitude_of_node = SecularElement::fixed(-90.0);
        let at = elements.at(0.0);
        assert!((at.longitude_of_node - 1.5 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_eccentricity_is_clamped() {
        let mut elements = circular(1.0);
        elements.eccentricity = SecularElement::new(0.95, 0.1);
        let at = elements.at(1.0);
        assert_eq!(at.eccentricity, MAX_ECCENTRICITY);
        assert!((at.raw_eccentricity - 1.05).abs() < 1e-12);

        elements.eccentricity = SecularElement::fixed(-0.2);
        assert_eq!(elements.at(0.0).eccentricity, 0.0);
    }

    #[test]
    fn test_nan_elements_are_not_finite() {
        let mut elements = circular(1.0);
        elements.inclination = SecularElement::fixed(f64::NAN);
        assert!(!elements.at(0.0).is_finite());
        assert!(circular(1.0).at(0.0).is_finite());
    }

    #[test]
    fn test_plane_to_reference_is_y_up() {
        // Zero inclination keeps every point in the XZ plane.
        for i in 0..8 {
            let u = i as f64 * 0.7;
            let p = plane_to_reference(2.0, u, 0.3, 0.0);
            assert!(p.y.abs() < 1e-12);
            assert!((p.length() - 2.0).abs() < 1e-12);
        }
        // Ninety degrees past the node at ninety degrees inclination is the pole.
        let pole = plane_to_reference(1.0, std::f64::consts::FRAC_PI_2, 0.0, std::f64::consts::FRAC_PI_2);
        assert!((pole.y - 1.0).abs() < 1e-12, "pole = {pole}");
    }

    #[test]
    fn test_conic_radius_at_perihelion_and_aphelion() {
        let mut elements = circular(2.0);
        elements.eccentricity = SecularElement::fixed(0.5);
        let at = elements.at(0.0);
        assert!((at.radius_at_true_anomaly(0.0, 1.0) - 1.0).abs() < 1e-12);
        assert!((at.radius_at_true_anomaly(std::f64::consts::PI, 1.0) - 3.0).abs() < 1e-12);
        assert!((at.radius_at_true_anomaly(0.0, 10.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_spin_direction_from_period_sign() {
        let prograde = SpinSpec {
            period_hours: 24.0,
            ..SpinSpec::default()
        };
        let retrograde = SpinSpec {
            period_hours: -5832.5,
            ..SpinSpec::default()
        };
        assert_eq!(prograde.direction(), 1.0);
        assert_eq!(retrograde.direction(), -1.0);
        assert!((retrograde.period_seconds() - 5832.5 * 3600.0).abs() < 1e-6);
    }

    #[test]
    fn test_secular_element_serializes_as_pair() {
        let element = SecularElement::new(1.5, -0.25);
        let text = ron::to_string(&element).unwrap();
        assert!(text.starts_with('('), "expected a tuple, got {text}");
        assert!(!text.contains("rate"), "expected no field names, got {text}");
        let back: SecularElement = ron::from_str(&text).unwrap();
        assert_eq!(back, element);
    }
}
