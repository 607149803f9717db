//! Built-in catalog: the eight planets plus the Moon and Phobos.
//!
//! Planetary elements are the JPL approximate Keplerian elements (Standish,
//! valid 1800–2050 AD) referred to the mean ecliptic and equinox of J2000.
//! Satellite elements are relative to their planet and carry the dominant
//! apsidal and nodal precession as secular rates.

use crate::catalog::ElementStore;
use crate::elements::{BodyDef, OrbitalElements, SecularElement as S, SpinSpec};
use crate::error::EphemerisError;

/// Name of the body whose rotation is calibrated against the real subsolar point.
pub const EARTH: &str = "earth";

/// Kilometres per astronomical unit.
pub const KM_PER_AU: f64 = 149_597_870.7;

/// Earth's obliquity at J2000 in degrees.
pub const EARTH_OBLIQUITY_DEG: f64 = 23.44;

fn elements(a: S, e: S, i: S, l: S, peri: S, node: S) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: a,
        eccentricity: e,
        inclination: i,
        mean_longitude: l,
        longitude_of_perihelion: peri,
        longitude_of_node: node,
    }
}

fn spin(period_hours: f64) -> SpinSpec {
    SpinSpec {
        period_hours,
        ..SpinSpec::default()
    }
}

fn planet(name: &str, radius_km: f64, elements: OrbitalElements, spin: SpinSpec) -> BodyDef {
    BodyDef {
        name: name.to_string(),
        elements,
        radius_km,
        central_body: None,
        spin,
    }
}

fn satellite(
    name: &str,
    central: &str,
    radius_km: f64,
    elements: OrbitalElements,
    spin: SpinSpec,
) -> BodyDef {
    BodyDef {
        name: name.to_string(),
        elements,
        radius_km,
        central_body: Some(central.to_string()),
        spin,
    }
}

/// Every built-in body definition, planets first.
pub fn bodies() -> Vec<BodyDef> {
    vec![
        planet(
            "mercury",
            2_439.7,
            elements(
                S::new(0.387_099_27, 0.000_000_37),
                S::new(0.205_635_93, 0.000_019_06),
                S::new(7.004_979_02, -0.005_947_49),
                S::new(252.250_323_50, 149_472.674_111_75),
                S::new(77.457_796_28, 0.160_476_89),
                S::new(48.330_765_93, -0.125_340_81),
            ),
            spin(1_407.6),
        ),
        planet(
            "venus",
            6_051.8,
            elements(
                S::new(0.723_335_66, 0.000_003_90),
                S::new(0.006_776_72, -0.000_041_07),
                S::new(3.394_676_05, -0.000_788_90),
                S::new(181.979_099_50, 58_517.815_387_29),
                S::new(131.602_467_18, 0.002_683_29),
                S::new(76.679_842_55, -0.277_694_18),
            ),
            spin(-5_832.5),
        ),
        planet(
            EARTH,
            6_371.0,
            elements(
                S::new(1.000_002_61, 0.000_005_62),
                S::new(0.016_711_23, -0.000_043_92),
                S::new(-0.000_015_31, -0.012_946_68),
                S::new(100.464_571_66, 35_999.372_449_81),
                S::new(102.937_681_93, 0.323_273_64),
                S::fixed(0.0),
            ),
            SpinSpec {
                period_hours: 23.934_5,
                axial_tilt_deg: EARTH_OBLIQUITY_DEG,
                reference_azimuth_deg: 0.0,
                offset_rad: 0.0,
                calibrated: true,
            },
        ),
        planet(
            "mars",
            3_389.5,
            elements(
                S::new(1.523_710_34, 0.000_018_47),
                S::new(0.093_394_10, 0.000_078_82),
                S::new(1.849_691_42, -0.008_131_31),
                S::new(-4.553_432_05, 19_140.302_684_99),
                S::new(-23.943_629_59, 0.444_410_88),
                S::new(49.559_538_91, -0.292_573_43),
            ),
            spin(24.622_9),
        ),
        planet(
            "jupiter",
            69_911.0,
            elements(
                S::new(5.202_887_00, -0.000_116_07),
                S::new(0.048_386_24, -0.000_132_53),
                S::new(1.304_396_95, -0.001_837_14),
                S::new(34.396_440_51, 3_034.746_127_75),
                S::new(14.728_479_83, 0.212_526_68),
                S::new(100.473_909_09, 0.204_691_06),
            ),
            spin(9.925),
        ),
        planet(
            "saturn",
            58_232.0,
            elements(
                S::new(9.536_675_94, -0.001_250_60),
                S::new(0.053_861_79, -0.000_509_91),
                S::new(2.485_991_87, 0.001_936_09),
                S::new(49.954_244_23, 1_222.493_622_01),
                S::new(92.598_878_31, -0.418_972_16),
                S::new(113.662_424_48, -0.288_677_94),
            ),
            spin(10.656),
        ),
        planet(
            "uranus",
            25_362.0,
            elements(
                S::new(19.189_164_64, -0.001_961_76),
                S::new(0.047_257_44, -0.000_043_97),
                S::new(0.772_637_83, -0.002_429_39),
                S::new(313.238_104_51, 428.482_027_85),
                S::new(170.954_276_30, 0.408_052_81),
                S::new(74.016_925_03, 0.042_405_89),
            ),
            spin(-17.24),
        ),
        planet(
            "neptune",
            24_622.0,
            elements(
                S::new(30.069_922_76, 0.000_262_91),
                S::new(0.008_590_48, 0.000_051_05),
                S::new(1.770_043_47, 0.000_353_72),
                S::new(-55.120_029_69, 218.459_453_25),
                S::new(44.964_762_27, -0.322_414_64),
                S::new(131.784_225_74, -0.005_086_64),
            ),
            spin(16.11),
        ),
        satellite(
            "moon",
            EARTH,
            1_737.4,
            elements(
                S::fixed(384_400.0 / KM_PER_AU),
                S::fixed(0.054_9),
                S::fixed(5.145),
                S::new(218.316, 481_267.881),
                S::new(83.353, 4_069.013_7),
                S::new(125.045, -1_934.136),
            ),
            SpinSpec {
                period_hours: 655.72,
                // Half-turn so the textured near side faces the planet.
                offset_rad: std::f64::consts::PI,
                ..SpinSpec::default()
            },
        ),
        satellite(
            "phobos",
            "mars",
            11.267,
            elements(
                S::fixed(9_376.0 / KM_PER_AU),
                S::fixed(0.015_1),
                S::fixed(1.093),
                S::new(35.06, 41_231_045.0),
                S::new(150.057, 15_880.0),
                S::new(164.931, -15_848.0),
            ),
            spin(7.66),
        ),
    ]
}

/// Build the built-in element store.
pub fn element_store() -> Result<ElementStore, EphemerisError> {
    ElementStore::from_bodies(bodies())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let store = element_store().unwrap();
        assert_eq!(store.len(), 10);
        assert!(store.validate().is_empty());
    }

    #[test]
    fn test_satellites_reference_planets() {
        let store = element_store().unwrap();
        assert_eq!(store.get("moon").unwrap().central_body.as_deref(), Some(EARTH));
        assert_eq!(store.get("phobos").unwrap().central_body.as_deref(), Some("mars"));
        let roots = store.iter().filter(|b| !b.is_satellite()).count();
        assert_eq!(roots, 8);
    }

    #[test]
    fn test_only_earth_is_calibrated() {
        let store = element_store().unwrap();
        let calibrated: Vec<_> = store
            .iter()
            .filter(|b| b.spin.calibrated)
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(calibrated, vec![EARTH]);
        assert!((store.get(EARTH).unwrap().spin.axial_tilt_deg - 23.44).abs() < 1e-12);
    }

    #[test]
    fn test_retrograde_rotators() {
        let store = element_store().unwrap();
        for name in ["venus", "uranus"] {
            assert_eq!(store.get(name).unwrap().spin.direction(), -1.0, "{name}");
        }
        assert_eq!(store.get(EARTH).unwrap().spin.direction(), 1.0);
    }
}
