//! Orbital element store: lookup and validation for every body in the system.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::elements::BodyDef;
use crate::error::EphemerisError;

/// Read-only catalog of body definitions keyed by name.
///
/// Central-body references form a forest. The store does not refuse a catalog
/// whose references dangle or loop; [`validate`](Self::validate) reports them and
/// the resolver degrades to a fallback position at runtime.
#[derive(Clone, Debug, Default)]
pub struct ElementStore {
    bodies: Vec<BodyDef>,
    name_index: HashMap<String, usize>,
}

/// On-disk shape of a catalog file.
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    bodies: Vec<BodyDef>,
}

/// Structural problem found by [`ElementStore::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogIssue {
    /// A body names a central body that is not in the catalog.
    MissingCentralBody {
        /// The orbiting body.
        body: String,
        /// The absent central body.
        central: String,
    },
    /// Following central-body links from this body never reaches a root.
    Cycle {
        /// A body on (or leading into) the cycle.
        body: String,
    },
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCentralBody { body, central } => {
                write!(f, "body '{body}' orbits unknown body '{central}'")
            }
            Self::Cycle { body } => write!(f, "central-body chain of '{body}' is cyclic"),
        }
    }
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of bodies, rejecting duplicate names.
    pub fn from_bodies(bodies: impl IntoIterator<Item = BodyDef>) -> Result<Self, EphemerisError> {
        let mut store = Self::new();
        for body in bodies {
            store.insert(body)?;
        }
        Ok(store)
    }

    /// Register a body. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`EphemerisError::DuplicateBody`] if the name is taken.
    pub fn insert(&mut self, body: BodyDef) -> Result<usize, EphemerisError> {
        if self.name_index.contains_key(&body.name) {
            return Err(EphemerisError::DuplicateBody(body.name));
        }
        let idx = self.bodies.len();
        self.name_index.insert(body.name.clone(), idx);
        self.bodies.push(body);
        Ok(idx)
    }

    /// Look up a body by name.
    pub fn get(&self, name: &str) -> Option<&BodyDef> {
        self.name_index.get(name).map(|&idx| &self.bodies[idx])
    }

    /// Whether a body with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BodyDef> {
        self.bodies.iter()
    }

    /// Report dangling central-body references and cycles.
    ///
    /// Each chain is walked at most `len()` hops, so a malformed catalog cannot
    /// make validation loop.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        for body in &self.bodies {
            let mut visited = HashSet::new();
            let mut current = body;
            visited.insert(current.name.as_str());
            while let Some(central) = current.central_body.as_deref() {
                let Some(next) = self.get(central) else {
                    if current.name == body.name {
                        issues.push(CatalogIssue::MissingCentralBody {
                            body: body.name.clone(),
                            central: central.to_string(),
                        });
                    }
                    break;
                };
                if !visited.insert(next.name.as_str()) || visited.len() > self.len() {
                    issues.push(CatalogIssue::Cycle {
                        body: body.name.clone(),
                    });
                    break;
                }
                current = next;
            }
        }
        issues
    }

    /// Parse a catalog from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, EphemerisError> {
        let file: CatalogFile = ron::from_str(text).map_err(EphemerisError::ParseError)?;
        Self::from_bodies(file.bodies)
    }

    /// Serialize the catalog to pretty RON text.
    pub fn to_ron_string(&self) -> Result<String, EphemerisError> {
        let file = CatalogFile {
            bodies: self.bodies.clone(),
        };
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(&file, pretty).map_err(EphemerisError::SerializeError)
    }

    /// Load a catalog from a RON file.
    pub fn load_ron(path: &Path) -> Result<Self, EphemerisError> {
        let contents = std::fs::read_to_string(path).map_err(EphemerisError::ReadError)?;
        let store = Self::from_ron_str(&contents)?;
        log::info!("Loaded {} bodies from {}", store.len(), path.display());
        Ok(store)
    }

    /// Write the catalog to a RON file, creating parent directories.
    pub fn save_ron(&self, path: &Path) -> Result<(), EphemerisError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(EphemerisError::WriteError)?;
        }
        let serialized = self.to_ron_string()?;
        std::fs::write(path, serialized).map_err(EphemerisError::WriteError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{OrbitalElements, SecularElement, SpinSpec};

    fn body(name: &str, central: Option<&str>) -> BodyDef {
        BodyDef {
            name: name.to_string(),
            elements: OrbitalElements {
                semi_major_axis: SecularElement::fixed(1.0),
                eccentricity: SecularElement::fixed(0.0),
                inclination: SecularElement::fixed(0.0),
                mean_longitude: SecularElement::fixed(0.0),
                longitude_of_perihelion: SecularElement::fixed(0.0),
                longitude_of_node: SecularElement::fixed(0.0),
            },
            radius_km: 1.0,
            central_body: central.map(str::to_string),
            spin: SpinSpec::default(),
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let store =
            ElementStore::from_bodies([body("earth", None), body("moon", Some("earth"))]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("moon").unwrap().central_body.as_deref(), Some("earth"));
        assert!(store.get("mars").is_none());
        assert!(store.contains("earth"));
        assert_eq!(store.iter().next().unwrap().name, "earth");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut store = ElementStore::new();
        store.insert(body("earth", None)).unwrap();
        let err = store.insert(body("earth", None)).unwrap_err();
        assert!(matches!(err, EphemerisError::DuplicateBody(ref n) if n == "earth"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_validate_clean_catalog() {
        let store =
            ElementStore::from_bodies([body("earth", None), body("moon", Some("earth"))]).unwrap();
        assert!(store.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_missing_central_body() {
        let store = ElementStore::from_bodies([body("moon", Some("earth"))]).unwrap();
        assert_eq!(
            store.validate(),
            vec![CatalogIssue::MissingCentralBody {
                body: "moon".to_string(),
                central: "earth".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_reports_cycles() {
        let store = ElementStore::from_bodies([
            body("a", Some("b")),
            body("b", Some("a")),
            body("c", Some("c")),
            body("d", Some("a")),
        ])
        .unwrap();
        let issues = store.validate();
        for name in ["a", "b", "c", "d"] {
            assert!(
                issues.contains(&CatalogIssue::Cycle {
                    body: name.to_string()
                }),
                "missing cycle issue for {name}: {issues:?}"
            );
        }
    }

    #[test]
    fn test_ron_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog").join("bodies.ron");
        let store =
            ElementStore::from_bodies([body("earth", None), body("moon", Some("earth"))]).unwrap();
        store.save_ron(&path).unwrap();

        let loaded = ElementStore::load_ron(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("moon"), store.get("moon"));
    }

    #[test]
    fn test_spin_defaults_when_omitted() {
        let text = r#"(
            bodies: [
                (
                    name: "ceres",
                    elements: (
                        semi_major_axis: (2.77, 0.0),
                        eccentricity: (0.0785, 0.0),
                        inclination: (10.6, 0.0),
                        mean_longitude: (153.0, 7800.0),
                        longitude_of_perihelion: (153.9, 0.0),
                        longitude_of_node: (80.3, 0.0),
                    ),
                    radius_km: 469.7,
                ),
            ],
        )"#;
        let store = ElementStore::from_ron_str(text).unwrap();
        let ceres = store.get("ceres").unwrap();
        assert!(ceres.central_body.is_none());
        assert_eq!(ceres.spin, SpinSpec::default());
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        let err = ElementStore::from_ron_str("{{nope}}").unwrap_err();
        assert!(matches!(err, EphemerisError::ParseError(_)));
    }
}
