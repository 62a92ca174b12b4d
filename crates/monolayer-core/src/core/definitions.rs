use super::models::periodic::PeriodicBox;
use super::models::template::{TemplateAtom, TemplateBond};
use super::models::topology::BondOrder;
use super::prototype::fragment::{Fragment, FragmentError, Port};
use super::surface::site::Site;
use super::surface::template::{SurfaceError, SurfaceTemplate};
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid definition in '{path}': {reason}")]
    Invalid { path: String, reason: String },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AtomDefinition {
    pub name: String,
    pub element: String,
    pub position: [f64; 3],
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BondDefinition {
    pub a: usize,
    pub b: usize,
    #[serde(default)]
    pub order: BondOrder,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PortDefinition {
    pub anchor: usize,
    pub direction: [f64; 3],
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteDefinition {
    pub atom: usize,
    pub position: [f64; 3],
    pub normal: [f64; 3],
}

/// A chain or cap fragment as written in a TOML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FragmentDefinition {
    pub name: String,
    #[serde(default)]
    pub periodic: bool,
    pub atoms: Vec<AtomDefinition>,
    #[serde(default)]
    pub bonds: Vec<BondDefinition>,
    pub port: PortDefinition,
}

/// A surface unit cell as written in a TOML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SurfaceDefinition {
    pub name: String,
    #[serde(rename = "box")]
    pub periodic_box: [f64; 3],
    pub lattice_a: [f64; 3],
    pub lattice_b: [f64; 3],
    pub atoms: Vec<AtomDefinition>,
    #[serde(default)]
    pub bonds: Vec<BondDefinition>,
    pub sites: Vec<SiteDefinition>,
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, DefinitionLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| DefinitionLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| DefinitionLoadError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn invalid(path: &Path, reason: impl ToString) -> DefinitionLoadError {
    DefinitionLoadError::Invalid {
        path: path.to_string_lossy().to_string(),
        reason: reason.to_string(),
    }
}

fn template_atoms(atoms: &[AtomDefinition]) -> Vec<TemplateAtom> {
    atoms
        .iter()
        .map(|a| TemplateAtom::new(&a.name, &a.element, Point3::from(a.position)))
        .collect()
}

fn template_bonds(bonds: &[BondDefinition]) -> Vec<TemplateBond> {
    bonds
        .iter()
        .map(|b| TemplateBond::new(b.a, b.b, b.order))
        .collect()
}

impl FragmentDefinition {
    pub fn load(path: &Path) -> Result<Self, DefinitionLoadError> {
        read_toml(path)
    }

    pub fn to_fragment(&self) -> Result<Fragment, FragmentError> {
        Fragment::new(
            &self.name,
            template_atoms(&self.atoms),
            template_bonds(&self.bonds),
            Port::open(self.port.anchor, Vector3::from(self.port.direction)),
            self.periodic,
        )
    }
}

impl SurfaceDefinition {
    pub fn load(path: &Path) -> Result<Self, DefinitionLoadError> {
        read_toml(path)
    }

    pub fn to_surface(&self) -> Result<SurfaceTemplate, SurfaceError> {
        let [lx, ly, lz] = self.periodic_box;
        let sites = self
            .sites
            .iter()
            .map(|s| Site {
                position: Point3::from(s.position),
                normal: Vector3::from(s.normal),
                atom: s.atom,
                occupied: false,
            })
            .collect();
        SurfaceTemplate::new(
            &self.name,
            template_atoms(&self.atoms),
            template_bonds(&self.bonds),
            sites,
            PeriodicBox::new(lx, ly, lz)?,
            Vector3::from(self.lattice_a),
            Vector3::from(self.lattice_b),
        )
    }
}

/// Loads and validates a fragment definition file.
pub fn load_fragment(path: &Path) -> Result<Fragment, DefinitionLoadError> {
    FragmentDefinition::load(path)?
        .to_fragment()
        .map_err(|e| invalid(path, e))
}

/// Loads and validates a surface definition file.
pub fn load_surface(path: &Path) -> Result<SurfaceTemplate, DefinitionLoadError> {
    SurfaceDefinition::load(path)?
        .to_surface()
        .map_err(|e| invalid(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const ETHYL: &str = r#"
        name = "ethyl"

        [[atoms]]
        name = "C1"
        element = "C"
        position = [0.0, 0.0, 0.0]

        [[atoms]]
        name = "C2"
        element = "C"
        position = [0.0, 0.0, 1.54]

        [[bonds]]
        a = 0
        b = 1

        [port]
        anchor = 0
        direction = [0.0, 0.0, -2.0]
    "#;

    const GOLD_CELL: &str = r#"
        name = "gold"
        box = [2.88, 2.88, 30.0]
        lattice-a = [2.88, 0.0, 0.0]
        lattice-b = [0.0, 2.88, 0.0]

        [[atoms]]
        name = "Au1"
        element = "Au"
        position = [0.0, 0.0, 0.0]

        [[atoms]]
        name = "S1"
        element = "S"
        position = [0.0, 0.0, 2.4]

        [[bonds]]
        a = 0
        b = 1
        order = "single"

        [[sites]]
        atom = 1
        position = [0.0, 0.0, 4.2]
        normal = [0.0, 0.0, 1.0]
    "#;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn load_fragment_succeeds_with_valid_toml() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "ethyl.toml", ETHYL);

        let fragment = load_fragment(&path).unwrap();
        assert_eq!(fragment.name(), "ethyl");
        assert_eq!(fragment.atom_count(), 2);
        assert_eq!(fragment.bond_count(), 1);
        assert_eq!(fragment.bonds()[0].order, BondOrder::Single);
        assert_eq!(fragment.port().direction, -Vector3::z());
        assert!(!fragment.is_periodic());
    }

    #[test]
    fn load_surface_succeeds_with_valid_toml() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "gold.toml", GOLD_CELL);

        let surface = load_surface(&path).unwrap();
        assert_eq!(surface.name(), "gold");
        assert_eq!(surface.site_count(), 1);
        assert_eq!(surface.periodic_box().lz(), 30.0);
        assert_eq!(surface.tile(3, 3).unwrap().site_count(), 9);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_fragment(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(DefinitionLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_unknown_fields() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "bad.toml", &format!("{}\ncolor = \"red\"", ETHYL));
        assert!(matches!(
            load_fragment(&path),
            Err(DefinitionLoadError::Toml { .. })
        ));
    }

    #[test]
    fn load_fails_for_invalid_port_anchor() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "bad.toml", &ETHYL.replace("anchor = 0", "anchor = 5"));
        let err = load_fragment(&path).unwrap_err();
        assert!(matches!(err, DefinitionLoadError::Invalid { .. }));
        assert!(err.to_string().contains("anchor 5"));
    }

    #[test]
    fn load_fails_for_invalid_surface_box() {
        let dir = tempdir().unwrap();
        let path = write_file(
            &dir,
            "bad.toml",
            &GOLD_CELL.replace("box = [2.88, 2.88, 30.0]", "box = [2.88, 0.0, 30.0]"),
        );
        assert!(matches!(
            load_surface(&path),
            Err(DefinitionLoadError::Invalid { .. })
        ));
    }
}
