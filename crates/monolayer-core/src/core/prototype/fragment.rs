use crate::core::models::template::{TemplateAtom, TemplateBond};
use crate::core::surface::site::Site;
use crate::core::utils::geometry::rotation_to_align;
use nalgebra::{Point3, Unit, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FragmentError {
    #[error("Fragment has no atoms")]
    NoAtoms,
    #[error("Port anchor {anchor} is out of range for a fragment of {atom_count} atoms")]
    AnchorOutOfRange { anchor: usize, atom_count: usize },
    #[error("Bond {bond} refers to a missing atom or bonds an atom to itself")]
    InvalidBond { bond: usize },
    #[error("Port direction has zero length")]
    DegeneratePort,
    #[error("Invalid fragment parameter: {0}")]
    InvalidParameter(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachError {
    #[error("Port of '{fragment}' is already closed")]
    PortClosed { fragment: String },
    #[error("Cannot orient '{fragment}' onto a site with a zero-length normal")]
    DegenerateGeometry { fragment: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortState {
    #[default]
    Open,
    Closed,
}

/// A directed attachment marker on one atom of a fragment.
///
/// `direction` points from the anchor atom towards the atom it will bond to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    pub anchor: usize,
    pub direction: Vector3<f64>,
    pub state: PortState,
}

impl Port {
    pub fn open(anchor: usize, direction: Vector3<f64>) -> Self {
        Self {
            anchor,
            direction,
            state: PortState::Open,
        }
    }
}

/// The bond to form after a successful attachment, as local indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub port_atom: usize, // Index into the fragment's atoms
    pub site_atom: usize, // Index into the surface's atoms
}

/// A molecular fragment with exactly one port.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    name: String,
    atoms: Vec<TemplateAtom>,
    bonds: Vec<TemplateBond>,
    port: Port,
    periodic: bool,
}

impl Fragment {
    pub fn new(
        name: &str,
        atoms: Vec<TemplateAtom>,
        bonds: Vec<TemplateBond>,
        port: Port,
        periodic: bool,
    ) -> Result<Self, FragmentError> {
        if atoms.is_empty() {
            return Err(FragmentError::NoAtoms);
        }
        if port.anchor >= atoms.len() {
            return Err(FragmentError::AnchorOutOfRange {
                anchor: port.anchor,
                atom_count: atoms.len(),
            });
        }
        if let Some(bond) = TemplateBond::find_invalid(&bonds, atoms.len()) {
            return Err(FragmentError::InvalidBond { bond });
        }
        let direction = port
            .direction
            .try_normalize(1e-12)
            .ok_or(FragmentError::DegeneratePort)?;

        Ok(Self {
            name: name.to_string(),
            atoms,
            bonds,
            port: Port { direction, ..port },
            periodic,
        })
    }

    /// A one-atom fragment whose port sits on that atom.
    pub fn single_atom(atom: TemplateAtom, direction: Unit<Vector3<f64>>) -> Self {
        Self {
            name: atom.name.clone(),
            atoms: vec![atom],
            bonds: Vec::new(),
            port: Port::open(0, direction.into_inner()),
            periodic: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[TemplateAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[TemplateBond] {
        &self.bonds
    }

    pub fn port(&self) -> &Port {
        &self.port
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    pub fn is_port_open(&self) -> bool {
        self.port.state == PortState::Open
    }

    pub fn port_position(&self) -> Point3<f64> {
        self.atoms[self.port.anchor].position
    }

    /// Unit vector from the port into the body of the fragment.
    pub fn port_axis(&self) -> Vector3<f64> {
        -self.port.direction
    }

    /// Rotates the port axis onto `site.normal`, moves the port atom onto
    /// `site.position` and closes the port.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::PortClosed`] if the port was already consumed; the fragment
    /// is left untouched in that case.
    pub fn attach(&mut self, site: &Site) -> Result<Attachment, AttachError> {
        if !self.is_port_open() {
            return Err(AttachError::PortClosed {
                fragment: self.name.clone(),
            });
        }
        let rotation = rotation_to_align(&self.port_axis(), &site.normal).ok_or_else(|| {
            AttachError::DegenerateGeometry {
                fragment: self.name.clone(),
            }
        })?;

        let pivot = self.port_position();
        for atom in &mut self.atoms {
            atom.transform(&rotation, &pivot, &site.position);
        }
        self.port.direction = rotation * self.port.direction;
        self.port.state = PortState::Closed;

        Ok(Attachment {
            port_atom: self.port.anchor,
            site_atom: site.atom,
        })
    }
}
