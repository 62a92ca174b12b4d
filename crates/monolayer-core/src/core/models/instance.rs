use super::ids::AtomId;
use std::fmt;

/// The role a sub-structure plays in an assembled monolayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    /// The (tiled) surface slab.
    Surface,
    /// A copy of a chain prototype; `species` indexes the resolved chain specs.
    Chain { species: usize },
    /// A copy of the backfill cap group.
    Cap,
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceKind::Surface => write!(f, "surface"),
            InstanceKind::Chain { species } => write!(f, "chain-{}", species),
            InstanceKind::Cap => write!(f, "cap"),
        }
    }
}

/// Records the bond formed when an instance's port was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRecord {
    pub port_atom: AtomId, // Atom of this instance that carried the port
    pub site_atom: AtomId, // Surface atom it was bonded to
}

/// A node of the ownership tree directly below the assembly root.
///
/// An instance exclusively owns its atoms; an atom's index inside `atoms` is its
/// local index, which together with the instance label and ordinal makes every atom
/// path-addressable from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub name: String,            // Name of the template this instance was cloned from
    pub kind: InstanceKind,      // Role of the instance
    pub ordinal: usize,          // Position among instances of the same kind
    pub(crate) atoms: Vec<AtomId>,
    pub(crate) port: Option<PortRecord>,
}

impl Instance {
    pub(crate) fn new(name: &str, kind: InstanceKind, ordinal: usize) -> Self {
        Self {
            name: name.to_string(),
            kind,
            ordinal,
            atoms: Vec::new(),
            port: None,
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn port(&self) -> Option<&PortRecord> {
        self.port.as_ref()
    }

    /// Surfaces carry no port; chain and cap instances must have a closed one.
    pub fn requires_port(&self) -> bool {
        !matches!(self.kind, InstanceKind::Surface)
    }

    pub fn label(&self) -> String {
        format!("{}[{}]", self.kind, self.ordinal)
    }

    pub fn local_index_of(&self, atom_id: AtomId) -> Option<usize> {
        self.atoms.iter().position(|&id| id == atom_id)
    }
}
