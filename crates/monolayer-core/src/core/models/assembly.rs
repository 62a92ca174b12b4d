use super::atom::Atom;
use super::ids::{AtomId, InstanceId};
use super::instance::{Instance, InstanceKind, PortRecord};
use super::periodic::PeriodicBox;
use super::topology::{Bond, BondKind, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;
use std::fmt;

/// Represents an assembled monolayer: atoms, bonds, ownership tree and periodic box.
///
/// Atoms and instances live in slot maps. Nothing is ever removed during assembly, so
/// iteration order equals insertion order and identical inputs yield identical orderings.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for instances (children of the ownership root).
    instances: SlotMap<InstanceId, Instance>,
    /// Instance IDs in insertion order.
    instance_order: Vec<InstanceId>,
    /// Next ordinal to hand out per instance kind.
    ordinals: HashMap<InstanceKind, usize>,
    /// List of all bonds.
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
    /// The periodic box of the assembled cell.
    periodic_box: PeriodicBox,
}

impl Assembly {
    /// Creates a new, empty assembly with the given periodic box.
    pub fn new(periodic_box: PeriodicBox) -> Self {
        Self {
            atoms: SlotMap::with_key(),
            instances: SlotMap::with_key(),
            instance_order: Vec::new(),
            ordinals: HashMap::new(),
            bonds: Vec::new(),
            bond_adjacency: SecondaryMap::new(),
            periodic_box,
        }
    }

    /// Retrieves an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in insertion order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Retrieves an instance by its ID.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id)
    }

    /// Returns an iterator over all instances in insertion order.
    pub fn instances_iter(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instance_order
            .iter()
            .filter_map(|&id| self.instances.get(id).map(|instance| (id, instance)))
    }

    /// Returns an iterator over the instances of one kind.
    pub fn instances_of_kind(
        &self,
        kind: InstanceKind,
    ) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances_iter()
            .filter(move |(_, instance)| instance.kind == kind)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn particle_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn periodic_box(&self) -> &PeriodicBox {
        &self.periodic_box
    }

    /// Adds a new, empty instance below the root of the ownership tree.
    ///
    /// Ordinals are assigned per kind in insertion order, starting at zero.
    pub fn add_instance(&mut self, name: &str, kind: InstanceKind) -> InstanceId {
        let ordinal = self.ordinals.entry(kind).or_insert(0);
        let instance = Instance::new(name, kind, *ordinal);
        *ordinal += 1;

        let id = self.instances.insert(instance);
        self.instance_order.push(id);
        id
    }

    /// Adds an atom to an instance.
    ///
    /// The atom's `instance_id` is overwritten with `instance_id`, so ownership can only
    /// ever point at the instance that lists the atom.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (the instance doesn't exist).
    pub fn add_atom_to_instance(&mut self, instance_id: InstanceId, mut atom: Atom) -> Option<AtomId> {
        let instance = self.instances.get_mut(instance_id)?;
        atom.instance_id = instance_id;

        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        instance.atoms.push(atom_id);

        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Adding an existing bond succeeds without creating a duplicate.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (an atom doesn't exist or the
    /// two IDs are identical).
    pub fn add_bond(
        &mut self,
        atom1_id: AtomId,
        atom2_id: AtomId,
        order: BondOrder,
        kind: BondKind,
    ) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        if self.bond_adjacency[atom1_id].contains(&atom2_id) {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order, kind));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    /// Forms the attachment bond of an instance and records its port as closed.
    ///
    /// # Return
    ///
    /// Returns `None` if the instance does not own `port_atom`, if `site_atom` belongs to
    /// the same instance, or if the instance's port was already recorded.
    pub fn close_port(
        &mut self,
        instance_id: InstanceId,
        port_atom: AtomId,
        site_atom: AtomId,
    ) -> Option<()> {
        let instance = self.instances.get(instance_id)?;
        if instance.port.is_some()
            || !instance.atoms.contains(&port_atom)
            || instance.atoms.contains(&site_atom)
        {
            return None;
        }

        self.add_bond(port_atom, site_atom, BondOrder::Single, BondKind::Attachment)?;
        self.instances[instance_id].port = Some(PortRecord {
            port_atom,
            site_atom,
        });
        Some(())
    }

    pub fn get_bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Number of chain or cap instances whose port has not been closed.
    pub fn open_port_count(&self) -> usize {
        self.instances
            .values()
            .filter(|instance| instance.requires_port() && instance.port.is_none())
            .count()
    }

    /// Returns the root-relative path of an atom, e.g. `"chain-0[12]/3"`.
    pub fn atom_path(&self, atom_id: AtomId) -> Option<String> {
        let atom = self.atoms.get(atom_id)?;
        let instance = self.instances.get(atom.instance_id)?;
        let local = instance.local_index_of(atom_id)?;
        Some(format!("{}/{}", instance.label(), local))
    }

    /// Resolves a path produced by [`Assembly::atom_path`] back to an atom ID.
    pub fn resolve_path(&self, path: &str) -> Option<AtomId> {
        let (label, local) = path.rsplit_once('/')?;
        let local: usize = local.parse().ok()?;
        self.instances_iter()
            .find(|(_, instance)| instance.label() == label)
            .and_then(|(_, instance)| instance.atoms.get(local).copied())
    }

    /// Returns the number of chain instances per species index, sorted by species.
    pub fn species_counts(&self) -> Vec<(usize, usize)> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for instance in self.instances.values() {
            if let InstanceKind::Chain { species } = instance.kind {
                *counts.entry(species).or_insert(0) += 1;
            }
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_unstable();
        counts
    }

    /// A human-readable one-line description; not a stable serialization format.
    pub fn summary(&self) -> String {
        format!(
            "Assembly: {} particles, {} bonds, {} instances, box [{}]",
            self.particle_count(),
            self.bond_count(),
            self.instance_count(),
            self.periodic_box
        )
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
