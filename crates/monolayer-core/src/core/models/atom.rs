use super::ids::InstanceId;
use nalgebra::Point3;

/// Represents a single particle of an assembled structure.
///
/// Every atom is owned by exactly one [`Instance`](super::instance::Instance): the surface,
/// one chain copy or one cap copy. Ownership is recorded on the atom itself so that
/// the ownership tree can be walked from the leaves without back-references.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The local name of the atom within its fragment (e.g., "C1", "H3", "Si12").
    pub name: String,
    /// The chemical element symbol (e.g., "C", "H", "Si").
    pub element: String,
    /// The ID of the instance that owns this atom.
    pub instance_id: InstanceId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom`.
    ///
    /// # Arguments
    ///
    /// * `name` - The local name of the atom.
    /// * `element` - The element symbol.
    /// * `instance_id` - The ID of the instance this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: &str, instance_id: InstanceId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            instance_id,
            position,
        }
    }
}
