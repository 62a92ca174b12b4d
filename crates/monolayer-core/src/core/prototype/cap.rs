use super::Attachable;
use super::fragment::Fragment;
use crate::core::models::template::TemplateAtom;
use nalgebra::{Point3, Vector3};

/// A small prototype used to cap surface sites no chain claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct CapGroup {
    fragment: Fragment,
}

impl CapGroup {
    pub fn new(fragment: Fragment) -> Self {
        Self { fragment }
    }

    /// A single hydrogen atom with its port pointing along `-z`.
    pub fn hydrogen() -> Self {
        Self {
            fragment: Fragment::single_atom(
                TemplateAtom::new("H", "H", Point3::origin()),
                -Vector3::z_axis(),
            ),
        }
    }
}

impl Default for CapGroup {
    fn default() -> Self {
        Self::hydrogen()
    }
}

impl Attachable for CapGroup {
    fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    fn fragment_mut(&mut self) -> &mut Fragment {
        &mut self.fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydrogen_cap_has_one_atom_and_no_bonds() {
        let cap = CapGroup::hydrogen();
        assert_eq!(cap.fragment().atom_count(), 1);
        assert_eq!(cap.fragment().bond_count(), 0);
        assert_eq!(cap.fragment().atoms()[0].element, "H");
        assert_eq!(cap.port_axis(), Vector3::z());
        assert_eq!(CapGroup::default(), cap);
    }
}
