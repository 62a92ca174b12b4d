use super::topology::BondOrder;
use nalgebra::{Point3, Rotation3, Vector3};

/// An atom of a read-only template, addressed by its index in the template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateAtom {
    pub name: String,
    pub element: String,
    pub position: Point3<f64>,
}

impl TemplateAtom {
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            position,
        }
    }

    pub(crate) fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            position: self.position + offset,
            ..self.clone()
        }
    }

    /// Applies `rotation` about `pivot`, then moves `pivot` onto `target`.
    pub(crate) fn transform(
        &mut self,
        rotation: &Rotation3<f64>,
        pivot: &Point3<f64>,
        target: &Point3<f64>,
    ) {
        self.position = target + rotation * (self.position - pivot);
    }
}

/// A bond between two template atoms, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateBond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

impl TemplateBond {
    pub fn new(a: usize, b: usize, order: BondOrder) -> Self {
        Self { a, b, order }
    }

    pub fn single(a: usize, b: usize) -> Self {
        Self::new(a, b, BondOrder::Single)
    }

    pub(crate) fn shifted(&self, by: usize) -> Self {
        Self::new(self.a + by, self.b + by, self.order)
    }

    /// Index of the first bond whose endpoints are out of range or identical.
    pub(crate) fn find_invalid(bonds: &[TemplateBond], atom_count: usize) -> Option<usize> {
        bonds
            .iter()
            .position(|bond| bond.a >= atom_count || bond.b >= atom_count || bond.a == bond.b)
    }
}
