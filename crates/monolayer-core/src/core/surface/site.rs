use nalgebra::{Point3, Vector3};

/// An attachment point on a surface.
///
/// `position` is where a port atom is placed; `atom` is the index of the surface atom the
/// port atom bonds to. Only `occupied` changes during assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>, // Outward unit normal
    pub atom: usize,
    pub occupied: bool,
}

impl Site {
    /// Creates an unoccupied site. Returns `None` if `normal` has (near) zero length.
    pub fn new(position: Point3<f64>, normal: Vector3<f64>, atom: usize) -> Option<Self> {
        let normal = normal.try_normalize(1e-12)?;
        Some(Self {
            position,
            normal,
            atom,
            occupied: false,
        })
    }

    pub(crate) fn replicated(&self, offset: &Vector3<f64>, atom_shift: usize) -> Self {
        Self {
            position: self.position + offset,
            normal: self.normal,
            atom: self.atom + atom_shift,
            occupied: false,
        }
    }
}
