use super::template::SurfaceError;
use crate::core::models::periodic::PeriodicBox;
use itertools::iproduct;
use nalgebra::Vector3;

/// Computes the periodic box and copy offsets of a tiled surface cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicityTracker {
    base_box: PeriodicBox,
    lattice_a: Vector3<f64>,
    lattice_b: Vector3<f64>,
}

impl PeriodicityTracker {
    pub fn new(base_box: PeriodicBox, lattice_a: Vector3<f64>, lattice_b: Vector3<f64>) -> Self {
        Self {
            base_box,
            lattice_a,
            lattice_b,
        }
    }

    pub fn base_box(&self) -> &PeriodicBox {
        &self.base_box
    }

    /// Box of the `tile_x × tile_y` supercell; `lz` is unchanged.
    pub fn tiled_box(&self, tile_x: usize, tile_y: usize) -> Result<PeriodicBox, SurfaceError> {
        Self::check_factors(tile_x, tile_y)?;
        Ok(self.base_box.tiled(tile_x, tile_y))
    }

    /// Translation of every cell copy, `y` outer and `x` inner.
    pub fn offsets(&self, tile_x: usize, tile_y: usize) -> Result<Vec<Vector3<f64>>, SurfaceError> {
        Self::check_factors(tile_x, tile_y)?;
        Ok(iproduct!(0..tile_y, 0..tile_x)
            .map(|(iy, ix)| self.lattice_a * ix as f64 + self.lattice_b * iy as f64)
            .collect())
    }

    /// Lattice vectors of the supercell.
    pub fn tiled_lattice(&self, tile_x: usize, tile_y: usize) -> (Vector3<f64>, Vector3<f64>) {
        (
            self.lattice_a * tile_x as f64,
            self.lattice_b * tile_y as f64,
        )
    }

    fn check_factors(tile_x: usize, tile_y: usize) -> Result<(), SurfaceError> {
        if tile_x < 1 || tile_y < 1 {
            return Err(SurfaceError::InvalidTiling { tile_x, tile_y });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PeriodicityTracker {
        PeriodicityTracker::new(
            PeriodicBox::new(4.0, 5.0, 30.0).unwrap(),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(0.0, 5.0, 0.0),
        )
    }

    #[test]
    fn tiled_box_scales_in_plane_lengths() {
        let tiled = tracker().tiled_box(3, 2).unwrap();
        assert_eq!((tiled.lx(), tiled.ly(), tiled.lz()), (12.0, 10.0, 30.0));
    }

    #[test]
    fn offsets_are_row_major_with_y_outer() {
        let offsets = tracker().offsets(2, 2).unwrap();
        assert_eq!(
            offsets,
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(4.0, 0.0, 0.0),
                Vector3::new(0.0, 5.0, 0.0),
                Vector3::new(4.0, 5.0, 0.0),
            ]
        );
    }

    #[test]
    fn single_tile_has_only_the_zero_offset() {
        assert_eq!(tracker().offsets(1, 1).unwrap(), vec![Vector3::zeros()]);
    }

    #[test]
    fn zero_factors_are_rejected() {
        assert_eq!(
            tracker().tiled_box(0, 1),
            Err(SurfaceError::InvalidTiling { tile_x: 0, tile_y: 1 })
        );
        assert!(tracker().offsets(2, 0).is_err());
    }

    #[test]
    fn tiled_lattice_scales_each_vector() {
        let (a, b) = tracker().tiled_lattice(3, 2);
        assert_eq!(a, Vector3::new(12.0, 0.0, 0.0));
        assert_eq!(b, Vector3::new(0.0, 10.0, 0.0));
    }
}
