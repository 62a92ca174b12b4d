use nalgebra::Vector3;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Box lengths must be finite and strictly positive, got ({lx}, {ly}, {lz})")]
pub struct InvalidBoxError {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
}

/// An orthorhombic periodic box `{Lx, Ly, Lz}` in Angstroms.
///
/// Surfaces are periodic in x and y only; `lz` describes the extent of the cell
/// along the surface normal and is never scaled by tiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBox {
    lengths: Vector3<f64>,
}

impl PeriodicBox {
    pub fn new(lx: f64, ly: f64, lz: f64) -> Result<Self, InvalidBoxError> {
        let valid = [lx, ly, lz].iter().all(|l| l.is_finite() && *l > 0.0);
        if !valid {
            return Err(InvalidBoxError { lx, ly, lz });
        }
        Ok(Self {
            lengths: Vector3::new(lx, ly, lz),
        })
    }

    pub fn lx(&self) -> f64 {
        self.lengths.x
    }

    pub fn ly(&self) -> f64 {
        self.lengths.y
    }

    pub fn lz(&self) -> f64 {
        self.lengths.z
    }

    pub fn lengths(&self) -> Vector3<f64> {
        self.lengths
    }

    /// Returns the box scaled by `(tile_x, tile_y, 1)`.
    pub fn tiled(&self, tile_x: usize, tile_y: usize) -> Self {
        Self {
            lengths: Vector3::new(
                self.lengths.x * tile_x as f64,
                self.lengths.y * tile_y as f64,
                self.lengths.z,
            ),
        }
    }
}

impl fmt::Display for PeriodicBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lx={:.4} Ly={:.4} Lz={:.4}",
            self.lengths.x, self.lengths.y, self.lengths.z
        )
    }
}
