use super::{Pattern, PatternError, PatternGenerator};
use itertools::iproduct;
use nalgebra::Point3;

/// `n_x · n_y` points evenly spaced over the unit square, `y` outer and `x` inner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPattern {
    pub n_x: usize,
    pub n_y: usize,
}

impl GridPattern {
    pub fn new(n_x: usize, n_y: usize) -> Self {
        Self { n_x, n_y }
    }
}

impl PatternGenerator for GridPattern {
    fn generate(&self) -> Result<Pattern, PatternError> {
        if self.n_x == 0 || self.n_y == 0 {
            return Err(PatternError::EmptyGrid {
                n_x: self.n_x,
                n_y: self.n_y,
            });
        }
        let points = iproduct!(0..self.n_y, 0..self.n_x)
            .map(|(j, i)| {
                Point3::new(
                    i as f64 / self.n_x as f64,
                    j as f64 / self.n_y as f64,
                    0.0,
                )
            })
            .collect();
        Pattern::new(points)
    }
}
