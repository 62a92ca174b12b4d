//! Surface-independent placement patterns.
//!
//! A [`Pattern`] holds points in normalized coordinates: `x` and `y` lie in `[0, 1)`
//! and are scaled into the tiled surface plane by the assembler. `z` is carried along
//! but never used for matching.

pub mod grid;
pub mod random;

use nalgebra::Point3;
use thiserror::Error;

pub use grid::GridPattern;
pub use random::RandomPattern;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatternError {
    #[error("Grid dimensions must be positive, got {n_x} x {n_y}")]
    EmptyGrid { n_x: usize, n_y: usize },
    #[error("Point {index} ({x}, {y}) lies outside the unit square")]
    OutOfBounds { index: usize, x: f64, y: f64 },
    #[error(
        "Placed only {placed} of {requested} points after {attempts} attempts at minimum separation {min_separation}"
    )]
    Saturated {
        placed: usize,
        requested: usize,
        attempts: usize,
        min_separation: f64,
    },
    #[error("Minimum separation must be finite and non-negative, got {0}")]
    InvalidSeparation(f64),
}

/// An ordered set of normalized placement points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pattern {
    points: Vec<Point3<f64>>,
}

impl Pattern {
    /// Creates a pattern, checking that every point lies in `[0, 1) × [0, 1)`.
    pub fn new(points: Vec<Point3<f64>>) -> Result<Self, PatternError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..1.0).contains(&v);
        if let Some((index, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !in_unit(p.x) || !in_unit(p.y))
        {
            return Err(PatternError::OutOfBounds {
                index,
                x: p.x,
                y: p.y,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Produces a fresh [`Pattern`] on every call.
pub trait PatternGenerator {
    fn generate(&self) -> Result<Pattern, PatternError>;
}
