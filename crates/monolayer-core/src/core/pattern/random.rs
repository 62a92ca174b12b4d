use super::{Pattern, PatternError, PatternGenerator};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const ATTEMPTS_PER_POINT: usize = 1000;
const MAX_PREALLOCATED_POINTS: usize = 1 << 16;

/// `count` points drawn uniformly over the unit square.
///
/// A candidate closer than `min_separation` (in normalized units) to an accepted point
/// is rejected. Without a seed every call draws from fresh entropy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomPattern {
    pub count: usize,
    pub min_separation: f64,
    pub seed: Option<u64>,
}

impl RandomPattern {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            min_separation: 0.0,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_min_separation(mut self, min_separation: f64) -> Self {
        self.min_separation = min_separation;
        self
    }

    /// Candidate draws allowed before giving up, saturating for huge counts.
    fn attempt_budget(&self) -> usize {
        ATTEMPTS_PER_POINT.saturating_mul(self.count)
    }
}

impl PatternGenerator for RandomPattern {
    fn generate(&self) -> Result<Pattern, PatternError> {
        if !self.min_separation.is_finite() || self.min_separation < 0.0 {
            return Err(PatternError::InvalidSeparation(self.min_separation));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let max_attempts = self.attempt_budget();
        let min_sq = self.min_separation * self.min_separation;

        let mut points: Vec<Point3<f64>> = Vec::with_capacity(self.count.min(MAX_PREALLOCATED_POINTS));
        let mut attempts = 0;
        while points.len() < self.count {
            if attempts == max_attempts {
                return Err(PatternError::Saturated {
                    placed: points.len(),
                    requested: self.count,
                    attempts,
                    min_separation: self.min_separation,
                });
            }
            attempts += 1;

            let candidate = Point3::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), 0.0);
            let too_close = min_sq > 0.0
                && points
                    .iter()
                    .any(|p| (p - candidate).norm_squared() < min_sq);
            if !too_close {
                points.push(candidate);
            }
        }

        debug!(
            count = self.count,
            attempts, "Random pattern generated"
        );
        Pattern::new(points)
    }
}
