use monolayer::core::pattern::{GridPattern, Pattern, PatternError, PatternGenerator, RandomPattern};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Unknown pattern kind in '{0}'. Expected 'grid:NXxNY', 'random:N' or 'full' (e.g., 'grid:8x8')."
    )]
    UnknownKind(String),

    #[error("Invalid grid dimensions in '{0}'. Expected 'grid:NXxNY' with positive integers.")]
    InvalidGridDimensions(String),

    #[error("Invalid point count in '{0}'. Expected 'random:N' with a positive integer.")]
    InvalidCount(String),

    #[error("Pattern '{0}' takes no arguments.")]
    UnexpectedArgument(String),
}

/// A placement pattern named on the command line or in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSpec {
    Grid { n_x: usize, n_y: usize },
    Random { count: usize },
    /// Every site receives a chain.
    Full,
}

impl PatternSpec {
    /// Generates the pattern; `Full` has no points and yields `None`.
    pub fn generate(
        &self,
        seed: Option<u64>,
        min_separation: f64,
    ) -> Result<Option<Pattern>, PatternError> {
        match *self {
            PatternSpec::Full => Ok(None),
            PatternSpec::Grid { n_x, n_y } => GridPattern::new(n_x, n_y).generate().map(Some),
            PatternSpec::Random { count } => {
                let mut generator = RandomPattern::new(count).with_min_separation(min_separation);
                if let Some(seed) = seed {
                    generator = generator.with_seed(seed);
                }
                generator.generate().map(Some)
            }
        }
    }
}

fn positive(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

/// Parses `grid:NXxNY`, `random:N` or `full`.
pub fn parse_pattern_spec(spec: &str) -> Result<PatternSpec, ParseError> {
    let spec = spec.trim();
    let (kind, argument) = match spec.split_once(':') {
        Some((kind, argument)) => (kind.trim(), Some(argument)),
        None => (spec, None),
    };

    match (kind.to_ascii_lowercase().as_str(), argument) {
        ("full", None) => Ok(PatternSpec::Full),
        ("full", Some(_)) => Err(ParseError::UnexpectedArgument(spec.to_string())),
        ("grid", Some(dims)) => {
            let (n_x, n_y) = dims
                .split_once(['x', 'X'])
                .and_then(|(nx, ny)| Some((positive(nx)?, positive(ny)?)))
                .ok_or_else(|| ParseError::InvalidGridDimensions(spec.to_string()))?;
            Ok(PatternSpec::Grid { n_x, n_y })
        }
        ("grid", None) => Err(ParseError::InvalidGridDimensions(spec.to_string())),
        ("random", Some(count)) => positive(count)
            .map(|count| PatternSpec::Random { count })
            .ok_or_else(|| ParseError::InvalidCount(spec.to_string())),
        ("random", None) => Err(ParseError::InvalidCount(spec.to_string())),
        _ => Err(ParseError::UnknownKind(spec.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_pattern_specs() {
        assert_eq!(
            parse_pattern_spec("grid:8x8"),
            Ok(PatternSpec::Grid { n_x: 8, n_y: 8 })
        );
        assert_eq!(
            parse_pattern_spec(" Grid:4X2 "),
            Ok(PatternSpec::Grid { n_x: 4, n_y: 2 })
        );
        assert_eq!(
            parse_pattern_spec("random:20"),
            Ok(PatternSpec::Random { count: 20 })
        );
        assert_eq!(parse_pattern_spec("full"), Ok(PatternSpec::Full));
    }

    #[test]
    fn rejects_malformed_grid_specs() {
        for spec in ["grid", "grid:8", "grid:0x8", "grid:ax3", "grid:8x"] {
            assert!(
                matches!(
                    parse_pattern_spec(spec),
                    Err(ParseError::InvalidGridDimensions(_))
                ),
                "{spec}"
            );
        }
    }

    #[test]
    fn rejects_malformed_random_and_unknown_specs() {
        assert_eq!(
            parse_pattern_spec("random:0"),
            Err(ParseError::InvalidCount("random:0".to_string()))
        );
        assert_eq!(
            parse_pattern_spec("random"),
            Err(ParseError::InvalidCount("random".to_string()))
        );
        assert_eq!(
            parse_pattern_spec("full:3"),
            Err(ParseError::UnexpectedArgument("full:3".to_string()))
        );
        assert_eq!(
            parse_pattern_spec("hexagonal:3"),
            Err(ParseError::UnknownKind("hexagonal:3".to_string()))
        );
    }

    #[test]
    fn full_spec_generates_no_pattern() {
        assert_eq!(PatternSpec::Full.generate(None, 0.0), Ok(None));
    }

    #[test]
    fn grid_spec_generates_every_point() {
        let pattern = PatternSpec::Grid { n_x: 4, n_y: 2 }
            .generate(None, 0.0)
            .unwrap()
            .unwrap();
        assert_eq!(pattern.len(), 8);
    }

    #[test]
    fn seeded_random_spec_is_reproducible() {
        let spec = PatternSpec::Random { count: 12 };
        let first = spec.generate(Some(7), 0.05).unwrap();
        let second = spec.generate(Some(7), 0.05).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.map(|p| p.len()), Some(12));
    }
}
