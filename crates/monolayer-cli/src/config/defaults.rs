use crate::utils::parser::PatternSpec;
use monolayer::engine::config::DEFAULT_CHAIN_LENGTH;

pub struct DefaultsConfig {
    pub pattern: PatternSpec,
    pub min_separation: f64,
    pub tile_x: usize,
    pub tile_y: usize,
    pub chain_length: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pattern: PatternSpec::Full,
            min_separation: 0.0,
            tile_x: 1,
            tile_y: 1,
            chain_length: DEFAULT_CHAIN_LENGTH,
        }
    }
}
