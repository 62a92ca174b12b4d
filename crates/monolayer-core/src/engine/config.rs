use crate::core::pattern::Pattern;
use crate::core::prototype::cap::CapGroup;
use thiserror::Error;

pub const DEFAULT_CHAIN_LENGTH: usize = 10;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Tiling factors must be at least 1, got {tile_x} x {tile_y}")]
    InvalidTiling { tile_x: usize, tile_y: usize },
    #[error("Chain length must be at least 1")]
    ZeroChainLength,
}

/// Options recognized by the monolayer assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Placement points; `None` fills every site with chains.
    pub pattern: Option<Pattern>,
    pub tile_x: usize,
    pub tile_y: usize,
    /// Forwarded to the default alkyl chain when no prototype is supplied.
    pub chain_length: usize,
    pub backfill: CapGroup,
    /// Parallel to the chain prototypes; `None` selects the single-species path.
    pub fractions: Option<Vec<f64>>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            pattern: None,
            tile_x: 1,
            tile_y: 1,
            chain_length: DEFAULT_CHAIN_LENGTH,
            backfill: CapGroup::hydrogen(),
            fractions: None,
        }
    }
}

#[derive(Default)]
pub struct AssemblyConfigBuilder {
    pattern: Option<Pattern>,
    tile_x: Option<usize>,
    tile_y: Option<usize>,
    chain_length: Option<usize>,
    backfill: Option<CapGroup>,
    fractions: Option<Vec<f64>>,
}

impl AssemblyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
    pub fn tile_x(mut self, factor: usize) -> Self {
        self.tile_x = Some(factor);
        self
    }
    pub fn tile_y(mut self, factor: usize) -> Self {
        self.tile_y = Some(factor);
        self
    }
    pub fn tiling(self, tile_x: usize, tile_y: usize) -> Self {
        self.tile_x(tile_x).tile_y(tile_y)
    }
    pub fn chain_length(mut self, length: usize) -> Self {
        self.chain_length = Some(length);
        self
    }
    pub fn backfill(mut self, cap: CapGroup) -> Self {
        self.backfill = Some(cap);
        self
    }
    pub fn fractions(mut self, fractions: Vec<f64>) -> Self {
        self.fractions = Some(fractions);
        self
    }

    pub fn build(self) -> Result<AssemblyConfig, ConfigError> {
        let defaults = AssemblyConfig::default();
        let tile_x = self.tile_x.unwrap_or(defaults.tile_x);
        let tile_y = self.tile_y.unwrap_or(defaults.tile_y);
        if tile_x < 1 || tile_y < 1 {
            return Err(ConfigError::InvalidTiling { tile_x, tile_y });
        }
        let chain_length = self.chain_length.unwrap_or(defaults.chain_length);
        if chain_length == 0 {
            return Err(ConfigError::ZeroChainLength);
        }

        Ok(AssemblyConfig {
            pattern: self.pattern,
            tile_x,
            tile_y,
            chain_length,
            backfill: self.backfill.unwrap_or(defaults.backfill),
            fractions: self.fractions,
        })
    }
}
