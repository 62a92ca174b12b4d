use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// A non-fatal event produced while assembling a monolayer.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// No fractions were given; one species occupies every matched site.
    DefaultSpecies { prototype: String },
    SurfaceTiled {
        tile_x: usize,
        tile_y: usize,
        sites: usize,
    },
    SitesMatched { matched: usize, available: usize },
    SpeciesAdded {
        species: usize,
        prototype: String,
        count: usize,
    },
    Backfilled { cap: String, count: usize },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::DefaultSpecies { .. } => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Forwards the diagnostic to `tracing` at a level matching its severity.
    pub fn log(&self) {
        match self.severity() {
            Severity::Warning => warn!("{}", self),
            Severity::Info => info!("{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DefaultSpecies { prototype } => write!(
                f,
                "No fractions provided; defaulting to a single species '{}'",
                prototype
            ),
            Diagnostic::SurfaceTiled {
                tile_x,
                tile_y,
                sites,
            } => write!(f, "Surface tiled {}x{}: {} sites", tile_x, tile_y, sites),
            Diagnostic::SitesMatched { matched, available } => {
                write!(f, "Matched {} of {} sites", matched, available)
            }
            Diagnostic::SpeciesAdded {
                species,
                prototype,
                count,
            } => write!(
                f,
                "Added {} copies of species {} '{}'",
                count, species, prototype
            ),
            Diagnostic::Backfilled { cap, count } => {
                write!(f, "Backfilled {} sites with '{}'", count, cap)
            }
        }
    }
}
