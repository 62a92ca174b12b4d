//! # Engine Module
//!
//! Configuration, error taxonomy and the algorithms that drive monolayer assembly.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Assembly options and their builder
//! - **Species** ([`species`]) - Resolution of chain prototypes and fractions into chain specs
//! - **Matching** ([`matching`]) - Nearest-site mapping of pattern points onto surface sites
//! - **Partitioning** ([`partition`]) - Largest-remainder counts and proportional interleaving
//! - **Diagnostics** ([`diagnostics`]) - Structured, non-fatal events returned to the caller
//! - **Progress Monitoring** ([`progress`]) - Phase and task callbacks for front ends
//! - **Error Handling** ([`error`]) - The error type raised by the assembly workflow

pub mod config;
pub mod diagnostics;
pub mod error;
pub(crate) mod matching;
pub(crate) mod partition;
pub mod progress;
pub mod species;
