//! # Monolayer Core Library
//!
//! A library for assembling periodic monolayers: a crystalline surface whose attachment
//! sites are decorated with copies of one or more chain fragments according to a placement
//! pattern, with every unclaimed site capped by a small backfill group.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that geometry, orchestration and the
//! public entry points stay separate and individually testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Assembly`, `SurfaceTemplate`,
//!   `Fragment`), placement patterns, geometric utilities and TOML definitions.
//!
//! - **[`engine`]: The Logic Core.** Configuration, error taxonomy, structured diagnostics,
//!   progress reporting, and the two algorithms that drive assembly: nearest-site pattern
//!   matching and largest-remainder fraction partitioning.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into the complete
//!   tile → match → partition → attach → backfill → merge procedure.

pub mod core;
pub mod engine;
pub mod workflows;
