//! # Core Module
//!
//! This module provides the fundamental building blocks for monolayer assembly.
//!
//! ## Architecture
//!
//! - **Structural Representation** ([`models`]) - Atoms, bonds, instances and the assembled
//!   structure with its periodic box
//! - **Surfaces** ([`surface`]) - Attachment sites, surface templates and periodic tiling
//! - **Prototypes** ([`prototype`]) - Chain and cap fragments exposing a single port
//! - **Patterns** ([`pattern`]) - Surface-independent placement point sets
//! - **Definitions** ([`definitions`]) - TOML descriptions of fragments and surfaces
//! - **Utilities** ([`utils`]) - Rigid-body geometry helpers

pub mod definitions;
pub mod models;
pub mod pattern;
pub mod prototype;
pub mod surface;
pub mod utils;
