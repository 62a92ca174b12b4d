//! # Workflows Module
//!
//! High-level entry points that run the complete assembly pipeline.
//!
//! - **Assembly Workflow** ([`assemble`]) - Tiles the surface, matches pattern points to
//!   sites, partitions them among chain species, attaches chains, backfills the remaining
//!   sites with caps and merges everything into one [`Assembly`](crate::core::models::assembly::Assembly).

pub mod assemble;
