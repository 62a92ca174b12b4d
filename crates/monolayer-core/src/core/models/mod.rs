//! # Core Models Module
//!
//! This module contains the data structures used to represent an assembled monolayer.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual particle with element, coordinates and owning instance
//! - [`topology`] - Bonds, bond orders and the distinction between internal and attachment bonds
//! - [`instance`] - A sub-structure (surface, chain copy or cap copy) owning a set of atoms
//! - [`assembly`] - The complete structure: atoms, bonds, ownership tree and periodic box
//! - [`periodic`] - The orthorhombic periodic box descriptor
//! - [`template`] - Index-addressed atoms and bonds shared by surface and fragment templates
//! - [`ids`] - Stable identifier types for atoms and instances
//!
//! ## Usage
//!
//! ```ignore
//! use monolayer::core::models::{assembly::Assembly, atom::Atom, instance::InstanceKind};
//!
//! let mut assembly = Assembly::new(PeriodicBox::new(10.0, 10.0, 20.0)?);
//! let surface_id = assembly.add_instance("surface", InstanceKind::Surface);
//! let atom_id = assembly.add_atom_to_instance(surface_id, Atom::new("Si1", "Si", surface_id, Point3::origin()));
//! ```

pub mod assembly;
pub mod atom;
pub mod ids;
pub mod instance;
pub mod periodic;
pub mod template;
pub mod topology;
