//! Chain and cap prototypes exposing a single port.
//!
//! Any type implementing [`Attachable`] can be cloned per site and attached to it:
//!
//! - [`rigid::RigidPrototype`] - a fixed fragment, usually loaded from a definition file
//! - [`flexible::FlexiblePrototype`] - a parametric chain rebuilt for a requested length
//! - [`cap::CapGroup`] - a small backfill group for unclaimed sites
//!
//! [`ChainPrototype`] is the closed set of chain variants the assembler accepts.

pub mod cap;
pub mod flexible;
pub mod fragment;
pub mod rigid;

use crate::core::surface::site::Site;
use flexible::FlexiblePrototype;
use fragment::{AttachError, Attachment, Fragment};
use nalgebra::{Point3, Vector3};
use rigid::RigidPrototype;

/// The attachment capability shared by every prototype.
pub trait Attachable {
    fn fragment(&self) -> &Fragment;

    fn fragment_mut(&mut self) -> &mut Fragment;

    fn port_position(&self) -> Point3<f64> {
        self.fragment().port_position()
    }

    fn port_axis(&self) -> Vector3<f64> {
        self.fragment().port_axis()
    }

    fn attach(&mut self, site: &Site) -> Result<Attachment, AttachError> {
        self.fragment_mut().attach(site)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChainPrototype {
    Rigid(RigidPrototype),
    Flexible(FlexiblePrototype),
}

impl ChainPrototype {
    pub fn name(&self) -> &str {
        self.fragment().name()
    }
}

impl Attachable for ChainPrototype {
    fn fragment(&self) -> &Fragment {
        match self {
            ChainPrototype::Rigid(p) => p.fragment(),
            ChainPrototype::Flexible(p) => p.fragment(),
        }
    }

    fn fragment_mut(&mut self) -> &mut Fragment {
        match self {
            ChainPrototype::Rigid(p) => p.fragment_mut(),
            ChainPrototype::Flexible(p) => p.fragment_mut(),
        }
    }
}

impl From<RigidPrototype> for ChainPrototype {
    fn from(value: RigidPrototype) -> Self {
        ChainPrototype::Rigid(value)
    }
}

impl From<FlexiblePrototype> for ChainPrototype {
    fn from(value: FlexiblePrototype) -> Self {
        ChainPrototype::Flexible(value)
    }
}
