//! Surface templates, attachment sites and periodic tiling.
//!
//! A [`template::SurfaceTemplate`] is an immutable periodic cell carrying atoms, bonds and
//! the [`site::Site`]s chains may attach to. [`tiling::PeriodicityTracker`] computes the
//! copy offsets and box of a `tile_x × tile_y` supercell.

pub mod site;
pub mod template;
pub mod tiling;
