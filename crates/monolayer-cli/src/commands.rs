pub mod build;
pub mod pattern;
