//! Layered configuration for the `build` command: built-in defaults, then the TOML
//! file, then `--set` overrides, then dedicated command-line flags.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
