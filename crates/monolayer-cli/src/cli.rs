use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "monolayer - assemble self-assembled monolayers by attaching chain prototypes to the binding sites of a periodic surface.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a monolayer and print a summary of the result.
    Build(BuildArgs),
    /// Generate a placement pattern and print its normalized points.
    Pattern(PatternArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Path to a TOML configuration file describing surface, chains and pattern.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Placement pattern: 'grid:NXxNY', 'random:N' or 'full'. Overrides the config file.
    #[arg(short, long, value_name = "SPEC")]
    pub pattern: Option<String>,

    /// Seed for random patterns.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Number of surface replicas along the first lattice vector.
    #[arg(long, value_name = "N")]
    pub tile_x: Option<usize>,

    /// Number of surface replicas along the second lattice vector.
    #[arg(long, value_name = "N")]
    pub tile_y: Option<usize>,

    /// Carbon count of alkane chains that do not set their own length.
    #[arg(long, value_name = "N")]
    pub chain_length: Option<usize>,

    /// Override a config file value (e.g. --set tiling.x=2). Can be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `pattern` subcommand.
#[derive(Args, Debug)]
pub struct PatternArgs {
    /// Placement pattern: 'grid:NXxNY', 'random:N' or 'full'.
    #[arg(short, long, required = true, value_name = "SPEC")]
    pub pattern: String,

    /// Seed for random patterns.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Minimum distance between random points, in normalized units.
    #[arg(long, value_name = "DIST", default_value_t = 0.0)]
    pub min_separation: f64,
}
