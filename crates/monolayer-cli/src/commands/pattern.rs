use crate::cli::PatternArgs;
use crate::error::Result;
use crate::utils::parser;
use monolayer::core::pattern::Pattern;
use std::fmt::Write;
use tracing::info;

pub fn run(args: PatternArgs) -> Result<()> {
    let spec = parser::parse_pattern_spec(&args.pattern)?;
    info!("Generating pattern {:?}", spec);

    match spec.generate(args.seed, args.min_separation)? {
        Some(pattern) => print!("{}", render_points(&pattern)),
        None => println!("Pattern 'full' places a chain on every site; it has no points."),
    }
    Ok(())
}

/// One `x y` line per point in normalized coordinates, preceded by a count header.
fn render_points(pattern: &Pattern) -> String {
    let mut out = format!("# {} point(s)\n", pattern.len());
    for point in pattern.points() {
        let _ = writeln!(out, "{:.6} {:.6}", point.x, point.y);
    }
    out
}
