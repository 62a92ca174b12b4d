use crate::cli::BuildArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use monolayer::engine::diagnostics::Severity;
use monolayer::engine::progress::ProgressReporter;
use monolayer::workflows::assemble::AssemblyOutput;
use monolayer::workflows;
use std::fmt::Write;
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app = build_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Assembling monolayer on '{}' ({} chain prototype(s))...",
        app.surface.name(),
        app.chains.len()
    );
    info!("Invoking the core assembly workflow...");

    let output = workflows::assemble::run(&app.surface, &app.chains, &app.core_config, &reporter)?;

    info!(
        "Workflow finished with {} diagnostic(s).",
        output.diagnostics.len()
    );
    print!("{}", render_report(&output));

    Ok(())
}

/// The summary line followed by one line per diagnostic.
fn render_report(output: &AssemblyOutput) -> String {
    let mut report = format!("✓ {}\n", output.assembly.summary());
    for diagnostic in &output.diagnostics {
        let tag = match diagnostic.severity() {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        let _ = writeln!(report, "  [{}] {}", tag, diagnostic);
    }
    report
}
