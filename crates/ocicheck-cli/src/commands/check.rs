//! Check command implementation.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use ocicheck::{Bundle, CheckContext, OutputFormat, RuleSet, Settings};
use tracing::{debug, info};

use super::SectionArg;

/// Arguments for the check command.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Only run rules covering this section
    #[arg(long)]
    pub section: Option<SectionArg>,
}

/// Executes the check command.
pub fn execute(args: &CheckArgs, settings: &Settings) -> Result<ExitCode> {
    let bundle = Bundle::new(&settings.bundle);
    info!("Checking bundle {}", bundle.path().display());

    let ctx = CheckContext::load(bundle);
    debug!(
        version = ?ctx.version(),
        os = ?ctx.declared_os(),
        host = ?ctx.host().convention,
        "Loaded configuration"
    );

    let rules = args
        .section
        .map_or_else(RuleSet::standard, |section| RuleSet::section(section.into()));
    let report = ocicheck::run(&ctx, &rules);

    match settings.format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => report
            .write_json(std::io::stdout().lock())
            .context("failed to write report")?,
    }

    info!(
        passed = report.summary.passed,
        failed = report.summary.failed,
        skipped = report.summary.skipped,
        "Check complete"
    );

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
