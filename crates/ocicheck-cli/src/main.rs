//! ocicheck CLI - OCI runtime-spec bundle conformance checker.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ocicheck::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands, check::CheckArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load().context("failed to load settings")?,
    };
    if let Some(bundle) = cli.bundle {
        settings.bundle = bundle;
    }
    if let Some(format) = cli.format {
        settings.format = format.into();
    }

    // Initialize logging based on debug flag
    let filter = if cli.debug {
        "ocicheck=debug,ocicheck_cli=debug".to_string()
    } else {
        let level = &settings.logging.level;
        format!("ocicheck={level},ocicheck_cli={level}")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        None => commands::check::execute(&CheckArgs::default(), &settings),
        Some(Commands::Check(args)) => commands::check::execute(&args, &settings),
        Some(Commands::Rules) => {
            commands::rules::execute(settings.format).map(|()| ExitCode::SUCCESS)
        }
        Some(Commands::Version) => commands::version::execute().map(|()| ExitCode::SUCCESS),
    }
}
