//! CLI command implementations.
//!
//! - `check` (default): run the conformance rules against a bundle
//! - `rules`: list the rules and their gates
//! - `version`: show tool and specification versions

use clap::{Parser, Subcommand, ValueEnum};
use ocicheck::{OutputFormat, Section};
use std::path::PathBuf;

pub mod check;
pub mod rules;
pub mod version;

/// ocicheck - OCI runtime-spec bundle conformance checker
#[derive(Parser)]
#[command(name = "ocicheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute (defaults to `check`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Bundle directory containing config.json
    ///
    /// Can also be set via BUNDLE or OCICHECK_BUNDLE environment variables.
    #[arg(long, short, global = true)]
    pub bundle: Option<PathBuf>,

    /// Settings file layered above the user and system settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true)]
    pub format: Option<Format>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// One line per rule
    Text,
    /// JSON document
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => Self::Text,
            Format::Json => Self::Json,
        }
    }
}

/// Configuration section selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SectionArg {
    /// Bundle layout
    Bundle,
    /// Encoding and JSON syntax
    Syntax,
    /// ociVersion
    Version,
    /// root
    Root,
    /// mounts
    Mounts,
    /// process
    Process,
}

impl From<SectionArg> for Section {
    fn from(section: SectionArg) -> Self {
        match section {
            SectionArg::Bundle => Self::Bundle,
            SectionArg::Syntax => Self::Syntax,
            SectionArg::Version => Self::Version,
            SectionArg::Root => Self::Root,
            SectionArg::Mounts => Self::Mounts,
            SectionArg::Process => Self::Process,
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check a bundle against the conformance rules
    Check(check::CheckArgs),

    /// List the conformance rules
    Rules,

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["ocicheck", "--bundle", "/srv/bundle"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.bundle, Some(PathBuf::from("/srv/bundle")));
        assert!(!cli.debug);
    }

    #[test]
    fn test_check_with_section() {
        let cli = Cli::try_parse_from([
            "ocicheck", "check", "--section", "mounts", "--format", "json",
        ])
        .unwrap();
        let Some(Commands::Check(args)) = cli.command else {
            panic!("expected check command");
        };
        assert!(matches!(args.section, Some(SectionArg::Mounts)));
        assert!(matches!(cli.format, Some(Format::Json)));
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["ocicheck", "--format", "yaml"]).is_err());
    }
}
