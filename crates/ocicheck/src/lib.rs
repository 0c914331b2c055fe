//! # ocicheck
//!
//! Conformance checks for OCI runtime-spec bundles.
//!
//! Given a bundle directory, the checker loads `config.json` once and runs a
//! table of hand-written rules against it. Each rule covers one requirement
//! of a specific runtime-spec release and yields one of three outcomes:
//!
//! - **Pass**: the requirement holds
//! - **Fail**: the requirement is violated, with the JSON location at fault
//! - **Skip**: the rule could not be evaluated (missing file, unrecognized
//!   version, foreign path convention, missing parent object)
//!
//! ## Example
//!
//! ```no_run
//! use ocicheck::{Bundle, CheckContext, RuleSet};
//!
//! let ctx = CheckContext::load(Bundle::new("/path/to/bundle"));
//! let report = ocicheck::run(&ctx, &RuleSet::standard());
//! println!("{report}");
//! if report.has_failures() {
//!     std::process::exit(1);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           ocicheck                           │
//! │                                                              │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │   bundle    │  │   context   │  │        rules         │  │
//! │  │             │  │             │  │                      │  │
//! │  │ - Bundle    │─▶│ - CheckCtx  │─▶│ bundle syntax version│  │
//! │  │ - LoadResult│  │ - HostCtx   │  │ root mounts process  │  │
//! │  └─────────────┘  └─────────────┘  └──────────┬───────────┘  │
//! │                                               │              │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────▼───────────┐  │
//! │  │    gate     │  │    path     │  │       report         │  │
//! │  │ - version   │  │ - Posix     │  │ - Outcome            │  │
//! │  │ - separator │  │ - Windows   │  │ - Summary            │  │
//! │  └─────────────┘  └─────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod bundle;
pub mod context;
pub mod error;
pub mod gate;
pub mod outcome;
pub mod path;
pub mod report;
pub mod rules;
pub mod settings;
pub mod version;

// Re-export main types for convenience.
pub use bundle::{Bundle, LoadResult};
pub use context::{CheckContext, HostContext};
pub use error::{CheckError, Result};
pub use gate::{Gate, path_separator_matches};
pub use outcome::{Outcome, Violation};
pub use path::PathConvention;
pub use report::{Report, Summary};
pub use rules::{Rule, RuleResult, RuleSet, Section};
pub use settings::{OutputFormat, Settings};
pub use version::{SUPPORTED_VERSIONS, SpecVersion, is_recognized};

/// Run `rules` against `ctx` and collect a report.
#[must_use]
pub fn run(ctx: &CheckContext, rules: &RuleSet) -> Report {
    Report::new(ctx, rules.run(ctx))
}

/// Load `bundle` and run every rule against it.
#[must_use]
pub fn check(bundle: Bundle) -> Report {
    run(&CheckContext::load(bundle), &RuleSet::standard())
}
