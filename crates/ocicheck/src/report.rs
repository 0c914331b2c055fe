//! Aggregated results of one run.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::context::CheckContext;
use crate::error::Result;
use crate::outcome::Outcome;
use crate::rules::RuleResult;

/// Outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Rules that passed.
    pub passed: usize,
    /// Rules that failed.
    pub failed: usize,
    /// Rules that were skipped.
    pub skipped: usize,
}

impl Summary {
    /// Total number of rules evaluated.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// Results of running a rule set against one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Bundle directory that was checked.
    pub bundle: PathBuf,
    /// Declared `ociVersion`, when it is a string.
    pub version: Option<String>,
    /// Per-rule outcomes in evaluation order.
    pub results: Vec<RuleResult>,
    /// Outcome counts.
    pub summary: Summary,
}

impl Report {
    /// Build a report for `ctx` from rule results.
    #[must_use]
    pub fn new(ctx: &CheckContext, results: Vec<RuleResult>) -> Self {
        let mut summary = Summary::default();
        for result in &results {
            match result.outcome {
                Outcome::Pass => summary.passed += 1,
                Outcome::Fail { .. } => summary.failed += 1,
                Outcome::Skip { .. } => summary.skipped += 1,
            }
        }
        Self {
            bundle: ctx.bundle().path().to_path_buf(),
            version: ctx.version().map(str::to_string),
            results,
            summary,
        }
    }

    /// Returns true if any rule failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    /// Outcome of a rule by id.
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|result| result.id == id)
            .map(|result| &result.outcome)
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            match &result.outcome {
                Outcome::Pass => writeln!(f, "{} ... ok", result.id)?,
                Outcome::Skip { reason } => {
                    writeln!(f, "{} ... skipped: {reason}", result.id)?;
                }
                Outcome::Fail { violations } => {
                    writeln!(f, "{} ... FAIL", result.id)?;
                    for violation in violations {
                        writeln!(f, "    {violation}")?;
                    }
                }
            }
        }
        writeln!(f)?;
        write!(
            f,
            "{} rules: {} passed, {} failed, {} skipped",
            self.summary.total(),
            self.summary.passed,
            self.summary.failed,
            self.summary.skipped
        )
    }
}
