//! The conformance rules, grouped by configuration section.
//!
//! Every rule is a row in a static table: an id, the section it covers, the
//! [`Gate`]s that must hold before it runs, and a body that turns a
//! [`CheckContext`] into an [`Outcome`]. Rules share no state, so the table
//! can be evaluated in any order and as often as needed.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::context::CheckContext;
use crate::gate::{self, Gate};
use crate::outcome::{Outcome, Violation};

mod bundle;
mod mounts;
mod process;
mod root;
mod syntax;
mod version;

pub use mounts::{Relation, relation};
pub use process::invalid_env_key_char;

/// Configuration section a rule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Bundle layout on disk.
    Bundle,
    /// Encoding and JSON well-formedness.
    Syntax,
    /// `ociVersion`.
    Version,
    /// `root`.
    Root,
    /// `mounts`.
    Mounts,
    /// `process`.
    Process,
}

impl Section {
    /// Lowercase section name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bundle => "bundle",
            Self::Syntax => "syntax",
            Self::Version => "version",
            Self::Root => "root",
            Self::Mounts => "mounts",
            Self::Process => "process",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, independently gated check.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Stable identifier used in reports.
    pub id: &'static str,
    /// Section covered.
    pub section: Section,
    /// The requirement being checked.
    pub summary: &'static str,
    /// Preconditions, evaluated in order.
    pub gates: &'static [Gate],
    check: fn(&CheckContext) -> Outcome,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("section", &self.section)
            .field("gates", &self.gates)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Evaluate the gates, then the body.
    #[must_use]
    pub fn evaluate(&self, ctx: &CheckContext) -> Outcome {
        if let Some(reason) = gate::all_of(self.gates, ctx) {
            return Outcome::skip(reason);
        }
        (self.check)(ctx)
    }
}

/// Outcome of one rule in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    /// Rule identifier.
    pub id: &'static str,
    /// Section covered.
    pub section: Section,
    /// The outcome.
    pub outcome: Outcome,
}

/// An ordered collection of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// Every rule the checker knows, in report order.
    #[must_use]
    pub fn standard() -> Self {
        let rules = [
            bundle::RULES,
            syntax::RULES,
            version::RULES,
            root::RULES,
            mounts::RULES,
            process::RULES,
        ]
        .concat();
        Self { rules }
    }

    /// Only the rules covering `section`.
    #[must_use]
    pub fn section(section: Section) -> Self {
        let rules = Self::standard()
            .rules
            .into_iter()
            .filter(|rule| rule.section == section)
            .collect();
        Self { rules }
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Evaluate every rule against `ctx`.
    #[must_use]
    pub fn run(&self, ctx: &CheckContext) -> Vec<RuleResult> {
        self.rules
            .iter()
            .map(|rule| {
                let outcome = rule.evaluate(ctx);
                debug!(rule = rule.id, ?outcome, "Evaluated rule");
                RuleResult {
                    id: rule.id,
                    section: rule.section,
                    outcome,
                }
            })
            .collect()
    }
}

/// Render a JSON value for a message: strings bare, everything else as JSON.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fetch `key` from `object`, failing when it is absent.
fn required<'a>(
    object: &'a serde_json::Map<String, Value>,
    key: &str,
    location: &str,
) -> Result<&'a Value, Violation> {
    object
        .get(key)
        .ok_or_else(|| Violation::new(format!("{location} is not set"), location))
}

/// Fetch a required string field.
fn required_str<'a>(
    object: &'a serde_json::Map<String, Value>,
    key: &str,
    location: &str,
) -> Result<&'a str, Violation> {
    required(object, key, location)?
        .as_str()
        .ok_or_else(|| Violation::new(format!("{location} is not a string"), location))
}
