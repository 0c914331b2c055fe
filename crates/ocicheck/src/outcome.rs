//! Three-valued rule outcomes.

use std::fmt;

use serde::Serialize;

/// One violated requirement, attributed to a JSON location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// What is wrong, in the words of the requirement.
    pub reason: String,
    /// JSON path of the offending field, e.g. `process.env[2]`.
    pub location: String,
}

impl Violation {
    /// Create a violation.
    pub fn new(reason: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// The rule ran and found nothing wrong.
    Pass,
    /// The rule ran and found at least one violation.
    Fail {
        /// Violations in the order they were found.
        violations: Vec<Violation>,
    },
    /// The rule could not be evaluated.
    Skip {
        /// Why the rule did not run.
        reason: String,
    },
}

impl Outcome {
    /// A failure with a single violation.
    pub fn fail(reason: impl Into<String>, location: impl Into<String>) -> Self {
        Self::Fail {
            violations: vec![Violation::new(reason, location)],
        }
    }

    /// A skip.
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip {
            reason: reason.into(),
        }
    }

    /// `Pass` when `violations` is empty, otherwise `Fail`.
    #[must_use]
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::Pass
        } else {
            Self::Fail { violations }
        }
    }

    /// Returns true if the rule passed.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if the rule failed.
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// Returns true if the rule was skipped.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    /// Violations of a failed rule; empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Fail { violations } => violations,
            _ => &[],
        }
    }

    /// Skip reason of a skipped rule.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Self::Skip { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Turns a chain of `?`-propagated checks into an [`Outcome`].
///
/// Rule bodies that stop at the first problem return
/// `Result<(), Violation>`; this converts the result.
impl From<Result<(), Violation>> for Outcome {
    fn from(result: Result<(), Violation>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(violation) => Self::Fail {
                violations: vec![violation],
            },
        }
    }
}
