//! Root configuration.
//!
//! 1.0.0-rc1 just requires a path. 0.5.0 additionally requires it to be
//! relative to the bundle.
//!
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/v1.0.0-rc1/config.md#root-configuration>

use serde_json::Value;

use super::{Rule, Section, required_str};
use crate::context::CheckContext;
use crate::gate::Gate;
use crate::outcome::{Outcome, Violation};
use crate::version::SpecVersion;

pub(super) const RULES: &[Rule] = &[
    Rule {
        id: "root.path",
        section: Section::Root,
        summary: "root.path (string, required)",
        gates: &[Gate::RecognizedVersion, Gate::PathSeparatorMatches],
        check: path,
    },
    Rule {
        id: "root.readonly",
        section: Section::Root,
        summary: "root.readonly (bool, optional)",
        gates: &[Gate::RecognizedVersion],
        check: readonly,
    },
];

/// `root.path`, checked for presence and type.
pub(super) fn root_path(ctx: &CheckContext) -> Result<&str, Violation> {
    let root = ctx
        .field("root")
        .ok_or_else(|| Violation::new("root is not set", "root"))?
        .as_object()
        .ok_or_else(|| Violation::new("root is not an object", "root"))?;
    required_str(root, "path", "root.path")
}

fn path(ctx: &CheckContext) -> Outcome {
    check_path(ctx).into()
}

fn check_path(ctx: &CheckContext) -> Result<(), Violation> {
    let path = root_path(ctx)?;
    if ctx.spec_version() == Some(SpecVersion::V0_5_0) && ctx.convention().is_absolute(path) {
        return Err(Violation::new("root.path MUST be relative", "root.path"));
    }
    Ok(())
}

fn readonly(ctx: &CheckContext) -> Outcome {
    match ctx
        .field("root")
        .and_then(Value::as_object)
        .and_then(|root| root.get("readonly"))
    {
        Some(value) if !value.is_boolean() => {
            Outcome::fail("root.readonly is not a boolean", "root.readonly")
        }
        _ => Outcome::Pass,
    }
}
