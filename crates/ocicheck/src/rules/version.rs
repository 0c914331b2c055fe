//! `ociVersion` (string, required) MUST be in `SemVer` v2.0.0 format.
//!
//! The syntax check is not restricted to recognized versions: a
//! semantically versioned field is expected to stay `SemVer` across every
//! release.
//!
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/v1.0.0-rc1/config.md#specification-version>

use serde_json::Value;

use super::{Rule, Section, display};
use crate::context::CheckContext;
use crate::gate::Gate;
use crate::outcome::Outcome;
use crate::version::{self, SUPPORTED_VERSIONS};

pub(super) const RULES: &[Rule] = &[
    Rule {
        id: "version.recognized",
        section: Section::Version,
        summary: "ociVersion is a version this checker has been taught",
        gates: &[Gate::VersionPresent],
        check: recognized,
    },
    Rule {
        id: "version.semantic",
        section: Section::Version,
        summary: "ociVersion MUST be in SemVer v2.0.0 format",
        gates: &[Gate::DocumentPresent],
        check: semantic,
    },
];

fn recognized(ctx: &CheckContext) -> Outcome {
    let v = ctx.version().unwrap_or_default();
    if version::is_recognized(Some(v)) {
        return Outcome::Pass;
    }
    Outcome::fail(
        format!(
            "unrecognized configuration version '{v}'; either your configuration does \
             not match an OCI specification or this checker has not been taught to \
             process it (known versions: {})",
            SUPPORTED_VERSIONS.join(", ")
        ),
        "ociVersion",
    )
}

fn semantic(ctx: &CheckContext) -> Outcome {
    let Some(value) = ctx.field("ociVersion") else {
        return Outcome::fail("ociVersion is not set", "ociVersion");
    };
    let Value::String(v) = value else {
        return Outcome::fail(
            format!("ociVersion ({}) is not a string", display(value)),
            "ociVersion",
        );
    };
    match version::check_semver(v) {
        Ok(_) => Outcome::Pass,
        Err(e) => Outcome::fail(
            format!("ociVersion ({v}) is not a SemVer v2.0.0 version: {e}"),
            "ociVersion",
        ),
    }
}
