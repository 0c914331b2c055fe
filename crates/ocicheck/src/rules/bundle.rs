//! Bundle layout: config.json and the root filesystem directory.
//!
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/v1.0.0-rc1/bundle.md#container-format>

use super::{Rule, Section, root};
use crate::bundle::paths;
use crate::context::CheckContext;
use crate::gate::Gate;
use crate::outcome::{Outcome, Violation};

pub(super) const RULES: &[Rule] = &[
    Rule {
        id: "bundle.configuration",
        section: Section::Bundle,
        summary: "config.json MUST reside in the root of the bundle directory",
        gates: &[],
        check: configuration,
    },
    Rule {
        id: "bundle.root",
        section: Section::Bundle,
        summary: "the bundle directory MUST contain the root filesystem",
        gates: &[Gate::RecognizedVersion, Gate::PathSeparatorMatches],
        check: root_filesystem,
    },
];

fn configuration(ctx: &CheckContext) -> Outcome {
    let load = ctx.load_result();
    if !load.exists() {
        return Outcome::fail(
            format!("no file found at {}", load.config_path().display()),
            paths::CONFIG_FILE,
        );
    }
    if load.raw_bytes().is_none() {
        let reason = load.read_error().map_or_else(
            || "unable to read configuration JSON".to_string(),
            |e| format!("unable to read configuration JSON: {e}"),
        );
        return Outcome::fail(reason, paths::CONFIG_FILE);
    }
    Outcome::Pass
}

fn root_filesystem(ctx: &CheckContext) -> Outcome {
    check_root_filesystem(ctx).into()
}

fn check_root_filesystem(ctx: &CheckContext) -> Result<(), Violation> {
    let path = root::root_path(ctx)?;

    let resolved = ctx.resolve(path);
    if !resolved.is_dir() {
        return Err(Violation::new(
            format!("the configured root.path ({path}) does not point to a directory"),
            "root.path",
        ));
    }

    let convention = ctx.convention();
    let bundle_dir = ctx.bundle_dir();
    let joined = convention.join(&bundle_dir, path);
    let relative = convention
        .relative(&joined, &bundle_dir)
        .unwrap_or(joined);
    if convention.has_separator(&relative) {
        return Err(Violation::new(
            format!(
                "root filesystem MUST be present in the same directory as config.json, \
                 but its relative path is {relative}"
            ),
            "root.path",
        ));
    }

    Ok(())
}
