//! Mounts.
//!
//! Each entry is checked on its own and violations carry the entry index.
//! The `type` and `options` value spaces are underspecified upstream, so only
//! their JSON types are checked.
//!
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/v1.0.0-rc1/config.md#mounts>

use serde_json::{Map, Value};

use super::{Rule, Section, required_str};
use crate::context::CheckContext;
use crate::gate::Gate;
use crate::outcome::{Outcome, Violation};
use crate::path::{PathConvention, WINDOWS_OS};
use crate::version::SpecVersion;

pub(super) const RULES: &[Rule] = &[
    Rule {
        id: "mounts.destination",
        section: Section::Mounts,
        summary: "destination (string, required)",
        gates: &[Gate::RecognizedVersion],
        check: destination,
    },
    Rule {
        id: "mounts.destination_nesting",
        section: Section::Mounts,
        summary: "for Windows, one mount destination MUST NOT be nested within another mount",
        gates: &[
            Gate::RecognizedVersion,
            Gate::Target {
                os: WINDOWS_OS,
                version: SpecVersion::V1_0_0Rc1,
            },
            Gate::PathSeparatorMatches,
        ],
        check: destination_nesting,
    },
    Rule {
        id: "mounts.type",
        section: Section::Mounts,
        summary: "type (string, required)",
        gates: &[Gate::RecognizedVersion],
        check: mount_type,
    },
    Rule {
        id: "mounts.source",
        section: Section::Mounts,
        summary: "source (string, required)",
        gates: &[Gate::RecognizedVersion],
        check: source,
    },
    Rule {
        id: "mounts.options",
        section: Section::Mounts,
        summary: "options (list of strings, optional)",
        gates: &[Gate::RecognizedVersion],
        check: options,
    },
];

/// How a mount destination relates to an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The same directory.
    Same,
    /// The earlier destination's parent.
    Parent,
    /// Above the earlier destination, or beside it.
    Ancestor,
    /// Directly inside the earlier destination.
    Child,
    /// Deeper inside the earlier destination.
    Descendant,
    /// On a different drive or share.
    Unrelated,
}

impl Relation {
    /// Whether the destination lies inside the earlier one.
    #[must_use]
    pub const fn is_nested(self) -> bool {
        matches!(self, Self::Child | Self::Descendant)
    }
}

/// Classify `destination` against `previous`.
#[must_use]
pub fn relation(convention: PathConvention, destination: &str, previous: &str) -> Relation {
    if destination == previous {
        return Relation::Same;
    }
    let Some(relative) = convention.relative(destination, previous) else {
        return Relation::Unrelated;
    };
    if relative == "." {
        Relation::Same
    } else if relative == ".." {
        Relation::Parent
    } else if !convention.has_separator(&relative) {
        Relation::Child
    } else if convention.first_component(&relative) == ".." {
        Relation::Ancestor
    } else {
        Relation::Descendant
    }
}

/// Apply `check` to every mount entry, collecting per-entry violations.
fn each_mount<F>(ctx: &CheckContext, mut check: F) -> Outcome
where
    F: FnMut(usize, &Map<String, Value>, &mut Vec<Violation>),
{
    let Some(mounts) = ctx.field("mounts") else {
        return Outcome::Pass;
    };
    let Some(mounts) = mounts.as_array() else {
        return Outcome::fail("mounts is not an array", "mounts");
    };

    let mut violations = Vec::new();
    for (i, mount) in mounts.iter().enumerate() {
        match mount.as_object() {
            Some(mount) => check(i, mount, &mut violations),
            None => violations.push(Violation::new(
                format!("mounts[{i}] is not an object"),
                format!("mounts[{i}]"),
            )),
        }
    }
    Outcome::from_violations(violations)
}

fn required_string_field(ctx: &CheckContext, key: &str) -> Outcome {
    each_mount(ctx, |i, mount, violations| {
        if let Err(violation) = required_str(mount, key, &format!("mounts[{i}].{key}")) {
            violations.push(violation);
        }
    })
}

fn destination(ctx: &CheckContext) -> Outcome {
    required_string_field(ctx, "destination")
}

fn mount_type(ctx: &CheckContext) -> Outcome {
    required_string_field(ctx, "type")
}

fn source(ctx: &CheckContext) -> Outcome {
    required_string_field(ctx, "source")
}

fn options(ctx: &CheckContext) -> Outcome {
    each_mount(ctx, |i, mount, violations| {
        let Some(options) = mount.get("options") else {
            return;
        };
        let location = format!("mounts[{i}].options");
        let Some(options) = options.as_array() else {
            violations.push(Violation::new(
                format!("{location} is not an array"),
                location,
            ));
            return;
        };
        for (j, option) in options.iter().enumerate() {
            if !option.is_string() {
                violations.push(Violation::new(
                    format!("{location}[{j}] is not a string"),
                    format!("{location}[{j}]"),
                ));
            }
        }
    })
}

fn destination_nesting(ctx: &CheckContext) -> Outcome {
    let Some(mounts) = ctx.field("mounts").and_then(Value::as_array) else {
        return Outcome::Pass;
    };
    let convention = ctx.convention();

    let mut seen: Vec<&str> = Vec::new();
    for (i, mount) in mounts.iter().enumerate() {
        // Non-string destinations are reported by `mounts.destination`.
        let Some(destination) = mount.get("destination").and_then(Value::as_str) else {
            continue;
        };
        if let Some(previous) = seen
            .iter()
            .find(|previous| relation(convention, destination, previous).is_nested())
        {
            return Outcome::fail(
                format!(
                    "for the Windows operating system, one mount destination MUST NOT be \
                     nested within another mount, but {destination} is nested within {previous}"
                ),
                format!("mounts[{i}].destination"),
            );
        }
        seen.push(destination);
    }
    Outcome::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Bundle, LoadResult};
    use crate::context::HostContext;

    fn context(json: &str, host: PathConvention) -> CheckContext {
        CheckContext::new(
            Bundle::new("/bundle"),
            LoadResult::from_bytes("/bundle/config.json", json),
            HostContext::with_convention(host),
        )
    }

    fn rule(id: &str) -> Rule {
        *RULES.iter().find(|rule| rule.id == id).unwrap()
    }

    #[test]
    fn test_relation() {
        let windows = PathConvention::Windows;
        assert_eq!(relation(windows, "c:\\foo", "c:\\foo"), Relation::Same);
        assert_eq!(relation(windows, "c:\\foo\\", "c:\\foo"), Relation::Same);
        assert_eq!(relation(windows, "c:\\foo", "c:\\foo\\bar"), Relation::Parent);
        assert_eq!(relation(windows, "c:\\", "c:\\foo\\bar"), Relation::Ancestor);
        assert_eq!(relation(windows, "c:\\baz", "c:\\foo"), Relation::Ancestor);
        assert_eq!(relation(windows, "c:\\foo\\bar", "c:\\foo"), Relation::Child);
        assert_eq!(
            relation(windows, "c:\\foo\\bar\\baz", "c:\\foo"),
            Relation::Descendant
        );
        assert_eq!(relation(windows, "d:\\foo\\bar", "c:\\foo"), Relation::Unrelated);
    }

    #[test]
    fn test_required_fields() {
        let ctx = context(
            r#"{"ociVersion": "0.5.0", "mounts": [
                {"destination": "/proc", "type": "proc", "source": "proc"},
                {"destination": 1, "source": "tmpfs"}
            ]}"#,
            PathConvention::Posix,
        );

        assert_eq!(
            rule("mounts.destination").evaluate(&ctx),
            Outcome::fail("mounts[1].destination is not a string", "mounts[1].destination")
        );
        assert_eq!(
            rule("mounts.type").evaluate(&ctx),
            Outcome::fail("mounts[1].type is not set", "mounts[1].type")
        );
        assert!(rule("mounts.source").evaluate(&ctx).is_pass());
    }

    #[test]
    fn test_each_entry_reported() {
        let ctx = context(
            r#"{"ociVersion": "0.5.0", "mounts": [{}, "tmpfs", {}]}"#,
            PathConvention::Posix,
        );
        let outcome = rule("mounts.source").evaluate(&ctx);
        let locations: Vec<_> = outcome
            .violations()
            .iter()
            .map(|v| v.location.as_str())
            .collect();
        assert_eq!(
            locations,
            vec!["mounts[0].source", "mounts[1]", "mounts[2].source"]
        );
    }

    #[test]
    fn test_mounts_not_an_array() {
        let ctx = context(
            r#"{"ociVersion": "0.5.0", "mounts": {"destination": "/proc"}}"#,
            PathConvention::Posix,
        );
        assert_eq!(
            rule("mounts.destination").evaluate(&ctx),
            Outcome::fail("mounts is not an array", "mounts")
        );
    }

    #[test]
    fn test_no_mounts_passes() {
        let ctx = context(r#"{"ociVersion": "0.5.0"}"#, PathConvention::Posix);
        for rule in RULES.iter().filter(|rule| rule.id != "mounts.destination_nesting") {
            assert!(rule.evaluate(&ctx).is_pass(), "{} did not pass", rule.id);
        }
    }

    #[test]
    fn test_options() {
        let ctx = context(
            r#"{"ociVersion": "1.0.0-rc1", "mounts": [
                {"options": ["nosuid", "noexec"]},
                {"options": "ro"},
                {"options": ["ro", 5]}
            ]}"#,
            PathConvention::Posix,
        );
        let outcome = rule("mounts.options").evaluate(&ctx);
        assert_eq!(
            outcome.violations(),
            &[
                Violation::new("mounts[1].options is not an array", "mounts[1].options"),
                Violation::new("mounts[2].options[1] is not a string", "mounts[2].options[1]"),
            ]
        );
    }

    #[test]
    fn test_nesting_fails_on_windows_rc1() {
        let ctx = context(
            r#"{"ociVersion": "1.0.0-rc1", "platform": {"os": "windows"}, "mounts": [
                {"destination": "c:\\foo"},
                {"destination": "c:\\bar"},
                {"destination": "c:\\foo\\bar"}
            ]}"#,
            PathConvention::Windows,
        );
        let outcome = rule("mounts.destination_nesting").evaluate(&ctx);
        assert!(outcome.is_fail());
        let violation = &outcome.violations()[0];
        assert_eq!(violation.location, "mounts[2].destination");
        assert!(violation.reason.ends_with("c:\\foo\\bar is nested within c:\\foo"));
    }

    #[test]
    fn test_nesting_allows_parents_and_duplicates() {
        let ctx = context(
            r#"{"ociVersion": "1.0.0-rc1", "platform": {"os": "windows"}, "mounts": [
                {"destination": "c:\\foo\\bar"},
                {"destination": "c:\\foo"},
                {"destination": "c:\\foo"},
                {"destination": 3}
            ]}"#,
            PathConvention::Windows,
        );
        assert!(rule("mounts.destination_nesting").evaluate(&ctx).is_pass());
    }

    #[test]
    fn test_nesting_gated_by_target() {
        let mounts = r#""mounts": [{"destination": "c:\\foo"}, {"destination": "c:\\foo\\bar"}]"#;

        let ctx = context(
            &format!(r#"{{"ociVersion": "0.5.0", "platform": {{"os": "windows"}}, {mounts}}}"#),
            PathConvention::Windows,
        );
        assert!(rule("mounts.destination_nesting").evaluate(&ctx).is_skip());

        let ctx = context(
            &format!(r#"{{"ociVersion": "1.0.0-rc1", "platform": {{"os": "linux"}}, {mounts}}}"#),
            PathConvention::Posix,
        );
        assert!(rule("mounts.destination_nesting").evaluate(&ctx).is_skip());

        let ctx = context(
            &format!(r#"{{"ociVersion": "1.0.0-rc1", "platform": {{"os": "windows"}}, {mounts}}}"#),
            PathConvention::Posix,
        );
        assert!(rule("mounts.destination_nesting").evaluate(&ctx).is_skip());
    }
}
