//! All configuration JSON MUST be encoded in UTF-8.
//!
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/v1.0.0-rc1/glossary.md#json>

use super::{Rule, Section};
use crate::bundle::paths;
use crate::context::CheckContext;
use crate::gate::Gate;
use crate::outcome::Outcome;

pub(super) const RULES: &[Rule] = &[Rule {
    id: "syntax",
    section: Section::Syntax,
    summary: "all configuration JSON MUST be encoded in UTF-8",
    gates: &[Gate::ConfigPresent],
    check: syntax,
}];

fn syntax(ctx: &CheckContext) -> Outcome {
    let load = ctx.load_result();

    if load.raw_bytes().is_none_or(<[u8]>::is_empty) {
        return Outcome::fail(
            format!(
                "unable to read any content from {}",
                load.config_path().display()
            ),
            paths::CONFIG_FILE,
        );
    }
    if load.decode_error().is_some() {
        return Outcome::fail(
            "all configuration JSON MUST be encoded in UTF-8",
            paths::CONFIG_FILE,
        );
    }
    if let Some(e) = load.parse_error() {
        return Outcome::fail(format!("invalid JSON encoding: {e}"), paths::CONFIG_FILE);
    }
    if ctx.config().is_none() {
        return Outcome::fail("configuration JSON is not an object", paths::CONFIG_FILE);
    }

    Outcome::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Bundle, LoadResult};
    use crate::context::HostContext;

    fn check(bytes: &[u8]) -> Outcome {
        let ctx = CheckContext::new(
            Bundle::new("/bundle"),
            LoadResult::from_bytes("/bundle/config.json", bytes),
            HostContext::current(),
        );
        RULES[0].evaluate(&ctx)
    }

    #[test]
    fn test_valid_json() {
        assert!(check(br#"{"ociVersion": "1.0.0-rc1"}"#).is_pass());
    }

    #[test]
    fn test_empty_file() {
        let outcome = check(b"");
        assert!(
            outcome.violations()[0]
                .reason
                .starts_with("unable to read any content from")
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let outcome = check(&[b'{', 0xc3, 0x28, b'}']);
        assert_eq!(
            outcome.violations()[0].reason,
            "all configuration JSON MUST be encoded in UTF-8"
        );
    }

    #[test]
    fn test_invalid_json_surfaces_parser_error() {
        let outcome = check(b"{\"ociVersion\": }");
        let reason = &outcome.violations()[0].reason;
        assert!(reason.starts_with("invalid JSON encoding: "));
        assert!(reason.contains("line 1"));
    }

    #[test]
    fn test_not_an_object() {
        let outcome = check(b"[]");
        assert_eq!(
            outcome.violations()[0].reason,
            "configuration JSON is not an object"
        );
    }

    #[test]
    fn test_skipped_when_missing() {
        let ctx = CheckContext::new(
            Bundle::new("/bundle"),
            LoadResult::default(),
            HostContext::current(),
        );
        assert!(RULES[0].evaluate(&ctx).is_skip());
    }
}
