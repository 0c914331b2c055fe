//! Preconditions that decide whether a rule runs at all.
//!
//! A rule declares a list of gates. They are evaluated in order before the
//! rule body and the first one that does not hold turns the rule into a
//! skip. Gates never fail a rule.

use serde_json::Value;

use crate::context::CheckContext;
use crate::path::PathConvention;
use crate::version::{self, SpecVersion};

/// A precondition for running a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Something exists at the config path.
    ConfigPresent,
    /// The config parsed as JSON.
    DocumentPresent,
    /// `ociVersion` is a string.
    VersionPresent,
    /// `ociVersion` is one of the supported versions.
    RecognizedVersion,
    /// The config's path convention matches the host's.
    PathSeparatorMatches,
    /// `process` is an object; the payload names the field being checked.
    ProcessObject(&'static str),
    /// The config targets exactly this platform and version.
    Target {
        /// Required `platform.os`.
        os: &'static str,
        /// Required `ociVersion`.
        version: SpecVersion,
    },
}

impl Gate {
    /// Returns the skip reason when the gate does not hold.
    #[must_use]
    pub fn check(&self, ctx: &CheckContext) -> Option<String> {
        match *self {
            Self::ConfigPresent => (!ctx.load_result().exists()).then(|| {
                format!(
                    "cannot test configuration JSON with a missing {}",
                    ctx.load_result().config_path().display()
                )
            }),
            Self::DocumentPresent => ctx
                .document()
                .is_none()
                .then(|| "cannot test version without configuration JSON".to_string()),
            Self::VersionPresent => ctx.version().is_none().then(|| {
                "cannot check for recognized version without a version string".to_string()
            }),
            Self::RecognizedVersion => match ctx.version() {
                Some(v) if version::is_recognized(Some(v)) => None,
                Some(v) => Some(format!("cannot validate against unrecognized version '{v}'")),
                None => Some("cannot validate without a recognized ociVersion".to_string()),
            },
            Self::PathSeparatorMatches => match ctx.declared_os() {
                Some(os) if path_separator_matches(Some(os), ctx.host().convention) => None,
                Some(os) => Some(format!(
                    "cannot evaluate '{}'-separated paths for platform.os '{os}' on a host using '{}'",
                    PathConvention::for_os(os).separator(),
                    ctx.host().convention.separator()
                )),
                None => Some(
                    "cannot determine the path convention without platform.os".to_string(),
                ),
            },
            Self::ProcessObject(field) => {
                (!ctx.field("process").is_some_and(Value::is_object)).then(|| {
                    format!("cannot validate process.{field} without a process object")
                })
            }
            Self::Target { os, version } => {
                let matches = ctx.declared_os() == Some(os) && ctx.spec_version() == Some(version);
                (!matches).then(|| {
                    format!("the restriction only applies to {os} for specification version {version}")
                })
            }
        }
    }
}

/// Evaluate `gates` in order and return the first skip reason.
#[must_use]
pub fn all_of(gates: &[Gate], ctx: &CheckContext) -> Option<String> {
    gates.iter().find_map(|gate| gate.check(ctx))
}

/// Whether paths written for `declared_os` can be judged with the host's
/// path rules. An unknown target never matches.
#[must_use]
pub fn path_separator_matches(declared_os: Option<&str>, host: PathConvention) -> bool {
    declared_os.is_some_and(|os| PathConvention::for_os(os).separator() == host.separator())
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

    #[test]
    fn test_path_separator_matches() {
        assert!(path_separator_matches(Some("linux"), PathConvention::Posix));
        assert!(path_separator_matches(Some("windows"), PathConvention::Windows));
        assert!(!path_separator_matches(Some("windows"), PathConvention::Posix));
        assert!(!path_separator_matches(Some("linux"), PathConvention::Windows));
        assert!(!path_separator_matches(None, PathConvention::Posix));
    }

    #[test]
    fn test_config_present() {
        let ctx = CheckContext::new(
            Bundle::new("/missing"),
            LoadResult::default(),
            HostContext::current(),
        );
        let reason = Gate::ConfigPresent.check(&ctx).unwrap();
        assert!(reason.starts_with("cannot test configuration JSON with a missing"));
    }

    #[test]
    fn test_recognized_version_reasons() {
        let ctx = context(r#"{"ociVersion": "9.9.9"}"#, PathConvention::Posix);
        assert_eq!(
            Gate::RecognizedVersion.check(&ctx).as_deref(),
            Some("cannot validate against unrecognized version '9.9.9'")
        );

        let ctx = context(r"{}", PathConvention::Posix);
        assert!(Gate::RecognizedVersion.check(&ctx).is_some());

        let ctx = context(r#"{"ociVersion": "0.5.0"}"#, PathConvention::Posix);
        assert!(Gate::RecognizedVersion.check(&ctx).is_none());
    }

    #[test]
    fn test_process_object() {
        let ctx = context(r#"{"process": []}"#, PathConvention::Posix);
        assert_eq!(
            Gate::ProcessObject("cwd").check(&ctx).as_deref(),
            Some("cannot validate process.cwd without a process object")
        );

        let ctx = context(r#"{"process": {}}"#, PathConvention::Posix);
        assert!(Gate::ProcessObject("cwd").check(&ctx).is_none());
    }

    #[test]
    fn test_target_gate() {
        let gate = Gate::Target {
            os: "windows",
            version: SpecVersion::V1_0_0Rc1,
        };
        let ctx = context(
            r#"{"ociVersion": "1.0.0-rc1", "platform": {"os": "windows"}}"#,
            PathConvention::Windows,
        );
        assert!(gate.check(&ctx).is_none());

        let ctx = context(
            r#"{"ociVersion": "0.5.0", "platform": {"os": "windows"}}"#,
            PathConvention::Windows,
        );
        assert!(gate.check(&ctx).is_some());
    }

    #[test]
    fn test_all_of_reports_first_skip() {
        let ctx = context(r#"{"ociVersion": "1.0.0-rc1"}"#, PathConvention::Posix);
        let reason = all_of(&[Gate::RecognizedVersion, Gate::PathSeparatorMatches], &ctx);
        assert_eq!(
            reason.as_deref(),
            Some("cannot determine the path convention without platform.os")
        );

        let ctx = context(
            r#"{"ociVersion": "1.0.0-rc1", "platform": {"os": "linux"}}"#,
            PathConvention::Posix,
        );
        assert!(all_of(&[Gate::RecognizedVersion, Gate::PathSeparatorMatches], &ctx).is_none());
    }
}
