//! Specification versions the rule set has been taught.

use std::fmt;

/// Recognized `ociVersion` values, newest first.
pub const SUPPORTED_VERSIONS: &[&str] = &[V1_0_0_RC1, V0_5_0];

const V1_0_0_RC1: &str = "1.0.0-rc1";
const V0_5_0: &str = "0.5.0";

/// A runtime-spec revision whose field semantics the rules encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// `1.0.0-rc1`: adds the Windows mount-nesting restriction and lets
    /// `root.path` be absolute.
    V1_0_0Rc1,
    /// `0.5.0`: `root.path` MUST be relative to the bundle.
    V0_5_0,
}

impl SpecVersion {
    /// Looks up a declared version string.
    #[must_use]
    pub fn parse(version: &str) -> Option<Self> {
        match version {
            V1_0_0_RC1 => Some(Self::V1_0_0Rc1),
            V0_5_0 => Some(Self::V0_5_0),
            _ => None,
        }
    }

    /// The version string as it appears in `config.json`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_0_0Rc1 => V1_0_0_RC1,
            Self::V0_5_0 => V0_5_0,
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `version` is one of [`SUPPORTED_VERSIONS`].
#[must_use]
pub fn is_recognized(version: Option<&str>) -> bool {
    version.and_then(SpecVersion::parse).is_some()
}

/// Validates `SemVer` 2.0.0 syntax, returning the parser's message on error.
pub fn check_semver(version: &str) -> std::result::Result<semver::Version, String> {
    semver::Version::parse(version).map_err(|e| e.to_string())
}
