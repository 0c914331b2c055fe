//! Immutable inputs shared by every rule in one run.

use std::path::Path;

use serde_json::{Map, Value};

use crate::bundle::{Bundle, LoadResult};
use crate::path::PathConvention;
use crate::version::SpecVersion;

/// Facts about the machine performing the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostContext {
    /// Separator convention of the host.
    pub convention: PathConvention,
}

impl HostContext {
    /// Context describing the current process.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            convention: PathConvention::host(),
        }
    }

    /// Context for a host using `convention`.
    #[must_use]
    pub const fn with_convention(convention: PathConvention) -> Self {
        Self { convention }
    }
}

impl Default for HostContext {
    fn default() -> Self {
        Self::current()
    }
}

/// Everything a rule may read: the bundle, its loaded config, and the host.
///
/// Built once per run and never mutated, so repeated or concurrent runs
/// against different bundles do not interfere.
#[derive(Debug, Clone)]
pub struct CheckContext {
    bundle: Bundle,
    load: LoadResult,
    host: HostContext,
}

impl CheckContext {
    /// Load `bundle` and describe the current host.
    #[must_use]
    pub fn load(bundle: Bundle) -> Self {
        let load = bundle.load();
        Self::new(bundle, load, HostContext::current())
    }

    /// Assemble a context from parts.
    #[must_use]
    pub const fn new(bundle: Bundle, load: LoadResult, host: HostContext) -> Self {
        Self { bundle, load, host }
    }

    /// The bundle being checked.
    #[must_use]
    pub const fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// The config snapshot.
    #[must_use]
    pub const fn load_result(&self) -> &LoadResult {
        &self.load
    }

    /// The host description.
    #[must_use]
    pub const fn host(&self) -> HostContext {
        self.host
    }

    /// Parsed document, when the config is valid JSON.
    #[must_use]
    pub const fn document(&self) -> Option<&Value> {
        self.load.document()
    }

    /// Top-level object of the document.
    #[must_use]
    pub fn config(&self) -> Option<&Map<String, Value>> {
        self.document().and_then(Value::as_object)
    }

    /// Top-level field of the document.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.config().and_then(|config| config.get(key))
    }

    /// Declared `ociVersion` string.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.load.version()
    }

    /// Declared version, when it is one the rules understand.
    #[must_use]
    pub fn spec_version(&self) -> Option<SpecVersion> {
        self.version().and_then(SpecVersion::parse)
    }

    /// Declared `platform.os`.
    #[must_use]
    pub fn declared_os(&self) -> Option<&str> {
        self.load.declared_os()
    }

    /// Convention the config's paths are written in. Only meaningful once
    /// the path-separator gate has passed, at which point it equals the
    /// host's.
    #[must_use]
    pub fn convention(&self) -> PathConvention {
        self.declared_os()
            .map_or(self.host.convention, PathConvention::for_os)
    }

    /// Bundle directory as an absolute path string.
    #[must_use]
    pub fn bundle_dir(&self) -> String {
        self.bundle.absolute_path().to_string_lossy().into_owned()
    }

    /// Resolve a config path against the bundle for filesystem queries.
    #[must_use]
    pub fn resolve(&self, path: &str) -> std::path::PathBuf {
        Path::new(&self.convention().join(&self.bundle_dir(), path)).to_path_buf()
    }
}
