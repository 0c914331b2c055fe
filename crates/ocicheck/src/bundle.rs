//! Bundle location and the one-shot `config.json` load.
//!
//! An OCI bundle is a directory containing:
//! - `config.json`: the runtime configuration
//! - a root filesystem directory referenced by `root.path`
//!
//! Loading never fails. Each stage that cannot complete leaves the later
//! fields of [`LoadResult`] empty, and rules turn that absence into an
//! explicit failure or skip.
//!
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/v1.0.0-rc1/bundle.md>

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

/// Bundle file name constants.
pub mod paths {
    /// Standard config file name.
    pub const CONFIG_FILE: &str = "config.json";
    /// Bundle used when nothing else is configured.
    pub const DEFAULT_BUNDLE: &str = ".";
}

/// A bundle directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    path: PathBuf,
}

impl Bundle {
    /// Refer to a bundle directory. The directory is not required to exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the bundle directory path as given.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the config.json path.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.path.join(paths::CONFIG_FILE)
    }

    /// Bundle directory made absolute against the working directory, for
    /// lexical comparison with paths taken from the config.
    #[must_use]
    pub fn absolute_path(&self) -> PathBuf {
        std::path::absolute(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    /// Read and parse `config.json`.
    #[must_use]
    pub fn load(&self) -> LoadResult {
        LoadResult::load(self.config_path())
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new(paths::DEFAULT_BUNDLE)
    }
}

/// Immutable snapshot of one attempt to load `config.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadResult {
    config_path: PathBuf,
    exists: bool,
    read_error: Option<String>,
    raw_bytes: Option<Vec<u8>>,
    text: Option<String>,
    decode_error: Option<String>,
    document: Option<Value>,
    parse_error: Option<String>,
    version: Option<String>,
    declared_os: Option<String>,
}

impl LoadResult {
    /// Load the config file at `config_path`.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Self {
        let config_path = config_path.as_ref();
        let mut result = Self {
            config_path: config_path.to_path_buf(),
            ..Self::default()
        };

        match std::fs::read(config_path) {
            Ok(bytes) => {
                result.exists = true;
                debug!("Read {} bytes from {}", bytes.len(), config_path.display());
                result.apply_bytes(bytes);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No configuration at {}", config_path.display());
            }
            Err(e) => {
                warn!("Unable to read {}: {e}", config_path.display());
                result.exists = config_path.exists();
                result.read_error = Some(e.to_string());
            }
        }

        result
    }

    /// Build a snapshot from bytes already in memory.
    pub fn from_bytes<P: AsRef<Path>>(config_path: P, bytes: impl Into<Vec<u8>>) -> Self {
        let mut result = Self {
            config_path: config_path.as_ref().to_path_buf(),
            exists: true,
            ..Self::default()
        };
        result.apply_bytes(bytes.into());
        result
    }

    fn apply_bytes(&mut self, bytes: Vec<u8>) {
        // All configuration JSON MUST be encoded in UTF-8.
        match std::str::from_utf8(&bytes) {
            Ok(text) => {
                self.apply_text(text);
                self.text = Some(text.to_string());
            }
            Err(e) => {
                debug!("Configuration is not valid UTF-8: {e}");
                self.decode_error = Some(e.to_string());
            }
        }
        self.raw_bytes = Some(bytes);
    }

    fn apply_text(&mut self, text: &str) {
        let document = match serde_json::from_str::<Value>(text) {
            Ok(document) => document,
            Err(e) => {
                debug!("Configuration is not valid JSON: {e}");
                self.parse_error = Some(e.to_string());
                return;
            }
        };

        self.version = document
            .get("ociVersion")
            .and_then(Value::as_str)
            .map(str::to_string);
        self.declared_os = document
            .get("platform")
            .and_then(|platform| platform.get("os"))
            .and_then(Value::as_str)
            .map(str::to_string);
        debug!(
            version = ?self.version,
            os = ?self.declared_os,
            "Parsed configuration JSON"
        );
        self.document = Some(document);
    }

    /// Path the snapshot was loaded from.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Whether something exists at the config path.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    /// Why the file could not be read, when it exists but was unreadable.
    #[must_use]
    pub fn read_error(&self) -> Option<&str> {
        self.read_error.as_deref()
    }

    /// Raw file content.
    #[must_use]
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        self.raw_bytes.as_deref()
    }

    /// UTF-8 decoded content.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Decoder message when the content is not UTF-8.
    #[must_use]
    pub fn decode_error(&self) -> Option<&str> {
        self.decode_error.as_deref()
    }

    /// Parsed JSON document.
    #[must_use]
    pub const fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }

    /// Parser message when the text is not JSON.
    #[must_use]
    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    /// `ociVersion`, when it is a string.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// `platform.os`, when it is a string.
    #[must_use]
    pub fn declared_os(&self) -> Option<&str> {
        self.declared_os.as_deref()
    }
}
