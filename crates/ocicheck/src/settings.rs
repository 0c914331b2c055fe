//! Checker settings.
//!
//! Settings are loaded from multiple sources with the following priority:
//!
//! 1. `BUNDLE` environment variable (bundle path only)
//! 2. Environment variables (`OCICHECK_*`)
//! 3. An explicitly requested settings file
//! 4. User settings file (`~/.config/ocicheck/config.toml`)
//! 5. System settings file (`/etc/ocicheck/config.toml`)
//! 6. Default values
//!
//! ## Example Settings File
//!
//! ```toml
//! bundle = "/var/lib/containers/mybundle"
//! format = "json"
//!
//! [logging]
//! level = "debug"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::bundle::paths;
use crate::error::{CheckError, Result};

/// Checker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bundle directory to check.
    pub bundle: PathBuf,
    /// Report format.
    pub format: OutputFormat,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bundle: PathBuf::from(paths::DEFAULT_BUNDLE),
            format: OutputFormat::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// How a report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per rule.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from the default files and environment.
    pub fn load() -> Result<Self> {
        Ok(Self::figment(None).extract()?)
    }

    /// Loads settings, layering `path` above the default files.
    ///
    /// Unlike the default files, `path` must exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CheckError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("settings file not found: {}", path.display()),
            )));
        }
        Ok(Self::figment(Some(path)).extract()?)
    }

    /// The layered provider chain.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(system_config_path()))
            .merge(Toml::file(user_config_path()));
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("OCICHECK_").split("_"))
            .merge(Env::raw().only(&["BUNDLE"]))
    }
}

fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("ocicheck")
        .join("config.toml")
}

fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/ocicheck/config.toml")
}
