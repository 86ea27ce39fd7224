//! apidiff configuration loading from `.apidiffrc.toml`.
//!
//! Configuration is optional. Every setting has a built-in default, and
//! command-line flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [facade]
//! keep_internals = false
//!
//! [output]
//! format = "table"
//! color = true
//!
//! [report]
//! output_dir = "artifacts/api"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".apidiffrc.toml";

/// Root configuration structure loaded from `.apidiffrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct ApiDiffConfig {
    /// Facade reduction defaults.
    #[serde(default)]
    pub facade: FacadeSettings,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,

    /// Report file settings.
    #[serde(default)]
    pub report: ReportSettings,
}

/// Facade reduction defaults.
#[derive(Debug, Deserialize, Default)]
pub struct FacadeSettings {
    /// Keep internal declarations when reducing.
    ///
    /// When unset, a module keeps its internals only if it declares friend
    /// modules.
    #[serde(default)]
    pub keep_internals: Option<bool>,
}

/// Output formatting preferences.
///
/// Distinct from the runtime `OutputConfig` in the output module, which
/// handles actual rendering.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

/// Report file settings.
#[derive(Debug, Deserialize, Default)]
pub struct ReportSettings {
    /// Directory for written reports such as the xUnit document.
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl ApiDiffConfig {
    /// Load configuration from `.apidiffrc.toml` in the given directory.
    ///
    /// A missing file yields defaults. An unreadable or invalid file is
    /// logged as a warning and also yields defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Configured keep-internals default, if any.
    pub fn keep_internals(&self) -> Option<bool> {
        self.facade.keep_internals
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Check if colored output should be used.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    /// Report directory, if configured.
    pub fn report_dir(&self) -> Option<PathBuf> {
        self.report.output_dir.as_ref().map(PathBuf::from)
    }
}
