//! Optional `.scout.toml` settings file.
//!
//! Lives next to the project's `Cargo.toml`. Every field is optional;
//! command-line flags win over the file, the file wins over defaults.
//!
//! ```toml
//! branch = "main"
//! without_error = false
//! features = "serde tokio"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// File name looked up next to the manifest.
pub const SETTINGS_FILE: &str = ".scout.toml";

/// Settings read from `.scout.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Branch or revision to diff against.
    pub branch: Option<String>,
    /// Exit successfully even when lints are found.
    pub without_error: Option<bool>,
    /// Space or comma separated list of features passed to clippy.
    pub features: Option<String>,
    pub all_features: Option<bool>,
    pub no_default_features: Option<bool>,
    /// Use `clippy-preview` from the nightly toolchain.
    pub preview: Option<bool>,
}

impl Settings {
    /// Loads `.scout.toml` from `dir`, or defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(SETTINGS_FILE);
        if !path.is_file() {
            trace!("no {} in {}", SETTINGS_FILE, dir.as_ref().display());
            return Ok(Self::default());
        }
        info!("using settings from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }
}
