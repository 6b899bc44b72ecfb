//! Cargo manifest reading.
//!
//! Linters have to be pointed at the right directories. A plain crate or a
//! workspace with a root package can be linted from the repository root, but
//! a virtual manifest (a `[workspace]` without a `[package]`) does not accept
//! feature flags, so each member is linted from its own directory.
//!
//! ```toml
//! [workspace]
//! members = ["cargo-scout", "cargo-scout-lib"]
//! ```

use std::path::Path;

use cargo_metadata::Metadata;
use serde::Deserialize;

use crate::error::Result;

/// What the linters need to know about the project layout.
pub trait Config {
    /// Workspace member directories, relative to the workspace root.
    fn members(&self) -> Vec<String>;

    /// Whether the linter has to run once per member instead of once at the
    /// root.
    fn linter_must_iterate(&self) -> bool;
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    package: Option<toml::Value>,
    workspace: Option<Workspace>,
}

#[derive(Debug, Default, Deserialize)]
struct Workspace {
    #[serde(default)]
    members: Vec<String>,
}

/// Project layout read from a `Cargo.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CargoConfig {
    members: Vec<String>,
    has_package: bool,
}

impl CargoConfig {
    /// Reads the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading manifest {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_manifest_str(&content)
    }

    /// Parses manifest contents.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML.
    pub fn from_manifest_str(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(Self {
            members: manifest.workspace.map(|w| w.members).unwrap_or_default(),
            has_package: manifest.package.is_some(),
        })
    }

    /// Builds the layout from `cargo metadata`.
    ///
    /// Unlike [`CargoConfig::from_manifest_path`] this resolves glob members
    /// such as `crates/*`.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let root = metadata.workspace_root.as_std_path();
        let root_package = metadata.root_package().map(|p| p.id.clone());

        let mut members: Vec<String> = metadata
            .workspace_packages()
            .into_iter()
            .filter(|p| Some(&p.id) != root_package.as_ref())
            .filter_map(|p| {
                let dir = p.manifest_path.parent()?.as_std_path();
                let rel = dir.strip_prefix(root).ok()?;
                Some(rel.to_string_lossy().replace('\\', "/"))
            })
            .filter(|rel| !rel.is_empty())
            .collect();
        members.sort();

        Self {
            members,
            has_package: root_package.is_some(),
        }
    }

    /// Runs `cargo metadata` for the manifest at `manifest_path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Metadata`] if cargo fails.
    pub fn from_cargo_metadata(manifest_path: impl AsRef<Path>) -> Result<Self> {
        let metadata = cargo_metadata::MetadataCommand::new()
            .manifest_path(manifest_path.as_ref())
            .no_deps()
            .exec()?;
        Ok(Self::from_metadata(&metadata))
    }

    /// Whether the manifest has a root `[package]`.
    pub fn has_package(&self) -> bool {
        self.has_package
    }
}

impl Config for CargoConfig {
    fn members(&self) -> Vec<String> {
        self.members.clone()
    }

    fn linter_must_iterate(&self) -> bool {
        !self.has_package && !self.members.is_empty()
    }
}
