//! Application context.
//!
//! [`AppContext`] resolves where the project lives, merges command-line
//! flags with the optional `.scout.toml`, and builds the pieces the
//! [`Scout`](cargo_scout_lib::scout::Scout) needs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cargo_metadata::Metadata;
use cargo_scout_lib::config::{CargoConfig, Config};
use cargo_scout_lib::settings::Settings;
use cargo_scout_lib::vcs::Git;

/// Branch diffed against when neither the flag nor the settings name one.
pub const DEFAULT_BRANCH: &str = "HEAD";

/// Path configuration.
#[derive(Debug, Default, Clone)]
pub struct PathConfig {
    /// Canonical path of the `Cargo.toml`.
    pub manifest: PathBuf,
    /// Directory holding the manifest. Linters run from here.
    pub project: PathBuf,
    /// Root of the cargo workspace the project belongs to. Git runs from
    /// here and every reported path is relative to it.
    pub workspace: PathBuf,
}

/// State shared by every subcommand.
#[derive(Debug, Default, Clone)]
pub struct AppContext {
    pub paths: PathConfig,
    pub verbose: bool,
    /// Values from `.scout.toml`, if any.
    pub settings: Settings,
}

impl AppContext {
    /// Resolves the manifest and its workspace, and loads settings next to
    /// the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest does not exist or `.scout.toml` is
    /// malformed.
    pub fn new(cargo_toml: &Path, verbose: bool) -> anyhow::Result<Self> {
        let manifest = cargo_toml
            .canonicalize()
            .with_context(|| format!("can not open manifest {}", cargo_toml.display()))?;
        let project = manifest
            .parent()
            .ok_or_else(|| anyhow!("{} has no parent directory", manifest.display()))?
            .to_path_buf();
        let settings = Settings::load(&project)
            .with_context(|| format!("invalid settings in {}", project.display()))?;

        let mut ctx = Self {
            paths: PathConfig {
                manifest,
                workspace: project.clone(),
                project,
            },
            verbose,
            settings,
        };
        ctx.paths.workspace = ctx.workspace_root();
        Ok(ctx)
    }

    /// The cargo workspace root, or the project directory when cargo can
    /// not tell.
    fn workspace_root(&self) -> PathBuf {
        match self.metadata() {
            Ok(metadata) => {
                let root = metadata.workspace_root.into_std_path_buf();
                root.canonicalize().unwrap_or(root)
            }
            Err(e) => {
                warn!(
                    "can not resolve the cargo workspace root, using {}: {e:#}",
                    self.paths.project.display()
                );
                self.paths.project.clone()
            }
        }
    }

    /// Gets the Cargo metadata for the project.
    ///
    /// # Errors
    ///
    /// Returns an error if `cargo metadata` fails.
    pub fn metadata(&self) -> anyhow::Result<Metadata> {
        let res = cargo_metadata::MetadataCommand::new()
            .manifest_path(&self.paths.manifest)
            .no_deps()
            .exec()?;
        Ok(res)
    }

    /// Reads the project layout.
    ///
    /// Glob members (`crates/*`) are resolved through `cargo metadata`;
    /// everything else comes straight from the manifest.
    pub fn cargo_config(&self) -> anyhow::Result<CargoConfig> {
        let config = CargoConfig::from_manifest_path(&self.paths.manifest)?;
        if config.members().iter().any(|m| m.contains('*')) {
            debug!("glob workspace members, asking cargo metadata");
            return Ok(CargoConfig::from_metadata(&self.metadata()?));
        }
        Ok(config)
    }

    pub fn branch(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.settings.branch.clone())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
    }

    pub fn git(&self, flag: Option<&str>) -> Git {
        Git::with_target(self.branch(flag))
    }

    pub fn without_error(&self, flag: bool) -> bool {
        flag || self.settings.without_error.unwrap_or(false)
    }
}
