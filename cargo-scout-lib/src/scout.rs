//! The orchestrator.
//!
//! [`Scout`] asks the VCS which lines changed, asks the linter what it
//! found, and keeps the intersection.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::intersections::lints_from_diff;
use crate::linter::{Lint, Linter};
use crate::vcs::Vcs;

/// Runs a linter and filters its output down to the diff.
pub struct Scout<V, C, L>
where
    V: Vcs,
    C: Config,
    L: Linter,
{
    vcs: V,
    config: C,
    linter: L,
}

impl<V, C, L> Scout<V, C, L>
where
    V: Vcs,
    C: Config,
    L: Linter,
{
    pub fn new(vcs: V, config: C, linter: L) -> Self {
        Self {
            vcs,
            config,
            linter,
        }
    }

    /// Runs in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved, or if
    /// the VCS or linter fails.
    pub fn run(&self) -> Result<Vec<Lint>> {
        let current_dir = std::fs::canonicalize(".")?;
        self.run_for(&current_dir)
    }

    /// Returns the lints found on lines changed in `repo_path`, a project
    /// that is its own cargo workspace root.
    ///
    /// # Errors
    ///
    /// Returns an error if the VCS or linter fails.
    pub fn run_for(&self, repo_path: &Path) -> Result<Vec<Lint>> {
        self.run_in(repo_path, repo_path)
    }

    /// Lints `project_dir`, which lives inside the cargo workspace at
    /// `workspace_root`.
    ///
    /// The diff is taken at the workspace root, because that is what clippy
    /// reports its paths relative to. The linter runs in the project
    /// directory, or in each member of a virtual manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the VCS or linter fails.
    pub fn run_in(&self, workspace_root: &Path, project_dir: &Path) -> Result<Vec<Lint>> {
        let sections = self.vcs.sections(workspace_root)?;
        if sections.is_empty() {
            debug!("no changes found, skipping the linter");
            return Ok(Vec::new());
        }

        let lints = if self.config.linter_must_iterate() {
            self.member_lints(workspace_root, project_dir)?
        } else {
            self.linter.lints(project_dir.to_path_buf())?
        };
        debug!("{} lints reported, {} changed sections", lints.len(), sections.len());

        Ok(lints_from_diff(&lints, &sections))
    }

    fn member_lints(&self, workspace_root: &Path, project_dir: &Path) -> Result<Vec<Lint>> {
        let mut lints = Vec::new();
        for member in self.config.members() {
            let member_dir: PathBuf = project_dir.join(&member);
            let member = root_relative(&member_dir, workspace_root);
            debug!("running the linter on workspace member {}", member_dir.display());
            let member_lints = self.linter.lints(member_dir)?;
            lints.extend(member_lints.into_iter().map(|lint| in_member(lint, &member)));
        }
        Ok(lints)
    }
}

fn root_relative(dir: &Path, workspace_root: &Path) -> String {
    dir.strip_prefix(workspace_root)
        .unwrap_or(dir)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Makes a member-relative lint path relative to the workspace root.
///
/// Clippy already reports paths from the workspace root, so those are left
/// untouched.
fn in_member(mut lint: Lint, member: &str) -> Lint {
    let member = member.trim_end_matches('/');
    let prefix = format!("{member}/");
    if !lint.location.path.starts_with(&prefix) && !Path::new(&lint.location.path).is_absolute() {
        lint.location.path = format!("{prefix}{}", lint.location.path);
    }
    lint
}
