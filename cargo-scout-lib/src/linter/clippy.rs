use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::linter::{Lint, Linter, Location};

/// Runs `cargo clippy` with `clippy::all` and `clippy::pedantic` enabled.
#[derive(Debug, Default, Clone)]
pub struct Clippy {
    verbose: bool,
    no_default_features: bool,
    all_features: bool,
    features: Option<String>,
    preview: bool,
}

/// One line of `--message-format json` output.
#[derive(Deserialize)]
struct CargoMessage {
    /// Absent on `compiler-artifact` and `build-finished` lines.
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    /// The diagnostic as rustc prints it, e.g. "unused variable: `count`".
    rendered: Option<String>,
    spans: Vec<Span>,
}

#[derive(Deserialize)]
struct Span {
    file_name: String,
    line_start: u32,
    line_end: u32,
}

impl Linter for Clippy {
    fn lints(&self, working_dir: PathBuf) -> Result<Vec<Lint>> {
        debug!("[Clippy] - getting lints for directory {}", working_dir.display());
        let output = self.clippy(&working_dir)?;
        Ok(lints(&output))
    }
}

impl Clippy {
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    pub fn set_no_default_features(&mut self, no_default_features: bool) -> &mut Self {
        self.no_default_features = no_default_features;
        self
    }

    pub fn set_all_features(&mut self, all_features: bool) -> &mut Self {
        self.all_features = all_features;
        self
    }

    pub fn set_features(&mut self, features: Option<String>) -> &mut Self {
        self.features = features;
        self
    }

    /// Uses `clippy-preview` from the nightly toolchain.
    pub fn set_preview(&mut self, preview: bool) -> &mut Self {
        self.preview = preview;
        self
    }

    fn command_parameters(&self) -> Vec<&str> {
        let mut params = if self.preview {
            vec![
                "+nightly",
                "clippy-preview",
                "-Z",
                "unstable-options",
                "--message-format",
                "json",
            ]
        } else {
            vec!["clippy", "--message-format", "json"]
        };
        if self.verbose {
            params.push("--verbose");
        }
        if self.no_default_features {
            params.push("--no-default-features");
        }
        if self.all_features {
            params.push("--all-features");
        }
        if let Some(features) = &self.features {
            params.extend(["--features", features.as_str()]);
        }
        params.extend(["--", "-W", "clippy::all", "-W", "clippy::pedantic"]);
        params
    }

    fn envs(&self) -> Vec<(&str, &str)> {
        let mut envs = vec![];
        if self.verbose {
            envs.push(("RUST_BACKTRACE", "full"));
        }
        envs
    }

    fn cargo(&self, path: &Path) -> Command {
        let mut cmd = Command::new("cargo", path);
        cmd.envs(self.envs());
        cmd
    }

    fn clippy(&self, path: &Path) -> Result<String> {
        let mut cmd = self.cargo(path);
        cmd.args(self.command_parameters());
        let output = cmd.capture()?;
        let stdout = String::from_utf8(output.stdout)?;

        if self.verbose {
            debug!("{stdout}");
        }
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !self.verbose {
            return Err(Error::Command {
                command: cmd.display(),
                stderr,
            });
        }

        // The report is the output of a clean build with a full backtrace.
        warn!("[Clippy] - run failed, cleaning and building with full backtrace");
        debug!("{stderr}");
        let mut clean = self.cargo(path);
        clean.arg("clean");
        clean.capture()?;
        let mut build = self.cargo(path);
        build.arg("build");
        let build_output = build.capture()?;
        Err(Error::Command {
            command: cmd.display(),
            stderr: format!(
                "{}{}",
                String::from_utf8_lossy(&build_output.stdout),
                String::from_utf8_lossy(&build_output.stderr)
            ),
        })
    }
}

/// Extracts one lint per span from clippy's json output.
#[must_use]
fn lints(clippy_output: &str) -> Vec<Lint> {
    clippy_output
        .lines()
        .filter(|l| l.starts_with('{'))
        .filter_map(|line| serde_json::from_str::<CargoMessage>(line).ok())
        .filter_map(|m| m.message)
        .flat_map(|message| {
            let rendered = message.rendered.unwrap_or_default();
            message.spans.into_iter().map(move |span| Lint {
                message: rendered.clone(),
                location: Location {
                    path: span.file_name,
                    lines: [span.line_start, span.line_end],
                },
            })
        })
        .collect()
}
