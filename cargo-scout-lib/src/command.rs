//! Subprocess helper.
//!
//! Every external tool cargo-scout drives (`cargo`, `git`) goes through
//! [`Command`], which logs the command line and turns a non-zero exit into
//! an [`Error::Command`] carrying the tool's stderr.

use std::{
    ffi::OsStr,
    ops::{Deref, DerefMut},
    path::Path,
    process::Output,
};

use crate::error::{Error, Result};

/// A thin wrapper over `std::process::Command`.
///
/// Derefs to the inner command, so `env`, `envs`, `args` and friends from
/// the standard library are all available.
pub struct Command {
    inner: std::process::Command,
}

impl Deref for Command {
    type Target = std::process::Command;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Command {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Command {
    /// Creates a command for `program` running in `workdir`.
    pub fn new<S>(program: S, workdir: &Path) -> Command
    where
        S: AsRef<OsStr>,
    {
        let mut cmd = std::process::Command::new(program);
        cmd.current_dir(workdir);
        Self { inner: cmd }
    }

    /// Renders the command line as it would be typed in a shell.
    pub fn display(&self) -> String {
        let mut cmd_str = self.get_program().to_string_lossy().to_string();

        for arg in self.get_args() {
            cmd_str += " ";
            cmd_str += arg.to_string_lossy().as_ref();
        }

        cmd_str
    }

    /// Logs the command line at debug level.
    pub fn print_cmd(&self) {
        debug!("$ {}", self.display());
    }

    /// Runs the command to completion and captures its output.
    ///
    /// The exit status is not checked; see [`Command::output_string`].
    pub fn capture(&mut self) -> Result<Output> {
        self.print_cmd();
        Ok(self.inner.output()?)
    }

    /// Runs the command and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] with the captured stderr if the process
    /// exits with a non-zero status, and [`Error::Utf8`] if stdout is not
    /// valid UTF-8.
    pub fn output_string(&mut self) -> Result<String> {
        let output = self.capture()?;
        if !output.status.success() {
            return Err(Error::Command {
                command: self.display(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}
