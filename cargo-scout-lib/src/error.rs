use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors raised while collecting diffs, manifests or lints.
#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command output is not valid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("failed to parse linter output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cargo metadata failed: {0}")]
    Metadata(#[from] cargo_metadata::Error),

    /// A subprocess exited with a non-zero status.
    #[error("`{command}` failed:\n{stderr}")]
    Command { command: String, stderr: String },

    /// Lints were found on the lines of the diff.
    #[error("{0} warnings found in the diff")]
    NotClean(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
