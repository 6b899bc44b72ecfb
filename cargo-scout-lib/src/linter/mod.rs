//! Linters and the lints they report.
//!
//! - [`clippy`] - `cargo clippy` with the `all` and `pedantic` groups
//! - [`rustfmt`] - `cargo fmt` formatting mismatches

use std::path::PathBuf;

use crate::error::Result;

/// `cargo clippy` runner.
pub mod clippy;

/// `cargo fmt` runner.
pub mod rustfmt;

/// Where a lint was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File path, relative to the cargo workspace root or absolute.
    pub path: String,
    /// First and last line, inclusive.
    pub lines: [u32; 2],
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lint {
    /// Human readable message, as rendered by the tool.
    pub message: String,
    pub location: Location,
}

/// A tool producing lints for a directory.
pub trait Linter {
    /// Runs the linter in `working_dir`.
    fn lints(&self, working_dir: PathBuf) -> Result<Vec<Lint>>;
}
