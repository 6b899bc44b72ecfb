//! # cargo-scout-lib
//!
//! Run Rust linters and keep only the diagnostics that touch the lines you
//! changed.
//!
//! The library is split along three seams, each one a trait so that the
//! [`scout::Scout`] orchestrator can be driven by real tools or by test
//! doubles:
//!
//! - [`vcs::Vcs`] - which lines changed against a target branch
//! - [`config::Config`] - which workspace members need linting
//! - [`linter::Linter`] - which lints a tool reports for a directory
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cargo_scout_lib::config::CargoConfig;
//! use cargo_scout_lib::linter::clippy::Clippy;
//! use cargo_scout_lib::scout::Scout;
//! use cargo_scout_lib::vcs::Git;
//!
//! let vcs = Git::with_target("main");
//! let config = CargoConfig::from_manifest_path("Cargo.toml").unwrap();
//! let mut clippy = Clippy::default();
//! clippy.set_all_features(true);
//!
//! let lints = Scout::new(vcs, config, clippy).run().unwrap();
//! for lint in lints {
//!     println!("{}", lint.message);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`command`] - subprocess helper
//! - [`config`] - Cargo manifest reading
//! - [`error`] - error type shared by every module
//! - [`intersections`] - lint and diff overlap
//! - [`linter`] - clippy and rustfmt
//! - [`scout`] - the orchestrator
//! - [`settings`] - optional `.scout.toml` file
//! - [`vcs`] - git diff sections

#[macro_use]
extern crate log;

/// Subprocess helper used by linters and the git backend.
pub mod command;

/// Cargo manifest reading and workspace member discovery.
pub mod config;

/// Error type and result alias.
pub mod error;

/// Filtering lints down to the ones overlapping a diff.
pub mod intersections;

/// Linter trait and the clippy and rustfmt implementations.
pub mod linter;

/// Ties a VCS, a manifest and a linter together.
pub mod scout;

/// Optional `.scout.toml` settings file.
pub mod settings;

/// Diff sections and the git backend.
pub mod vcs;

pub use error::{Error, Result};
