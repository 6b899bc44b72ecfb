//! # cargo-scout
//!
//! Leave the codebase better than when you found it.
//!
//! Runs clippy or rustfmt and only reports what the lines you changed
//! against a target branch trigger:
//!
//! ```text
//! cargo scout lint --branch main
//! cargo scout fmt
//! ```

use std::path::PathBuf;

use anyhow::Context;
use cargo_scout_lib::linter::{Lint, Linter, clippy::Clippy, rustfmt::RustFmt};
use cargo_scout_lib::scout::Scout;
use cargo_scout_lib::Error;
use clap::{Args, Parser, Subcommand};

use crate::ctx::AppContext;
use crate::report::Tool;

/// Application context and settings merging.
mod ctx;

/// Terminal output.
mod report;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

/// `cargo` runs `cargo-scout scout ...`, so the first argument is the
/// subcommand name.
#[derive(Parser, Debug)]
#[command(name = "cargo", bin_name = "cargo")]
enum CargoCli {
    Scout(ScoutCli),
}

#[derive(Args, Debug)]
#[command(version, about = "Leave the codebase better than when you found it.")]
struct ScoutCli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run clippy and report the warnings on lines you changed
    Lint(LintOptions),
    /// Run rustfmt and report the formatting issues on lines you changed
    Fmt(FmtOptions),
}

#[derive(Args, Debug)]
struct CommonOptions {
    /// Set the verbosity level
    #[arg(short, long)]
    verbose: bool,

    /// Set the target branch [default: HEAD]
    #[arg(short, long, value_name = "branch")]
    branch: Option<String>,

    /// Set the path to the project's Cargo.toml
    #[arg(short = 't', long, value_name = "cargo_toml", default_value = "Cargo.toml")]
    cargo_toml: PathBuf,

    /// Exit with success even if warnings are found
    #[arg(short, long)]
    without_error: bool,
}

#[derive(Args, Debug)]
struct LintOptions {
    #[command(flatten)]
    common: CommonOptions,

    /// Pass --no-default-features to clippy
    #[arg(long)]
    no_default_features: bool,

    /// Pass --all-features to clippy
    #[arg(long)]
    all_features: bool,

    /// Space or comma separated list of features to activate
    #[arg(long, value_name = "features")]
    features: Option<String>,

    /// Run cargo clippy-preview from the nightly toolchain
    #[arg(long)]
    preview: bool,
}

#[derive(Args, Debug)]
struct FmtOptions {
    #[command(flatten)]
    common: CommonOptions,
}

impl Command {
    fn common(&self) -> &CommonOptions {
        match self {
            Command::Lint(opts) => &opts.common,
            Command::Fmt(opts) => &opts.common,
        }
    }
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn clippy(ctx: &AppContext, opts: &LintOptions) -> Clippy {
    let settings = &ctx.settings;
    let mut clippy = Clippy::default();
    clippy
        .set_verbose(ctx.verbose)
        .set_no_default_features(
            opts.no_default_features || settings.no_default_features.unwrap_or(false),
        )
        .set_all_features(opts.all_features || settings.all_features.unwrap_or(false))
        .set_features(opts.features.clone().or_else(|| settings.features.clone()))
        .set_preview(opts.preview || settings.preview.unwrap_or(false));
    clippy
}

fn scout<L: Linter>(
    ctx: &AppContext,
    common: &CommonOptions,
    linter: L,
    message: &str,
) -> anyhow::Result<Vec<Lint>> {
    let git = ctx.git(common.branch.as_deref());
    info!("Getting diff against target {}", git.target_branch());

    let config = ctx.cargo_config()?;
    let spinner = report::spinner(message, ctx.verbose);
    let lints =
        Scout::new(git, config, linter).run_in(&ctx.paths.workspace, &ctx.paths.project);
    spinner.finish_and_clear();

    lints.with_context(|| format!("failed to scout {}", ctx.paths.project.display()))
}

fn main() -> anyhow::Result<()> {
    let CargoCli::Scout(cli) = CargoCli::parse();
    let common = cli.command.common();
    init_logger(common.verbose);

    let ctx = AppContext::new(&common.cargo_toml, common.verbose)?;

    let (tool, lints) = match &cli.command {
        Command::Lint(opts) => {
            let lints = scout(&ctx, common, clippy(&ctx, opts), "Running clippy")?;
            (Tool::Clippy, lints)
        }
        Command::Fmt(_) => {
            let lints = scout(
                &ctx,
                common,
                RustFmt::with_root(ctx.paths.workspace.clone()),
                "Running rustfmt",
            )?;
            (Tool::RustFmt, lints)
        }
    };

    report::display_warnings(tool, &lints);

    if lints.is_empty() || ctx.without_error(common.without_error) {
        Ok(())
    } else {
        Err(Error::NotClean(lints.len()).into())
    }
}
