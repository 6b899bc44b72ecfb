//! Terminal output.

use std::time::Duration;

use cargo_scout_lib::linter::Lint;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Which tool produced the lints, for the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Clippy,
    RustFmt,
}

impl Tool {
    fn name(self) -> &'static str {
        match self {
            Tool::Clippy => "clippy::pedantic",
            Tool::RustFmt => "rustfmt",
        }
    }
}

/// Spinner shown while a linter runs.
///
/// Hidden in verbose mode, where the linter output is logged instead.
pub fn spinner(message: &str, verbose: bool) -> ProgressBar {
    if verbose {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn location(lint: &Lint) -> String {
    let [start, end] = lint.location.lines;
    if start == end {
        format!("{}:{}", lint.location.path, start)
    } else {
        format!("{}:{}-{}", lint.location.path, start, end)
    }
}

pub fn summary(tool: Tool, count: usize) -> String {
    if count == 0 {
        format!(
            "No warnings raised by {} in your diff, you're good to go!",
            tool.name()
        )
    } else {
        format!("{} found {} warnings in your diff", tool.name(), count)
    }
}

/// Prints every lint followed by a summary line.
pub fn display_warnings(tool: Tool, lints: &[Lint]) {
    for lint in lints {
        println!("{}", format!("--> {}", location(lint)).bold().yellow());
        for line in lint.message.lines() {
            println!("{line}");
        }
    }

    let summary = summary(tool, lints.len());
    if lints.is_empty() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red().bold());
    }
}
