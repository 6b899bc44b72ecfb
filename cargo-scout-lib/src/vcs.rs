//! Diff sections and the git backend.
//!
//! A [`Section`] is an inclusive range of lines that were added or modified
//! in the working tree relative to a target revision. Lints are later
//! matched against these sections.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::command::Command;
use crate::error::Result;

/// Lines changed in a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Path relative to the directory the diff was taken in.
    pub file_name: String,
    pub line_start: u32,
    pub line_end: u32,
}

/// A source of changed lines.
pub trait Vcs {
    /// Returns the sections changed in the repository at `repo_path`.
    fn sections(&self, repo_path: &Path) -> Result<Vec<Section>>;
}

/// Diffs the working tree against a target branch with `git diff`.
#[derive(Debug, Clone)]
pub struct Git {
    target_branch: String,
}

impl Default for Git {
    fn default() -> Self {
        Self::with_target("HEAD")
    }
}

impl Git {
    /// Creates a git backend diffing against `target_branch`.
    pub fn with_target(target_branch: impl Into<String>) -> Self {
        Self {
            target_branch: target_branch.into(),
        }
    }

    pub fn target_branch(&self) -> &str {
        &self.target_branch
    }

    fn command_parameters(&self) -> Vec<&str> {
        vec![
            "diff",
            "--no-color",
            "--no-ext-diff",
            "--relative",
            "-U0",
            &self.target_branch,
        ]
    }
}

impl Vcs for Git {
    fn sections(&self, repo_path: &Path) -> Result<Vec<Section>> {
        debug!("[Git] - getting diff against target {}", self.target_branch);
        let mut cmd = Command::new("git", repo_path);
        cmd.args(self.command_parameters());
        let diff = cmd.output_string()?;
        let sections = parse_diff(&diff);
        debug!("[Git] - {} changed sections", sections.len());
        Ok(sections)
    }
}

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -\d+(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("hunk header regex is valid")
});

/// Parses the output of `git diff -U0` into changed sections.
///
/// Hunks of deleted files and pure deletions are skipped: no line exists in
/// the working tree to attach a lint to.
#[must_use]
pub fn parse_diff(diff: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_file: Option<String> = None;
    // body lines left in the current hunk, so `+++`-looking content is not
    // mistaken for a file header
    let mut pending: u64 = 0;

    for line in diff.lines() {
        if pending > 0 {
            if !line.starts_with('\\') {
                pending -= 1;
            }
            continue;
        }

        if let Some(path) = line.strip_prefix("+++ ") {
            current_file = new_file_path(path);
            continue;
        }

        let Some(caps) = HUNK_HEADER.captures(line) else {
            continue;
        };
        let (Some(old_count), Some(start), Some(new_count)) = (
            count(caps.get(1)),
            caps[2].parse::<u32>().ok(),
            count(caps.get(3)),
        ) else {
            warn!("[Git] - skipping malformed hunk header `{line}`");
            continue;
        };
        pending = u64::from(old_count) + u64::from(new_count);

        let Some(file_name) = &current_file else {
            continue;
        };
        if new_count == 0 {
            continue;
        }

        let Some(line_end) = start.checked_add(new_count - 1) else {
            warn!("[Git] - skipping out of range hunk `{line}`");
            continue;
        };
        sections.push(Section {
            file_name: file_name.clone(),
            line_start: start,
            line_end,
        });
    }

    sections
}

/// A missing hunk count means a single line.
fn count(m: Option<regex::Match<'_>>) -> Option<u32> {
    match m {
        Some(m) => m.as_str().parse().ok(),
        None => Some(1),
    }
}

fn new_file_path(path: &str) -> Option<String> {
    // git appends a tab when the path contains spaces
    let path = path.trim_end_matches('\t');
    if path == "/dev/null" {
        return None;
    }
    Some(path.strip_prefix("b/").unwrap_or(path).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(file_name: &str, line_start: u32, line_end: u32) -> Section {
        Section {
            file_name: file_name.to_string(),
            line_start,
            line_end,
        }
    }

    #[test]
    fn test_command_parameters() {
        let git = Git::default();
        assert_eq!(
            git.command_parameters(),
            vec!["diff", "--no-color", "--no-ext-diff", "--relative", "-U0", "HEAD"]
        );

        let git = Git::with_target("main");
        assert_eq!(git.target_branch(), "main");
        assert_eq!(
            git.command_parameters(),
            vec!["diff", "--no-color", "--no-ext-diff", "--relative", "-U0", "main"]
        );
    }

    #[test]
    fn test_parse_diff() {
        let diff = r#"diff --git a/src/lib.rs b/src/lib.rs
index 3b18e51..a8c2d4f 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -3 +3 @@ use std::io;
-fn foo() {}
+fn foo() -> u32 { 1 }
@@ -10,0 +11,4 @@ fn bar() {
+fn baz() {
+    let count = 1;
+    println!("{}", count);
+}
diff --git a/src/main.rs b/src/main.rs
index 1111111..2222222 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -20,2 +20,3 @@ fn main() {
-    a();
-    b();
+    a();
+    b();
+    c();
"#;
        assert_eq!(
            parse_diff(diff),
            vec![
                section("src/lib.rs", 3, 3),
                section("src/lib.rs", 11, 14),
                section("src/main.rs", 20, 22),
            ]
        );
    }

    #[test]
    fn test_pure_deletion_is_skipped() {
        let diff = "--- a/src/lib.rs\n+++ b/src/lib.rs\n@@ -5,3 +4,0 @@\n-a\n-b\n-c\n";
        assert!(parse_diff(diff).is_empty());
    }

    #[test]
    fn test_deleted_file_is_skipped() {
        let diff = "diff --git a/old.rs b/old.rs\ndeleted file mode 100644\n--- a/old.rs\n+++ /dev/null\n@@ -1,2 +0,0 @@\n-a\n-b\n";
        assert!(parse_diff(diff).is_empty());
    }

    #[test]
    fn test_new_file() {
        let diff = "diff --git a/new.rs b/new.rs\nnew file mode 100644\n--- /dev/null\n+++ b/new.rs\n@@ -0,0 +1,3 @@\n+a\n+b\n+c\n";
        assert_eq!(parse_diff(diff), vec![section("new.rs", 1, 3)]);
    }

    #[test]
    fn test_hunk_lines_are_not_headers() {
        // an added line that itself starts with "++ " must not switch files
        let diff = "--- a/a.rs\n+++ b/a.rs\n@@ -1 +1,2 @@\n-w\n+++ b/fake.rs\n+x\n@@ -9 +10 @@\n-y\n+z\n";
        assert_eq!(
            parse_diff(diff),
            vec![section("a.rs", 1, 2), section("a.rs", 10, 10)]
        );
    }

    #[test]
    fn test_no_newline_marker_is_not_counted() {
        let diff = "--- a/a.rs\n+++ b/a.rs\n@@ -1 +1 @@\n-x\n\\ No newline at end of file\n+y\n\\ No newline at end of file\n@@ -5,0 +6 @@\n+z\n";
        assert_eq!(
            parse_diff(diff),
            vec![section("a.rs", 1, 1), section("a.rs", 6, 6)]
        );
    }

    #[test]
    fn test_out_of_range_hunk_is_skipped() {
        let diff = "--- a/a.rs\n+++ b/a.rs\n@@ -1 +4294967295,2 @@\n-x\n+y\n+z\n@@ -8 +9 @@\n-u\n+v\n";
        assert_eq!(parse_diff(diff), vec![section("a.rs", 9, 9)]);
    }

    #[test]
    fn test_empty_diff() {
        assert!(parse_diff("").is_empty());
    }
}
