use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::command::Command;
use crate::error::Result;
use crate::linter::{Lint, Linter, Location};

/// Reports formatting mismatches from `cargo +nightly fmt -- --emit json`.
///
/// rustfmt prints absolute paths. They are made relative to the workspace
/// root when one is set, and to the directory rustfmt ran in otherwise.
#[derive(Debug, Default, Clone)]
pub struct RustFmt {
    root: Option<PathBuf>,
}

impl Linter for RustFmt {
    fn lints(&self, working_dir: PathBuf) -> Result<Vec<Lint>> {
        debug!("[RustFmt] - checking format for directory {}", working_dir.display());
        let output = Self::fmt(&working_dir)?;
        lints(&output, self.root.as_deref().unwrap_or(working_dir.as_path()))
    }
}

impl RustFmt {
    /// Reports paths relative to the cargo workspace `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn command_parameters() -> Vec<&'static str> {
        vec!["+nightly", "fmt", "--", "--emit", "json"]
    }

    fn fmt(path: &Path) -> Result<String> {
        let mut cmd = Command::new("cargo", path);
        cmd.args(Self::command_parameters());
        cmd.output_string()
    }
}

#[derive(Deserialize, Debug)]
struct FmtLint {
    /// Absolute path of the file.
    name: String,
    mismatches: Vec<FmtMismatch>,
}

#[derive(Deserialize, Debug)]
struct FmtMismatch {
    original_begin_line: u32,
    original_end_line: u32,
    original: String,
    expected: String,
}

/// `cargo fmt` runs rustfmt once per edition, so the output is a sequence of
/// json arrays, possibly empty.
fn lints(fmt_output: &str, base: &Path) -> Result<Vec<Lint>> {
    let mut lints = Vec::new();
    for fmt_lints in serde_json::Deserializer::from_str(fmt_output).into_iter::<Vec<FmtLint>>() {
        for fmt_lint in fmt_lints? {
            let path = relative_path(&fmt_lint.name, base);
            lints.extend(fmt_lint.mismatches.iter().map(|mismatch| Lint {
                message: display_mismatch(mismatch, &path),
                location: Location {
                    path: path.clone(),
                    lines: [mismatch.original_begin_line, mismatch.original_end_line],
                },
            }));
        }
    }
    Ok(lints)
}

fn relative_path(name: &str, base: &Path) -> String {
    let path = Path::new(name);
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn prefixed(text: &str, prefix: char) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_mismatch(mismatch: &FmtMismatch, path: &str) -> String {
    let header = if mismatch.original_begin_line == mismatch.original_end_line {
        format!("Diff in {} at line {}:", path, mismatch.original_begin_line)
    } else {
        format!(
            "Diff in {} between lines {} and {}:",
            path, mismatch.original_begin_line, mismatch.original_end_line
        )
    };
    format!(
        "{header}\n{}\n{}\n",
        prefixed(&mismatch.original, '-'),
        prefixed(&mismatch.expected, '+')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parameters() {
        assert_eq!(
            RustFmt::command_parameters(),
            vec!["+nightly", "fmt", "--", "--emit", "json"]
        );
    }

    #[test]
    fn test_lints() {
        let fmt_output = r#"[{"name":"/work/project/src/lib.rs","mismatches":[{"original_begin_line":3,"original_end_line":3,"expected_begin_line":3,"expected_end_line":3,"original":"fn foo( ) {}","expected":"fn foo() {}"},{"original_begin_line":10,"original_end_line":11,"expected_begin_line":10,"expected_end_line":10,"original":"let x =\n    1;","expected":"let x = 1;"}]}]"#;

        let lints = lints(fmt_output, Path::new("/work/project")).unwrap();
        assert_eq!(
            lints,
            vec![
                Lint {
                    message: "Diff in src/lib.rs at line 3:\n-fn foo( ) {}\n+fn foo() {}\n"
                        .to_string(),
                    location: Location {
                        path: "src/lib.rs".to_string(),
                        lines: [3, 3],
                    },
                },
                Lint {
                    message: "Diff in src/lib.rs between lines 10 and 11:\n-let x =\n-    1;\n+let x = 1;\n"
                        .to_string(),
                    location: Location {
                        path: "src/lib.rs".to_string(),
                        lines: [10, 11],
                    },
                },
            ]
        );
    }

    #[test]
    fn test_path_outside_working_dir_is_kept() {
        let fmt_output = r#"[{"name":"/elsewhere/a.rs","mismatches":[{"original_begin_line":1,"original_end_line":1,"original":"a","expected":"b"}]}]"#;
        let lints = lints(fmt_output, Path::new("/work/project")).unwrap();
        assert_eq!(lints[0].location.path, "/elsewhere/a.rs");
    }

    #[test]
    fn test_one_array_per_edition() {
        let fmt_output = "[{\"name\":\"/ws/src/main.rs\",\"mismatches\":[{\"original_begin_line\":2,\"original_end_line\":2,\"original\":\"a\",\"expected\":\"b\"}]}]\n[{\"name\":\"/ws/bar/src/lib.rs\",\"mismatches\":[{\"original_begin_line\":5,\"original_end_line\":6,\"original\":\"c\",\"expected\":\"d\"}]}]\n[]\n";
        let lints = lints(fmt_output, Path::new("/ws")).unwrap();
        assert_eq!(
            lints
                .iter()
                .map(|l| (l.location.path.as_str(), l.location.lines))
                .collect::<Vec<_>>(),
            vec![("src/main.rs", [2, 2]), ("bar/src/lib.rs", [5, 6])]
        );
    }

    #[test]
    fn test_paths_relative_to_root() {
        let fmt = RustFmt::with_root("/ws");
        assert_eq!(fmt.root.as_deref(), Some(Path::new("/ws")));
        assert_eq!(
            relative_path("/ws/crates/foo/src/lib.rs", Path::new("/ws")),
            "crates/foo/src/lib.rs"
        );
        assert_eq!(
            relative_path("/ws/crates/foo/src/lib.rs", Path::new("/ws/crates/foo")),
            "src/lib.rs"
        );
    }

    #[test]
    fn test_empty_output() {
        assert!(lints("", Path::new(".")).unwrap().is_empty());
        assert!(lints("[]", Path::new(".")).unwrap().is_empty());
        assert!(lints("\n", Path::new(".")).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_output() {
        let err = lints("not json", Path::new(".")).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }
}
