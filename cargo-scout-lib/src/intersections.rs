use crate::linter::Lint;
use crate::vcs::Section;

/// Keeps the lints whose lines overlap a changed section of the same file.
///
/// Both ranges are inclusive. Order is preserved and each lint appears at
/// most once, however many sections it overlaps.
#[must_use]
pub fn lints_from_diff(lints: &[Lint], sections: &[Section]) -> Vec<Lint> {
    lints
        .iter()
        .filter(|lint| sections.iter().any(|section| overlaps(lint, section)))
        .cloned()
        .collect()
}

fn overlaps(lint: &Lint, section: &Section) -> bool {
    let [start, end] = lint.location.lines;
    same_file(&lint.location.path, &section.file_name)
        && start <= section.line_end
        && section.line_start <= end
}

fn same_file(lint_path: &str, diff_path: &str) -> bool {
    let lint_path = lint_path.trim_start_matches("./");
    let diff_path = diff_path.trim_start_matches("./");
    lint_path.replace('\\', "/") == diff_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Location;

    fn lint(path: &str, start: u32, end: u32) -> Lint {
        Lint {
            message: format!("{path}:{start}-{end}"),
            location: Location {
                path: path.to_string(),
                lines: [start, end],
            },
        }
    }

    fn section(file_name: &str, line_start: u32, line_end: u32) -> Section {
        Section {
            file_name: file_name.to_string(),
            line_start,
            line_end,
        }
    }

    #[test]
    fn test_lints_from_diff() {
        let lints = vec![
            lint("src/a.rs", 1, 1),
            lint("src/a.rs", 5, 8),
            lint("src/a.rs", 20, 20),
            lint("src/b.rs", 5, 5),
        ];
        let sections = vec![section("src/a.rs", 8, 12), section("src/c.rs", 5, 5)];

        assert_eq!(lints_from_diff(&lints, &sections), vec![lint("src/a.rs", 5, 8)]);
    }

    #[test]
    fn test_boundaries() {
        let sections = vec![section("a.rs", 10, 12)];
        assert!(lints_from_diff(&[lint("a.rs", 9, 9)], &sections).is_empty());
        assert!(lints_from_diff(&[lint("a.rs", 13, 20)], &sections).is_empty());
        assert_eq!(lints_from_diff(&[lint("a.rs", 12, 20)], &sections).len(), 1);
        assert_eq!(lints_from_diff(&[lint("a.rs", 1, 10)], &sections).len(), 1);
        // lint spanning the whole section
        assert_eq!(lints_from_diff(&[lint("a.rs", 1, 100)], &sections).len(), 1);
    }

    #[test]
    fn test_lint_kept_once() {
        let sections = vec![section("a.rs", 1, 2), section("a.rs", 4, 5)];
        assert_eq!(lints_from_diff(&[lint("a.rs", 1, 5)], &sections).len(), 1);
    }

    #[test]
    fn test_paths_are_normalized() {
        let sections = vec![section("src/a.rs", 1, 1)];
        assert_eq!(lints_from_diff(&[lint("./src/a.rs", 1, 1)], &sections).len(), 1);
        assert_eq!(lints_from_diff(&[lint("src\\a.rs", 1, 1)], &sections).len(), 1);
    }

    #[test]
    fn test_empty() {
        assert!(lints_from_diff(&[], &[section("a.rs", 1, 1)]).is_empty());
        assert!(lints_from_diff(&[lint("a.rs", 1, 1)], &[]).is_empty());
    }
}
