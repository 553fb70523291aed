//! Conflict predicate between two tickets' file sets.

use std::path::Path;

use crate::config::ConflictSensitivity;
use crate::ticket::proposal::Category;

/// Filenames conventionally touched by many unrelated changes in the same
/// directory — an edit to one of these alongside another ticket's edit in
/// that directory is a likely merge conflict even without a shared category.
pub const DEFAULT_CONFLICT_PRONE_FILENAMES: &[&str] = &["index.*", "package.json", "Cargo.toml", "go.mod"];

/// Whether two tickets conflict and so cannot share a wave.
pub fn conflicts(
    a_files: &[String],
    a_category: &Category,
    b_files: &[String],
    b_category: &Category,
    sensitivity: ConflictSensitivity,
    conflict_prone_filenames: &[&str],
) -> bool {
    match sensitivity {
        ConflictSensitivity::Relaxed => exact_overlap(a_files, b_files),
        ConflictSensitivity::Normal => {
            exact_overlap(a_files, b_files)
                || directory_overlap(a_files, a_category, b_files, b_category, conflict_prone_filenames)
        }
        ConflictSensitivity::Strict => {
            exact_overlap(a_files, b_files)
                || directory_overlap(a_files, a_category, b_files, b_category, conflict_prone_filenames)
                || prefix_overlap(a_files, b_files)
        }
    }
}

fn exact_overlap(a: &[String], b: &[String]) -> bool {
    a.iter().any(|f| b.contains(f))
}

/// Same directory, and either a shared conflict-prone filename or the same
/// ticket category — a bare same-directory match isn't enough on its own.
fn directory_overlap(
    a: &[String],
    a_category: &Category,
    b: &[String],
    b_category: &Category,
    conflict_prone_filenames: &[&str],
) -> bool {
    let same_category = a_category == b_category;
    let a_dirs: Vec<_> = a.iter().filter_map(|f| Path::new(f).parent()).collect();

    b.iter().filter_map(|f| Path::new(f).parent()).any(|bd| {
        if !a_dirs.contains(&bd) {
            return false;
        }
        same_category
            || a.iter().any(|fa| is_conflict_prone_filename(Path::new(fa), conflict_prone_filenames))
            || b.iter().any(|fb| is_conflict_prone_filename(Path::new(fb), conflict_prone_filenames))
    })
}

fn is_conflict_prone_filename(path: &Path, conflict_prone_filenames: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    conflict_prone_filenames.iter().any(|pattern| match pattern.strip_suffix(".*") {
        Some(stem) => path.file_stem().and_then(|s| s.to_str()) == Some(stem),
        None => name == *pattern,
    })
}

/// Same monorepo package under `packages/<name>` or `apps/<name>`.
fn prefix_overlap(a: &[String], b: &[String]) -> bool {
    let a_packages: Vec<_> = a.iter().filter_map(|f| monorepo_package(f)).collect();
    b.iter().filter_map(|f| monorepo_package(f)).any(|bp| a_packages.contains(&bp))
}

fn monorepo_package(path: &str) -> Option<(&'static str, String)> {
    let mut components = Path::new(path).components();
    while let Some(component) = components.next() {
        let std::path::Component::Normal(part) = component else {
            continue;
        };
        let root = match part.to_str() {
            Some("packages") => "packages",
            Some("apps") => "apps",
            _ => continue,
        };
        if let Some(std::path::Component::Normal(name)) = components.next() {
            if let Some(name) = name.to_str() {
                return Some((root, name.to_string()));
            }
        }
        return None;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn relaxed_only_flags_exact_file_overlap() {
        let a = files(&["src/a.rs"]);
        let b = files(&["src/b.rs"]);
        assert!(!conflicts(&a, &Category::Refactor, &b, &Category::Refactor, ConflictSensitivity::Relaxed, DEFAULT_CONFLICT_PRONE_FILENAMES));
        let c = files(&["src/a.rs"]);
        assert!(conflicts(&a, &Category::Refactor, &c, &Category::Refactor, ConflictSensitivity::Relaxed, DEFAULT_CONFLICT_PRONE_FILENAMES));
    }

    #[test]
    fn normal_does_not_flag_same_directory_alone() {
        let a = files(&["src/mod/a.rs"]);
        let b = files(&["src/mod/b.rs"]);
        assert!(!conflicts(&a, &Category::Refactor, &b, &Category::Docs, ConflictSensitivity::Normal, DEFAULT_CONFLICT_PRONE_FILENAMES));
    }

    #[test]
    fn normal_flags_same_directory_and_same_category() {
        let a = files(&["src/mod/a.rs"]);
        let b = files(&["src/mod/b.rs"]);
        assert!(conflicts(&a, &Category::Refactor, &b, &Category::Refactor, ConflictSensitivity::Normal, DEFAULT_CONFLICT_PRONE_FILENAMES));
        assert!(!conflicts(&a, &Category::Refactor, &b, &Category::Refactor, ConflictSensitivity::Relaxed, DEFAULT_CONFLICT_PRONE_FILENAMES));
    }

    #[test]
    fn normal_flags_same_directory_and_conflict_prone_filename() {
        let a = files(&["packages/web/package.json"]);
        let b = files(&["packages/web/src.rs"]);
        assert!(conflicts(&a, &Category::Deps, &b, &Category::Refactor, ConflictSensitivity::Normal, DEFAULT_CONFLICT_PRONE_FILENAMES));
    }

    #[test]
    fn strict_flags_same_monorepo_package_across_subdirectories() {
        let a = files(&["packages/web/src/a.rs"]);
        let b = files(&["packages/web/tests/b.rs"]);
        assert!(conflicts(&a, &Category::Refactor, &b, &Category::Test, ConflictSensitivity::Strict, DEFAULT_CONFLICT_PRONE_FILENAMES));
    }

    #[test]
    fn strict_does_not_flag_different_monorepo_packages() {
        let a = files(&["packages/web/src/a.rs"]);
        let b = files(&["packages/api/src/b.rs"]);
        assert!(!conflicts(&a, &Category::Refactor, &b, &Category::Refactor, ConflictSensitivity::Strict, DEFAULT_CONFLICT_PRONE_FILENAMES));
    }
}
