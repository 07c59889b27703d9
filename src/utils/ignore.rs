//! Utilities for handling .typelinkignore file patterns
//!
//! Loading and matching of user ignore patterns, plus the directories that are
//! always skipped during source discovery.
//!
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Build output and tooling directories never walked for sources
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "bin",
    "obj",
    ".git",
    "node_modules",
    "packages",
    "dist",
    "build",
    "target",
];

/// Load custom ignore patterns from .typelinkignore in the source root
///
/// Empty lines and comments (lines starting with #) are skipped.
///
/// ```text
/// # .typelinkignore
/// Generated/
/// *.Designer.cs
/// Migrations
/// ```
pub fn load_typelinkignore(root: &Path) -> Result<Vec<String>> {
    let ignore_file = root.join(".typelinkignore");

    if !ignore_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&ignore_file)
        .map_err(|e| anyhow::anyhow!("Failed to read .typelinkignore: {}", e))?;

    let patterns: Vec<String> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect();

    if !patterns.is_empty() {
        debug!(
            "Loaded {} custom ignore patterns from .typelinkignore",
            patterns.len()
        );
    }

    Ok(patterns)
}

/// True when a directory name is one of [`DEFAULT_IGNORED_DIRS`]
pub fn is_default_ignored_dir(name: &str) -> bool {
    DEFAULT_IGNORED_DIRS.contains(&name)
}

/// Check if a path matches any of the custom ignore patterns
///
/// Supports three pattern types:
/// - Directory patterns (ending with /): the directory as a whole path component, plus contents
/// - Wildcard extension patterns (starting with *.): matches the file suffix
/// - Substring patterns: matches anywhere in path
///
/// "Generated/" matches "Generated" and "src/Generated/A.cs" but not "MyGenerated".
pub fn is_ignored_by_pattern(path: &Path, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    // Patterns are written with forward slashes
    let path_str = path.to_str().unwrap_or("").replace('\\', "/");

    patterns
        .iter()
        .any(|pattern| matches_pattern(&path_str, pattern))
}

fn matches_pattern(path_str: &str, pattern: &str) -> bool {
    if let Some(dir_name) = pattern.strip_suffix('/') {
        if dir_name.is_empty() {
            return false;
        }
        let component_start = |pos: usize| pos == 0 || path_str.as_bytes()[pos - 1] == b'/';

        // Directory at the start of the path or as an inner component
        if path_str.starts_with(pattern) || path_str.contains(&format!("/{}/", dir_name)) {
            return true;
        }

        // Directory itself, at the end of the path
        if path_str.ends_with(dir_name) && component_start(path_str.len() - dir_name.len()) {
            return true;
        }

        false
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        // *.Designer.cs
        suffix.starts_with('.') && path_str.ends_with(suffix)
    } else {
        path_str.contains(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_typelinkignore() {
        let temp_dir = TempDir::new().unwrap();
        let patterns = load_typelinkignore(temp_dir.path()).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_load_typelinkignore_with_patterns() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".typelinkignore"),
            "# Comment line\nGenerated/\n*.Designer.cs\n\n  Migrations  \n# Another comment\n",
        )
        .unwrap();

        let patterns = load_typelinkignore(temp_dir.path()).unwrap();
        assert_eq!(patterns, vec!["Generated/", "*.Designer.cs", "Migrations"]);
    }

    #[test]
    fn test_is_ignored_directory_pattern() {
        let patterns = vec!["Generated/".to_string()];
        assert!(is_ignored_by_pattern(
            &PathBuf::from("src/Generated/Schema.cs"),
            &patterns
        ));
        assert!(is_ignored_by_pattern(
            &PathBuf::from("Generated/Schema.cs"),
            &patterns
        ));
        assert!(is_ignored_by_pattern(&PathBuf::from("src/Generated"), &patterns));
    }

    #[test]
    fn test_directory_pattern_respects_component_boundaries() {
        let patterns = vec!["packages/".to_string()];
        assert!(!is_ignored_by_pattern(&PathBuf::from("my-packages"), &patterns));
        assert!(!is_ignored_by_pattern(
            &PathBuf::from("src/subpackages/A.cs"),
            &patterns
        ));
        assert!(!is_ignored_by_pattern(&PathBuf::from("packages-old"), &patterns));
    }

    #[test]
    fn test_is_ignored_wildcard_extension() {
        let patterns = vec!["*.Designer.cs".to_string()];
        assert!(is_ignored_by_pattern(
            &PathBuf::from("Forms/Main.Designer.cs"),
            &patterns
        ));
        assert!(!is_ignored_by_pattern(&PathBuf::from("Forms/Main.cs"), &patterns));
    }

    #[test]
    fn test_is_ignored_substring_match() {
        let patterns = vec!["Migrations".to_string()];
        assert!(is_ignored_by_pattern(
            &PathBuf::from("Data/Migrations/0001_Init.cs"),
            &patterns
        ));
    }

    #[test]
    fn test_windows_separators_are_normalized() {
        let patterns = vec!["Generated/".to_string()];
        assert!(is_ignored_by_pattern(
            &PathBuf::from(r"src\Generated\Schema.cs"),
            &patterns
        ));
    }

    #[test]
    fn test_default_ignored_dirs() {
        assert!(is_default_ignored_dir("bin"));
        assert!(is_default_ignored_dir("obj"));
        assert!(is_default_ignored_dir("node_modules"));
        assert!(!is_default_ignored_dir("src"));
        assert!(!is_default_ignored_dir("Bin2"));
    }
}
