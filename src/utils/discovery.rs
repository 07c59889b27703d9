//! Source discovery
//!
//! Walks a source root for `.cs` files and assigns FileIds. Ids follow the
//! sorted relative paths, so the same tree always yields the same ids and the
//! same corpus order.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::AnalyzerConfig;
use crate::model::FileId;
use crate::utils::ignore::{is_default_ignored_dir, is_ignored_by_pattern};
use crate::utils::paths::to_relative_unix_style;

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_id: FileId,
    /// Relative to the source root, `/`-separated
    pub relative_path: String,
    pub absolute_path: PathBuf,
}

/// Find every C# source under `root`, ordered by relative path, ids from 1
pub fn discover_sources(root: &Path, config: &AnalyzerConfig) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        anyhow::bail!("Source root {} is not a directory", root.display());
    }
    let excludes = config.compiled_excludes()?;

    let mut found: Vec<(String, PathBuf)> = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() || !is_csharp_file(entry.path()) {
            continue;
        }

        let relative = to_relative_unix_style(entry.path(), root)?;
        if is_ignored_by_pattern(Path::new(&relative), &config.ignore_patterns) {
            debug!("Ignored by pattern: {}", relative);
            continue;
        }
        if excludes.iter().any(|pattern| pattern.matches(&relative)) {
            debug!("Excluded by glob: {}", relative);
            continue;
        }

        found.push((relative, entry.into_path()));
    }

    found.sort_by(|(a, _), (b, _)| a.cmp(b));

    let sources: Vec<SourceFile> = found
        .into_iter()
        .enumerate()
        .map(|(i, (relative_path, absolute_path))| SourceFile {
            file_id: FileId(i as u32 + 1),
            relative_path,
            absolute_path,
        })
        .collect();

    info!("Discovered {} C# files under {}", sources.len(), root.display());
    Ok(sources)
}

// The root itself is never skipped, even when it is named `build` or `bin`
fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(is_default_ignored_dir)
            .unwrap_or(false)
}

fn is_csharp_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(crate::language::detect_language_from_extension)
        == Some("csharp")
}
