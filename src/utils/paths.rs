//! Path conversion between absolute native paths and the relative Unix-style
//! paths stored on FileRecords and used as output keys.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Convert an absolute path under `root` to a relative path with `/` separators
///
/// Both paths are canonicalized when possible so symlinked roots still match.
/// Fails when `absolute` does not live under `root`.
pub fn to_relative_unix_style(absolute: &Path, root: &Path) -> Result<String> {
    let canonical_absolute = absolute
        .canonicalize()
        .unwrap_or_else(|_| absolute.to_path_buf());
    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    let relative = canonical_absolute
        .strip_prefix(&canonical_root)
        .with_context(|| {
            format!(
                "File path '{}' is not within source root '{}'",
                canonical_absolute.display(),
                canonical_root.display()
            )
        })?;

    let relative_str = relative
        .to_str()
        .context("Path contains invalid UTF-8")?;

    Ok(relative_str.replace('\\', "/"))
}

/// Join a relative Unix-style path onto a native base directory
pub fn to_absolute_native(relative_unix: &str, base: &Path) -> PathBuf {
    base.join(relative_unix)
}
