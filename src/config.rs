//! Analyzer configuration
//!
//! Defaults, optionally overridden by a `typelink.json` in the source root and
//! extended with `.typelinkignore` patterns. The CLI applies its flags on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::resolution::ImportOptions;
use crate::utils::ignore::load_typelinkignore;

pub const CONFIG_FILE_NAME: &str = "typelink.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Compute per-file propagation results on the rayon pool
    pub parallel_resolution: bool,
    /// Glob patterns matched against relative Unix-style paths
    pub exclude: Vec<String>,
    /// `.typelinkignore`-style patterns (directory, `*.ext`, substring)
    pub ignore_patterns: Vec<String>,
    /// Where `analyze` writes JSON; nothing is written when unset. Relative
    /// paths in `typelink.json` are taken from the source root.
    pub out_dir: Option<PathBuf>,
    /// File dependency pass settings, the `"imports"` object in `typelink.json`
    pub imports: ImportOptions,
}

impl AnalyzerConfig {
    /// Load the configuration for a source root.
    ///
    /// A missing `typelink.json` yields the defaults; a malformed one is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE_NAME);
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let parsed: AnalyzerConfig = serde_json::from_str(&content)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
            debug!("Loaded configuration from {}", config_path.display());
            parsed.rooted_at(root)
        } else {
            Self::default()
        };

        config
            .ignore_patterns
            .extend(load_typelinkignore(root)?);
        Ok(config)
    }

    fn rooted_at(mut self, root: &Path) -> Self {
        if let Some(out_dir) = self.out_dir.take() {
            self.out_dir = Some(if out_dir.is_relative() {
                root.join(out_dir)
            } else {
                out_dir
            });
        }
        self
    }

    /// Validate the exclude globs up front so discovery can't fail halfway
    pub fn compiled_excludes(&self) -> Result<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern)
                    .with_context(|| format!("Invalid exclude pattern '{}'", pattern))
            })
            .collect()
    }
}
