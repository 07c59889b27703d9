//! Analyzer - discovery, extraction and the resolution pipeline for one source root

use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::config::AnalyzerConfig;
use crate::extractors::ExtractorManager;
use crate::model::FileRecord;
use crate::model::FileId;
use crate::resolution::{
    dependency_levels, run_pipeline, NameIndex, PipelineReport, Resolver, Verdict,
};
use crate::utils::discover_sources;

/// A fully resolved corpus and what the pipeline did to it
#[derive(Debug, Clone)]
pub struct Analysis {
    pub corpus: Vec<FileRecord>,
    pub report: PipelineReport,
}

impl Analysis {
    /// Resolve a raw type name against this corpus, as a member reference would be
    pub fn inspect(&self, raw: &str) -> Verdict {
        let index = NameIndex::build(&self.corpus);
        Resolver::new(&self.corpus, &index).resolve(raw)
    }

    /// Dependency levels of the file at relative `path`, `None` when it was not analyzed
    pub fn dependencies(&self, path: &str, max_levels: usize) -> Option<Vec<Vec<&FileRecord>>> {
        let start = self.corpus.iter().find(|record| record.path == path)?;
        let levels = dependency_levels(&self.corpus, start.file_id, max_levels)
            .into_iter()
            .map(|level| level.into_iter().filter_map(|id| self.record(id)).collect())
            .collect();
        Some(levels)
    }

    fn record(&self, file_id: FileId) -> Option<&FileRecord> {
        self.corpus.iter().find(|record| record.file_id == file_id)
    }
}

/// Discover, extract and resolve every C# file under `root`.
///
/// Per-file extraction failures degrade to empty records; discovery errors
/// (missing root, bad exclude glob) abort the run.
pub fn analyze(root: &Path, config: &AnalyzerConfig) -> Result<Analysis> {
    let started = Instant::now();

    let sources = discover_sources(root, config)?;
    let mut corpus = ExtractorManager::new().extract_all(&sources);
    let report = run_pipeline(&mut corpus, config.parallel_resolution, &config.imports);

    info!(
        "Analyzed {} files in {:?}: {}/{} base types resolved, {}/{} member references resolved, {} file imports",
        report.files,
        started.elapsed(),
        report.propagation.resolved_base_types,
        report.propagation.base_types,
        report.propagation.resolved_member_references,
        report.propagation.member_references,
        report.imports,
    );

    Ok(Analysis { corpus, report })
}
