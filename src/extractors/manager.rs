//! ExtractorManager - Public API for declaration extraction
//!
//! Parses source files and delegates to the C# extractor. Batch extraction runs
//! in parallel; a file that fails to read or parse degrades to an empty record
//! so it still holds its FileId and path in the corpus.

use anyhow::Context;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, warn};
use tree_sitter::Parser;

use crate::extractors::csharp::CSharpExtractor;
use crate::model::{FileId, FileRecord};
use crate::utils::discovery::SourceFile;

/// Manager for the C# extractor
pub struct ExtractorManager {
    // No state needed - parsers are created per file so extraction can run on any thread
}

impl Default for ExtractorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorManager {
    pub fn new() -> Self {
        Self {}
    }

    /// Extract one file's declarations from its content.
    ///
    /// `file_path` is the relative Unix-style path stored on the record.
    pub fn extract_file(
        &self,
        file_id: FileId,
        file_path: &str,
        content: &str,
    ) -> Result<FileRecord, anyhow::Error> {
        // Determine language from file extension
        let language = self.get_language_from_extension(file_path)?;

        // Create parser for the language
        let mut parser = Parser::new();
        let tree_sitter_language = crate::language::get_tree_sitter_language(language)?;

        parser.set_language(&tree_sitter_language).map_err(|e| {
            anyhow::anyhow!("Failed to set parser language for {}: {}", language, e)
        })?;

        // Parse the file
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| anyhow::anyhow!("Failed to parse file: {}", file_path))?;

        let extractor = CSharpExtractor::new(file_path.to_string(), content.to_string());
        if extractor.has_syntax_errors(&tree) {
            warn!(
                "Syntax errors in {}; declarations may be incomplete",
                file_path
            );
        }

        let mut record = extractor.extract_file(&tree, file_id);
        record.content_hash = content_hash(content);

        debug!(
            "Extracted {} types from {} file: {}",
            record.types.len(),
            language,
            file_path
        );
        Ok(record)
    }

    /// Read and extract a discovered file from disk
    pub fn extract_source(&self, source: &SourceFile) -> Result<FileRecord, anyhow::Error> {
        let content = std::fs::read_to_string(&source.absolute_path)
            .with_context(|| format!("Failed to read {}", source.absolute_path.display()))?;
        self.extract_file(source.file_id, &source.relative_path, &content)
    }

    /// Extract every discovered file in parallel, preserving discovery order.
    ///
    /// Per-file failures are logged and replaced by an empty record.
    pub fn extract_all(&self, sources: &[SourceFile]) -> Vec<FileRecord> {
        sources
            .par_iter()
            .map(|source| match self.extract_source(source) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Extraction failed for {}: {:#}", source.relative_path, e);
                    FileRecord::new(source.file_id, source.relative_path.clone())
                }
            })
            .collect()
    }

    /// Determine language from file extension
    fn get_language_from_extension(&self, file_path: &str) -> Result<&'static str, anyhow::Error> {
        let path = Path::new(file_path);
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        crate::language::detect_language_from_extension(extension)
            .ok_or_else(|| anyhow::anyhow!("Unsupported file extension: {}", extension))
    }
}

/// blake3 hex digest of a file's content
pub fn content_hash(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}
