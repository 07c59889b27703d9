//! JSON output for an analyzed corpus
//!
//! One pretty-printed document per source file at `<out>/<relative path>.json`
//! and an aggregate `summary.json` keyed by path. Only called once every
//! pipeline pass has finished, so files never carry partial annotations.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::model::{DeclaredKind, FileId, FileRecord};
use crate::utils::paths::to_absolute_native;

pub const SUMMARY_FILE_NAME: &str = "summary.json";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TypeSummary {
    pub name: String,
    pub kind: DeclaredKind,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FileSummary {
    pub file_id: FileId,
    pub namespace: String,
    pub types: Vec<TypeSummary>,
    pub resolved_implements: usize,
    pub implemented_by: usize,
    pub imports: usize,
}

impl From<&FileRecord> for FileSummary {
    fn from(record: &FileRecord) -> Self {
        Self {
            file_id: record.file_id,
            namespace: record.namespace.clone(),
            types: record
                .types
                .iter()
                .map(|t| TypeSummary {
                    name: t.name.clone(),
                    kind: t.kind,
                })
                .collect(),
            resolved_implements: record.resolved_implements.len(),
            implemented_by: record.implemented_by.len(),
            imports: record.imports.len(),
        }
    }
}

/// Summary map keyed by relative path
pub fn summarize(corpus: &[FileRecord]) -> BTreeMap<String, FileSummary> {
    corpus
        .iter()
        .map(|record| (record.path.clone(), FileSummary::from(record)))
        .collect()
}

/// Where a record's document lands under `out_dir`
pub fn record_output_path(out_dir: &Path, record: &FileRecord) -> PathBuf {
    to_absolute_native(&format!("{}.json", record.path), out_dir)
}

/// Write every record and the summary under `out_dir`, creating directories as needed
pub fn write_corpus(corpus: &[FileRecord], out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    for record in corpus {
        let target = record_output_path(out_dir, record);
        write_json(&target, record)?;
        debug!("Wrote {}", target.display());
    }

    write_json(&out_dir.join(SUMMARY_FILE_NAME), &summarize(corpus))?;

    info!(
        "Wrote {} file documents and {} to {}",
        corpus.len(),
        SUMMARY_FILE_NAME,
        out_dir.display()
    );
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(target: &Path, value: &T) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", target.display()))?;
    fs::write(target, json).with_context(|| format!("Failed to write {}", target.display()))
}
