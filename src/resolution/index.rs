// Global Name Index
//
// Two lookups over the whole corpus, built once per run and read-only afterwards:
// qualified name -> first declaring file, short name -> every declaring file in
// discovery order.

use std::collections::HashMap;
use tracing::debug;

use crate::model::FileRecord;

/// Where a declared type lives
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Position of the declaring file in the corpus slice the index was built from
    pub position: usize,
    pub file_id: crate::model::FileId,
    pub path: String,
    pub qualified_name: String,
}

#[derive(Debug, Default)]
pub struct NameIndex {
    qualified: HashMap<String, IndexEntry>,
    short: HashMap<String, Vec<IndexEntry>>,
}

impl NameIndex {
    /// Build both indices from the corpus in its given order.
    ///
    /// The first declaration of a qualified name wins; later duplicates are only
    /// visible through the short-name candidate list.
    pub fn build(corpus: &[FileRecord]) -> Self {
        let mut index = NameIndex::default();

        for (position, file) in corpus.iter().enumerate() {
            for declared in &file.types {
                let entry = IndexEntry {
                    position,
                    file_id: file.file_id,
                    path: file.path.clone(),
                    qualified_name: declared.qualified_name(),
                };

                if !index.qualified.contains_key(&entry.qualified_name) {
                    index
                        .qualified
                        .insert(entry.qualified_name.clone(), entry.clone());
                } else {
                    debug!(
                        "Duplicate qualified name '{}' in {} ignored (first declaration wins)",
                        entry.qualified_name, file.path
                    );
                }

                index
                    .short
                    .entry(declared.name.clone())
                    .or_default()
                    .push(entry);
            }
        }

        debug!(
            "Built name index: {} qualified names, {} short names",
            index.qualified.len(),
            index.short.len()
        );
        index
    }

    pub fn qualified(&self, qualified_name: &str) -> Option<&IndexEntry> {
        self.qualified.get(qualified_name)
    }

    /// Candidates for a short name, in discovery order; empty when unknown
    pub fn candidates(&self, short_name: &str) -> &[IndexEntry] {
        self.short
            .get(short_name)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct qualified names
    pub fn len(&self) -> usize {
        self.qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qualified.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclaredKind, DeclaredType, FileId};

    fn file(id: u32, path: &str, types: Vec<DeclaredType>) -> FileRecord {
        let mut record = FileRecord::new(FileId(id), path);
        record.types = types;
        record
    }

    #[test]
    fn test_empty_corpus_yields_empty_index() {
        let index = NameIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.candidates("Anything").is_empty());
        assert!(index.qualified("N.A").is_none());
    }

    #[test]
    fn test_first_declaration_wins_for_qualified_name() {
        let corpus = vec![
            file(1, "First.cs", vec![DeclaredType::new("A", "N", DeclaredKind::Class)]),
            file(2, "Second.cs", vec![DeclaredType::new("A", "N", DeclaredKind::Interface)]),
        ];
        let index = NameIndex::build(&corpus);

        let entry = index.qualified("N.A").unwrap();
        assert_eq!(entry.file_id, FileId(1));
        assert_eq!(entry.path, "First.cs");
        assert_eq!(index.len(), 1);

        // Both declarations remain short-name candidates, in discovery order
        let candidates = index.candidates("A");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].path, "First.cs");
        assert_eq!(candidates[1].path, "Second.cs");
    }

    #[test]
    fn test_global_namespace_uses_bare_name() {
        let corpus = vec![file(
            1,
            "Global.cs",
            vec![DeclaredType::new("Program", "", DeclaredKind::Class)],
        )];
        let index = NameIndex::build(&corpus);
        assert!(index.qualified("Program").is_some());
        assert_eq!(index.candidates("Program")[0].qualified_name, "Program");
    }

    #[test]
    fn test_short_name_candidates_keep_file_order_not_alphabetical() {
        let corpus = vec![
            file(1, "z/Foo.cs", vec![DeclaredType::new("Foo", "Zeta", DeclaredKind::Class)]),
            file(2, "a/Foo.cs", vec![DeclaredType::new("Foo", "Alpha", DeclaredKind::Class)]),
        ];
        let index = NameIndex::build(&corpus);
        let names: Vec<&str> = index
            .candidates("Foo")
            .iter()
            .map(|c| c.qualified_name.as_str())
            .collect();
        assert_eq!(names, vec!["Zeta.Foo", "Alpha.Foo"]);
    }

    #[test]
    fn test_build_does_not_touch_records() {
        let corpus = vec![file(1, "A.cs", vec![DeclaredType::new("A", "N", DeclaredKind::Class)])];
        let before = corpus.clone();
        let _ = NameIndex::build(&corpus);
        assert_eq!(corpus, before);
    }
}
