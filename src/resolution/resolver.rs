// Reference Resolver
//
// Maps a raw type-reference string to a Verdict against the name index. Pure:
// reads the corpus and index, writes nothing.

use serde::Serialize;
use tracing::debug;

use super::index::{IndexEntry, NameIndex};
use super::type_name::{heuristic_kind, short_name, TypeName};
use crate::model::{BaseTypeDetail, FileId, FileRecord, TypeAnnotation, TypeKind};

/// Outcome of resolving one reference
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Verdict {
    pub kind: TypeKind,
    pub target_file_id: FileId,
    /// Empty when unresolved
    pub target_path: String,
    /// Qualified name of the matched declaration, empty when unresolved
    pub target_type: String,
    /// Corpus position of the target file
    #[serde(skip)]
    pub target_position: Option<usize>,
}

impl Verdict {
    fn heuristic(short: &str) -> Self {
        Self {
            kind: heuristic_kind(short),
            target_file_id: FileId::UNRESOLVED,
            target_path: String::new(),
            target_type: String::new(),
            target_position: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.target_file_id.is_resolved()
    }

    pub fn to_annotation(&self) -> TypeAnnotation {
        TypeAnnotation {
            type_kind: self.kind,
            target_file_id: self.target_file_id,
            target_path: self.target_path.clone(),
        }
    }

    pub fn to_base_detail(&self, raw: &str) -> BaseTypeDetail {
        BaseTypeDetail {
            name: raw.to_string(),
            kind: self.kind,
            target_file_id: self.target_file_id,
            target_path: self.target_path.clone(),
        }
    }
}

pub struct Resolver<'a> {
    corpus: &'a [FileRecord],
    index: &'a NameIndex,
}

impl<'a> Resolver<'a> {
    /// `index` must have been built from this same `corpus` slice
    pub fn new(corpus: &'a [FileRecord], index: &'a NameIndex) -> Self {
        Self { corpus, index }
    }

    /// Resolve a member type reference (field, property, parameter).
    ///
    /// Exact qualified match first, then the first short-name candidate, then
    /// the naming heuristic.
    pub fn resolve(&self, raw: &str) -> Verdict {
        let name = match TypeName::parse(raw) {
            Ok(name) => name,
            Err(e) => return self.malformed(raw, e),
        };

        if let Some(entry) = self.index.qualified(name.stripped()) {
            return self.verdict_for(entry, name.short());
        }

        match self.index.candidates(name.short()).first() {
            Some(entry) => self.verdict_for(entry, name.short()),
            None => Verdict::heuristic(name.short()),
        }
    }

    /// Resolve a base-list entry.
    ///
    /// Among short-name candidates, prefer one whose qualified name matches the
    /// written form exactly or ends with it (partial qualification such as
    /// `Data.IRepo` for `App.Data.IRepo`), else take the first.
    pub fn resolve_base_type(&self, raw: &str) -> Verdict {
        let name = match TypeName::parse(raw) {
            Ok(name) => name,
            Err(e) => return self.malformed(raw, e),
        };

        let candidates = self.index.candidates(name.short());
        let suffix = format!(".{}", name.stripped());
        let chosen = candidates
            .iter()
            .find(|c| c.qualified_name == name.stripped() || c.qualified_name.ends_with(&suffix))
            .or_else(|| candidates.first());

        match chosen {
            Some(entry) => self.verdict_for(entry, name.short()),
            None => Verdict::heuristic(name.short()),
        }
    }

    fn malformed(&self, raw: &str, error: super::TypeNameError) -> Verdict {
        debug!("Unparseable type reference {:?}: {}", raw, error);
        Verdict::heuristic(short_name(raw.trim()))
    }

    fn verdict_for(&self, entry: &IndexEntry, short: &str) -> Verdict {
        Verdict {
            kind: self.confirm_kind(entry, short),
            target_file_id: entry.file_id,
            target_path: entry.path.clone(),
            target_type: entry.qualified_name.clone(),
            target_position: Some(entry.position),
        }
    }

    /// Kind of the declaration the entry points at: exact qualified match in the
    /// target file, then a short-name match, else Unknown.
    fn confirm_kind(&self, entry: &IndexEntry, short: &str) -> TypeKind {
        let Some(file) = self.corpus.get(entry.position) else {
            return TypeKind::Unknown;
        };

        file.types
            .iter()
            .find(|t| t.qualified_name() == entry.qualified_name)
            .or_else(|| file.types.iter().find(|t| t.name == short))
            .map(|t| TypeKind::from(t.kind))
            .unwrap_or(TypeKind::Unknown)
    }
}
