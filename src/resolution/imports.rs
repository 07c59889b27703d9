// File Dependency Pass
//
// Links each file to the files it depends on, one FileImport per target file,
// tagged with the first rule that matched. Rules run in a fixed order: member
// types (with DI expansion), `new` expressions, call qualifiers, called method
// names, `using` namespaces, then the `<Type>.cs` filename fallback.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::info;

use super::index::NameIndex;
use super::type_name::TypeName;
use crate::model::{FileId, FileImport, FileRecord, ImportReason};

/// Files whose names contain one of these are not linked through `using` alone;
/// they import half the project and would link to everything.
const USING_IGNORED_FILE_KEYWORDS: &[&str] =
    &["dependencyinjection", "databasecontext", "startup", "program"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    /// `using A.B` matches namespaces `A.B` and `A.B.*` only, not the parent `A`
    pub strict_usings: bool,
    /// Do not record links found only through a `using`
    pub skip_using_only: bool,
    /// Case-insensitive substrings; target files whose name contains one are never linked
    pub exclude_filename_patterns: Vec<String>,
}

/// Whether `using` brings `declared` (a namespace some file declares) into scope.
///
/// Equal or parent namespaces always match; permissive mode also accepts a
/// using of a child namespace (`using A.B.C` matches `A.B`).
pub fn using_matches(using: &str, declared: &str, strict: bool) -> bool {
    let is_parent = |outer: &str, inner: &str| {
        inner.len() > outer.len()
            && inner.starts_with(outer)
            && inner.as_bytes()[outer.len()] == b'.'
    };

    if declared == using || is_parent(using, declared) {
        return true;
    }
    !strict && is_parent(declared, using)
}

/// Lookups shared by every file's dependency scan
struct ImportContext<'a> {
    corpus: &'a [FileRecord],
    index: &'a NameIndex,
    options: &'a ImportOptions,
    /// method name -> corpus positions declaring it, in corpus order
    methods: HashMap<&'a str, Vec<usize>>,
    /// service short name -> implementation short names, registration order
    services: HashMap<&'a str, Vec<&'a str>>,
    /// (namespace, position) for every declared namespace
    namespaces: Vec<(&'a str, usize)>,
    excluded: HashSet<usize>,
}

impl<'a> ImportContext<'a> {
    fn new(corpus: &'a [FileRecord], index: &'a NameIndex, options: &'a ImportOptions) -> Self {
        let mut methods: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut services: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut namespaces = Vec::new();
        let patterns: Vec<String> = options
            .exclude_filename_patterns
            .iter()
            .map(|p| p.to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        let mut excluded = HashSet::new();

        for (position, file) in corpus.iter().enumerate() {
            for method in file
                .types
                .iter()
                .flat_map(|t| t.methods.iter())
                .filter(|m| !m.is_constructor)
            {
                let files = methods.entry(method.name.as_str()).or_default();
                if !files.contains(&position) {
                    files.push(position);
                }
            }

            for registration in &file.registrations {
                let implementations = services.entry(registration.service.as_str()).or_default();
                if !implementations.contains(&registration.implementation.as_str()) {
                    implementations.push(registration.implementation.as_str());
                }
            }

            for namespace in &file.namespaces {
                namespaces.push((namespace.as_str(), position));
            }

            let name = file_name(&file.path).to_lowercase();
            if patterns.iter().any(|p| name.contains(p.as_str())) {
                excluded.insert(position);
            }
        }

        Self {
            corpus,
            index,
            options,
            methods,
            services,
            namespaces,
            excluded,
        }
    }

    fn imports_for(&self, position: usize) -> Vec<FileImport> {
        let file = &self.corpus[position];
        let mut scan = ImportScan {
            context: self,
            source: position,
            seen: HashSet::new(),
            imports: Vec::new(),
        };

        let member_types = member_type_names(file);
        let created_types = created_type_names(file);

        for name in &member_types {
            scan.link_type(name, ImportReason::Member, name);
            if let Some(implementations) = self.services.get(name.as_str()) {
                for implementation in implementations {
                    let symbol = format!("{}->{}", name, implementation);
                    scan.link_type(implementation, ImportReason::Di, &symbol);
                }
            }
        }

        for name in &created_types {
            scan.link_type(name, ImportReason::New, name);
        }

        for call in file
            .types
            .iter()
            .flat_map(|t| t.methods.iter())
            .flat_map(|m| m.calls.iter())
        {
            if let Some(qualifier) = type_qualifier(&call.receiver) {
                scan.link_type(qualifier, ImportReason::Qualifier, qualifier);
            }
            if let Some(positions) = self.methods.get(call.name.as_str()) {
                for &target in positions {
                    scan.link(target, ImportReason::Method, &call.name);
                }
            }
        }

        if !self.options.skip_using_only {
            for using in &file.usings {
                for &(declared, target) in &self.namespaces {
                    if !using_matches(using, declared, self.options.strict_usings) {
                        continue;
                    }
                    let name = file_name(&self.corpus[target].path).to_lowercase();
                    if USING_IGNORED_FILE_KEYWORDS.iter().any(|k| name.contains(k)) {
                        continue;
                    }
                    scan.link(target, ImportReason::Using, using);
                }
            }
        }

        for name in member_types.iter().chain(created_types.iter()) {
            if !self.index.candidates(name).is_empty() {
                continue;
            }
            let wanted = format!("{}.cs", name.to_lowercase());
            for (target, other) in self.corpus.iter().enumerate() {
                if file_name(&other.path).to_lowercase() == wanted {
                    scan.link(target, ImportReason::Filename, name);
                }
            }
        }

        scan.imports
    }
}

/// Per-file accumulator: one import per target, never the file itself
struct ImportScan<'c, 'a> {
    context: &'c ImportContext<'a>,
    source: usize,
    seen: HashSet<usize>,
    imports: Vec<FileImport>,
}

impl ImportScan<'_, '_> {
    fn link_type(&mut self, short: &str, reason: ImportReason, symbol: &str) {
        let targets: Vec<usize> = self
            .context
            .index
            .candidates(short)
            .iter()
            .map(|entry| entry.position)
            .collect();
        for target in targets {
            self.link(target, reason, symbol);
        }
    }

    fn link(&mut self, target: usize, reason: ImportReason, symbol: &str) {
        if target == self.source
            || self.context.excluded.contains(&target)
            || !self.seen.insert(target)
        {
            return;
        }
        let file = &self.context.corpus[target];
        self.imports.push(FileImport {
            imported_file_id: file.file_id,
            imported_path: file.path.clone(),
            matched_by: reason,
            matched_symbol: symbol.to_string(),
        });
    }
}

/// Short names of every field, property, parameter and return type, first occurrence order
fn member_type_names(file: &FileRecord) -> Vec<String> {
    let mut raw: Vec<&str> = Vec::new();
    for declared in &file.types {
        raw.extend(declared.fields.iter().map(|f| f.type_name.as_str()));
        raw.extend(declared.properties.iter().map(|p| p.type_name.as_str()));
        for method in &declared.methods {
            raw.extend(method.parameters.iter().map(|p| p.type_name.as_str()));
            raw.push(method.return_type.as_str());
        }
    }
    unique_short_names(raw)
}

fn created_type_names(file: &FileRecord) -> Vec<String> {
    unique_short_names(
        file.types
            .iter()
            .flat_map(|t| t.methods.iter())
            .flat_map(|m| m.creations.iter().map(String::as_str)),
    )
}

fn unique_short_names<'s>(raw: impl IntoIterator<Item = &'s str>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|r| TypeName::parse(r).ok())
        .map(|name| name.short().to_string())
        .filter(|short| seen.insert(short.clone()))
        .collect()
}

/// Leading segment of a receiver when it looks like a type name (`Guard` in
/// `Guard.Checks`), not a local, field or expression
fn type_qualifier(receiver: &str) -> Option<&str> {
    let head = receiver.split('.').next()?;
    let starts_upper = head.chars().next().is_some_and(|c| c.is_uppercase());
    let plain = head.chars().all(|c| c.is_alphanumeric() || c == '_');
    (starts_upper && plain).then_some(head)
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Recompute every file's imports. Idempotent; `index` must be built from `corpus`.
///
/// Returns the total number of imports recorded.
pub fn link_imports(
    corpus: &mut [FileRecord],
    index: &NameIndex,
    options: &ImportOptions,
    parallel: bool,
) -> usize {
    let imports: Vec<Vec<FileImport>> = {
        let snapshot: &[FileRecord] = corpus;
        let context = ImportContext::new(snapshot, index, options);
        if parallel {
            (0..snapshot.len())
                .into_par_iter()
                .map(|position| context.imports_for(position))
                .collect()
        } else {
            (0..snapshot.len())
                .map(|position| context.imports_for(position))
                .collect()
        }
    };

    let mut total = 0;
    for (file, found) in corpus.iter_mut().zip(imports) {
        total += found.len();
        file.imports = found;
    }

    info!("Linked {} file imports across {} files", total, corpus.len());
    total
}

/// Files reachable from `file_id` through imports, grouped by distance.
///
/// Entry 0 holds the direct imports, entry 1 the files those import that are
/// not already listed, and so on up to `max_levels` entries. The start file is
/// never listed. Unknown ids give an empty result.
pub fn dependency_levels(
    corpus: &[FileRecord],
    file_id: FileId,
    max_levels: usize,
) -> Vec<Vec<FileId>> {
    let positions: HashMap<FileId, usize> = corpus
        .iter()
        .enumerate()
        .map(|(position, file)| (file.file_id, position))
        .collect();
    let Some(&start) = positions.get(&file_id) else {
        return Vec::new();
    };

    let mut visited: HashSet<FileId> = HashSet::from([file_id]);
    let mut levels: Vec<Vec<FileId>> = Vec::new();
    let mut frontier: VecDeque<usize> = VecDeque::from([start]);

    while levels.len() < max_levels && !frontier.is_empty() {
        let mut level = Vec::new();
        let mut next = VecDeque::new();
        for position in frontier.drain(..) {
            for import in &corpus[position].imports {
                if visited.insert(import.imported_file_id) {
                    level.push(import.imported_file_id);
                    if let Some(&target) = positions.get(&import.imported_file_id) {
                        next.push_back(target);
                    }
                }
            }
        }
        if level.is_empty() {
            break;
        }
        levels.push(level);
        frontier = next;
    }

    levels
}
