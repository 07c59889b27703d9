// Cross-Reference Propagator
//
// Resolves every base type and member type reference in the corpus and writes
// the verdicts back onto the records. Verdicts are computed over an immutable
// view of the corpus first (optionally in parallel), then applied in a single
// serial pass so reverse edges land in source-file order either way.

use rayon::prelude::*;
use tracing::info;

use super::index::NameIndex;
use super::resolver::Resolver;
use crate::model::{
    BaseTypeDetail, DeclaredType, FileRecord, ResolutionEdge, ReverseEdge, TypeAnnotation,
};

/// Counters reported after a propagation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    pub base_types: usize,
    pub resolved_base_types: usize,
    pub member_references: usize,
    pub resolved_member_references: usize,
}

impl PropagationStats {
    fn merge(&mut self, other: &PropagationStats) {
        self.base_types += other.base_types;
        self.resolved_base_types += other.resolved_base_types;
        self.member_references += other.member_references;
        self.resolved_member_references += other.resolved_member_references;
    }
}

/// Verdicts for one declared type, in member order
#[derive(Debug, Default)]
struct TypeResolution {
    base_type_details: Vec<BaseTypeDetail>,
    fields: Vec<TypeAnnotation>,
    properties: Vec<TypeAnnotation>,
    parameters: Vec<Vec<TypeAnnotation>>,
}

#[derive(Debug, Default)]
struct FileResolution {
    types: Vec<TypeResolution>,
    implements: Vec<ResolutionEdge>,
    /// Edges owed to other files, keyed by their corpus position
    reverse: Vec<(usize, ReverseEdge)>,
    stats: PropagationStats,
}

/// Annotate the corpus in place.
///
/// Details, edges and annotations are rebuilt from scratch on every call, so
/// running twice leaves the corpus unchanged. `index` must be built from `corpus`.
pub fn propagate(corpus: &mut [FileRecord], index: &NameIndex, parallel: bool) -> PropagationStats {
    let resolutions: Vec<FileResolution> = {
        let snapshot: &[FileRecord] = corpus;
        let resolver = Resolver::new(snapshot, index);
        if parallel {
            snapshot
                .par_iter()
                .map(|file| resolve_file(&resolver, file))
                .collect()
        } else {
            snapshot
                .iter()
                .map(|file| resolve_file(&resolver, file))
                .collect()
        }
    };

    for file in corpus.iter_mut() {
        file.resolved_implements.clear();
        file.implemented_by.clear();
    }

    let mut stats = PropagationStats::default();
    let mut reverse_edges = Vec::new();
    for (file, resolution) in corpus.iter_mut().zip(resolutions) {
        stats.merge(&resolution.stats);
        file.resolved_implements = resolution.implements;
        for (declared, verdicts) in file.types.iter_mut().zip(resolution.types) {
            apply_type(declared, verdicts);
        }
        reverse_edges.extend(resolution.reverse);
    }

    for (position, edge) in reverse_edges {
        if let Some(target) = corpus.get_mut(position) {
            target.implemented_by.push(edge);
        }
    }

    info!(
        "Propagated references: {}/{} base types and {}/{} member types resolved",
        stats.resolved_base_types,
        stats.base_types,
        stats.resolved_member_references,
        stats.member_references
    );
    stats
}

fn resolve_file(resolver: &Resolver<'_>, file: &FileRecord) -> FileResolution {
    let mut out = FileResolution::default();

    for declared in &file.types {
        let mut verdicts = TypeResolution::default();

        for raw in &declared.base_types {
            let verdict = resolver.resolve_base_type(raw);
            out.stats.base_types += 1;
            verdicts.base_type_details.push(verdict.to_base_detail(raw));

            if !verdict.is_resolved() {
                continue;
            }
            out.stats.resolved_base_types += 1;

            out.implements.push(ResolutionEdge {
                source_type: declared.name.clone(),
                target_type: verdict.target_type.clone(),
                target_file_id: verdict.target_file_id,
                target_path: verdict.target_path.clone(),
            });

            if let Some(position) = verdict.target_position {
                out.reverse.push((
                    position,
                    ReverseEdge {
                        implementer_type: declared.name.clone(),
                        implementer_file_id: file.file_id,
                        implementer_path: file.path.clone(),
                    },
                ));
            }
        }

        let mut annotate = |raw: &str| {
            let verdict = resolver.resolve(raw);
            out.stats.member_references += 1;
            if verdict.is_resolved() {
                out.stats.resolved_member_references += 1;
            }
            verdict.to_annotation()
        };

        verdicts.fields = declared.fields.iter().map(|f| annotate(&f.type_name)).collect();
        verdicts.properties = declared
            .properties
            .iter()
            .map(|p| annotate(&p.type_name))
            .collect();
        verdicts.parameters = declared
            .methods
            .iter()
            .map(|m| m.parameters.iter().map(|p| annotate(&p.type_name)).collect())
            .collect();

        out.types.push(verdicts);
    }

    out
}

fn apply_type(declared: &mut DeclaredType, verdicts: TypeResolution) {
    declared.base_type_details = verdicts.base_type_details;

    for (field, annotation) in declared.fields.iter_mut().zip(verdicts.fields) {
        field.annotation = annotation;
    }
    for (property, annotation) in declared.properties.iter_mut().zip(verdicts.properties) {
        property.annotation = annotation;
    }
    for (method, annotations) in declared.methods.iter_mut().zip(verdicts.parameters) {
        for (parameter, annotation) in method.parameters.iter_mut().zip(annotations) {
            parameter.annotation = annotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DeclaredKind, Field, FileId, Method, Parameter, Property, TypeKind,
    };

    fn file(id: u32, path: &str, types: Vec<DeclaredType>) -> FileRecord {
        let mut record = FileRecord::new(FileId(id), path);
        record.types = types;
        record
    }

    fn field(name: &str, type_name: &str) -> Field {
        Field {
            name: name.to_string(),
            type_name: type_name.to_string(),
            attributes: Vec::new(),
            annotation: TypeAnnotation::default(),
        }
    }

    fn property(name: &str, type_name: &str) -> Property {
        Property {
            name: name.to_string(),
            type_name: type_name.to_string(),
            attributes: Vec::new(),
            annotation: TypeAnnotation::default(),
        }
    }

    /// Interface + implementation + a consumer holding both
    fn layered_corpus() -> Vec<FileRecord> {
        let repo_iface = DeclaredType::new("IRepo", "App.Data", DeclaredKind::Interface);

        let mut repo = DeclaredType::new("Repo", "App.Data", DeclaredKind::Class);
        repo.base_types = vec!["IRepo".to_string(), "IDisposable".to_string()];

        let mut service = DeclaredType::new("UserService", "App.Services", DeclaredKind::Class);
        service.base_types = vec!["Data.IRepo".to_string()];
        service.fields.push(field("_repo", "IRepo"));
        service.properties.push(property("Name", "string"));
        let mut method = Method::new("Load");
        method.parameters.push(Parameter::new("source", "Repo"));
        method.parameters.push(Parameter::new("token", "CancellationToken"));
        service.methods.push(method);

        vec![
            file(1, "Data/IRepo.cs", vec![repo_iface]),
            file(2, "Data/Repo.cs", vec![repo]),
            file(3, "Services/UserService.cs", vec![service]),
        ]
    }

    fn run(corpus: &mut [FileRecord], parallel: bool) -> PropagationStats {
        let index = NameIndex::build(corpus);
        propagate(corpus, &index, parallel)
    }

    #[test]
    fn test_one_detail_per_base_type() {
        let mut corpus = layered_corpus();
        run(&mut corpus, false);

        for record in &corpus {
            for declared in &record.types {
                assert_eq!(declared.base_type_details.len(), declared.base_types.len());
                for (raw, detail) in declared.base_types.iter().zip(&declared.base_type_details) {
                    assert_eq!(raw, &detail.name);
                }
            }
        }

        let repo = &corpus[1].types[0];
        assert_eq!(repo.base_type_details[0].kind, TypeKind::Interface);
        assert_eq!(repo.base_type_details[0].target_file_id, FileId(1));
        // Unresolved base: heuristic kind, sentinel target
        assert_eq!(repo.base_type_details[1].kind, TypeKind::Interface);
        assert_eq!(repo.base_type_details[1].target_file_id, FileId::UNRESOLVED);
        assert_eq!(repo.base_type_details[1].target_path, "");
    }

    #[test]
    fn test_forward_and_reverse_edges_are_symmetric() {
        let mut corpus = layered_corpus();
        run(&mut corpus, false);

        let forward: usize = corpus.iter().map(|f| f.resolved_implements.len()).sum();
        let reverse: usize = corpus.iter().map(|f| f.implemented_by.len()).sum();
        assert_eq!(forward, 2);
        assert_eq!(forward, reverse);

        for source in &corpus {
            for edge in &source.resolved_implements {
                let target = corpus
                    .iter()
                    .find(|f| f.file_id == edge.target_file_id)
                    .unwrap();
                assert_eq!(target.path, edge.target_path);
                assert!(target.implemented_by.iter().any(|r| {
                    r.implementer_type == edge.source_type
                        && r.implementer_file_id == source.file_id
                        && r.implementer_path == source.path
                }));
            }
        }

        // Reverse edges follow source-file order
        let implementers: Vec<&str> = corpus[0]
            .implemented_by
            .iter()
            .map(|r| r.implementer_type.as_str())
            .collect();
        assert_eq!(implementers, vec!["Repo", "UserService"]);
        assert_eq!(corpus[2].resolved_implements[0].target_type, "App.Data.IRepo");
    }

    #[test]
    fn test_member_annotations_written_in_place() {
        let mut corpus = layered_corpus();
        let stats = run(&mut corpus, false);

        let service = &corpus[2].types[0];
        assert_eq!(service.fields[0].annotation.type_kind, TypeKind::Interface);
        assert_eq!(service.fields[0].annotation.target_path, "Data/IRepo.cs");

        assert_eq!(service.properties[0].annotation.type_kind, TypeKind::Class);
        assert!(service.properties[0].annotation.target().is_none());

        let params = &service.methods[0].parameters;
        assert_eq!(params[0].annotation.type_kind, TypeKind::Class);
        assert_eq!(params[0].annotation.target_file_id, FileId(2));
        assert_eq!(params[1].annotation.type_kind, TypeKind::Class);
        assert!(params[1].annotation.target().is_none());

        assert_eq!(stats.base_types, 3);
        assert_eq!(stats.resolved_base_types, 2);
        assert_eq!(stats.member_references, 4);
        assert_eq!(stats.resolved_member_references, 2);
    }

    #[test]
    fn test_rerun_does_not_duplicate() {
        let mut corpus = layered_corpus();
        run(&mut corpus, false);
        let first = corpus.clone();
        run(&mut corpus, false);
        assert_eq!(corpus, first);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut sequential = layered_corpus();
        let mut parallel = layered_corpus();

        // Widen the corpus so rayon actually splits the work
        for i in 0..64u32 {
            let mut impl_type = DeclaredType::new(format!("Repo{}", i), "App.More", DeclaredKind::Class);
            impl_type.base_types = vec!["IRepo".to_string()];
            impl_type.fields.push(field("_inner", "Repo"));
            let record = file(4 + i, &format!("More/Repo{}.cs", i), vec![impl_type]);
            sequential.push(record.clone());
            parallel.push(record);
        }

        let a = run(&mut sequential, false);
        let b = run(&mut parallel, true);
        assert_eq!(a, b);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel[0].implemented_by.len(), 66);
    }

    #[test]
    fn test_empty_corpus_is_noop() {
        let mut corpus: Vec<FileRecord> = Vec::new();
        let stats = run(&mut corpus, true);
        assert_eq!(stats, PropagationStats::default());
    }

    #[test]
    fn test_self_implementing_file_gets_its_own_reverse_edge() {
        let iface = DeclaredType::new("IShape", "Geo", DeclaredKind::Interface);
        let mut shape = DeclaredType::new("Circle", "Geo", DeclaredKind::Class);
        shape.base_types = vec!["IShape".to_string()];
        let mut corpus = vec![file(1, "Shapes.cs", vec![iface, shape])];

        run(&mut corpus, false);
        assert_eq!(corpus[0].resolved_implements.len(), 1);
        assert_eq!(corpus[0].implemented_by.len(), 1);
        assert_eq!(corpus[0].implemented_by[0].implementer_file_id, FileId(1));
    }
}
