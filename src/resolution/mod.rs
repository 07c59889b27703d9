//! Cross-file type resolution over an extracted corpus.
//!
//! Passes run strictly in order over the whole corpus:
//!
//! 1. `index` - qualified-name and short-name lookups (read-only)
//! 2. `propagate` - base-type details, implements/implemented-by edges, member annotations
//! 3. `inference` - body-binding markers on POST/PUT/PATCH actions
//! 4. `imports` - file-to-file dependencies with the rule that matched
//!
//! `resolver` is the pure lookup consulted by `propagate` and by `typelink inspect`.

pub mod imports;
pub mod index;
pub mod inference;
pub mod propagate;
pub mod resolver;
pub mod type_name;

pub use imports::{dependency_levels, link_imports, using_matches, ImportOptions};
pub use index::{IndexEntry, NameIndex};
pub use inference::{infer_body_binding, is_body_verb_method, INFERRED_BODY_MARKER};
pub use propagate::{propagate, PropagationStats};
pub use resolver::{Resolver, Verdict};
pub use type_name::{
    element_type, heuristic_kind, short_name, strip_generics, TypeName, TypeNameError,
};

use tracing::info;

use crate::model::FileRecord;

/// What a full pipeline run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub files: usize,
    pub indexed_types: usize,
    pub propagation: PropagationStats,
    pub inferred_bindings: usize,
    pub imports: usize,
}

/// Index, propagate, infer, then link file imports. The corpus must be in discovery order.
pub fn run_pipeline(
    corpus: &mut [FileRecord],
    parallel: bool,
    import_options: &ImportOptions,
) -> PipelineReport {
    let index = NameIndex::build(corpus);
    let propagation = propagate(corpus, &index, parallel);
    let inferred_bindings = infer_body_binding(corpus);
    let imports = link_imports(corpus, &index, import_options, parallel);

    let report = PipelineReport {
        files: corpus.len(),
        indexed_types: index.len(),
        propagation,
        inferred_bindings,
        imports,
    };
    info!(
        "Resolution pipeline finished: {} files, {} indexed types, {} inferred body bindings, {} file imports",
        report.files, report.indexed_types, report.inferred_bindings, report.imports
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DeclaredKind, DeclaredType, FileId, ImportReason, Method, Parameter, TypeKind,
    };

    fn file(id: u32, path: &str, namespace: &str, types: Vec<DeclaredType>) -> FileRecord {
        let mut record = FileRecord::new(FileId(id), path);
        record.namespace = namespace.to_string();
        record.namespaces = vec![namespace.to_string()];
        record.types = types;
        record
    }

    #[test]
    fn test_repository_implementation_scenario() {
        let iface = DeclaredType::new("IUserRepo", "App.Data", DeclaredKind::Interface);
        let mut repo = DeclaredType::new("UserRepo", "App.Data", DeclaredKind::Class);
        repo.base_types = vec!["IUserRepo".to_string()];

        let mut corpus = vec![
            file(1, "Data/IUserRepo.cs", "App.Data", vec![iface]),
            file(2, "Data/UserRepo.cs", "App.Data", vec![repo]),
        ];
        let report = run_pipeline(&mut corpus, false, &ImportOptions::default());
        assert_eq!(report.indexed_types, 2);

        let detail = &corpus[1].types[0].base_type_details[0];
        assert_eq!(detail.kind, TypeKind::Interface);
        assert_eq!(detail.target_file_id, FileId(1));
        assert_eq!(detail.target_path, "Data/IUserRepo.cs");

        let edge = &corpus[1].resolved_implements[0];
        assert_eq!(edge.source_type, "UserRepo");
        assert_eq!(edge.target_type, "App.Data.IUserRepo");

        let reverse = &corpus[0].implemented_by[0];
        assert_eq!(reverse.implementer_type, "UserRepo");
        assert_eq!(reverse.implementer_file_id, FileId(2));
        assert_eq!(reverse.implementer_path, "Data/UserRepo.cs");
    }

    #[test]
    fn test_controller_body_binding_scenario() {
        let dto = DeclaredType::new("CreateUserDto", "App.Models", DeclaredKind::Class);

        let mut controller = DeclaredType::new("UsersController", "App.Api", DeclaredKind::Controller);
        let mut create = Method::new("Create");
        create.attributes = vec!["HttpPost".to_string()];
        create.parameters = vec![
            Parameter::new("dto", "CreateUserDto"),
            Parameter::new("id", "int"),
        ];
        let mut by_route = Parameter::new("other", "CreateUserDto");
        by_route.attributes = vec!["FromRoute".to_string()];
        create.parameters.push(by_route);
        controller.methods.push(create);

        let mut corpus = vec![
            file(1, "Api/UsersController.cs", "App.Api", vec![controller]),
            file(2, "Models/CreateUserDto.cs", "App.Models", vec![dto]),
        ];
        let report = run_pipeline(&mut corpus, false, &ImportOptions::default());

        let params = &corpus[0].types[0].methods[0].parameters;
        assert_eq!(params[0].annotation.type_kind, TypeKind::Class);
        assert_eq!(params[0].annotation.target_file_id, FileId(2));
        assert_eq!(params[0].attributes, vec![INFERRED_BODY_MARKER]);

        // `int` falls to the heuristic (Class, no target) and is still marked
        assert_eq!(params[1].annotation.type_kind, TypeKind::Class);
        assert!(params[1].annotation.target().is_none());
        assert_eq!(params[1].attributes, vec![INFERRED_BODY_MARKER]);

        assert_eq!(params[2].attributes, vec!["FromRoute"]);
        assert_eq!(report.inferred_bindings, 2);

        // The controller depends on the DTO file through its parameter type
        assert_eq!(report.imports, 1);
        assert_eq!(corpus[0].imports[0].imported_file_id, FileId(2));
        assert_eq!(corpus[0].imports[0].matched_by, ImportReason::Member);

        // Whole-pipeline rerun is stable
        let once = corpus.clone();
        let rerun = run_pipeline(&mut corpus, true, &ImportOptions::default());
        assert_eq!(rerun.inferred_bindings, 0);
        assert_eq!(corpus, once);
    }

    #[test]
    fn test_interface_parameter_is_not_body_bound() {
        let iface = DeclaredType::new("IRepo", "", DeclaredKind::Interface);
        let mut repo = DeclaredType::new("UserRepo", "", DeclaredKind::Class);
        repo.base_types = vec!["IRepo".to_string()];
        let mut save = Method::new("Save");
        save.attributes = vec!["HttpPost".to_string()];
        save.parameters = vec![Parameter::new("inner", "IRepo")];
        repo.methods.push(save);

        let mut corpus = vec![
            file(1, "File1.cs", "", vec![iface]),
            file(2, "File2.cs", "", vec![repo]),
        ];
        run_pipeline(&mut corpus, false, &ImportOptions::default());

        let user_repo = &corpus[1].types[0];
        assert_eq!(user_repo.base_type_details.len(), 1);
        let detail = &user_repo.base_type_details[0];
        assert_eq!(detail.name, "IRepo");
        assert_eq!(detail.kind, TypeKind::Interface);
        assert_eq!(detail.target_file_id, FileId(1));

        assert_eq!(corpus[0].implemented_by.len(), 1);
        assert_eq!(corpus[0].implemented_by[0].implementer_type, "UserRepo");

        let param = &user_repo.methods[0].parameters[0];
        assert_eq!(param.annotation.type_kind, TypeKind::Interface);
        assert!(param.attributes.is_empty());
    }

    #[test]
    fn test_unresolvable_parameter_is_body_bound_once() {
        let mut controller = DeclaredType::new("WidgetsController", "Shop", DeclaredKind::Controller);
        let mut create = Method::new("Create");
        create.attributes = vec!["HttpPost(\"widgets\")".to_string()];
        create.parameters = vec![Parameter::new("widget", "Widget")];
        controller.methods.push(create);

        let mut corpus = vec![file(1, "WidgetsController.cs", "Shop", vec![controller])];
        run_pipeline(&mut corpus, false, &ImportOptions::default());
        run_pipeline(&mut corpus, false, &ImportOptions::default());

        let param = &corpus[0].types[0].methods[0].parameters[0];
        assert_eq!(param.annotation.type_kind, TypeKind::Class);
        assert_eq!(param.annotation.target_file_id, FileId::UNRESOLVED);
        assert_eq!(param.attributes, vec![INFERRED_BODY_MARKER]);
    }

    #[test]
    fn test_empty_corpus() {
        let mut corpus: Vec<FileRecord> = Vec::new();
        let report = run_pipeline(&mut corpus, false, &ImportOptions::default());
        assert_eq!(report, PipelineReport::default());
    }
}
