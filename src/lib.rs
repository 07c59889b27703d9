// typelink - cross-file type resolution for C# source trees
//
// tree-sitter extraction of declarations into per-file records, then the
// corpus-wide passes: name index, cross-reference propagation, convention
// inference and file dependencies.

pub mod analyzer;
pub mod config;
pub mod extractors;
pub mod language;
pub mod model;
pub mod output;
pub mod resolution;
pub mod utils;

pub use analyzer::{analyze, Analysis};
pub use config::AnalyzerConfig;
pub use extractors::ExtractorManager;
pub use model::{DeclaredKind, DeclaredType, FileId, FileRecord, TypeKind};
pub use output::write_corpus;
pub use resolution::{
    run_pipeline, ImportOptions, NameIndex, PipelineReport, Resolver, Verdict,
};
