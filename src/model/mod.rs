//! Corpus model shared by the extractor, the resolution passes and the output writer.
//!
//! - `types.rs` - FileRecord, DeclaredType, kinds and resolution edges
//! - `members.rs` - fields, properties, methods, parameters, call sites

pub mod members;
pub mod types;

pub use members::{CallSite, Field, Method, Parameter, Property, TypeAnnotation};
pub use types::{
    qualify, BaseTypeDetail, DeclaredKind, DeclaredType, FileId, FileImport, FileRecord,
    ImportReason, ResolutionEdge, ReverseEdge, ServiceRegistration, TypeKind,
};
