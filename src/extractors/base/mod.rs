// Base Extractor for typelink
//
// - extractor.rs: BaseExtractor (text, ids, line spans)
// - tree_methods.rs: tree navigation helpers

pub mod extractor;
pub mod tree_methods;

pub use extractor::BaseExtractor;
