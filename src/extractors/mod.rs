//! typelink's Language Extractors Module
//!
//! tree-sitter based extraction of C# declarations into FileRecords.
//!
//! - `base` - BaseExtractor with node text, ids and tree navigation
//! - `csharp` - the C# declaration walker
//! - `manager` - ExtractorManager public API (parse, extract, batch)

pub mod base;
pub mod csharp;
pub mod manager;

pub use base::BaseExtractor;
pub use csharp::CSharpExtractor;
pub use manager::{content_hash, ExtractorManager};
