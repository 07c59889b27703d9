// typelink's Utilities Module
//
// Source discovery and the path and ignore helpers it is built on.

pub mod discovery;
pub mod ignore;
pub mod paths;

pub use discovery::{discover_sources, SourceFile};
