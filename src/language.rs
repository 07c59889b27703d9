//! Language Support - tree-sitter language configuration
//!
//! typelink only analyzes C#; everything language-specific about the parser
//! lives here so the manager and tests share one source of truth.

use anyhow::Result;

/// Get tree-sitter language parser for a given language name
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "csharp" => Ok(tree_sitter_c_sharp::LANGUAGE.into()),
        _ => Err(anyhow::anyhow!(
            "Unsupported language: '{}'. Supported languages: csharp",
            language
        )),
    }
}

/// Detect language from file extension
///
/// Returns the language name that can be passed to `get_tree_sitter_language()`.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "cs" => Some("csharp"),
        _ => None,
    }
}

/// Node kinds that declare a type
pub fn get_type_declaration_kinds() -> &'static [&'static str] {
    &[
        "class_declaration",
        "struct_declaration",
        "record_declaration",
        "record_struct_declaration",
        "interface_declaration",
        "enum_declaration",
    ]
}
