// Raw type-name parsing
//
// Reference strings come straight from source text: `IRepo`, `App.Data.IRepo`,
// `List<User>`, `Dictionary<string, List<int>>`, `Status?`, `User[]`. Only the
// part before the first `<` takes part in resolution, and nullable and array
// suffixes resolve to their element type.

use thiserror::Error;

use crate::model::TypeKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeNameError {
    #[error("type name is empty")]
    Empty,
    #[error("unbalanced generic brackets in '{0}'")]
    UnbalancedGenerics(String),
}

/// A validated reference string split into the forms the resolver looks up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeName<'a> {
    stripped: &'a str,
    short: &'a str,
}

impl<'a> TypeName<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, TypeNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeNameError::Empty);
        }

        let mut depth: i32 = 0;
        for c in trimmed.chars() {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(TypeNameError::UnbalancedGenerics(trimmed.to_string()));
                    }
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(TypeNameError::UnbalancedGenerics(trimmed.to_string()));
        }

        let element = element_type(trimmed);
        let stripped = strip_generics(element);
        let short = short_name(element);
        if stripped.is_empty() || short.is_empty() {
            return Err(TypeNameError::Empty);
        }

        Ok(Self { stripped, short })
    }

    /// Full dotted form without generic arguments
    pub fn stripped(&self) -> &'a str {
        self.stripped
    }

    pub fn short(&self) -> &'a str {
        self.short
    }
}

/// Element type of a reference: `global::` alias, trailing `?` and array rank
/// specifiers removed. `User?[]` and `global::App.User` both give the bare name.
pub fn element_type(raw: &str) -> &str {
    let mut element = raw.trim();
    element = element.strip_prefix("global::").unwrap_or(element);
    loop {
        let before = element;
        if let Some(rest) = element.strip_suffix('?') {
            element = rest.trim_end();
        }
        if element.ends_with(']') {
            if let Some(open) = element.rfind('[') {
                element = element[..open].trim_end();
            }
        }
        if element == before {
            return element;
        }
    }
}

/// Text before the first `<`
pub fn strip_generics(raw: &str) -> &str {
    match raw.find('<') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

/// Text before the first `<`, then after the last `.`
pub fn short_name(raw: &str) -> &str {
    let stripped = strip_generics(raw);
    match stripped.rfind('.') {
        Some(idx) => &stripped[idx + 1..],
        None => stripped,
    }
}

/// Naming-convention guess for names no index knows about: `IFoo` is an interface,
/// anything else a class.
pub fn heuristic_kind(short: &str) -> TypeKind {
    let mut chars = short.chars();
    match (chars.next(), chars.next()) {
        (Some('I'), Some(second)) if second.is_uppercase() => TypeKind::Interface,
        _ => TypeKind::Class,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_namespace_and_generics() {
        assert_eq!(short_name("IRepo"), "IRepo");
        assert_eq!(short_name("App.Data.IRepo"), "IRepo");
        assert_eq!(short_name("List<User>"), "List");
        assert_eq!(short_name("System.Collections.Generic.List<App.User>"), "List");
        assert_eq!(short_name("Dictionary<string, List<int>>"), "Dictionary");
    }

    #[test]
    fn test_parse_keeps_full_dotted_form() {
        let name = TypeName::parse("App.Data.IRepository<User>").unwrap();
        assert_eq!(name.stripped(), "App.Data.IRepository");
        assert_eq!(name.short(), "IRepository");
    }

    #[test]
    fn test_nullable_and_array_references_use_element_type() {
        assert_eq!(TypeName::parse("Status?").unwrap().short(), "Status");
        assert_eq!(TypeName::parse("User[]").unwrap().short(), "User");
        assert_eq!(TypeName::parse("User?[]").unwrap().short(), "User");
        assert_eq!(TypeName::parse("int[,]").unwrap().short(), "int");
        assert_eq!(TypeName::parse("List<User>[]").unwrap().short(), "List");

        let aliased = TypeName::parse("global::App.Models.User").unwrap();
        assert_eq!(aliased.stripped(), "App.Models.User");
        assert_eq!(aliased.short(), "User");

        // Nothing left once the suffixes are gone
        assert_eq!(TypeName::parse("[]"), Err(TypeNameError::Empty));
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(TypeName::parse(""), Err(TypeNameError::Empty));
        assert_eq!(TypeName::parse("   "), Err(TypeNameError::Empty));
        assert_eq!(TypeName::parse("<T>"), Err(TypeNameError::Empty));
        assert_eq!(TypeName::parse("App."), Err(TypeNameError::Empty));
        assert!(matches!(
            TypeName::parse("List<User"),
            Err(TypeNameError::UnbalancedGenerics(_))
        ));
        assert!(matches!(
            TypeName::parse("List>User<"),
            Err(TypeNameError::UnbalancedGenerics(_))
        ));
    }

    #[test]
    fn test_heuristic_kind() {
        assert_eq!(heuristic_kind("IWidget"), TypeKind::Interface);
        assert_eq!(heuristic_kind("Widget"), TypeKind::Class);
        // Second character must be uppercase
        assert_eq!(heuristic_kind("Index"), TypeKind::Class);
        // Length must exceed one
        assert_eq!(heuristic_kind("I"), TypeKind::Class);
        assert_eq!(heuristic_kind(""), TypeKind::Class);
    }
}
