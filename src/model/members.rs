// Member Types for typelink
//
// Fields, properties, methods, parameters and call sites owned by a DeclaredType.

use serde::{Deserialize, Serialize};

use super::types::{FileId, TypeKind};

/// Resolution written onto a member's type reference.
///
/// Before the cross-reference pass runs this is `Unknown` with the unresolved
/// sentinel; afterwards it always carries the resolver's verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TypeAnnotation {
    pub type_kind: TypeKind,
    pub target_file_id: FileId,
    /// Empty when unresolved
    pub target_path: String,
}

impl TypeAnnotation {
    /// Resolved target, if any
    pub fn target(&self) -> Option<(FileId, &str)> {
        if self.target_file_id.is_resolved() {
            Some((self.target_file_id, self.target_path.as_str()))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Field {
    pub name: String,
    pub type_name: String,
    pub attributes: Vec<String>,
    #[serde(flatten)]
    pub annotation: TypeAnnotation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Property {
    pub name: String,
    pub type_name: String,
    pub attributes: Vec<String>,
    #[serde(flatten)]
    pub annotation: TypeAnnotation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    /// Attribute names as written (`FromBody`, `FromQuery`, ...), plus any inferred marker
    pub attributes: Vec<String>,
    #[serde(flatten)]
    pub annotation: TypeAnnotation,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            attributes: Vec::new(),
            annotation: TypeAnnotation::default(),
        }
    }
}

/// An invocation found inside a method body. Never resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CallSite {
    /// Invoked method name (`Save` in `_repo.Save(user)`)
    pub name: String,
    /// Receiver expression text, empty for unqualified calls
    pub receiver: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Method {
    pub id: String,
    pub name: String,
    pub return_type: String,
    pub attributes: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub is_constructor: bool,
    pub calls: Vec<CallSite>,
    /// Type names of `new T(...)` expressions in the body, as written
    pub creations: Vec<String>,
    pub start_line: u32,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            return_type: "void".to_string(),
            attributes: Vec::new(),
            parameters: Vec::new(),
            is_constructor: false,
            calls: Vec::new(),
            creations: Vec::new(),
            start_line: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_is_flattened_and_never_omitted() {
        let param = Parameter::new("dto", "CreateUserDto");
        let json = serde_json::to_value(&param).unwrap();

        assert_eq!(json["Name"], "dto");
        assert_eq!(json["TypeName"], "CreateUserDto");
        assert_eq!(json["TypeKind"], "Unknown");
        assert_eq!(json["TargetFileId"], 0);
        assert_eq!(json["TargetPath"], "");
        assert!(param.annotation.target().is_none());
    }

    #[test]
    fn test_annotation_target_when_resolved() {
        let annotation = TypeAnnotation {
            type_kind: TypeKind::Class,
            target_file_id: FileId(4),
            target_path: "Models/User.cs".to_string(),
        };
        assert_eq!(annotation.target(), Some((FileId(4), "Models/User.cs")));
    }
}
