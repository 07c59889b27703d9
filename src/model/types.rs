// Corpus Types for typelink
//
// FileRecord, DeclaredType and the edges written by the cross-reference pass.
// Everything here serializes to PascalCase JSON; annotation fields are never omitted.

use serde::{Deserialize, Serialize};

use super::members::{Field, Method, Property};

/// Numeric file identifier, 1-based in discovery order.
///
/// `FileId::UNRESOLVED` (0) is the sentinel written into annotations and
/// details whose reference did not resolve to any file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

impl FileId {
    pub const UNRESOLVED: FileId = FileId(0);

    pub fn is_resolved(self) -> bool {
        self != Self::UNRESOLVED
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::UNRESOLVED
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a textual type declaration.
///
/// Structs and records are folded into `Class`. `Controller` is a Class picked out
/// by naming/attribute convention, not a distinct source construct.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DeclaredKind {
    Class,
    Interface,
    Enum,
    Controller,
}

impl DeclaredKind {
    /// Classify a class-like declaration as `Controller` or plain `Class`
    pub fn classify_class(name: &str, attributes: &[String], base_types: &[String]) -> Self {
        let named_controller = name.len() > "Controller".len() && name.ends_with("Controller");
        let attributed = attributes.iter().any(|a| a.contains("Controller"));
        let derives_controller = base_types.iter().any(|b| {
            let short = crate::resolution::short_name(b);
            short.ends_with("Controller") || short.ends_with("ControllerBase")
        });

        if named_controller || attributed || derives_controller {
            DeclaredKind::Controller
        } else {
            DeclaredKind::Class
        }
    }

    /// Class or Controller
    pub fn is_class_like(self) -> bool {
        matches!(self, DeclaredKind::Class | DeclaredKind::Controller)
    }
}

impl std::fmt::Display for DeclaredKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TypeKind::from(*self).fmt(f)
    }
}

/// Kind written by the resolver: a declared kind, or `Unknown` when an index hit
/// could not be confirmed against a declaration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Controller,
    #[default]
    Unknown,
}

impl From<DeclaredKind> for TypeKind {
    fn from(kind: DeclaredKind) -> Self {
        match kind {
            DeclaredKind::Class => TypeKind::Class,
            DeclaredKind::Interface => TypeKind::Interface,
            DeclaredKind::Enum => TypeKind::Enum,
            DeclaredKind::Controller => TypeKind::Controller,
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Class => write!(f, "Class"),
            TypeKind::Interface => write!(f, "Interface"),
            TypeKind::Enum => write!(f, "Enum"),
            TypeKind::Controller => write!(f, "Controller"),
            TypeKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One raw base-type string paired with its resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct BaseTypeDetail {
    /// Base type exactly as written in the base list
    pub name: String,
    pub kind: TypeKind,
    pub target_file_id: FileId,
    /// Empty when unresolved
    pub target_path: String,
}

/// Forward edge: a type in this file derives from / implements a type in another file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResolutionEdge {
    pub source_type: String,
    pub target_type: String,
    pub target_file_id: FileId,
    pub target_path: String,
}

/// Reverse edge stored on the target file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ReverseEdge {
    pub implementer_type: String,
    pub implementer_file_id: FileId,
    pub implementer_path: String,
}

/// Why the dependency pass linked a file to another
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImportReason {
    /// Field, property, parameter or return type names a type declared there
    Member,
    /// A member type is a registered service; the link goes to its implementation
    Di,
    /// `new T(...)` of a type declared there
    New,
    /// Static-style call on a type name, `Guard.NotNull(x)`
    Qualifier,
    /// Call to a method name declared there
    Method,
    /// `using` of a namespace declared there
    Using,
    /// Unknown type name matched a `<Name>.cs` file
    Filename,
}

/// File-level dependency found by the dependency pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FileImport {
    pub imported_file_id: FileId,
    pub imported_path: String,
    pub matched_by: ImportReason,
    /// Type, method, namespace or `Service->Implementation` that produced the match
    pub matched_symbol: String,
}

/// `services.AddScoped<IUserRepo, UserRepo>()` or the `typeof` form, short names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRegistration {
    pub service: String,
    pub implementation: String,
}

/// A single textual type declaration (class, struct, record, interface, enum)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeclaredType {
    /// md5 of `path:name:line:column`
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub kind: DeclaredKind,
    pub attributes: Vec<String>,
    pub base_types: Vec<String>,
    pub base_type_details: Vec<BaseTypeDetail>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    /// 1-based
    pub start_line: u32,
    pub end_line: u32,
}

impl DeclaredType {
    /// Bare declaration with no members; used by the extractor and in tests
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, kind: DeclaredKind) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            namespace: namespace.into(),
            kind,
            attributes: Vec::new(),
            base_types: Vec::new(),
            base_type_details: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            start_line: 0,
            end_line: 0,
        }
    }

    /// `namespace.name`, or just `name` outside any namespace
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }
}

/// Join a namespace and a type name the way the indices key them
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Everything extracted from one source file, plus the cross-file annotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FileRecord {
    pub file_id: FileId,
    /// Relative Unix-style path, unique within a run
    pub path: String,
    /// First namespace declared in the file, empty when none
    pub namespace: String,
    pub namespaces: Vec<String>,
    pub usings: Vec<String>,
    pub types: Vec<DeclaredType>,
    pub resolved_implements: Vec<ResolutionEdge>,
    pub implemented_by: Vec<ReverseEdge>,
    /// DI registrations made anywhere in the file, top-level statements included
    pub registrations: Vec<ServiceRegistration>,
    pub imports: Vec<FileImport>,
    /// blake3 hex digest of the source text
    pub content_hash: String,
}

impl FileRecord {
    pub fn new(file_id: FileId, path: impl Into<String>) -> Self {
        Self {
            file_id,
            path: path.into(),
            namespace: String::new(),
            namespaces: Vec::new(),
            usings: Vec::new(),
            types: Vec::new(),
            resolved_implements: Vec::new(),
            implemented_by: Vec::new(),
            registrations: Vec::new(),
            imports: Vec::new(),
            content_hash: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_with_and_without_namespace() {
        let scoped = DeclaredType::new("UserRepo", "App.Data", DeclaredKind::Class);
        assert_eq!(scoped.qualified_name(), "App.Data.UserRepo");

        let global = DeclaredType::new("UserRepo", "", DeclaredKind::Class);
        assert_eq!(global.qualified_name(), "UserRepo");
    }

    #[test]
    fn test_controller_classification() {
        let none: Vec<String> = Vec::new();
        assert_eq!(
            DeclaredKind::classify_class("UsersController", &none, &none),
            DeclaredKind::Controller
        );
        assert_eq!(
            DeclaredKind::classify_class("Users", &["ApiController".to_string()], &none),
            DeclaredKind::Controller
        );
        assert_eq!(
            DeclaredKind::classify_class(
                "Users",
                &none,
                &["Microsoft.AspNetCore.Mvc.ControllerBase".to_string()]
            ),
            DeclaredKind::Controller
        );
        // A bare "Controller" class is the framework base, not a convention hit
        assert_eq!(
            DeclaredKind::classify_class("Controller", &none, &none),
            DeclaredKind::Class
        );
        assert_eq!(
            DeclaredKind::classify_class("UserService", &none, &["IUserService".to_string()]),
            DeclaredKind::Class
        );
    }

    #[test]
    fn test_kinds_serialize_as_pascal_case_strings() {
        assert_eq!(serde_json::to_string(&TypeKind::Interface).unwrap(), "\"Interface\"");
        assert_eq!(serde_json::to_string(&TypeKind::Unknown).unwrap(), "\"Unknown\"");
        assert_eq!(serde_json::to_string(&DeclaredKind::Controller).unwrap(), "\"Controller\"");
    }

    #[test]
    fn test_unresolved_sentinel_serializes_as_zero() {
        let detail = BaseTypeDetail {
            name: "IMissing".to_string(),
            kind: TypeKind::Interface,
            target_file_id: FileId::UNRESOLVED,
            target_path: String::new(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["TargetFileId"], 0);
        assert_eq!(json["TargetPath"], "");
        assert_eq!(json["Kind"], "Interface");
        assert!(!detail.target_file_id.is_resolved());
    }
}
