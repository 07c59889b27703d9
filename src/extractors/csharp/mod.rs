// C# Language Extractor
//
// Walks a tree-sitter-c-sharp tree and produces one FileRecord:
// - Namespaces (block and file-scoped, nested ones joined with `.`)
// - Using directives (regular, static, global, alias)
// - Classes, structs, records, interfaces and enums, including nested types
// - Fields, properties, methods and constructors with parameters
// - Attribute names, call sites and `new` expressions inside method bodies
// - DI service registrations anywhere in the file

mod calls;
mod helpers;
mod members;
mod types;

use crate::extractors::base::BaseExtractor;
use crate::language::get_type_declaration_kinds;
use crate::model::{qualify, FileId, FileRecord};
use tree_sitter::{Node, Tree};

/// C# extractor using tree-sitter-c-sharp parser
pub struct CSharpExtractor {
    base: BaseExtractor,
}

impl CSharpExtractor {
    /// Create new C# extractor; `file_path` is the relative Unix-style path
    pub fn new(file_path: String, content: String) -> Self {
        Self {
            base: BaseExtractor::new(file_path, content),
        }
    }

    /// Extract the declarations of one parsed file
    pub fn extract_file(&self, tree: &Tree, file_id: FileId) -> FileRecord {
        let mut record = FileRecord::new(file_id, self.base.file_path.clone());
        self.walk_compilation_unit(tree.root_node(), &mut record);
        record.registrations =
            calls::extract_service_registrations(&self.base, &tree.root_node());
        record.namespace = record.namespaces.first().cloned().unwrap_or_default();
        record
    }

    /// Whether the parse contains syntax errors
    pub fn has_syntax_errors(&self, tree: &Tree) -> bool {
        self.base.has_error(&tree.root_node())
    }

    /// Top level: a file-scoped `namespace X;` applies to every later sibling
    fn walk_compilation_unit(&self, node: Node, record: &mut FileRecord) {
        let mut namespace = String::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "file_scoped_namespace_declaration" {
                if let Some(name) = types::extract_namespace_name(&self.base, &child) {
                    namespace = name;
                    record_namespace(record, &namespace);
                }
                // Some grammar versions nest the declarations under the namespace node
                let mut inner = child.walk();
                for grandchild in child.named_children(&mut inner) {
                    self.walk_node(grandchild, &namespace, record);
                }
                continue;
            }
            self.walk_node(child, &namespace, record);
        }
    }

    fn walk_node(&self, node: Node, namespace: &str, record: &mut FileRecord) {
        match node.kind() {
            "namespace_declaration" => {
                let Some(name) = types::extract_namespace_name(&self.base, &node) else {
                    return;
                };
                let full = qualify(namespace, &name);
                record_namespace(record, &full);
                if let Some(body) = types::type_body(&self.base, &node) {
                    let mut cursor = body.walk();
                    for child in body.named_children(&mut cursor) {
                        self.walk_node(child, &full, record);
                    }
                }
            }
            "using_directive" => {
                if let Some(target) = types::extract_using(&self.base, &node) {
                    record.usings.push(target);
                }
            }
            kind if get_type_declaration_kinds().contains(&kind) => {
                self.extract_type(node, namespace, record);
            }
            // Top-level statements and global attributes hold no declarations
            "global_statement" | "global_attribute" | "comment" => {}
            _ => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.walk_node(child, namespace, record);
                }
            }
        }
    }

    /// Record a type declaration, then its nested types after it
    fn extract_type(&self, node: Node, namespace: &str, record: &mut FileRecord) {
        let Some(mut declared) = types::extract_type_declaration(&self.base, &node, namespace)
        else {
            return;
        };

        if matches!(
            node.kind(),
            "record_declaration" | "record_struct_declaration"
        ) {
            declared.properties = members::extract_record_properties(&self.base, &node);
        }

        let mut nested = Vec::new();
        if let Some(body) = types::type_body(&self.base, &node) {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "method_declaration" => {
                        declared
                            .methods
                            .extend(members::extract_method(&self.base, &member));
                    }
                    "constructor_declaration" => {
                        declared
                            .methods
                            .extend(members::extract_constructor(&self.base, &member));
                    }
                    "property_declaration" => {
                        declared
                            .properties
                            .extend(members::extract_property(&self.base, &member));
                    }
                    "field_declaration" | "event_field_declaration" => {
                        declared
                            .fields
                            .extend(members::extract_fields(&self.base, &member));
                    }
                    kind if get_type_declaration_kinds().contains(&kind) => nested.push(member),
                    _ => {}
                }
            }
        }

        record.types.push(declared);
        for inner in nested {
            self.extract_type(inner, namespace, record);
        }
    }
}

fn record_namespace(record: &mut FileRecord, namespace: &str) {
    if !record.namespaces.iter().any(|n| n == namespace) {
        record.namespaces.push(namespace.to_string());
    }
}
