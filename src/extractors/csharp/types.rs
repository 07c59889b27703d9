// C# Type Declaration Extraction

use super::helpers;
use crate::extractors::base::BaseExtractor;
use crate::model::{DeclaredKind, DeclaredType};
use tree_sitter::Node;

/// Name of a `namespace X.Y { }` or `namespace X.Y;` declaration
pub fn extract_namespace_name(base: &BaseExtractor, node: &Node) -> Option<String> {
    let name_node = node
        .child_by_field_name("name")
        .or_else(|| base.find_child_by_types(node, &["qualified_name", "identifier"]))?;

    let parts = helpers::namespace_parts(&base.get_node_text(&name_node));
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}

/// Target of a using directive: `using A.B;`, `using static A.B;`, `global using A;`
/// and `using Alias = A.B;` all yield the imported name.
pub fn extract_using(base: &BaseExtractor, node: &Node) -> Option<String> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();

    let target = match children.iter().position(|c| c.kind() == "=") {
        Some(equals) => children[equals + 1..].iter().find(|c| c.is_named()),
        None => children.iter().find(|c| {
            matches!(
                c.kind(),
                "qualified_name"
                    | "identifier"
                    | "generic_name"
                    | "alias_qualified_name"
                    | "member_access_expression"
            )
        }),
    }?;

    let text = base.get_node_text(target);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Header of a type declaration (name, kind, attributes, base list, span).
/// Members are filled in by the caller.
pub fn extract_type_declaration(
    base: &BaseExtractor,
    node: &Node,
    namespace: &str,
) -> Option<DeclaredType> {
    let name = helpers::extract_name(base, node)?;
    let attributes = helpers::extract_attributes(base, node);

    let (kind, base_types) = match node.kind() {
        "interface_declaration" => (
            DeclaredKind::Interface,
            helpers::extract_base_list(base, node),
        ),
        // `enum E : byte` names the underlying type, not a base
        "enum_declaration" => (DeclaredKind::Enum, Vec::new()),
        "class_declaration"
        | "struct_declaration"
        | "record_declaration"
        | "record_struct_declaration" => {
            let base_types = helpers::extract_base_list(base, node);
            (
                DeclaredKind::classify_class(&name, &attributes, &base_types),
                base_types,
            )
        }
        _ => return None,
    };

    let (start_line, end_line) = base.line_span(node);
    let mut declared = DeclaredType::new(name, namespace, kind);
    declared.id = base.node_id(node, &declared.name);
    declared.attributes = attributes;
    declared.base_types = base_types;
    declared.start_line = start_line;
    declared.end_line = end_line;
    Some(declared)
}

/// Body node holding a type's members
pub fn type_body<'a>(base: &BaseExtractor, node: &Node<'a>) -> Option<Node<'a>> {
    node.child_by_field_name("body").or_else(|| {
        base.find_child_by_types(node, &["declaration_list", "enum_member_declaration_list"])
    })
}
