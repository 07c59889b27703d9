// C# Helper Methods
//
// Utility functions for reading names, attributes and type text off C# AST nodes

use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// Node kinds that can stand in for a type reference
const TYPE_NODE_KINDS: &[&str] = &[
    "predefined_type",
    "identifier",
    "qualified_name",
    "generic_name",
    "array_type",
    "nullable_type",
    "tuple_type",
    "pointer_type",
    "alias_qualified_name",
];

/// Declared name of a type or member: the `name` field, else the first identifier
pub fn extract_name(base: &BaseExtractor, node: &Node) -> Option<String> {
    let name_node = node
        .child_by_field_name("name")
        .or_else(|| base.find_child_by_type(node, "identifier"))?;
    let name = base.get_node_text(&name_node);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Attribute names on a declaration, as written, without brackets or arguments.
///
/// `[HttpPost("users"), Authorize]` yields `HttpPost`, `Authorize`.
pub fn extract_attributes(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let mut attributes = Vec::new();

    for list in base.find_children_by_type(node, "attribute_list") {
        for attribute in base.find_children_by_type(&list, "attribute") {
            let name = match attribute.child_by_field_name("name") {
                Some(name_node) => base.get_node_text(&name_node),
                None => attribute_name_from_text(&base.get_node_text(&attribute)),
            };
            if !name.is_empty() {
                attributes.push(name);
            }
        }
    }

    attributes
}

fn attribute_name_from_text(text: &str) -> String {
    text.split('(').next().unwrap_or(text).trim().to_string()
}

/// Extract base list (inheritance/implementation classes and interfaces)
pub fn extract_base_list(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let Some(base_list) = base.find_child_by_type(node, "base_list") else {
        return Vec::new();
    };

    let mut cursor = base_list.walk();
    base_list
        .children(&mut cursor)
        .filter(|c| c.is_named() && c.kind() != "argument_list")
        .map(|c| {
            // Record primary constructors: `record B(int X) : A(X)`
            if c.kind() == "primary_constructor_base_type" {
                c.child_by_field_name("type")
                    .or_else(|| base.find_child_by_types(&c, TYPE_NODE_KINDS))
                    .map(|t| base.get_node_text(&t))
                    .unwrap_or_else(|| base.get_node_text(&c))
            } else {
                base.get_node_text(&c)
            }
        })
        .filter(|text| !text.is_empty())
        .collect()
}

/// Type text of a member (`type` field, else the first type-like child)
pub fn extract_type_text(base: &BaseExtractor, node: &Node) -> Option<String> {
    node.child_by_field_name("type")
        .or_else(|| base.find_child_by_types(node, TYPE_NODE_KINDS))
        .map(|t| base.get_node_text(&t))
        .filter(|text| !text.is_empty())
}

/// Extract return type from a method node
pub fn extract_return_type(base: &BaseExtractor, node: &Node) -> Option<String> {
    if let Some(returns) = node
        .child_by_field_name("returns")
        .or_else(|| node.child_by_field_name("type"))
    {
        return Some(base.get_node_text(&returns));
    }

    // Find method name identifier - comes before parameter_list (may have type_parameter_list in between)
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    let param_list_index = children.iter().position(|c| c.kind() == "parameter_list")?;
    let name_index = children[..param_list_index]
        .iter()
        .rposition(|c| c.kind() == "identifier")?;

    children[..name_index]
        .iter()
        .find(|c| TYPE_NODE_KINDS.contains(&c.kind()))
        .map(|node| base.get_node_text(node))
}

/// Split a namespace name into its dotted parts
pub fn namespace_parts(name: &str) -> Vec<String> {
    name.split('.')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

/// Text before the first `<`, for generic method names like `Get<T>`
pub fn strip_type_arguments(name: &str) -> &str {
    crate::resolution::strip_generics(name)
}
