// C# Call Site Extraction
//
// invocation_expression and object_creation_expression nodes inside a method or
// constructor body, plus DI service registrations anywhere in the file.

use once_cell::sync::Lazy;
use regex::Regex;

use super::helpers;
use crate::extractors::base::BaseExtractor;
use crate::model::{CallSite, ServiceRegistration};
use crate::resolution::short_name;
use tree_sitter::Node;

static REGISTRATION_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Add(Scoped|Transient|Singleton)$").expect("registration pattern is valid")
});

/// Block body and expression body of a method or constructor.
///
/// Only bodies are searched so attribute arguments like `nameof(Get)` are not
/// reported as calls.
fn callable_bodies<'a>(base: &BaseExtractor, callable: &Node<'a>) -> Vec<Node<'a>> {
    let mut bodies: Vec<Node<'a>> = Vec::new();
    let candidates = [
        callable.child_by_field_name("body"),
        base.find_child_by_type(callable, "arrow_expression_clause"),
    ];
    for body in candidates.into_iter().flatten() {
        // `body` and the block child may be the same node
        if !bodies.iter().any(|b| b.id() == body.id()) {
            bodies.push(body);
        }
    }
    bodies
}

/// Call sites in the body of `callable`, in source order
pub fn extract_call_sites(base: &BaseExtractor, callable: &Node) -> Vec<CallSite> {
    callable_bodies(base, callable)
        .iter()
        .flat_map(|body| base.find_nodes_by_type(body, "invocation_expression"))
        .filter_map(|invocation| extract_call_site(base, &invocation))
        .collect()
}

/// Type names of `new T(...)` in the body of `callable`; target-typed `new()` has none
pub fn extract_object_creations(base: &BaseExtractor, callable: &Node) -> Vec<String> {
    callable_bodies(base, callable)
        .iter()
        .flat_map(|body| base.find_nodes_by_type(body, "object_creation_expression"))
        .filter_map(|creation| base.get_field_text(&creation, "type"))
        .filter(|text| !text.is_empty())
        .collect()
}

/// `AddScoped<IService, Impl>()` and `AddScoped(typeof(IService), typeof(Impl))`
/// registrations (also Transient and Singleton) anywhere under `root`
pub fn extract_service_registrations(base: &BaseExtractor, root: &Node) -> Vec<ServiceRegistration> {
    base.find_nodes_by_type(root, "invocation_expression")
        .iter()
        .filter_map(|invocation| extract_registration(base, invocation))
        .collect()
}

fn extract_registration(base: &BaseExtractor, invocation: &Node) -> Option<ServiceRegistration> {
    let function = invocation
        .child_by_field_name("function")
        .or_else(|| invocation.named_child(0))?;
    let name_node = match function.kind() {
        "member_access_expression" => function.child_by_field_name("name")?,
        "generic_name" | "identifier" => function,
        _ => return None,
    };

    let name_text = base.get_node_text(&name_node);
    if !REGISTRATION_METHOD.is_match(helpers::strip_type_arguments(&name_text).trim()) {
        return None;
    }

    let types: Vec<String> = if name_node.kind() == "generic_name" {
        let arguments = base.find_child_by_type(&name_node, "type_argument_list")?;
        let mut cursor = arguments.walk();
        let named: Vec<String> = arguments
            .named_children(&mut cursor)
            .map(|t| base.get_node_text(&t))
            .collect();
        named
    } else {
        let arguments = invocation
            .child_by_field_name("arguments")
            .or_else(|| base.find_child_by_type(invocation, "argument_list"))?;
        base.find_children_by_type(&arguments, "argument")
            .iter()
            .filter_map(|argument| {
                let typeof_node = base.find_child_by_type(argument, "typeof_expression")?;
                typeof_node
                    .child_by_field_name("type")
                    .or_else(|| typeof_node.named_child(0))
                    .map(|t| base.get_node_text(&t))
            })
            .collect()
    };

    match types.as_slice() {
        [service, implementation] => Some(ServiceRegistration {
            service: short_name(service).trim().to_string(),
            implementation: short_name(implementation).trim().to_string(),
        }),
        _ => None,
    }
}

fn extract_call_site(base: &BaseExtractor, invocation: &Node) -> Option<CallSite> {
    let function = invocation
        .child_by_field_name("function")
        .or_else(|| invocation.named_child(0))?;

    let (name, receiver) = match function.kind() {
        "member_access_expression" => (
            base.get_field_text(&function, "name")?,
            base.get_field_text(&function, "expression")
                .unwrap_or_default(),
        ),
        // `a?.Save()`: the receiver sits on the enclosing conditional access
        "member_binding_expression" => {
            let name = base.get_field_text(&function, "name")?;
            let receiver = find_conditional_receiver(base, invocation).unwrap_or_default();
            (name, receiver)
        }
        "conditional_access_expression" => {
            let binding = base.find_child_by_type(&function, "member_binding_expression")?;
            let name = base.get_field_text(&binding, "name")?;
            let receiver = function
                .child_by_field_name("condition")
                .or_else(|| function.named_child(0))
                .map(|c| base.get_node_text(&c))
                .unwrap_or_default();
            (name, receiver)
        }
        _ => (base.get_node_text(&function), String::new()),
    };

    let name = helpers::strip_type_arguments(&name).trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(CallSite {
        name,
        receiver,
        line: (invocation.start_position().row + 1) as u32,
    })
}

fn find_conditional_receiver(base: &BaseExtractor, node: &Node) -> Option<String> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "conditional_access_expression" {
            return parent
                .child_by_field_name("condition")
                .or_else(|| parent.named_child(0))
                .map(|c| base.get_node_text(&c));
        }
        current = parent.parent();
    }
    None
}
