// C# Member Declaration Extraction

use super::{calls, helpers};
use crate::extractors::base::BaseExtractor;
use crate::model::{Field, Method, Parameter, Property, TypeAnnotation};
use tree_sitter::Node;

/// Extract method
pub fn extract_method(base: &BaseExtractor, node: &Node) -> Option<Method> {
    let name_node = node.child_by_field_name("name").or_else(|| {
        // identifier right before parameter_list (may have type_parameter_list in between)
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        let param_list_index = children.iter().position(|c| c.kind() == "parameter_list")?;
        children[..param_list_index]
            .iter()
            .rev()
            .find(|c| c.kind() == "identifier")
            .copied()
    })?;
    let name = base.get_node_text(&name_node);
    if name.is_empty() {
        return None;
    }

    let mut method = Method::new(name);
    method.id = base.node_id(node, &method.name);
    if let Some(return_type) = helpers::extract_return_type(base, node) {
        method.return_type = return_type;
    }
    fill_callable(base, node, &mut method);
    Some(method)
}

/// Extract constructor
pub fn extract_constructor(base: &BaseExtractor, node: &Node) -> Option<Method> {
    let name = helpers::extract_name(base, node)?;

    let mut method = Method::new(name);
    method.id = base.node_id(node, &method.name);
    method.return_type = String::new();
    method.is_constructor = true;
    fill_callable(base, node, &mut method);
    Some(method)
}

fn fill_callable(base: &BaseExtractor, node: &Node, method: &mut Method) {
    method.attributes = helpers::extract_attributes(base, node);
    method.parameters = node
        .child_by_field_name("parameters")
        .or_else(|| base.find_child_by_type(node, "parameter_list"))
        .map(|list| extract_parameters(base, &list))
        .unwrap_or_default();
    method.calls = calls::extract_call_sites(base, node);
    method.creations = calls::extract_object_creations(base, node);
    method.start_line = base.line_span(node).0;
}

/// Extract the parameters of a parameter_list.
///
/// A `params T[] rest` parameter is not wrapped in a `parameter` node: its type
/// and name sit as fields on the list itself, with its attributes beside them.
pub fn extract_parameters(base: &BaseExtractor, list: &Node) -> Vec<Parameter> {
    let mut parameters: Vec<Parameter> = base
        .find_children_by_type(list, "parameter")
        .iter()
        .filter_map(|param| {
            let name = helpers::extract_name(base, param)?;
            let type_name =
                helpers::extract_type_text(base, param).unwrap_or_else(|| "var".to_string());
            let mut parameter = Parameter::new(name, type_name);
            parameter.attributes = helpers::extract_attributes(base, param);
            Some(parameter)
        })
        .collect();

    let mut type_cursor = list.walk();
    let mut name_cursor = list.walk();
    let params_types = list.children_by_field_name("type", &mut type_cursor);
    let params_names = list.children_by_field_name("name", &mut name_cursor);
    for (type_node, name_node) in params_types.zip(params_names) {
        let name = base.get_node_text(&name_node);
        if name.is_empty() {
            continue;
        }
        let mut parameter = Parameter::new(name, base.get_node_text(&type_node));
        parameter.attributes = helpers::extract_attributes(base, list);
        parameters.push(parameter);
    }

    parameters
}

/// Positional parameters of a record become its public properties
pub fn extract_record_properties(base: &BaseExtractor, node: &Node) -> Vec<Property> {
    let Some(list) = node
        .child_by_field_name("parameters")
        .or_else(|| base.find_child_by_type(node, "parameter_list"))
    else {
        return Vec::new();
    };

    extract_parameters(base, &list)
        .into_iter()
        .map(|parameter| Property {
            name: parameter.name,
            type_name: parameter.type_name,
            attributes: parameter.attributes,
            annotation: TypeAnnotation::default(),
        })
        .collect()
}

/// Extract property
pub fn extract_property(base: &BaseExtractor, node: &Node) -> Option<Property> {
    let name = helpers::extract_name(base, node)?;
    let type_name = helpers::extract_type_text(base, node).unwrap_or_else(|| "var".to_string());

    Some(Property {
        name,
        type_name,
        attributes: helpers::extract_attributes(base, node),
        annotation: TypeAnnotation::default(),
    })
}

/// Extract field or event field declaration, one Field per declarator
/// (`int a, b;` is two fields)
pub fn extract_fields(base: &BaseExtractor, node: &Node) -> Vec<Field> {
    let Some(var_declaration) = base.find_child_by_type(node, "variable_declaration") else {
        return Vec::new();
    };
    let type_name =
        helpers::extract_type_text(base, &var_declaration).unwrap_or_else(|| "var".to_string());
    let attributes = helpers::extract_attributes(base, node);

    base.find_children_by_type(&var_declaration, "variable_declarator")
        .iter()
        .filter_map(|declarator| helpers::extract_name(base, declarator))
        .map(|name| Field {
            name,
            type_name: type_name.clone(),
            attributes: attributes.clone(),
            annotation: TypeAnnotation::default(),
        })
        .collect()
}
