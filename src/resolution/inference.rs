// Convention Inference Pass
//
// Web-API convention: complex parameters of POST/PUT/PATCH actions bind from the
// request body unless another binding attribute says otherwise. Runs after
// propagation since it reads the resolved TypeKind of each parameter.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::model::{FileRecord, Method, Parameter, TypeKind};

/// Synthetic attribute appended to parameters inferred to bind from the body
pub const INFERRED_BODY_MARKER: &str = "FromBody(Inferred)";

static BODY_VERB_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Http(Post|Put|Patch)").expect("body verb pattern is valid"));

/// Whether the method carries an HttpPost / HttpPut / HttpPatch attribute
pub fn is_body_verb_method(method: &Method) -> bool {
    method
        .attributes
        .iter()
        .any(|attr| BODY_VERB_ATTRIBUTE.is_match(attr))
}

fn should_infer_body(parameter: &Parameter) -> bool {
    if parameter.attributes.iter().any(|a| a == INFERRED_BODY_MARKER) {
        return false;
    }
    parameter.attributes.is_empty() && parameter.annotation.type_kind == TypeKind::Class
}

/// Mark body-bound parameters; returns how many markers were added
pub fn infer_body_binding(corpus: &mut [FileRecord]) -> usize {
    let mut added = 0;

    for file in corpus.iter_mut() {
        for declared in file.types.iter_mut().filter(|t| t.kind.is_class_like()) {
            for method in declared.methods.iter_mut() {
                if !is_body_verb_method(method) {
                    continue;
                }
                for parameter in method.parameters.iter_mut() {
                    if should_infer_body(parameter) {
                        debug!(
                            "Inferred body binding for {}.{}({})",
                            declared.name, method.name, parameter.name
                        );
                        parameter.attributes.push(INFERRED_BODY_MARKER.to_string());
                        added += 1;
                    }
                }
            }
        }
    }

    added
}
