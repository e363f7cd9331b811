//! Desugars concise object methods to full function-expression notation.
//!
//! ```text
//! var foo = {            var foo = {
//!   method(x, y) { }       method: function(x, y) { }
//! };                     };
//! ```
//!
//! Reserved-word keys are quoted on the way through (`class()` becomes
//! `"class": function()`), and generator methods keep their star on the
//! function keyword. Computed keys belong to the computed-property catalog
//! and are not matched here.

use downlevel_ast::{Node, NodeKind};

use crate::engine::Traverser;
use crate::error::TransformError;
use crate::rule::{AncestorPath, Rule, VisitResult};
use crate::session::TransformState;
use crate::visitors::reserved_words::is_reserved_word;

pub static VISITOR_LIST: &[Rule] = &[Rule {
    name: "concise-methods.property",
    test: is_concise_method,
    action: visit_object_concise_method,
}];

fn is_concise_method(node: &Node, _path: &AncestorPath<'_>, _state: &TransformState<'_>) -> bool {
    match &node.kind {
        NodeKind::Property(property) => {
            property.method
                && !property.computed
                && matches!(property.value.kind, NodeKind::FunctionExpression(_))
        }
        _ => false,
    }
}

fn visit_object_concise_method<'ast>(
    traverser: &Traverser<'_>,
    node: &'ast Node,
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let NodeKind::Property(property) = &node.kind else {
        return Ok(VisitResult::Descend);
    };
    let is_generator = matches!(&property.value.kind, NodeKind::FunctionExpression(f) if f.generator);
    if is_generator {
        // drop the leading `*`; it reappears on the function keyword
        state.cursor.catch_up(node.span.start)?;
        state.cursor.catch_up_white_space(node.span.start + 1)?;
    }
    if let NodeKind::Identifier(key) = &property.key.kind {
        if is_reserved_word(&key.name) {
            state.cursor.catch_up(property.key.span.start)?;
            state.cursor.append("\"");
            state.cursor.catch_up(property.key.span.end)?;
            state.cursor.append("\"");
        }
    }

    state.cursor.catch_up(property.key.span.end)?;
    state
        .cursor
        .append(if is_generator { ": function*" } else { ": function" });
    traverser.traverse(&property.value, path, state)?;
    Ok(VisitResult::Handled)
}

// ============================================================================
// Tests
// ============================================================================
