//! Desugars rest parameters into `arguments` slicing.
//!
//! ```text
//! function printf(template, ...args) {
//!   args.forEach(run);
//! }
//! ```
//!
//! becomes
//!
//! ```text
//! function printf(template ) {var args=Array.prototype.slice.call(arguments,1);
//!   args.forEach(run);
//! }
//! ```
//!
//! The rest marker is deleted through the whitespace catch-up, so the
//! parameter list keeps its line breaks and comments.

use downlevel_ast::{Node, NodeKind};

use crate::engine::Traverser;
use crate::error::TransformError;
use crate::rule::{AncestorPath, Rule, VisitResult};
use crate::session::TransformState;

pub static VISITOR_LIST: &[Rule] = &[Rule {
    name: "rest-params.function",
    test: has_rest_param,
    action: visit_function_with_rest_param,
}];

fn has_rest_param(node: &Node, _path: &AncestorPath<'_>, _state: &TransformState<'_>) -> bool {
    node.as_function().is_some_and(|f| f.rest.is_some())
}

fn visit_function_with_rest_param<'ast>(
    traverser: &Traverser<'_>,
    node: &'ast Node,
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let (NodeKind::FunctionDeclaration(function) | NodeKind::FunctionExpression(function)) =
        &node.kind
    else {
        return Ok(VisitResult::Descend);
    };
    let Some(rest) = function.rest.as_deref() else {
        return Ok(VisitResult::Descend);
    };
    let rest_name = match &rest.kind {
        NodeKind::Identifier(id) => id.name.as_str(),
        _ => {
            return Err(TransformError::unsupported(
                "rest-params.function",
                rest.span,
                "rest parameter must be a plain identifier",
            ))
        }
    };

    // Render params.
    if let Some(last_param) = function.params.last() {
        state.cursor.catch_up(last_param.span.end)?;
    } else {
        // the `...` marker sits three bytes before the rest identifier
        state.cursor.catch_up(rest.span.start - 3)?;
    }
    state.cursor.catch_up_white_space(rest.span.end)?;

    // Move to the body capturing the opening brace, then inject the slice.
    state.cursor.catch_up(function.body.span.start + 1)?;
    let param_count = function.params.len();
    state.cursor.append(&format!(
        "var {rest_name}=Array.prototype.slice.call(arguments,{param_count});"
    ));

    traverser.traverse(&function.body, path, state)?;
    Ok(VisitResult::Handled)
}

// ============================================================================
// Tests
// ============================================================================
