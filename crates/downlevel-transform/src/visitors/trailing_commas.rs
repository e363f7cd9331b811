//! Strips trailing commas from array and object literals.
//!
//! ```text
//! var arr = [        var arr = [
//!   foo,               foo,
//!   bar,               bar
//! ];                 ];
//! ```
//!
//! Arrays with a trailing elision (`[1, 2, , ]`) are left untouched:
//! removing their comma would change the array's length.

use downlevel_ast::{Node, NodeKind};

use crate::engine::Traverser;
use crate::error::TransformError;
use crate::rule::{AncestorPath, Rule, VisitResult};
use crate::session::TransformState;

pub static VISITOR_LIST: &[Rule] = &[Rule {
    name: "trailing-commas.literal",
    test: is_trailing_comma_candidate,
    action: visit_array_or_object,
}];

fn is_trailing_comma_candidate(
    node: &Node,
    _path: &AncestorPath<'_>,
    _state: &TransformState<'_>,
) -> bool {
    match &node.kind {
        NodeKind::ArrayExpression(array) => {
            array.elements.last().is_some_and(|last| last.is_some())
        }
        NodeKind::ObjectExpression(object) => !object.properties.is_empty(),
        _ => false,
    }
}

fn visit_array_or_object<'ast>(
    traverser: &Traverser<'_>,
    node: &'ast Node,
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let items: Vec<&'ast Node> = match &node.kind {
        NodeKind::ArrayExpression(array) => array.elements.iter().flatten().collect(),
        NodeKind::ObjectExpression(object) => object.properties.iter().collect(),
        _ => return Ok(VisitResult::Descend),
    };
    let Some(last) = items.last() else {
        return Ok(VisitResult::Descend);
    };
    let last_end = last.span.end;

    // Transform the items themselves first.
    for item in &items {
        traverser.traverse(item, path, state)?;
    }

    // Catch up to the end of the last item, then drop any commas between it
    // and the closing bracket.
    state.cursor.catch_up(last_end)?;
    state
        .cursor
        .catch_up_with(node.span.end - 1, |text| text.replace(',', ""))?;
    Ok(VisitResult::Handled)
}

// ============================================================================
// Tests
// ============================================================================
