//! Reserved-word hygiene for the ES3 target.
//!
//! ```text
//! o.class           o["class"]
//! ({ class: x })    ({ "class": x })
//! ```
//!
//! ES3 engines reject reserved words as property names; quoting them keeps
//! the program parseable without changing behavior.

use downlevel_ast::{Node, NodeKind};

use crate::engine::Traverser;
use crate::error::TransformError;
use crate::rule::{AncestorPath, Rule, VisitResult};
use crate::session::TransformState;
use crate::visitors::reserved_words::is_reserved_word;

pub static VISITOR_LIST: &[Rule] = &[
    Rule {
        name: "es3.member-reserved-word",
        test: is_reserved_member_access,
        action: visit_member_with_reserved_word,
    },
    Rule {
        name: "es3.property-reserved-word",
        test: is_reserved_property_key,
        action: visit_property_with_reserved_word,
    },
];

fn is_reserved_member_access(
    node: &Node,
    _path: &AncestorPath<'_>,
    _state: &TransformState<'_>,
) -> bool {
    match &node.kind {
        NodeKind::MemberExpression(member) => {
            !member.computed
                && matches!(&member.property.kind, NodeKind::Identifier(id) if is_reserved_word(&id.name))
        }
        _ => false,
    }
}

fn visit_member_with_reserved_word<'ast>(
    traverser: &Traverser<'_>,
    node: &'ast Node,
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let NodeKind::MemberExpression(member) = &node.kind else {
        return Ok(VisitResult::Descend);
    };
    traverser.traverse(&member.object, path, state)?;
    state.cursor.catch_up(member.object.span.end)?;
    // the dot goes away; surrounding layout stays
    state.cursor.catch_up_white_space(member.property.span.start)?;
    state.cursor.append("[\"");
    state.cursor.catch_up(member.property.span.end)?;
    state.cursor.append("\"]");
    Ok(VisitResult::Handled)
}

fn is_reserved_property_key(
    node: &Node,
    _path: &AncestorPath<'_>,
    _state: &TransformState<'_>,
) -> bool {
    match &node.kind {
        NodeKind::Property(property) => {
            !property.method
                && !property.computed
                && !property.shorthand
                && matches!(&property.key.kind, NodeKind::Identifier(id) if is_reserved_word(&id.name))
        }
        _ => false,
    }
}

fn visit_property_with_reserved_word<'ast>(
    _traverser: &Traverser<'_>,
    node: &'ast Node,
    _path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let NodeKind::Property(property) = &node.kind else {
        return Ok(VisitResult::Descend);
    };
    state.cursor.catch_up(property.key.span.start)?;
    state.cursor.append("\"");
    state.cursor.catch_up(property.key.span.end)?;
    state.cursor.append("\"");
    // default descent still renders the value
    Ok(VisitResult::Descend)
}

// ============================================================================
// Tests
// ============================================================================
