//! Traversal and dispatch engine.
//!
//! Depth-first, pre-order walk over the syntax tree. At each node the
//! composed rule list is scanned in order; the first rule whose predicate
//! matches is dispatched, and every later rule is ignored for that node.
//! This total order is the sole conflict-resolution mechanism between
//! independently authored catalogs.
//!
//! # Control Flow
//!
//! - No matching rule, or the action returns [`VisitResult::Descend`]:
//!   children are visited recursively in source order.
//! - The action returns [`VisitResult::Handled`]: the engine does nothing
//!   further for this node; the action already traversed whatever needed
//!   traversing.
//!
//! # Cursor discipline
//!
//! The engine itself never touches the cursor. Catching up to a node's range
//! is the responsibility of whichever action (or the session's trailing
//! flush) emits output around it; default descent over an untouched subtree
//! emits nothing, which is exactly what makes an empty rule set the identity
//! transform.
//!
//! # Errors
//!
//! An action error is not caught locally: it propagates to the session and
//! aborts the whole transform. The ancestor path is popped on every exit
//! path, so an error never leaks stale context into sibling visits.

use downlevel_ast::Node;
use tracing::trace;

use crate::error::TransformError;
use crate::rule::{AncestorPath, Rule, VisitResult};
use crate::session::TransformState;

/// Rule-dispatch engine over one composed rule list.
///
/// The traverser is passed back into every rule action as the re-entrant
/// visit function, so actions can selectively recurse into chosen children
/// in any order.
pub struct Traverser<'r> {
    rules: &'r [Rule],
}

impl<'r> Traverser<'r> {
    pub fn new(rules: &'r [Rule]) -> Self {
        Traverser { rules }
    }

    /// Visit `node`: dispatch the first matching rule, or descend into
    /// children by default.
    pub fn traverse<'ast>(
        &self,
        node: &'ast Node,
        path: &mut AncestorPath<'ast>,
        state: &mut TransformState<'_>,
    ) -> Result<(), TransformError> {
        let matched = self.rules.iter().find(|rule| (rule.test)(node, path, state));
        path.push(node);
        let result = self.dispatch(matched, node, path, state);
        path.pop();
        result
    }

    fn dispatch<'ast>(
        &self,
        matched: Option<&Rule>,
        node: &'ast Node,
        path: &mut AncestorPath<'ast>,
        state: &mut TransformState<'_>,
    ) -> Result<(), TransformError> {
        let outcome = match matched {
            Some(rule) => {
                trace!(
                    rule = rule.name,
                    kind = node.kind_name(),
                    start = node.span.start,
                    "rule matched"
                );
                (rule.action)(self, node, path, state)?
            }
            None => VisitResult::Descend,
        };
        if outcome == VisitResult::Descend {
            for child in node.children() {
                self.traverse(child, path, state)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
