//! The rule contract: predicate/action pairs and the ancestor path.
//!
//! A rule is a self-contained rewrite unit. Its `test` decides whether the
//! rule applies to a node given the ancestor path and session state; its
//! `action` drives the cursor and may recursively invoke traversal on chosen
//! children through the [`Traverser`] it receives. Rules are immutable,
//! stateless data built at compile time; the only mutable entities are the
//! session's cursor and state bag.

use downlevel_ast::Node;

use crate::engine::Traverser;
use crate::error::TransformError;
use crate::session::TransformState;

/// Continuation signal returned by a rule action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Let the engine recurse into the node's children after the action
    /// returns.
    Descend,
    /// The action fully handled this node and its relevant subtree: it
    /// already traversed whatever needed traversing and advanced the cursor
    /// itself.
    Handled,
}

/// Predicate over (node, ancestor path, session state).
///
/// Predicates are pure: they must not touch the cursor or state bag.
pub type TestFn =
    for<'ast> fn(&'ast Node, &AncestorPath<'ast>, &TransformState<'_>) -> bool;

/// Rule action. Receives the engine's own visit function so it can
/// selectively recurse into chosen children, in any order, any number of
/// times.
pub type ActionFn = for<'ast> fn(
    &Traverser<'_>,
    &'ast Node,
    &mut AncestorPath<'ast>,
    &mut TransformState<'_>,
) -> Result<VisitResult, TransformError>;

/// A single rewrite rule: a named predicate/action pair.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable name for trace output and error messages.
    pub name: &'static str,
    pub test: TestFn,
    pub action: ActionFn,
}

/// Stack of enclosing nodes at the current traversal point, innermost first.
///
/// The engine pushes a node around its dispatch and default descent and pops
/// it on every exit path, so predicates observe the path *excluding* the
/// node under test: `parent()` is the enclosing node.
#[derive(Debug, Default)]
pub struct AncestorPath<'ast> {
    stack: Vec<&'ast Node>,
}

impl<'ast> AncestorPath<'ast> {
    pub fn new() -> Self {
        AncestorPath { stack: Vec::new() }
    }

    /// The innermost enclosing node, if any.
    pub fn parent(&self) -> Option<&'ast Node> {
        self.stack.last().copied()
    }

    /// The `n`-th enclosing node, innermost first (`get(0) == parent()`).
    pub fn get(&self, n: usize) -> Option<&'ast Node> {
        self.stack.iter().rev().nth(n).copied()
    }

    /// Iterate ancestors innermost first.
    pub fn iter(&self) -> impl Iterator<Item = &'ast Node> + '_ {
        self.stack.iter().rev().copied()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub(crate) fn push(&mut self, node: &'ast Node) {
        self.stack.push(node);
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }
}

// ============================================================================
// Tests
// ============================================================================
