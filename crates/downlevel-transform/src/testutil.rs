//! Test-only helpers for building syntax trees with source-accurate spans.
//!
//! The engine consumes trees from an external parser; tests build them by
//! hand. Spans are located by searching the source text for the node's
//! lexeme, so a test cannot drift out of sync with its source string.

#![allow(dead_code)]

use downlevel_ast::{
    ArrayExpression, BinaryExpression, Block, CallExpression, ExpressionStatement, Function,
    Identifier, Literal, MemberExpression, NewExpression, Node, NodeKind, ObjectExpression,
    Program, Property, PropertyKind, ReturnStatement, SpreadElement, VariableDeclaration,
    VariableDeclarator,
};
use downlevel_core::Span;

use crate::rule::Rule;
use crate::session::{self, TransformOptions};

/// Span of the first occurrence of `needle` in `src`.
pub(crate) fn sp(src: &str, needle: &str) -> Span {
    sp_nth(src, needle, 0)
}

/// Span of the `nth` (0-based) occurrence of `needle` in `src`.
pub(crate) fn sp_nth(src: &str, needle: &str, nth: usize) -> Span {
    let (start, _) = src
        .match_indices(needle)
        .nth(nth)
        .unwrap_or_else(|| panic!("occurrence {nth} of {needle:?} not found in {src:?}"));
    Span::new(start, start + needle.len())
}

pub(crate) fn node(span: Span, kind: NodeKind) -> Node {
    Node { span, kind }
}

/// Program spanning the whole source.
pub(crate) fn program(src: &str, body: Vec<Node>) -> Node {
    node(
        Span::new(0, src.len()),
        NodeKind::Program(Program { body }),
    )
}

pub(crate) fn ident_at(src: &str, name: &str, nth: usize) -> Node {
    node(
        sp_nth(src, name, nth),
        NodeKind::Identifier(Identifier {
            name: name.to_string(),
        }),
    )
}

pub(crate) fn lit_at(src: &str, raw: &str, nth: usize) -> Node {
    node(
        sp_nth(src, raw, nth),
        NodeKind::Literal(Literal {
            raw: Some(raw.to_string()),
        }),
    )
}

/// Expression statement sharing its expression's span.
pub(crate) fn expr_stmt(expression: Node) -> Node {
    node(
        expression.span,
        NodeKind::ExpressionStatement(ExpressionStatement {
            expression: Box::new(expression),
        }),
    )
}

pub(crate) fn block(span: Span, body: Vec<Node>) -> Node {
    node(span, NodeKind::BlockStatement(Block { body }))
}

pub(crate) fn ret_stmt(span: Span, argument: Option<Node>) -> Node {
    node(
        span,
        NodeKind::ReturnStatement(ReturnStatement {
            argument: argument.map(Box::new),
        }),
    )
}

pub(crate) fn array(span: Span, elements: Vec<Option<Node>>) -> Node {
    node(span, NodeKind::ArrayExpression(ArrayExpression { elements }))
}

pub(crate) fn object(span: Span, properties: Vec<Node>) -> Node {
    node(
        span,
        NodeKind::ObjectExpression(ObjectExpression { properties }),
    )
}

pub(crate) fn property(span: Span, key: Node, value: Node, method: bool) -> Node {
    node(
        span,
        NodeKind::Property(Property {
            key: Box::new(key),
            value: Box::new(value),
            kind: PropertyKind::Init,
            method,
            shorthand: false,
            computed: false,
        }),
    )
}

pub(crate) fn func_expr(span: Span, params: Vec<Node>, rest: Option<Node>, body: Node) -> Node {
    node(
        span,
        NodeKind::FunctionExpression(Function {
            id: None,
            params,
            rest: rest.map(Box::new),
            body: Box::new(body),
            generator: false,
        }),
    )
}

pub(crate) fn func_expr_gen(span: Span, params: Vec<Node>, body: Node) -> Node {
    node(
        span,
        NodeKind::FunctionExpression(Function {
            id: None,
            params,
            rest: None,
            body: Box::new(body),
            generator: true,
        }),
    )
}

pub(crate) fn func_decl(
    span: Span,
    id: Node,
    params: Vec<Node>,
    rest: Option<Node>,
    body: Node,
) -> Node {
    node(
        span,
        NodeKind::FunctionDeclaration(Function {
            id: Some(Box::new(id)),
            params,
            rest: rest.map(Box::new),
            body: Box::new(body),
            generator: false,
        }),
    )
}

pub(crate) fn call(span: Span, callee: Node, arguments: Vec<Node>) -> Node {
    node(
        span,
        NodeKind::CallExpression(CallExpression {
            callee: Box::new(callee),
            arguments,
        }),
    )
}

pub(crate) fn new_expr(span: Span, callee: Node, arguments: Vec<Node>) -> Node {
    node(
        span,
        NodeKind::NewExpression(NewExpression {
            callee: Box::new(callee),
            arguments,
        }),
    )
}

pub(crate) fn member(span: Span, object: Node, property: Node) -> Node {
    node(
        span,
        NodeKind::MemberExpression(MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            computed: false,
        }),
    )
}

pub(crate) fn spread_el(span: Span, argument: Node) -> Node {
    node(
        span,
        NodeKind::SpreadElement(SpreadElement {
            argument: Box::new(argument),
        }),
    )
}

pub(crate) fn binary(span: Span, operator: &str, left: Node, right: Node) -> Node {
    node(
        span,
        NodeKind::BinaryExpression(BinaryExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }),
    )
}

pub(crate) fn var_decl(span: Span, declarations: Vec<Node>) -> Node {
    node(
        span,
        NodeKind::VariableDeclaration(VariableDeclaration {
            declarations,
            kind: "var".to_string(),
        }),
    )
}

pub(crate) fn declarator(span: Span, id: Node, init: Option<Node>) -> Node {
    node(
        span,
        NodeKind::VariableDeclarator(VariableDeclarator {
            id: Box::new(id),
            init: init.map(Box::new),
        }),
    )
}

/// Run a rule list over a tree with default options, returning the code.
pub(crate) fn run_rules(rules: &[Rule], root: &Node, source: &str) -> String {
    run_rules_with(rules, root, source, &TransformOptions::default())
}

pub(crate) fn run_rules_with(
    rules: &[Rule],
    root: &Node,
    source: &str,
    options: &TransformOptions,
) -> String {
    session::run(rules, root, source, options)
        .expect("transform failed")
        .code
}
