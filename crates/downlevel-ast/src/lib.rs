//! ESTree-style syntax tree contract for downlevel.
//!
//! The parser itself is out of scope: any parser that produces ESTree-shaped
//! JSON with byte `range` annotations (esprima with `range: true`, or
//! compatible) can drive the rewriting engine. This crate is the narrow
//! interface the engine consumes:
//!
//! - a `kind` tag per node ([`NodeKind`])
//! - a half-open byte range into the original source ([`Node::span`])
//! - ordered child enumeration ([`Node::children`])
//!
//! Nodes are read-only for the engine; the rewrite rules never mutate the
//! tree, only the output buffer.

pub mod nodes;

pub use nodes::{
    ArrayExpression, AssignmentExpression, BinaryExpression, Block, CallExpression,
    ExpressionStatement, Function, Identifier, IfStatement, Literal, MemberExpression,
    NewExpression, Node, NodeKind, ObjectExpression, Program, Property, PropertyKind,
    ReturnStatement, SpreadElement, VariableDeclaration, VariableDeclarator,
};
