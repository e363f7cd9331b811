//! Rewriting core for downlevel.
//!
//! This crate implements a pattern-directed string-rewriting machine over a
//! syntax tree. Given a parsed tree (from an external parser, see
//! `downlevel-ast`) and an ordered set of rewrite rules, it reconstructs the
//! program text with selected constructs desugared while preserving every
//! byte of formatting the rules do not explicitly touch.
//!
//! The moving parts:
//!
//! - [`cursor::Cursor`] - read-position/output-buffer pair with verbatim
//!   copy, skip, and insert primitives
//! - [`rule::Rule`] - a predicate/action pair; the action drives the cursor
//!   and decides whether the engine descends into children
//! - [`engine::Traverser`] - depth-first dispatch, first matching rule wins
//! - [`session`] - one end-to-end transform invocation
//! - [`registry`] - named catalogs composed into one ordered rule list
//! - [`visitors`] - the shipped rule catalogs
//!
//! A transform either fully succeeds or fails atomically; no partial output
//! is ever returned.

pub mod cursor;
pub mod engine;
pub mod error;
pub mod registry;
pub mod rule;
pub mod session;
pub mod source_map;
pub mod visitors;

#[cfg(test)]
pub(crate) mod testutil;

pub use cursor::{Cursor, CursorError, MappingSegment};
pub use engine::Traverser;
pub use error::TransformError;
pub use registry::{compose_rule_sets, RegistryError};
pub use rule::{AncestorPath, Rule, VisitResult};
pub use session::{
    run, SideTables, SourceType, TransformOptions, TransformOutput, TransformState,
};
pub use source_map::SourceMap;
