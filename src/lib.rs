//! downlevel: formatting-preserving JavaScript desugaring.
//!
//! Given a parsed syntax tree (ESTree-shaped JSON with byte ranges, from an
//! external parser) and the original source text, downlevel rewrites selected
//! ES6 constructs into portable ES3/ES5 equivalents while reproducing every
//! byte of formatting the rewrite rules do not touch.
//!
//! The engine lives in the workspace crates; this crate wires user-facing
//! options to composed rule sets and hosts the `dlv` CLI.

// Core infrastructure - re-exported from the workspace crates
pub use downlevel_ast::{Node, NodeKind};
pub use downlevel_core::{text, Span};
pub use downlevel_transform::{
    compose_rule_sets, registry, rule, session, visitors, SourceMap, TransformOutput,
};

pub mod error;
pub mod transform;

pub use error::{DlvError, ErrorCode};
pub use transform::{transform, Options, Target};
