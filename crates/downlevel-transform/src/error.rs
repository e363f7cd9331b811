//! Error type for the rewriting core.
//!
//! A transform either fully succeeds or fails atomically. Any error from a
//! rule aborts the session immediately; no partial output is emitted, since
//! a half-rewritten program is worse than a clear failure.

use downlevel_core::Span;
use thiserror::Error;

use crate::cursor::CursorError;

/// Fatal session errors.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A rule violated the cursor advancement contract, or the session
    /// finished with unconsumed source. Internal-consistency bugs, not
    /// recoverable conditions.
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// A rule encountered a construct it cannot rewrite.
    #[error("{rule}: unsupported construct at {span}: {message}")]
    UnsupportedConstruct {
        rule: &'static str,
        span: Span,
        message: String,
    },

    /// Source-map serialization failed.
    #[error("source map serialization failed: {0}")]
    SourceMap(#[from] serde_json::Error),
}

impl TransformError {
    /// Create an unsupported-construct error carrying the offending node's
    /// source range.
    pub fn unsupported(rule: &'static str, span: Span, message: impl Into<String>) -> Self {
        TransformError::UnsupportedConstruct {
            rule,
            span,
            message: message.into(),
        }
    }

    /// The source range of the offending construct, where obtainable.
    pub fn span(&self) -> Option<Span> {
        match self {
            TransformError::UnsupportedConstruct { span, .. } => Some(*span),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
