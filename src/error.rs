//! Error types and exit-code constants for the downlevel CLI.
//!
//! `DlvError` is the unified error type every subsystem error converges to
//! before reaching the user. Each variant maps to a stable exit code:
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Input errors (missing file, malformed tree JSON)
//! - `4`: Rewrite failures (a rule or cursor invariant violation)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use downlevel_transform::cursor::CursorError;
use downlevel_transform::{RegistryError, TransformError};
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Stable exit codes for CLI failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// Input errors (file not found, malformed tree).
    InputError = 3,
    /// Rewrite failed (rule error, cursor invariant violation).
    RewriteError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum DlvError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The tree JSON did not parse as an ESTree node.
    #[error("malformed syntax tree: {0}")]
    Tree(#[from] serde_json::Error),

    /// A requested rule set does not exist.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The rewrite itself failed.
    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl DlvError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        DlvError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Wrap an I/O failure with the path it occurred on.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        DlvError::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the exit code for this error.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

impl From<&DlvError> for ErrorCode {
    fn from(err: &DlvError) -> Self {
        match err {
            DlvError::InvalidArguments { .. } => ErrorCode::InvalidArguments,
            DlvError::Io { .. } => ErrorCode::InputError,
            DlvError::Tree(_) => ErrorCode::InputError,
            DlvError::Registry(_) => ErrorCode::InvalidArguments,
            DlvError::Transform(TransformError::Cursor(CursorError::Incomplete { .. })) => {
                ErrorCode::InternalError
            }
            DlvError::Transform(_) => ErrorCode::RewriteError,
        }
    }
}

impl From<DlvError> for ErrorCode {
    fn from(err: DlvError) -> Self {
        ErrorCode::from(&err)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use downlevel_core::Span;

    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn invalid_arguments_maps_to_2() {
            let err = DlvError::invalid_args("missing tree");
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn io_and_tree_errors_map_to_3() {
            let io = DlvError::io(
                "missing.js",
                std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            );
            assert_eq!(io.error_code().code(), 3);

            let bad_json: serde_json::Error =
                serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            assert_eq!(DlvError::Tree(bad_json).error_code().code(), 3);
        }

        #[test]
        fn unknown_rule_set_maps_to_2() {
            let err = DlvError::Registry(RegistryError::UnknownRuleSet {
                name: "nope".to_string(),
            });
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn rule_failures_map_to_4() {
            let err = DlvError::Transform(TransformError::unsupported(
                "test.rule",
                Span::new(0, 1),
                "unsupported",
            ));
            assert_eq!(err.error_code().code(), 4);

            let backwards =
                DlvError::Transform(TransformError::Cursor(CursorError::Backwards {
                    at: 5,
                    target: 2,
                }));
            assert_eq!(backwards.error_code().code(), 4);
        }

        #[test]
        fn incomplete_consumption_is_internal() {
            let err = DlvError::Transform(TransformError::Cursor(CursorError::Incomplete {
                at: 3,
                len: 9,
            }));
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn invalid_arguments_display() {
            let err = DlvError::invalid_args("missing tree");
            assert_eq!(err.to_string(), "invalid arguments: missing tree");
        }

        #[test]
        fn transform_errors_pass_through() {
            let err = DlvError::Transform(TransformError::unsupported(
                "rest-params.function",
                Span::new(10, 17),
                "rest parameter must be a plain identifier",
            ));
            assert!(err.to_string().contains("rest-params.function"));
            assert!(err.to_string().contains("[10, 17)"));
        }
    }

    mod exit_codes {
        use super::*;

        #[test]
        fn code_values_are_stable() {
            assert_eq!(ErrorCode::InvalidArguments.code(), 2);
            assert_eq!(ErrorCode::InputError.code(), 3);
            assert_eq!(ErrorCode::RewriteError.code(), 4);
            assert_eq!(ErrorCode::InternalError.code(), 10);
        }

        #[test]
        fn display_shows_code() {
            assert_eq!(format!("{}", ErrorCode::InputError), "3");
            assert_eq!(format!("{}", ErrorCode::InternalError), "10");
        }
    }
}
