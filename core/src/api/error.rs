//! Public error types for the Stencil API.
//!
//! Internal errors are converted to these public types at API boundaries.

use core::fmt;

use thiserror::Error as ThisError;

use crate::evaluator::EvalError;
use crate::parser::Span;

/// Public error type for all Stencil operations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The template did not parse.
    ///
    /// Contains one or more diagnostics with source locations and context.
    #[error("Compilation failed with {} error(s)", .diagnostics.len())]
    Compilation {
        diagnostics: Vec<Diagnostic>,
        /// The template text the diagnostics point into.
        template: String,
    },

    /// A fatal evaluation error (e.g. arithmetic on a non-number).
    #[error("Runtime error: {0}")]
    Runtime(EvalError),

    /// Resource limits exceeded (e.g. stack overflow).
    #[error("Resource limit exceeded: {0}")]
    ResourceExceeded(EvalError),

    /// An expression tree handed over as JSON did not decode.
    #[error("Malformed expression tree: {0}")]
    MalformedAst(String),
}

impl Error {
    /// The evaluation error behind this error, if any.
    pub fn eval_error(&self) -> Option<&EvalError> {
        match self {
            Error::Runtime(err) | Error::ResourceExceeded(err) => Some(err),
            _ => None,
        }
    }
}

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "P001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - compilation cannot succeed.
    Error,
    /// Warning - suspicious code that might be wrong.
    Warning,
    /// Info - informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<crate::parser::ParseError> for Error {
    fn from(err: crate::parser::ParseError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            template: err.input,
        }
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        if err.is_resource_exceeded() {
            Error::ResourceExceeded(err)
        } else {
            Error::Runtime(err)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedAst(err.to_string())
    }
}
