//! Fatal evaluation errors.
//!
//! Missing data never ends up here: absent variables evaluate to null,
//! unresolved `subject.key` references render as placeholders and failing
//! function calls render as `ERROR: ...` text. These variants are the
//! failures that abort the whole evaluation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A function node without a name, only possible in trees decoded from JSON.
    #[error("function call without a name")]
    MissingFunctionName,

    /// Arithmetic or ordering operator applied to a non-numeric value.
    #[error("operator {op} expects numbers, got {value}")]
    NotANumber { op: &'static str, value: String },

    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    #[error("lambda must produce exactly one value, got {count}")]
    LambdaArity { count: usize },

    #[error("range bounds must be integers, got {value}")]
    InvalidRangeBound { value: String },

    #[error("range step must be positive, got {step}")]
    InvalidStep { step: i64 },

    #[error("no resolver registered under {name:?}")]
    UnknownResolver { name: String },

    #[error("expected a boolean result, got {value}")]
    NotABoolean { value: String },

    /// Recursion limit exceeded (resource exhaustion).
    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },
}

impl EvalError {
    /// Resource exhaustion, as opposed to a fault in the template itself.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, EvalError::StackOverflow { .. })
    }
}
