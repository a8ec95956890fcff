//! Function dispatch.
//!
//! Every `name(args)` call in a template is handed to a [`FunctionResolver`]
//! together with the already-evaluated arguments. A resolver error does not
//! abort evaluation: the evaluator renders it in place of the call as
//! `ERROR: <reason>`. The one exception is [`DispatchError::Eval`], which
//! carries a fatal evaluation error (for instance from a closure the
//! resolver invoked) and is propagated unchanged.

use thiserror::Error;

use crate::context::Context;
use crate::evaluator::EvalError;
use crate::values::Value;

/// Resolves function calls made from templates.
///
/// Resolvers are shared between evaluations and threads. Any side effects
/// they perform are their own business.
pub trait FunctionResolver: Send + Sync {
    fn call(&self, name: &str, args: &[Value], context: &Context) -> Result<Value, DispatchError>;
}

impl<F> FunctionResolver for F
where
    F: Fn(&str, &[Value], &Context) -> Result<Value, DispatchError> + Send + Sync,
{
    fn call(&self, name: &str, args: &[Value], context: &Context) -> Result<Value, DispatchError> {
        self(name, args, context)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("unknown function {0:?}")]
    UnknownFunction(String),

    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("{name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl DispatchError {
    pub fn arity(name: &str, expected: impl ToString, got: usize) -> Self {
        DispatchError::Arity {
            name: name.to_string(),
            expected: expected.to_string(),
            got,
        }
    }

    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        DispatchError::InvalidArgument {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
