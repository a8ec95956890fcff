//! Lambda values.
//!
//! A closure owns a snapshot of the context it was created in. Calling it
//! layers the call arguments on top of that snapshot under the captures key,
//! evaluates the body and expects exactly one resulting value.

use core::fmt;
use std::sync::Arc;

use crate::api::EvaluatorOptions;
use crate::context::Context;
use crate::dispatch::FunctionResolver;
use crate::evaluator::{EvalError, Evaluator};
use crate::parser::Expr;
use crate::values::Value;

#[derive(Clone)]
pub struct Closure {
    context: Arc<Context>,
    body: Arc<Vec<Expr>>,
    resolver: Arc<dyn FunctionResolver>,
    options: EvaluatorOptions,
}

impl Closure {
    pub(crate) fn new(
        context: Context,
        body: Vec<Expr>,
        resolver: Arc<dyn FunctionResolver>,
        options: EvaluatorOptions,
    ) -> Self {
        Self {
            context: Arc::new(context),
            body: Arc::new(body),
            resolver,
            options,
        }
    }

    /// Invoke the closure with positional arguments, referenced as `&1`, `&2`, ...
    pub fn call(&self, args: Vec<Value>) -> Result<Value, EvalError> {
        let context = self.context.with_captures(args);
        let mut evaluator = Evaluator::new(&context, &self.resolver, self.options.clone());
        let results = evaluator.eval_sequence(&self.body)?;
        <[Value; 1]>::try_from(results)
            .map(|[value]| value)
            .map_err(|results| EvalError::LambdaArity {
                count: results.len(),
            })
    }

    pub fn body(&self) -> &[Expr] {
        &self.body
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body) && Arc::ptr_eq(&self.context, &other.context)
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
