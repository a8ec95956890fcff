//! Tree-walking evaluator for Stencil templates.
//!
//! The evaluator walks parsed expressions (`Expr`) against a normalized
//! `Context` and produces runtime values (`Value`). Function calls are
//! handed to a `FunctionResolver`.
//!
//! ## Design Principles
//!
//! - **Missing data is soft**: absent variables are null, unresolved
//!   `subject.key` references render as `@subject.key`, failed calls render
//!   as `ERROR: <reason>`
//! - **Type contract violations are fatal**: non-numeric arithmetic, bad
//!   lambda results and malformed trees abort with an `EvalError`
//! - **Stack-safe**: depth tracking prevents stack overflow from deeply nested expressions
//!
//! Evaluation never mutates the tree or the context, so both can be shared
//! between threads. There is no timeout: ranges and lists are as large as the
//! template asks for, so hosts running untrusted templates should bound
//! evaluation time themselves.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use stencil_core::{api::ContextOptions, context::Context, dispatch::FunctionResolver};
//! use stencil_core::{evaluator, parser, stdlib::StandardLibrary, values::Value};
//!
//! let template = parser::parse("Hello @upper(name)!").unwrap();
//! let context = Context::new(serde_json::json!({"Name": "ada"}), &ContextOptions::default());
//! let resolver: Arc<dyn FunctionResolver> = Arc::new(StandardLibrary);
//!
//! let values = evaluator::eval_sequence(&template, &context, &resolver).unwrap();
//! assert_eq!(evaluator::stringify(&values), "Hello ADA!");
//! ```

mod error;
mod eval;
mod operators;


pub use error::EvalError;
pub use eval::{Evaluator, stringify};

use std::sync::Arc;

use crate::{
    api::EvaluatorOptions, context::Context, dispatch::FunctionResolver, parser::Expr,
    values::Value,
};

/// Evaluate a single expression with default limits.
///
/// Uses default stack depth limit of 1000.
pub fn eval(
    expr: &Expr,
    context: &Context,
    resolver: &Arc<dyn FunctionResolver>,
) -> Result<Value, EvalError> {
    Evaluator::new(context, resolver, EvaluatorOptions::default()).eval(expr)
}

/// Evaluate a template segment sequence with default limits.
pub fn eval_sequence(
    exprs: &[Expr],
    context: &Context,
    resolver: &Arc<dyn FunctionResolver>,
) -> Result<Vec<Value>, EvalError> {
    eval_sequence_with_options(exprs, context, resolver, EvaluatorOptions::default())
}

/// Evaluate a single expression with custom limits.
///
/// ## Example
///
/// ```ignore
/// // Allow deeper recursion for specific use case
/// let options = EvaluatorOptions { max_depth: 5000 };
/// let result = eval_with_options(&expr, &context, &resolver, options)?;
/// ```
pub fn eval_with_options(
    expr: &Expr,
    context: &Context,
    resolver: &Arc<dyn FunctionResolver>,
    options: EvaluatorOptions,
) -> Result<Value, EvalError> {
    Evaluator::new(context, resolver, options).eval(expr)
}

pub fn eval_sequence_with_options(
    exprs: &[Expr],
    context: &Context,
    resolver: &Arc<dyn FunctionResolver>,
    options: EvaluatorOptions,
) -> Result<Vec<Value>, EvalError> {
    Evaluator::new(context, resolver, options).eval_sequence(exprs)
}
