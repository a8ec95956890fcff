//! Core evaluation logic.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    api::EvaluatorOptions,
    context::{Context, DEFAULT_VALUE_KEY},
    dispatch::{DispatchError, FunctionResolver},
    evaluator::{EvalError, operators},
    parser::{BinaryOp, Expr},
    values::{Closure, Range, Value},
};

/// Tree-walking evaluator over one context and one resolver.
pub struct Evaluator<'a> {
    options: EvaluatorOptions,
    context: &'a Context,
    resolver: &'a Arc<dyn FunctionResolver>,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        context: &'a Context,
        resolver: &'a Arc<dyn FunctionResolver>,
        options: EvaluatorOptions,
    ) -> Self {
        Self {
            options,
            context,
            resolver,
            depth: 0,
        }
    }

    /// Evaluate a top-level segment sequence, one value per segment.
    ///
    /// Maps carrying a `__value__` entry are replaced by that value.
    pub fn eval_sequence(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, EvalError> {
        exprs
            .iter()
            .map(|expr| self.eval(expr).map(unwrap_default))
            .collect()
    }

    /// Evaluate an expression node.
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(EvalError::StackOverflow {
                depth: self.depth,
                max_depth: self.options.max_depth,
            });
        }

        self.depth += 1;
        let result = self.eval_inner(expr);
        self.depth -= 1;

        result
    }

    fn eval_inner(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Text(text) => Ok(Value::Str(text.clone())),

            Expr::Literal(literal) => Ok(Value::from(literal.clone())),

            Expr::Atom(name) => Ok(self.context.get(name).cloned().unwrap_or_default()),

            Expr::Attribute { subject, key } => match subject.as_ref() {
                // `@contact.name` renders itself when either hop is missing.
                Expr::Atom(name) => Ok(match self.context.get(name) {
                    Some(Value::Map(inner)) => match inner.get(key) {
                        Some(value) if !value.is_null() => value.clone(),
                        _ => Value::Str(format!("@{name}.{key}")),
                    },
                    _ => Value::Str(format!("@{name}.{key}")),
                }),
                computed => {
                    let subject = self.eval(computed)?;
                    Ok(lookup_key(&subject, key))
                }
            },

            Expr::Access { subject, index } => {
                let subject = self.eval(subject)?;
                let index = self.eval(index)?;
                Ok(access(&subject, &index))
            }

            Expr::Function { name, args } => self.eval_call(name, args),

            Expr::Lambda { body } => Ok(Value::Closure(Closure::new(
                self.context.clone(),
                body.clone(),
                Arc::clone(self.resolver),
                self.options.clone(),
            ))),

            Expr::Capture(index) => Ok(self.context.capture(*index)),

            Expr::Range { start, end, step } => {
                let start = self.eval_bound(start)?;
                let end = self.eval_bound(end)?;
                let step = match step {
                    Some(step) => self.eval_bound(step)?,
                    None => 1,
                };
                if step <= 0 {
                    return Err(EvalError::InvalidStep { step });
                }
                Ok(Value::Range(Range::new(start, end, step)))
            }

            Expr::List(items) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| self.eval(item))
                    .collect::<Result<_, _>>()?,
            )),

            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                match op {
                    BinaryOp::Eq => Ok(Value::Bool(operators::loose_eq(&left, &right))),
                    BinaryOp::Neq => Ok(Value::Bool(!operators::loose_eq(&left, &right))),
                    BinaryOp::Pow => operators::eval_pow(&left, &right),
                    BinaryOp::Concat => Ok(Value::Str(format!("{left}{right}"))),
                    op => operators::eval_numeric(*op, &left, &right),
                }
            }
        }
    }

    fn eval_call(&mut self, name: &str, args: &[Expr]) -> Result<Value, EvalError> {
        if name.is_empty() {
            return Err(EvalError::MissingFunctionName);
        }

        let args = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;

        trace!(function = name, args = args.len(), "Dispatching function call");
        match self.resolver.call(name, &args, self.context) {
            Ok(value) => Ok(value),
            Err(DispatchError::Eval(err)) => Err(err),
            Err(reason) => {
                debug!(function = name, %reason, "Function call failed, rendering inline");
                Ok(Value::Str(format!("ERROR: {reason}")))
            }
        }
    }

    fn eval_bound(&mut self, expr: &Expr) -> Result<i64, EvalError> {
        match self.eval(expr)? {
            Value::Int(n) => Ok(n),
            other => Err(EvalError::InvalidRangeBound {
                value: other.repr(),
            }),
        }
    }
}

fn unwrap_default(value: Value) -> Value {
    match value {
        Value::Map(ctx) => match ctx.get(DEFAULT_VALUE_KEY) {
            Some(inner) => inner.clone(),
            None => Value::Map(ctx),
        },
        other => other,
    }
}

fn lookup_key(subject: &Value, key: &str) -> Value {
    match subject {
        Value::Map(ctx) => ctx.get(key).cloned().unwrap_or_default(),
        _ => Value::Null,
    }
}

/// Bracket access. Numbers index positionally (negative from the end),
/// ranges slice inclusively and anything else is a map key. Combinations
/// that make no sense yield null.
fn access(subject: &Value, index: &Value) -> Value {
    match (subject, index) {
        (Value::List(items), Value::Int(i)) => {
            position(items.len(), *i).map_or(Value::Null, |i| items[i].clone())
        }
        (Value::Range(range), Value::Int(i)) => range.get(*i).map_or(Value::Null, Value::Int),
        (Value::List(items), Value::Range(range)) => Value::List(
            slice(items.len(), range)
                .map(|i| items[i].clone())
                .collect(),
        ),
        (Value::Str(text), Value::Range(range)) => {
            let chars: Vec<char> = text.chars().collect();
            Value::Str(slice(chars.len(), range).map(|i| chars[i]).collect())
        }
        (Value::Map(ctx), Value::Str(key)) => ctx.get(key).cloned().unwrap_or_default(),
        (Value::Map(ctx), Value::Int(n)) => ctx.get(&n.to_string()).cloned().unwrap_or_default(),
        _ => Value::Null,
    }
}

fn position(len: usize, index: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { len + index } else { index };
    (0..len).contains(&index).then_some(index as usize)
}

/// Indices selected by an inclusive slice; negative bounds count from the end.
fn slice(len: usize, range: &Range) -> impl Iterator<Item = usize> + use<> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolve = |i: i64| if i < 0 { len + i } else { i };
    let start = resolve(range.start).max(0);
    let end = resolve(range.end).min(len - 1);
    let step = usize::try_from(range.step).unwrap_or(1).max(1);
    (start..=end).step_by(step).map(|i| i as usize)
}

/// Join the rendered values into one string.
pub fn stringify(values: &[Value]) -> String {
    values.iter().map(ToString::to_string).collect()
}
