//! Binary operator implementations.

use core::cmp::Ordering;

use rust_decimal::Decimal;

use crate::evaluator::EvalError;
use crate::parser::BinaryOp;
use crate::values::Value;

/// Evaluate `+`, `-`, `*`, `/` and the ordering comparisons.
///
/// Both operands must be numeric. Integers use wrapping arithmetic, decimals
/// checked arithmetic, and a float on either side makes the result a float.
/// `/` always produces a float and follows IEEE 754 (division by zero is inf).
pub(super) fn eval_numeric(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    for operand in [left, right] {
        if !operand.is_numeric() {
            return Err(EvalError::NotANumber {
                op: op.symbol(),
                value: operand.repr(),
            });
        }
    }

    match op {
        BinaryOp::Gt => Ok(Value::Bool(compare(left, right) == Some(Ordering::Greater))),
        BinaryOp::Ge => Ok(Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ))),
        BinaryOp::Lt => Ok(Value::Bool(compare(left, right) == Some(Ordering::Less))),
        BinaryOp::Le => Ok(Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ))),
        BinaryOp::Div => Ok(Value::Float(eval_binary_float(op, float(left), float(right)))),
        _ => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(eval_binary_int(op, *a, *b))),
            (Value::Float(_), _) | (_, Value::Float(_)) => {
                Ok(Value::Float(eval_binary_float(op, float(left), float(right))))
            }
            _ => eval_binary_decimal(op, decimal(left), decimal(right)).map(Value::Decimal),
        },
    }
}

/// `^` converts both sides to floats; anything that has no float form fails.
pub(super) fn eval_pow(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left.as_f64(), right.as_f64()) {
        (Some(base), Some(exp)) => Ok(Value::Float(eval_binary_float(BinaryOp::Pow, base, exp))),
        _ => Err(EvalError::Arithmetic(format!(
            "cannot raise {} to the power of {}",
            left.repr(),
            right.repr()
        ))),
    }
}

/// Equality across types. Numbers compare by value regardless of their
/// representation; lists and maps compare element-wise.
pub(super) fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (a, b) if a.is_numeric() && b.is_numeric() => compare(a, b) == Some(Ordering::Equal),
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| loose_eq(x, y)))
        }
        (a, b) => a == b,
    }
}

/// Wrapping arithmetic on two integers. Never called with `/`.
fn eval_binary_int(op: BinaryOp, left: i64, right: i64) -> i64 {
    match op {
        BinaryOp::Add => left.wrapping_add(right),
        BinaryOp::Sub => left.wrapping_sub(right),
        BinaryOp::Mul => left.wrapping_mul(right),
        _ => unreachable!("non-arithmetic operator {op} on integers"),
    }
}

/// Follows IEEE 754 semantics (produces inf/nan rather than panicking).
fn eval_binary_float(op: BinaryOp, left: f64, right: f64) -> f64 {
    match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
        BinaryOp::Pow => left.powf(right),
        _ => unreachable!("non-arithmetic operator {op} on floats"),
    }
}

fn eval_binary_decimal(op: BinaryOp, left: Decimal, right: Decimal) -> Result<Decimal, EvalError> {
    let result = match op {
        BinaryOp::Add => left.checked_add(right),
        BinaryOp::Sub => left.checked_sub(right),
        BinaryOp::Mul => left.checked_mul(right),
        _ => unreachable!("non-arithmetic operator {op} on decimals"),
    };
    result.ok_or_else(|| EvalError::Arithmetic(format!("decimal overflow in {left} {op} {right}")))
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(_), _) | (_, Value::Float(_)) => float(left).partial_cmp(&float(right)),
        _ => Some(decimal(left).cmp(&decimal(right))),
    }
}

fn float(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::Int(n) => Decimal::from(*n),
        Value::Decimal(d) => *d,
        Value::Float(f) => Decimal::try_from(*f).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}
