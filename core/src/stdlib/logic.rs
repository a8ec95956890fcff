//! Logic Package
//!
//! Arguments arrive evaluated, so `if` picks between two values rather than
//! two branches. Truthiness follows [`Value::is_truthy`].

use std::collections::HashMap;

use crate::context::Context;
use crate::dispatch::DispatchError;
use crate::stdlib::{NativeFn, exactly};
use crate::values::Value;

pub(super) fn register(functions: &mut HashMap<&'static str, NativeFn>) {
    functions.insert("if", logic_if);
    functions.insert("and", logic_and);
    functions.insert("or", logic_or);
    functions.insert("not", logic_not);
}

fn logic_if(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    let [condition, then, otherwise] = exactly::<3>(name, args)?;
    Ok(if condition.is_truthy() { then } else { otherwise }.clone())
}

fn logic_and(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    if args.is_empty() {
        return Err(DispatchError::arity(name, "at least 1", 0));
    }
    Ok(Value::Bool(args.iter().all(Value::is_truthy)))
}

fn logic_or(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    if args.is_empty() {
        return Err(DispatchError::arity(name, "at least 1", 0));
    }
    Ok(Value::Bool(args.iter().any(Value::is_truthy)))
}

fn logic_not(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    let [value] = exactly::<1>(name, args)?;
    Ok(Value::Bool(!value.is_truthy()))
}
