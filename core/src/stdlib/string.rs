//! String Package
//!
//! Design notes:
//! - `len` counts characters, not bytes, and also measures lists, ranges and maps
//! - `upper`/`lower` use full Unicode case mapping
//! - `concatenate` renders each argument the way templates do

use std::collections::HashMap;

use crate::context::Context;
use crate::dispatch::DispatchError;
use crate::stdlib::{NativeFn, exactly};
use crate::values::Value;

pub(super) fn register(functions: &mut HashMap<&'static str, NativeFn>) {
    functions.insert("upper", string_upper);
    functions.insert("lower", string_lower);
    functions.insert("len", string_len);
    functions.insert("concatenate", string_concatenate);
}

fn string_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str, DispatchError> {
    value.as_str().ok_or_else(|| {
        DispatchError::invalid_argument(
            name,
            format!("expected a string, got {}", value.type_name()),
        )
    })
}

fn string_upper(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    let [value] = exactly::<1>(name, args)?;
    Ok(Value::Str(string_arg(name, value)?.to_uppercase()))
}

fn string_lower(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    let [value] = exactly::<1>(name, args)?;
    Ok(Value::Str(string_arg(name, value)?.to_lowercase()))
}

fn string_len(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    let [value] = exactly::<1>(name, args)?;
    let len = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Range(range) => range.len(),
        Value::Map(map) => map.len(),
        other => {
            return Err(DispatchError::invalid_argument(
                name,
                format!("cannot measure {}", other.type_name()),
            ));
        }
    };
    Ok(Value::Int(len as i64))
}

fn string_concatenate(_: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    Ok(Value::Str(args.iter().map(ToString::to_string).collect()))
}
