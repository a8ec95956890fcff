//! List Package

use std::collections::HashMap;

use crate::context::Context;
use crate::dispatch::DispatchError;
use crate::stdlib::{NativeFn, exactly};
use crate::values::Value;

pub(super) fn register(functions: &mut HashMap<&'static str, NativeFn>) {
    functions.insert("map", list_map);
}

/// `map(collection, &(...))` calls the lambda once per element with the
/// element as `&1`. Fatal errors raised by the lambda abort evaluation.
fn list_map(name: &str, args: &[Value], _: &Context) -> Result<Value, DispatchError> {
    let [collection, function] = exactly::<2>(name, args)?;
    let Value::Closure(function) = function else {
        return Err(DispatchError::invalid_argument(
            name,
            format!("expected a function, got {}", function.type_name()),
        ));
    };

    let items: Vec<Value> = match collection {
        Value::List(items) => items.clone(),
        Value::Range(range) => range.iter().map(Value::Int).collect(),
        other => {
            return Err(DispatchError::invalid_argument(
                name,
                format!("cannot iterate over {}", other.type_name()),
            ));
        }
    };

    let mapped = items
        .into_iter()
        .map(|item| function.call(vec![item]))
        .collect::<Result<_, _>>()?;
    Ok(Value::List(mapped))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dispatch::FunctionResolver;
    use crate::evaluator::{self, EvalError};
    use crate::parser;
    use crate::stdlib::StandardLibrary;

    fn run(source: &str) -> Result<Value, EvalError> {
        let resolver: Arc<dyn FunctionResolver> = Arc::new(StandardLibrary);
        let expr = parser::parse_expression(source).unwrap();
        evaluator::eval(&expr, &Context::default(), &resolver)
    }

    #[test]
    fn test_map_over_range() {
        assert_eq!(
            run("map(1..3, &(&1 * 10))").unwrap(),
            Value::List(vec![Value::Int(10), Value::Int(20), Value::Int(30)])
        );
    }

    #[test]
    fn test_map_over_list() {
        assert_eq!(
            run("map([\"a\", \"b\"], \"upper\")").unwrap(),
            Value::str("ERROR: map: expected a function, got string")
        );
        assert_eq!(
            run("map([\"a\", \"b\"], &(upper(&1)))").unwrap(),
            Value::List(vec![Value::str("A"), Value::str("B")])
        );
    }

    #[test]
    fn test_map_requires_collection() {
        assert_eq!(
            run("map(1, &(&1))").unwrap(),
            Value::str("ERROR: map: cannot iterate over integer")
        );
    }

    #[test]
    fn test_fatal_error_in_lambda_aborts() {
        assert!(matches!(
            run("map([1, \"x\"], &(&1 + 1))"),
            Err(EvalError::NotANumber { .. })
        ));
    }
}
