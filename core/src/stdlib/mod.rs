//! Stencil Standard Library
//!
//! The default [`FunctionResolver`]. Functions are grouped by package:
//! - Logic: `if`, `and`, `or`, `not`
//! - String: `upper`, `lower`, `len`, `concatenate`
//! - List: `map`
//!
//! Names are matched case-insensitively, so `@UPPER(x)` and `@upper(x)` are
//! the same call.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::context::Context;
use crate::dispatch::{DispatchError, FunctionResolver};
use crate::values::Value;

pub mod list;
pub mod logic;
pub mod string;

/// Signature shared by all built-in functions. The first argument is the
/// name the function was called by, for error messages.
pub type NativeFn = fn(&str, &[Value], &Context) -> Result<Value, DispatchError>;

lazy_static! {
    static ref FUNCTIONS: HashMap<&'static str, NativeFn> = {
        let mut functions: HashMap<&'static str, NativeFn> = HashMap::new();
        logic::register(&mut functions);
        string::register(&mut functions);
        list::register(&mut functions);
        functions
    };
}

/// The built-in function library.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLibrary;

impl StandardLibrary {
    /// Names of all built-in functions, sorted.
    pub fn function_names() -> Vec<&'static str> {
        let mut names: Vec<_> = FUNCTIONS.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl FunctionResolver for StandardLibrary {
    fn call(&self, name: &str, args: &[Value], context: &Context) -> Result<Value, DispatchError> {
        let function = FUNCTIONS
            .get(name.to_lowercase().as_str())
            .ok_or_else(|| DispatchError::UnknownFunction(name.to_string()))?;
        function(name, args, context)
    }
}

/// Fails with an arity error unless exactly `N` arguments were passed.
pub(crate) fn exactly<'a, const N: usize>(
    name: &str,
    args: &'a [Value],
) -> Result<&'a [Value; N], DispatchError> {
    args.try_into()
        .map_err(|_| DispatchError::arity(name, N, args.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(name: &str, args: &[Value]) -> Result<Value, DispatchError> {
        StandardLibrary.call(name, args, &Context::default())
    }

    #[test]
    fn test_function_names() {
        assert_eq!(
            StandardLibrary::function_names(),
            vec!["and", "concatenate", "if", "len", "lower", "map", "not", "or", "upper"]
        );
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(call("UPPER", &[Value::str("a")]).unwrap(), Value::str("A"));
        assert_eq!(call("Len", &[Value::str("abc")]).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            call("nope", &[]),
            Err(DispatchError::UnknownFunction("nope".to_string()))
        );
    }

    #[test]
    fn test_arity_error_message() {
        let err = call("upper", &[]).unwrap_err();
        assert_eq!(err.to_string(), "upper expects 1 argument(s), got 0");
    }
}
