//! Conversion of raw host data into a typed [`Context`].
//!
//! Keys are lower-cased at every depth. Strings are read as literals
//! (integers, decimals, booleans, timestamps) unless that is switched off,
//! and anything that does not parse stays a string. Normalization never
//! fails.

use tracing::trace;

use crate::api::ContextOptions;
use crate::context::Context;
use crate::parser;
use crate::values::Value;

/// Normalize raw key/value pairs into a [`Context`].
///
/// Keys that collide once lower-cased keep the value seen last.
pub fn normalize<K, I>(raw: I, options: &ContextOptions) -> Context
where
    K: ToString,
    I: IntoIterator<Item = (K, serde_json::Value)>,
{
    let mut ctx = Context::default();
    for (key, value) in raw {
        ctx.insert(key, normalize_json(value, options));
    }
    ctx
}

fn normalize_json(raw: serde_json::Value, options: &ContextOptions) -> Value {
    use serde_json::Value as Json;
    match raw {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        Json::String(s) => normalize_string(s, options),
        Json::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| normalize_json(item, options))
                .collect(),
        ),
        Json::Object(map) => Value::Map(normalize(map, options)),
    }
}

/// Normalize a host value: strings are read as literals, maps and lists are
/// walked recursively, everything else passes through.
pub fn normalize_value(value: Value, options: &ContextOptions) -> Value {
    match value {
        Value::Str(s) => normalize_string(s, options),
        Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|item| normalize_value(item, options))
                .collect(),
        ),
        Value::Map(ctx) => Value::Map(
            ctx.iter()
                .map(|(key, value)| (key.clone(), normalize_value(value.clone(), options)))
                .collect(),
        ),
        other => other,
    }
}

fn normalize_string(text: String, options: &ContextOptions) -> Value {
    if options.skip_context_evaluation {
        return Value::Str(text);
    }
    if text == "0" {
        return Value::Int(0);
    }
    // Leading zeros: "007" or a postal code is data, not a number.
    if let Some(rest) = text.strip_prefix('0') {
        if rest.chars().all(|c| c.is_ascii_digit()) {
            return Value::Str(text);
        }
    }

    match parser::parse_literal(&text) {
        Ok(literal) => Value::from(literal),
        Err(err) => {
            trace!(input = %text, reason = %err.message(), "Keeping context string as-is");
            Value::Str(text)
        }
    }
}
