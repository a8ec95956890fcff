//! Typed evaluation context.
//!
//! A [`Context`] maps lower-case keys to [`Value`]s at every nesting depth.
//! It is built once per evaluation from host data (see [`normalize`]) and is
//! never mutated while an expression is being evaluated.

mod normalize;


use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::api::ContextOptions;
use crate::values::Value;

pub use normalize::{normalize, normalize_value};

/// Lambda arguments of the current invocation.
pub const CAPTURES_KEY: &str = "__captures";
/// Names a registered resolver to use instead of the default one.
pub const RESOLVER_KEY: &str = "__resolver__";
/// Marks a map as a wrapper around a default value.
pub const DEFAULT_VALUE_KEY: &str = "__value__";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: BTreeMap<String, Value>,
}

impl Context {
    /// Build a context from a raw JSON object.
    ///
    /// A root that is not an object yields an empty context.
    pub fn new(raw: serde_json::Value, options: &ContextOptions) -> Self {
        match raw {
            serde_json::Value::Object(map) => normalize(map, options),
            serde_json::Value::Null => Context::default(),
            other => {
                tracing::warn!(kind = json_kind(&other), "Context root is not an object");
                Context::default()
            }
        }
    }

    /// Build a context from raw pairs whose keys only need a string form.
    pub fn from_raw<K, I>(pairs: I, options: &ContextOptions) -> Self
    where
        K: ToString,
        I: IntoIterator<Item = (K, serde_json::Value)>,
    {
        normalize(pairs, options)
    }

    /// Build a context from host values, normalizing them like raw input.
    pub fn from_values<K, I>(pairs: I, options: &ContextOptions) -> Self
    where
        K: ToString,
        I: IntoIterator<Item = (K, Value)>,
    {
        pairs.into_iter().fold(Context::default(), |mut ctx, (key, value)| {
            ctx.insert(key, normalize_value(value, options));
            ctx
        })
    }

    /// Looks up `key` as written, then lower-cased.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .get(key)
            .or_else(|| self.entries.get(&key.to_lowercase()))
    }

    /// Insert under the lower-cased form of `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl ToString, value: Value) -> Option<Value> {
        self.entries.insert(key.to_string().to_lowercase(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Derived context carrying `args` as the lambda captures.
    pub fn with_captures(&self, args: Vec<Value>) -> Context {
        let mut derived = self.clone();
        derived.insert(CAPTURES_KEY, Value::List(args));
        derived
    }

    /// 1-based capture lookup; anything out of range is null.
    pub fn capture(&self, index: usize) -> Value {
        match (self.get(CAPTURES_KEY), index.checked_sub(1)) {
            (Some(Value::List(args)), Some(i)) => args.get(i).cloned().unwrap_or_default(),
            _ => Value::Null,
        }
    }

    /// The resolver override requested by the host, if any.
    pub fn resolver_name(&self) -> Option<&str> {
        self.get(RESOLVER_KEY).and_then(Value::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert back to a plain JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: ToString> FromIterator<(K, Value)> for Context {
    /// Collects already-typed values; only the keys are normalized.
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut ctx = Context::default();
        for (key, value) in iter {
            ctx.insert(key, value);
        }
        ctx
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
