use core::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::context::{Context, DEFAULT_VALUE_KEY};
use crate::parser::Literal;
use crate::values::Closure;

/// Runtime value produced by evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent marker. Renders as an empty string.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Str(String),
    DateTime(DateTime<FixedOffset>),
    Range(Range),
    List(Vec<Value>),
    Map(Context),
    Closure(Closure),
}

/// Inclusive integer range with a positive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

impl Range {
    pub fn new(start: i64, end: i64, step: i64) -> Self {
        Self { start, end, step }
    }

    /// Walks from `start` towards `end`, counting down when `end < start`.
    pub fn iter(&self) -> impl Iterator<Item = i64> + use<> {
        let Range { start, end, step } = *self;
        let step = step.max(1);
        let descending = end < start;
        let mut next = Some(start);
        core::iter::from_fn(move || {
            let current = next?;
            next = if descending {
                current.checked_sub(step).filter(|n| *n >= end)
            } else {
                current.checked_add(step).filter(|n| *n <= end)
            };
            Some(current)
        })
    }

    /// Number of elements, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        usize::try_from(self.count()).unwrap_or(usize::MAX)
    }

    /// Always false: a range holds at least its start.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Element at `index`. Negative indices count back from the last element.
    pub fn get(&self, index: i64) -> Option<i64> {
        let count = self.count();
        let index = i128::from(index);
        let index = if index < 0 { count + index } else { index };
        if !(0..count).contains(&index) {
            return None;
        }
        let offset = index * i128::from(self.step.max(1));
        let value = if self.end < self.start {
            i128::from(self.start) - offset
        } else {
            i128::from(self.start) + offset
        };
        i64::try_from(value).ok()
    }

    // At most 2^64, which always fits.
    fn count(&self) -> i128 {
        let span = self.start.abs_diff(self.end);
        i128::from(span / self.step.max(1).unsigned_abs()) + 1
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)?;
        if self.step != 1 {
            write!(f, "//{}", self.step)?;
        }
        Ok(())
    }
}

impl Value {
    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Decimal(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Range(_) => "range",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Closure(_) => "function",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Quoted rendering used in diagnostics, e.g. `"abc"` rather than `abc`.
    pub fn repr(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Str(s) => format!("{:?}", s),
            Value::DateTime(dt) => format!("{:?}", rfc3339(dt)),
            other => other.to_string(),
        }
    }

    /// Plain JSON form. Timestamps become RFC 3339 strings and decimals keep
    /// their digits as strings; closures have no JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null | Value::Closure(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) => Json::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Decimal(d) => Json::String(d.to_string()),
            Value::Str(s) => Json::String(s.clone()),
            Value::DateTime(dt) => Json::String(rfc3339(dt)),
            Value::Range(r) => Json::String(r.to_string()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(ctx) => ctx.to_json(),
        }
    }
}

fn rfc3339(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Str(s) => f.write_str(s),
            Value::DateTime(dt) => f.write_str(&rfc3339(dt)),
            Value::Range(r) => write!(f, "{}", r),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.repr())?;
                }
                f.write_str("]")
            }
            Value::Map(ctx) => {
                if let Some(value) = ctx.get(DEFAULT_VALUE_KEY) {
                    return write!(f, "{}", value);
                }
                f.write_str("{")?;
                for (i, (key, value)) in ctx.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, value.repr())?;
                }
                f.write_str("}")
            }
            Value::Closure(_) => f.write_str("<lambda>"),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Int(n) => Value::Int(n),
            Literal::Float(f) => Value::Float(f),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Str(s) => Value::Str(s),
            Literal::DateTime(dt) => Value::DateTime(dt),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    f64 => Float,
    Decimal => Decimal,
    String => Str,
    &str => Str,
    DateTime<FixedOffset> => DateTime,
    Range => Range,
    Vec<Value> => List,
    Context => Map,
    Closure => Closure,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
