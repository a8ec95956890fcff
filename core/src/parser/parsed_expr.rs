use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::parser::BinaryOp;

/// A parsed template: the ordered text and expression segments.
pub type Template = Vec<Expr>;

/// Expression tree produced by the parser and consumed by the evaluator.
///
/// Every node owns its children, so a tree can be shared between threads and
/// evaluated concurrently against different contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Literal template text between expressions.
    Text(String),
    Literal(Literal),
    /// Bare variable reference, e.g. `contact`.
    Atom(String),
    /// Dotted property access, e.g. `contact.name`.
    Attribute { subject: Box<Expr>, key: String },
    /// Bracket access, e.g. `items[0]` or `items[1..3]`.
    Access { subject: Box<Expr>, index: Box<Expr> },
    Function {
        #[serde(default)]
        name: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// Anonymous function. The body is a segment sequence that must produce
    /// exactly one value when invoked.
    Lambda { body: Vec<Expr> },
    /// 1-based positional reference to a lambda argument, e.g. `&1`.
    Capture(usize),
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        #[serde(default)]
        step: Option<Box<Expr>>,
    },
    List(Vec<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn text(text: impl Into<String>) -> Self {
        Expr::Text(text.into())
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Expr::Atom(name.into())
    }

    pub fn literal(literal: impl Into<Literal>) -> Self {
        Expr::Literal(literal.into())
    }

    pub fn attribute(subject: Expr, key: impl Into<String>) -> Self {
        Expr::Attribute {
            subject: Box::new(subject),
            key: key.into(),
        }
    }

    pub fn access(subject: Expr, index: Expr) -> Self {
        Expr::Access {
            subject: Box::new(subject),
            index: Box::new(index),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
        }
    }

    pub fn lambda(body: Expr) -> Self {
        Expr::Lambda { body: vec![body] }
    }

    pub fn range(start: Expr, end: Expr, step: Option<Expr>) -> Self {
        Expr::Range {
            start: Box::new(start),
            end: Box::new(end),
            step: step.map(Box::new),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    DateTime(DateTime<FixedOffset>),
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<DateTime<FixedOffset>> for Literal {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Literal::DateTime(value)
    }
}
