mod parsed_expr;
pub mod parser;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::TemplateParser;
pub use parser::Rule;
pub use parser::{parse, parse_expression, parse_literal};

pub use parsed_expr::{Expr, Literal, Template};
pub use syntax::{BinaryOp, Span};
pub use error::{ParseError, ParseErrorKind};

/// Decode a template tree from its JSON interchange form.
///
/// This is how hosts hand over trees built by another producer.
pub fn from_json(json: &str) -> Result<Template, serde_json::Error> {
    serde_json::from_str(json)
}


#[cfg(test)]
mod precedence_test;
