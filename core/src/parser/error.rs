use core::fmt;

use miette::{LabeledSpan, SourceCode};

use crate::api::{Diagnostic, Severity};
use crate::parser::{Rule, Span};

/// Parser error with the offending source and location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub input: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Text matched a literal rule but does not denote a valid value,
    /// e.g. an integer that overflows or a timestamp on February 30th.
    InvalidLiteral { kind: &'static str, text: String },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, input: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            input: input.into(),
            span,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("Expected {}, found {}", expected, found)
            }
            ParseErrorKind::InvalidLiteral { kind, text } => {
                format!("Invalid {} literal '{}'", kind, text)
            }
            ParseErrorKind::Other { message } => message.clone(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::UnexpectedToken { .. } => "P001",
            ParseErrorKind::InvalidLiteral { .. } => "P002",
            ParseErrorKind::Other { .. } => "P999",
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        match self.kind {
            ParseErrorKind::UnexpectedToken { .. } => {
                Some("Write a literal `@` as `@@` to keep it out of expressions")
            }
            ParseErrorKind::InvalidLiteral { .. } => Some("Check the literal format"),
            ParseErrorKind::Other { .. } => None,
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            message: self.message(),
            span: self.span.clone(),
            help: self.help().map(str::to_string),
            code: Some(self.code().to_string()),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", Severity::Error, self.message(), self.code())
    }
}

impl std::error::Error for ParseError {}

impl miette::Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(ParseError::code(self)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        ParseError::help(self).map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.input)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.message()), self.span.0.clone());
        Some(Box::new(core::iter::once(label)))
    }
}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: describe_found(&negatives, source, span.0.start),
        },
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, source, span)
}

fn concept_of(rule: Rule) -> &'static str {
    match rule {
        Rule::integer | Rule::decimal | Rule::boolean | Rule::string | Rule::datetime => {
            "literal"
        }
        Rule::atom | Rule::function_name | Rule::attribute_key => "identifier",
        Rule::capture_index => "capture index",
        Rule::eq
        | Rule::neq
        | Rule::ge
        | Rule::le
        | Rule::gt
        | Rule::lt
        | Rule::add
        | Rule::sub
        | Rule::mul
        | Rule::div
        | Rule::pow
        | Rule::concat => "operator",
        Rule::EOI => "end of input",
        _ => "expression",
    }
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts: Vec<&str> = Vec::new();
    for rule in rules {
        let concept = concept_of(*rule);
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((only, [])) => only.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Describe what the parser stumbled upon.
fn describe_found(negatives: &[Rule], source: &str, pos: usize) -> String {
    if let Some(rule) = negatives.first() {
        return concept_of(*rule).to_string();
    }
    match source.get(pos..).and_then(|rest| rest.chars().next()) {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}
