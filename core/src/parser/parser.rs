use chrono::{DateTime, FixedOffset, NaiveDateTime};
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::parser::error::{ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::{BinaryOp, Expr, Literal, Span, Template};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::neq, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left)
        )                                               // comparisons
        .op(Op::infix(Rule::concat, Assoc::Left))        // `&`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                               // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left)
        )                                               // `*`, `/`
        .op(Op::infix(Rule::pow, Assoc::Right))          // `^` (right-assoc)
        .op(
            Op::postfix(Rule::attribute_op) |
            Op::postfix(Rule::index_op)
        )                                               // `.key`, `[index]`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/template.pest"]
pub struct TemplateParser;

type ParseResult<T> = Result<T, ParseError>;

/// Parse a template (text interleaved with `@` expressions).
pub fn parse(source: &str) -> ParseResult<Template> {
    let mut pairs = TemplateParser::parse(Rule::template, source)
        .map_err(|e| convert_pest_error(e, source))?;
    let template = next_pair(&mut pairs, source, Span(0..source.len()))?;

    let mut segments: Template = Vec::new();
    for pair in template.into_inner() {
        let segment = match pair.as_rule() {
            Rule::EOI => continue,
            Rule::text => Expr::text(pair.as_str()),
            Rule::escaped_at => Expr::text("@"),
            Rule::expression_block => {
                let span = Span::from(pair.as_span());
                let mut inner = pair.into_inner();
                parse_expr(next_pair(&mut inner, source, span)?, source)?
            }
            Rule::bare_expression => parse_bare_expression(pair, source)?,
            rule => return Err(unexpected_rule(rule, &pair, source)),
        };
        push_segment(&mut segments, segment);
    }
    Ok(segments)
}

/// Parse a single expression written without the leading `@`, e.g. `age >= 18`.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    let mut pairs = TemplateParser::parse(Rule::expression_input, source)
        .map_err(|e| convert_pest_error(e, source))?;
    let input = next_pair(&mut pairs, source, Span(0..source.len()))?;
    let mut inner = input.into_inner();
    parse_expr(next_pair(&mut inner, source, Span(0..source.len()))?, source)
}

/// Parse the whole input as a scalar literal: integer, decimal, boolean or timestamp.
///
/// String literals are not recognised here; this is the rule context
/// normalization uses to decide whether raw text denotes a typed value.
pub fn parse_literal(source: &str) -> ParseResult<Literal> {
    let mut pairs = TemplateParser::parse(Rule::literal_input, source)
        .map_err(|e| convert_pest_error(e, source))?;
    let input = next_pair(&mut pairs, source, Span(0..source.len()))?;
    let mut inner = input.into_inner();
    match parse_expr(next_pair(&mut inner, source, Span(0..source.len()))?, source)? {
        Expr::Literal(literal) => Ok(literal),
        other => Err(ParseError::new(
            ParseErrorKind::Other {
                message: format!("expected a literal, got {:?}", other),
            },
            source,
            Span(0..source.len()),
        )),
    }
}

/// Merge adjacent text segments so `a@@b` yields a single `a@b` text node.
fn push_segment(segments: &mut Template, segment: Expr) {
    if let (Some(Expr::Text(previous)), Expr::Text(text)) = (segments.last_mut(), &segment) {
        previous.push_str(text);
        return;
    }
    segments.push(segment);
}

fn parse_bare_expression(pair: Pair<Rule>, source: &str) -> ParseResult<Expr> {
    let span = Span::from(pair.as_span());
    let mut inner = pair.into_inner();
    let head = parse_expr(next_pair(&mut inner, source, span)?, source)?;
    inner.try_fold(head, |subject, op| apply_postfix(subject, op, source))
}

fn parse_expr(pair: Pair<Rule>, source: &str) -> ParseResult<Expr> {
    match pair.as_rule() {
        Rule::expression => PRATT_PARSER
            .map_primary(|primary| parse_expr(primary, source))
            .map_infix(|lhs, op, rhs| {
                let op = match op.as_rule() {
                    Rule::eq => BinaryOp::Eq,
                    Rule::neq => BinaryOp::Neq,
                    Rule::gt => BinaryOp::Gt,
                    Rule::ge => BinaryOp::Ge,
                    Rule::lt => BinaryOp::Lt,
                    Rule::le => BinaryOp::Le,
                    Rule::concat => BinaryOp::Concat,
                    Rule::add => BinaryOp::Add,
                    Rule::sub => BinaryOp::Sub,
                    Rule::mul => BinaryOp::Mul,
                    Rule::div => BinaryOp::Div,
                    Rule::pow => BinaryOp::Pow,
                    rule => return Err(unexpected_rule(rule, &op, source)),
                };
                Ok(Expr::binary(op, lhs?, rhs?))
            })
            .map_postfix(|lhs, op| apply_postfix(lhs?, op, source))
            .parse(pair.into_inner()),

        Rule::atom => Ok(Expr::atom(pair.as_str())),

        Rule::function_call => {
            let span = Span::from(pair.as_span());
            let mut inner = pair.into_inner();
            let name = next_pair(&mut inner, source, span.clone())?.as_str().to_string();
            let args = next_pair(&mut inner, source, span)?
                .into_inner()
                .map(|arg| parse_expr(arg, source))
                .collect::<ParseResult<_>>()?;
            Ok(Expr::Function { name, args })
        }

        Rule::list => {
            let items = pair
                .into_inner()
                .map(|item| parse_expr(item, source))
                .collect::<ParseResult<_>>()?;
            Ok(Expr::List(items))
        }

        Rule::range => {
            let span = Span::from(pair.as_span());
            let mut inner = pair.into_inner();
            let start = parse_expr(next_pair(&mut inner, source, span.clone())?, source)?;
            let end = parse_expr(next_pair(&mut inner, source, span)?, source)?;
            let step = inner.next().map(|step| parse_expr(step, source)).transpose()?;
            Ok(Expr::range(start, end, step))
        }

        Rule::lambda => {
            let span = Span::from(pair.as_span());
            let body = next_pair(&mut pair.into_inner(), source, span.clone())?;
            let body = next_pair(&mut body.into_inner(), source, span)?;
            Ok(Expr::lambda(parse_expr(body, source)?))
        }

        Rule::capture => {
            let span = Span::from(pair.as_span());
            let index = next_pair(&mut pair.into_inner(), source, span.clone())?;
            let index = index
                .as_str()
                .parse()
                .map_err(|_| invalid_literal("capture index", index.as_str(), source, span))?;
            Ok(Expr::Capture(index))
        }

        Rule::integer => {
            let value = pair.as_str().parse().map_err(|_| {
                invalid_literal("integer", pair.as_str(), source, pair.as_span().into())
            })?;
            Ok(Expr::Literal(Literal::Int(value)))
        }

        Rule::decimal => {
            // Out-of-range digits parse to infinity; treat them like any bad literal.
            let value = pair
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    invalid_literal("decimal", pair.as_str(), source, pair.as_span().into())
                })?;
            Ok(Expr::Literal(Literal::Float(value)))
        }

        Rule::boolean => Ok(Expr::Literal(Literal::Bool(
            pair.as_str().eq_ignore_ascii_case("true"),
        ))),

        Rule::datetime => {
            let value = parse_datetime(pair.as_str()).ok_or_else(|| {
                invalid_literal("timestamp", pair.as_str(), source, pair.as_span().into())
            })?;
            Ok(Expr::Literal(Literal::DateTime(value)))
        }

        Rule::string => {
            let span = Span::from(pair.as_span());
            let content = next_pair(&mut pair.into_inner(), source, span)?;
            Ok(Expr::Literal(Literal::Str(unescape(content.as_str()))))
        }

        rule => Err(unexpected_rule(rule, &pair, source)),
    }
}

fn apply_postfix(subject: Expr, op: Pair<Rule>, source: &str) -> ParseResult<Expr> {
    let span = Span::from(op.as_span());
    match op.as_rule() {
        Rule::attribute_op => {
            let key = next_pair(&mut op.into_inner(), source, span)?;
            Ok(Expr::attribute(subject, key.as_str()))
        }
        Rule::index_op => {
            let index = next_pair(&mut op.into_inner(), source, span)?;
            Ok(Expr::access(subject, parse_expr(index, source)?))
        }
        rule => Err(unexpected_rule(rule, &op, source)),
    }
}

/// Timestamps without an offset are taken to be UTC.
fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value);
    }
    const WITH_OFFSET: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    const NAIVE: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    WITH_OFFSET
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            let naive = text.trim_end_matches(['Z', 'z']);
            NAIVE
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
                .map(|value| value.and_utc().fixed_offset())
        })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn next_pair<'i>(
    pairs: &mut pest::iterators::Pairs<'i, Rule>,
    source: &str,
    span: Span,
) -> ParseResult<Pair<'i, Rule>> {
    pairs.next().ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::Other {
                message: "missing expected pair in rule".to_string(),
            },
            source,
            span,
        )
    })
}

fn invalid_literal(kind: &'static str, text: &str, source: &str, span: Span) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidLiteral {
            kind,
            text: text.to_string(),
        },
        source,
        span,
    )
}

fn unexpected_rule(rule: Rule, pair: &Pair<Rule>, source: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: format!("Unhandled rule: {:?}", rule),
        },
        source,
        pair.as_span().into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_binary_expr() {
        assert_eq!(
            parse_expression("1 + 2").unwrap(),
            Expr::binary(
                BinaryOp::Add,
                Expr::literal(1i64),
                Expr::literal(2i64),
            )
        );
    }

    #[test]
    fn test_text_only_template() {
        assert_eq!(parse("hello world").unwrap(), vec![Expr::text("hello world")]);
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(parse("").unwrap(), Vec::<Expr>::new());
    }

    #[test]
    fn test_escaped_at_merges_with_text() {
        assert_eq!(parse("mail me @@ home").unwrap(), vec![Expr::text("mail me @ home")]);
    }

    #[test]
    fn test_lone_at_is_text() {
        assert_eq!(parse("a @ b").unwrap(), vec![Expr::text("a @ b")]);
        assert_eq!(parse("@123").unwrap(), vec![Expr::text("@123")]);
    }

    #[test]
    fn test_bare_attribute_chain() {
        assert_eq!(
            parse("Hi @contact.name.").unwrap(),
            vec![
                Expr::text("Hi "),
                Expr::attribute(Expr::atom("contact"), "name"),
                Expr::text("."),
            ]
        );
    }

    #[test]
    fn test_bare_function_call() {
        assert_eq!(
            parse("@upper(contact.name)!").unwrap(),
            vec![
                Expr::function(
                    "upper",
                    vec![Expr::attribute(Expr::atom("contact"), "name")]
                ),
                Expr::text("!"),
            ]
        );
    }

    #[test]
    fn test_bare_access() {
        assert_eq!(
            parse("@items[0].name").unwrap(),
            vec![Expr::attribute(
                Expr::access(Expr::atom("items"), Expr::literal(0i64)),
                "name"
            )]
        );
    }

    #[test]
    fn test_expression_block() {
        assert_eq!(
            parse("@( a & \"!\" )").unwrap(),
            vec![Expr::binary(
                BinaryOp::Concat,
                Expr::atom("a"),
                Expr::literal("!"),
            )]
        );
    }

    #[test]
    fn test_range_with_step() {
        assert_eq!(
            parse_expression("1..10//2").unwrap(),
            Expr::range(
                Expr::literal(1i64),
                Expr::literal(10i64),
                Some(Expr::literal(2i64))
            )
        );
    }

    #[test]
    fn test_lambda_and_captures() {
        assert_eq!(
            parse_expression("map(items, &(&1 * 2))").unwrap(),
            Expr::function(
                "map",
                vec![
                    Expr::atom("items"),
                    Expr::lambda(Expr::binary(
                        BinaryOp::Mul,
                        Expr::Capture(1),
                        Expr::literal(2i64),
                    )),
                ]
            )
        );
    }

    #[test]
    fn test_lambda_with_list_body() {
        assert_eq!(
            parse_expression("&[&1, &2]").unwrap(),
            Expr::lambda(Expr::List(vec![Expr::Capture(1), Expr::Capture(2)]))
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse_expression(r#""say \"hi\"\n""#).unwrap(),
            Expr::literal("say \"hi\"\n")
        );
    }

    #[test]
    fn test_parse_literal_scalars() {
        assert_eq!(parse_literal("42").unwrap(), Literal::Int(42));
        assert_eq!(parse_literal("-7").unwrap(), Literal::Int(-7));
        assert_eq!(parse_literal("1.234").unwrap(), Literal::Float(1.234));
        assert_eq!(parse_literal("TRUE").unwrap(), Literal::Bool(true));
        assert_eq!(parse_literal("false").unwrap(), Literal::Bool(false));
        assert_eq!(
            parse_literal("2020-12-13T23:34:45").unwrap(),
            Literal::DateTime(
                chrono::Utc
                    .with_ymd_and_hms(2020, 12, 13, 23, 34, 45)
                    .unwrap()
                    .fixed_offset()
            )
        );
    }

    #[test]
    fn test_parse_literal_rejects_partial_input() {
        assert!(parse_literal("42 apples").is_err());
        assert!(parse_literal("\"quoted\"").is_err());
        assert!(parse_literal("hello").is_err());
        assert!(parse_literal("").is_err());
    }

    #[test]
    fn test_integer_overflow_is_invalid_literal() {
        let err = parse_literal("99999999999999999999").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::InvalidLiteral { kind: "integer", .. }
        ));
    }

    #[test]
    fn test_oversized_decimal_is_invalid_literal() {
        let digits = format!("{}.5", "9".repeat(400));
        let err = parse_literal(&digits).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::InvalidLiteral { kind: "decimal", .. }
        ));
    }

    #[test]
    fn test_impossible_date_is_invalid_literal() {
        let err = parse_literal("2021-02-30T10:00:00").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::InvalidLiteral { kind: "timestamp", .. }
        ));
    }

    #[test]
    fn test_datetime_offsets() {
        let with_colon = parse_literal("2020-01-01T10:00:00+02:00").unwrap();
        let without_colon = parse_literal("2020-01-01T10:00:00+0200").unwrap();
        assert_eq!(with_colon, without_colon);

        let zulu = parse_literal("2020-01-01T08:00:00Z").unwrap();
        let (Literal::DateTime(a), Literal::DateTime(b)) = (with_colon, zulu) else {
            panic!("expected timestamps");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_unclosed_block_is_error() {
        let err = parse("@(1 + 2").unwrap_err();
        assert_eq!(err.input, "@(1 + 2");
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }
}
