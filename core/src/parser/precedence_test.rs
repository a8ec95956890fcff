use pretty_assertions::assert_eq;

use crate::parser::{BinaryOp, Expr, parse_expression};

// Helper function to parse an expression and return the AST.
//
// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same AST.
fn ast(source: &str) -> Expr {
    parse_expression(source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
}

#[test]
fn test_addition_vs_subtraction() {
    assert_eq!(ast("a + b - c"), ast("(a + b) - c"));
    assert_eq!(ast("a - b + c"), ast("(a - b) + c"));
    assert_eq!(
        ast("a + b - c + d - e + f"),
        ast("((((a + b) - c) + d) - e) + f")
    );
}

#[test]
fn test_multiplication_vs_division() {
    assert_eq!(ast("a * b / c"), ast("(a * b) / c"));
    assert_eq!(ast("a / b * c"), ast("(a / b) * c"));
}

#[test]
fn test_addition_vs_multiplication() {
    assert_eq!(ast("a + b * c"), ast("a + (b * c)"));
    assert_eq!(ast("a * b + c"), ast("(a * b) + c"));
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(ast("a ^ b ^ c"), ast("a ^ (b ^ c)"));
    assert_eq!(ast("a * b ^ c"), ast("a * (b ^ c)"));
}

#[test]
fn test_concat_binds_looser_than_arithmetic() {
    assert_eq!(ast("a & b + c"), ast("a & (b + c)"));
    assert_eq!(ast("a + b & c"), ast("(a + b) & c"));
    assert_eq!(ast("a & b & c"), ast("(a & b) & c"));
}

#[test]
fn test_comparison_binds_loosest() {
    assert_eq!(ast("a + 1 > b * 2"), ast("(a + 1) > (b * 2)"));
    assert_eq!(ast("a & b == c"), ast("(a & b) == c"));
    assert_eq!(ast("a == b != c"), ast("(a == b) != c"));
}

#[test]
fn test_postfix_binds_tightest() {
    assert_eq!(ast("a.b + c[0]"), ast("(a.b) + (c[0])"));
    assert_eq!(ast("a.b ^ 2"), ast("(a.b) ^ 2"));
}

#[test]
fn test_comparison_shape() {
    assert_eq!(
        ast("age >= 18"),
        Expr::binary(BinaryOp::Ge, Expr::atom("age"), Expr::literal(18i64))
    );
    assert_eq!(
        ast("a <> b"),
        Expr::binary(BinaryOp::Neq, Expr::atom("a"), Expr::atom("b"))
    );
}
