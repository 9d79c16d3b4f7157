//! Shape-dispatched expression builders
//!
//! Windows that start with no dispatch keyword land here and are
//! disambiguated by shape:
//!
//! - word followed by `=` — variable modification
//! - any top-level binary operator — math expression (first-found split)
//! - whole-window `( ... )` — grouped sub-expression
//! - word followed by `(` — function call
//! - single token — number, string, or variable leaf
//!
//! # Operator split
//!
//! The math builder splits a window at its *first* top-level operator and
//! recurses on both sides. There is no precedence climbing: `1 + 2 * 3`
//! splits at the `+` into `1` and `2 * 3`, so chains associate to the
//! right regardless of mathematical precedence. Comparisons, `==`/`!=`,
//! and `&&`/`||` participate in the same split and produce the same node.

use crate::parser::ast::{BinOp, Expr, SourceLocation};
use crate::parser::delimiters::{
    find_top_level, interior, match_delimited, split_on_commas,
};
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{expect_window, parse_window, SyntaxError};
use crate::parser::types::is_numeric_word;

/// Dispatch a non-keyword window by shape.
pub(crate) fn parse_expression(tokens: &[Token]) -> Result<Expr, SyntaxError> {
    let first = tokens.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "where an expression was expected".to_string(),
        location: SourceLocation::new(0, 0),
    })?;

    // Variable modification: word followed by a lone '='. Checked before
    // the operator split so `x = a + b` keeps the whole right-hand side.
    if first.kind == TokenKind::Word
        && tokens.get(1).map_or(false, |t| t.kind == TokenKind::Equal)
    {
        let value = expect_window(
            &tokens[2..],
            tokens[1].location,
            "after '=' in assignment",
        )?;
        return Ok(Expr::ModifyVariable {
            name: first.literal.clone(),
            value: Box::new(value),
        });
    }

    // First-found top-level operator splits the window.
    if let Some(split) = find_top_level(tokens, is_binary_operator) {
        return parse_math_split(tokens, split);
    }

    // Whole-window parenthesized group.
    if first.is(TokenKind::Parenthesis, "(") {
        let delimited = match_delimited(tokens, "(", ")")?;
        if delimited.len() == tokens.len() {
            return expect_window(
                interior(delimited),
                first.location,
                "inside parentheses",
            );
        }
        let trailing = &tokens[delimited.len()];
        return Err(SyntaxError::UnexpectedToken {
            found: trailing.to_string(),
            context: "after parenthesized expression".to_string(),
            location: trailing.location,
        });
    }

    // Function call: word followed by '('.
    if first.kind == TokenKind::Word
        && tokens
            .get(1)
            .map_or(false, |t| t.is(TokenKind::Parenthesis, "("))
    {
        let args_delimited = match_delimited(&tokens[1..], "(", ")")?;
        if 1 + args_delimited.len() != tokens.len() {
            let trailing = &tokens[1 + args_delimited.len()];
            return Err(SyntaxError::UnexpectedToken {
                found: trailing.to_string(),
                context: "after call arguments".to_string(),
                location: trailing.location,
            });
        }

        return Ok(Expr::FunctionCall {
            name: first.literal.clone(),
            args: parse_arguments(interior(args_delimited))?,
        });
    }

    // Single-token leaves.
    if tokens.len() == 1 {
        return parse_leaf(first);
    }

    Err(SyntaxError::UnexpectedToken {
        found: first.to_string(),
        context: "in expression".to_string(),
        location: first.location,
    })
}

/// Split at the operator token found at `split` and recurse on both sides.
fn parse_math_split(
    tokens: &[Token],
    split: usize,
) -> Result<Expr, SyntaxError> {
    let op_token = &tokens[split];

    if split == 0 {
        return Err(SyntaxError::UnexpectedToken {
            found: op_token.to_string(),
            context: "with no left operand".to_string(),
            location: op_token.location,
        });
    }

    let op = BinOp::from_literal(&op_token.literal).ok_or_else(|| {
        SyntaxError::UnexpectedToken {
            found: op_token.to_string(),
            context: "in math expression".to_string(),
            location: op_token.location,
        }
    })?;

    let left = parse_window(&tokens[..split])?;
    let right = expect_window(
        &tokens[split + 1..],
        op_token.location,
        "after operator",
    )?;

    Ok(Expr::MathExpression {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

/// Number, string, or variable-reference leaf.
fn parse_leaf(token: &Token) -> Result<Expr, SyntaxError> {
    match token.kind {
        TokenKind::Str => Ok(Expr::StringLiteral(unescape_string_literal(
            &token.literal,
            token.location,
        )?)),
        TokenKind::Word if is_numeric_word(&token.literal) => {
            let value = token.literal.parse::<i64>().map_err(|_| {
                SyntaxError::InvalidNumber {
                    literal: token.literal.clone(),
                    location: token.location,
                }
            })?;
            Ok(Expr::Number(value))
        }
        TokenKind::Word => Ok(Expr::Variable(token.literal.clone())),
        _ => Err(SyntaxError::UnexpectedToken {
            found: token.to_string(),
            context: "in expression".to_string(),
            location: token.location,
        }),
    }
}

/// Parse a comma-separated argument list interior.
pub(crate) fn parse_arguments(
    tokens: &[Token],
) -> Result<Vec<Expr>, SyntaxError> {
    let mut args = Vec::new();

    if tokens.is_empty() {
        return Ok(args);
    }

    for segment in split_on_commas(tokens) {
        args.push(parse_window(segment)?);
    }

    Ok(args)
}

fn is_binary_operator(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Operator
            | TokenKind::Comparison
            | TokenKind::Equals
            | TokenKind::NotEqual
            | TokenKind::LogicalOperator
    )
}

/// Explicit unescape for string-literal leaves.
///
/// The tokenizer hands over the raw literal, quotes included. Accepted
/// sequences: `\"`, `\\`, `\n`, `\t`, `\r`, `\0`. Anything else is fatal.
fn unescape_string_literal(
    raw: &str,
    location: SourceLocation,
) -> Result<String, SyntaxError> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(SyntaxError::UnexpectedEnd {
            context: "inside string literal".to_string(),
            location,
        })?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let escaped = chars.next().ok_or(SyntaxError::UnexpectedEnd {
            context: "inside string literal".to_string(),
            location,
        })?;

        match escaped {
            '"' => result.push('"'),
            '\\' => result.push('\\'),
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            '0' => result.push('\0'),
            other => {
                return Err(SyntaxError::InvalidEscape {
                    sequence: format!("\\{}", other),
                    location,
                });
            }
        }
    }

    Ok(result)
}
