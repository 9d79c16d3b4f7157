//! Delimiter matching and token-window carving
//!
//! Every composite construct is parsed by first isolating a balanced
//! sub-sequence of tokens (`(...)` conditions and argument lists, `[...]`
//! size expressions, `{...}` bodies) and then recursing into it. The same
//! depth-counting discipline also drives statement and argument splitting.

use super::ast::SourceLocation;
use super::lexer::{Token, TokenKind};
use super::parse::SyntaxError;

/// Isolate the maximal balanced prefix of `tokens` for a delimiter pair.
///
/// `tokens[0]` must be the already-open delimiter, so the depth counter
/// starts at 1. The returned slice spans the opening delimiter through the
/// closing one; use [`interior`] to strip both. Running out of tokens
/// before the nesting returns to zero is a fatal error.
pub fn match_delimited<'a>(
    tokens: &'a [Token],
    open: &str,
    close: &str,
) -> Result<&'a [Token], SyntaxError> {
    let mut depth = 1usize;

    for (i, token) in tokens.iter().enumerate().skip(1) {
        if is_structural(token) {
            if token.literal == open {
                depth += 1;
            } else if token.literal == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(&tokens[..=i]);
                }
            }
        }
    }

    Err(SyntaxError::UnbalancedDelimiter {
        open: open.to_string(),
        close: close.to_string(),
        location: tokens
            .first()
            .map(|t| t.location)
            .unwrap_or(SourceLocation::new(0, 0)),
    })
}

/// Strip the opening and closing delimiter from a [`match_delimited`] result.
pub fn interior(delimited: &[Token]) -> &[Token] {
    &delimited[1..delimited.len() - 1]
}

/// Split a block interior into statement units, in source order.
///
/// A unit ends at a top-level `;` (discarded) or at the `}` closing a
/// brace-bodied construct (kept), except that a `}` directly followed by
/// `else` stays in the same unit so if/else chains arrive whole.
pub fn split_statements(tokens: &[Token]) -> Vec<&[Token]> {
    let mut units = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match (token.kind, token.literal.as_str()) {
            (TokenKind::Bracket, "{") => depth += 1,
            (TokenKind::Bracket, "}") => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let next_is_else = tokens
                        .get(i + 1)
                        .map_or(false, |t| t.is(TokenKind::Word, "else"));
                    if !next_is_else {
                        units.push(&tokens[start..=i]);
                        start = i + 1;
                    }
                }
            }
            (TokenKind::Semicolon, _) if depth == 0 => {
                if i > start {
                    units.push(&tokens[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < tokens.len() {
        units.push(&tokens[start..]);
    }

    units
}

/// Split a window on top-level commas (argument and parameter lists).
pub fn split_on_commas(tokens: &[Token]) -> Vec<&[Token]> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    if tokens.is_empty() {
        return segments;
    }

    for (i, token) in tokens.iter().enumerate() {
        if is_structural(token) {
            match token.literal.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
        } else if token.kind == TokenKind::Comma && depth == 0 {
            segments.push(&tokens[start..i]);
            start = i + 1;
        }
    }

    segments.push(&tokens[start..]);
    segments
}

/// Index of the first top-level token matching `predicate`, skipping
/// anything nested inside `()`, `[]`, or `{}`.
pub fn find_top_level(
    tokens: &[Token],
    predicate: impl Fn(&Token) -> bool,
) -> Option<usize> {
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        if is_structural(token) {
            match token.literal.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
        } else if depth == 0 && predicate(token) {
            return Some(i);
        }
    }

    None
}

/// Brackets, parentheses, and square brackets adjust nesting depth; nothing
/// else does. String literals keep their quotes in `literal`, so they can
/// never collide with a delimiter here.
fn is_structural(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Bracket | TokenKind::Parenthesis | TokenKind::SquareBracket
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().unwrap()
    }

    #[test]
    fn test_match_delimited_balanced() {
        // Framing gives us a `{ ... }` to carve
        let tokens = lex("var int32 x = 5;");
        let delimited = match_delimited(&tokens, "{", "}").unwrap();

        assert_eq!(delimited.len(), tokens.len());
        assert!(delimited.first().unwrap().is(TokenKind::Bracket, "{"));
        assert!(delimited.last().unwrap().is(TokenKind::Bracket, "}"));
    }

    #[test]
    fn test_match_delimited_nested() {
        let tokens = lex("(a * (b + c)) + d");
        // Skip the synthetic `{`
        let delimited = match_delimited(&tokens[1..], "(", ")").unwrap();

        assert_eq!(delimited.len(), 9);
        assert!(delimited.last().unwrap().is(TokenKind::Parenthesis, ")"));
    }

    #[test]
    fn test_match_delimited_exhaustion_is_error() {
        let tokens = lex("(a + b");
        let result = match_delimited(&tokens[1..], "(", ")");
        assert!(result.is_err());
    }

    #[test]
    fn test_split_statements_on_semicolons() {
        let tokens = lex("var int32 x = 1; x = 2; free x;");
        let inner = interior(match_delimited(&tokens, "{", "}").unwrap());
        let units = split_statements(inner);

        assert_eq!(units.len(), 3);
        assert!(units[0][0].is(TokenKind::Word, "var"));
        assert!(units[1][0].is(TokenKind::Word, "x"));
        assert!(units[2][0].is(TokenKind::Word, "free"));
    }

    #[test]
    fn test_split_statements_keeps_chain_whole() {
        let tokens =
            lex("if (x) { a = 1; } else { a = 2; } while (x) { a = 3; }");
        let inner = interior(match_delimited(&tokens, "{", "}").unwrap());
        let units = split_statements(inner);

        assert_eq!(units.len(), 2);
        assert!(units[0][0].is(TokenKind::Word, "if"));
        assert!(units[1][0].is(TokenKind::Word, "while"));
    }

    #[test]
    fn test_split_on_commas_respects_nesting() {
        let tokens = lex("f(a, b), c");
        let inner = interior(match_delimited(&tokens, "{", "}").unwrap());
        let segments = split_on_commas(inner);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 6); // f ( a , b )
        assert_eq!(segments[1].len(), 1);
    }

    #[test]
    fn test_find_top_level_skips_nested() {
        let tokens = lex("(1 + 2) * 3");
        let inner = interior(match_delimited(&tokens, "{", "}").unwrap());
        let index =
            find_top_level(inner, |t| t.kind == TokenKind::Operator).unwrap();

        assert!(inner[index].is(TokenKind::Operator, "*"));
    }
}
