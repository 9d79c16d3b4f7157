//! Main parser coordinator
//!
//! This module provides the [`Parser`] entry point, the [`SyntaxError`]
//! type, and the core window dispatcher.
//!
//! # Builder Architecture
//!
//! The builder is recursive descent over *token windows*: every builder is
//! a function of the `&[Token]` slice handed to it, with no cursor state
//! and no backtracking. Composite constructs carve balanced sub-windows
//! with the delimiter matcher and recurse:
//!
//! - This module: entry points and error type
//! - `delimiters`: balanced sub-sequence isolation and unit splitting
//! - `types`: type descriptor resolution and the static keyword tables
//! - `statements`: keyword-led builders (`var`, `if`, `while`, ...)
//! - `expressions`: shape-dispatched builders (math split, calls, leaves)
//!
//! All fatal: any error aborts the whole parse with no partial tree.

use super::ast::{Expr, SourceLocation};
use super::delimiters::{interior, match_delimited, split_statements};
use super::lexer::{LexError, Lexer, Token, TokenKind};
use super::statements::parse_statement;
use super::types::VALID_BASE_TYPES;
use std::fmt;

/// Fatal parse errors. No partial AST survives any of these.
#[derive(Debug)]
pub enum SyntaxError {
    /// A word in type position that is not one of the twelve base types.
    UnknownBaseType {
        found: String,
        location: SourceLocation,
    },

    /// An all-numeric word used as a declared name.
    NumericName {
        name: String,
        location: SourceLocation,
    },

    /// A reserved keyword used as a declared name.
    ReservedName {
        name: String,
        location: SourceLocation,
    },

    /// The token sequence ran out before a delimiter pair balanced.
    UnbalancedDelimiter {
        open: String,
        close: String,
        location: SourceLocation,
    },

    /// The token window ran out mid-construct.
    UnexpectedEnd {
        context: String,
        location: SourceLocation,
    },

    /// A token that fits no construct at this position.
    UnexpectedToken {
        found: String,
        context: String,
        location: SourceLocation,
    },

    /// A numeric word too large for the number leaf.
    InvalidNumber {
        literal: String,
        location: SourceLocation,
    },

    /// An escape sequence the unescape routine does not accept.
    InvalidEscape {
        sequence: String,
        location: SourceLocation,
    },

    /// Tokenizer failure.
    Lexical {
        message: String,
        location: SourceLocation,
    },
}

impl SyntaxError {
    pub fn location(&self) -> SourceLocation {
        match self {
            SyntaxError::UnknownBaseType { location, .. }
            | SyntaxError::NumericName { location, .. }
            | SyntaxError::ReservedName { location, .. }
            | SyntaxError::UnbalancedDelimiter { location, .. }
            | SyntaxError::UnexpectedEnd { location, .. }
            | SyntaxError::UnexpectedToken { location, .. }
            | SyntaxError::InvalidNumber { location, .. }
            | SyntaxError::InvalidEscape { location, .. }
            | SyntaxError::Lexical { location, .. } => *location,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = self.location();
        write!(f, "Syntax error at line {}, column {}: ", loc.line, loc.column)?;

        match self {
            SyntaxError::UnknownBaseType { found, .. } => write!(
                f,
                "'{}' is not a valid base type (valid types: {})",
                found,
                VALID_BASE_TYPES.join(", ")
            ),
            SyntaxError::NumericName { name, .. } => {
                write!(f, "'{}' cannot be used as a name: names must not be numeric", name)
            }
            SyntaxError::ReservedName { name, .. } => {
                write!(f, "'{}' is a reserved keyword and cannot be used as a name", name)
            }
            SyntaxError::UnbalancedDelimiter { open, close, .. } => {
                write!(f, "unbalanced '{}': no matching '{}'", open, close)
            }
            SyntaxError::UnexpectedEnd { context, .. } => {
                write!(f, "ran out of tokens {}", context)
            }
            SyntaxError::UnexpectedToken { found, context, .. } => {
                write!(f, "unexpected {} {}", found, context)
            }
            SyntaxError::InvalidNumber { literal, .. } => {
                write!(f, "number '{}' is out of range", literal)
            }
            SyntaxError::InvalidEscape { sequence, .. } => {
                write!(f, "unknown escape sequence '{}'", sequence)
            }
            SyntaxError::Lexical { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        SyntaxError::Lexical {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent builder for Org source
///
/// Owns the token sequence produced by the lexer; [`Parser::parse_program`]
/// builds the root [`Expr`] for the implicit top-level block.
pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self { tokens })
    }

    /// Build the whole tree. The lexer frames every input with `{ }`, so
    /// the result is always an [`Expr::Block`] in source order.
    pub fn parse_program(&self) -> Result<Expr, SyntaxError> {
        parse_window(&self.tokens)
    }

    /// The token sequence this parser was built over.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Entry dispatcher: a window opening with `{` is a block; anything else
/// goes to the single-expression dispatcher.
pub(crate) fn parse_window(tokens: &[Token]) -> Result<Expr, SyntaxError> {
    match tokens.first() {
        None => Err(SyntaxError::UnexpectedEnd {
            context: "where an expression was expected".to_string(),
            location: SourceLocation::new(0, 0),
        }),
        Some(t) if t.is(TokenKind::Bracket, "{") => parse_block(tokens),
        Some(_) => parse_statement(tokens),
    }
}

/// Carve a `{ ... }` body, split it into statement units, and parse each,
/// yielding the ordered block.
pub(crate) fn parse_block(tokens: &[Token]) -> Result<Expr, SyntaxError> {
    let delimited = match_delimited(tokens, "{", "}")?;

    if delimited.len() != tokens.len() {
        let trailing = &tokens[delimited.len()];
        return Err(SyntaxError::UnexpectedToken {
            found: trailing.to_string(),
            context: "after block".to_string(),
            location: trailing.location,
        });
    }

    let mut statements = Vec::new();
    for unit in split_statements(interior(delimited)) {
        statements.push(parse_window(unit)?);
    }

    Ok(Expr::Block(statements))
}

/// Parse a window that must not be empty; `at` anchors the error when it is.
pub(crate) fn expect_window(
    tokens: &[Token],
    at: SourceLocation,
    context: &str,
) -> Result<Expr, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::UnexpectedEnd {
            context: context.to_string(),
            location: at,
        });
    }
    parse_window(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{BaseType, Expr};

    #[test]
    fn test_parse_simple_declaration() {
        let parser = Parser::new("var int32 x = 5;").unwrap();
        let program = parser.parse_program().unwrap();

        let Expr::Block(statements) = program else {
            panic!("Expected top-level block");
        };
        assert_eq!(statements.len(), 1);

        match &statements[0] {
            Expr::VariableDeclaration {
                var_type,
                name,
                initializer,
            } => {
                assert_eq!(var_type.base, BaseType::Int32);
                assert!(var_type.size.is_none());
                assert_eq!(name, "x");
                assert_eq!(**initializer, Expr::Number(5));
            }
            other => panic!("Expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_statements_kept_in_source_order() {
        let parser = Parser::new(
            "var int32 a = 1; var int32 b = 2; a = b;",
        )
        .unwrap();
        let program = parser.parse_program().unwrap();

        let Expr::Block(statements) = program else {
            panic!("Expected top-level block");
        };
        assert_eq!(statements.len(), 3);
        assert!(matches!(
            statements[0],
            Expr::VariableDeclaration { ref name, .. } if name == "a"
        ));
        assert!(matches!(
            statements[1],
            Expr::VariableDeclaration { ref name, .. } if name == "b"
        ));
        assert!(matches!(statements[2], Expr::ModifyVariable { .. }));
    }

    #[test]
    fn test_empty_input_is_empty_block() {
        let parser = Parser::new("").unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program, Expr::Block(Vec::new()));
    }

    #[test]
    fn test_lex_error_propagates() {
        assert!(Parser::new("a & b").is_err());
    }
}
