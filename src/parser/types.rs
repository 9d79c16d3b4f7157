//! Type descriptor resolution and the static lookup tables
//!
//! Holds the two boundary constants the rest of the front end consults: the
//! Reserved Keyword Set and the Valid Base Type Set. Both are fixed; the
//! resolver turns a token in type position into an immutable [`ValueType`]
//! or fails with a descriptive error.

use rustc_hash::FxHashSet;
use std::sync::LazyLock;

use super::ast::{BaseType, SourceLocation, ValueType};
use super::delimiters::{interior, match_delimited};
use super::lexer::{Token, TokenKind};
use super::parse::{parse_window, SyntaxError};

/// Words reserved for syntax, disallowed as identifiers.
pub const RESERVED_KEYWORDS: [&str; 16] = [
    "var", "mod", "realloc", "if", "else", "while", "call", "syscall",
    "function", "return", "free", "alloc", "get", "set", "break", "continue",
];

/// The twelve recognized base type names, in the order error messages
/// quote them.
pub const VALID_BASE_TYPES: [&str; 12] = [
    "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64",
    "float", "double", "char", "pointer",
];

static RESERVED: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| RESERVED_KEYWORDS.iter().copied().collect());

static BASE_TYPES: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| VALID_BASE_TYPES.iter().copied().collect());

pub fn is_reserved_keyword(word: &str) -> bool {
    RESERVED.contains(word)
}

pub fn is_base_type(word: &str) -> bool {
    BASE_TYPES.contains(word)
}

/// True for words made entirely of ASCII digits, i.e. numbers still in
/// `Word` clothing.
pub fn is_numeric_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve the type descriptor at the head of `tokens`.
///
/// The first token must name one of the twelve base types; an optional
/// `[...]` right after it is carved out and recursively parsed as the size
/// expression. Returns the descriptor together with the number of tokens
/// consumed, so callers can keep walking the window.
pub(crate) fn resolve_type(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<(ValueType, usize), SyntaxError> {
    let token = tokens.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "in type position".to_string(),
        location: at,
    })?;

    let base = match token.kind {
        TokenKind::Word => BaseType::from_str(&token.literal),
        _ => None,
    }
    .ok_or_else(|| SyntaxError::UnknownBaseType {
        found: token.literal.clone(),
        location: token.location,
    })?;

    let mut descriptor = ValueType::new(base);
    let mut consumed = 1;

    if tokens
        .get(1)
        .map_or(false, |t| t.is(TokenKind::SquareBracket, "["))
    {
        let delimited = match_delimited(&tokens[1..], "[", "]")?;
        descriptor = descriptor.with_size(parse_window(interior(delimited))?);
        consumed += delimited.len();
    }

    Ok((descriptor, consumed))
}

/// Validate a token as a declared name: must be a word, not all-numeric,
/// and not a reserved keyword.
pub(crate) fn validate_name(token: &Token) -> Result<String, SyntaxError> {
    if token.kind != TokenKind::Word {
        return Err(SyntaxError::UnexpectedToken {
            found: token.to_string(),
            context: "where a name was expected".to_string(),
            location: token.location,
        });
    }

    if is_numeric_word(&token.literal) {
        return Err(SyntaxError::NumericName {
            name: token.literal.clone(),
            location: token.location,
        });
    }

    if is_reserved_keyword(&token.literal) {
        return Err(SyntaxError::ReservedName {
            name: token.literal.clone(),
            location: token.location,
        });
    }

    Ok(token.literal.clone())
}
