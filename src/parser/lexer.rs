//! Tokenizer for Org source code
//!
//! Converts comment-free source text into a flat [`Token`] stream consumed by
//! the builder. Comment and blank-line stripping is the preprocessor's job;
//! the tokenizer assumes it has already happened.
//!
//! The whole stream is framed with a synthetic `{` and `}` so the builder
//! always starts from an implicit top-level block.

use super::ast::SourceLocation;
use std::fmt;

/// Token kinds produced by the tokenizer.
///
/// Numbers are not classified here: an all-digit run is still a [`Word`],
/// and numeric classification is deferred to the builder.
///
/// [`Word`]: TokenKind::Word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, keyword, or number: a run of letters, digits, underscores.
    Word,
    /// String literal, quotes retained, escapes unprocessed.
    Str,
    /// `{` or `}`
    Bracket,
    /// `(` or `)`
    Parenthesis,
    /// `[` or `]`
    SquareBracket,
    Comma,
    Semicolon,
    Colon,
    /// Lone `=` (assignment)
    Equal,
    /// `==`
    Equals,
    /// `+ - * / % ^`
    Operator,
    /// `< > <= >=`
    Comparison,
    /// Lone `!`
    Not,
    /// `!=`
    NotEqual,
    /// `&&` or `||`
    LogicalOperator,
}

/// Smallest named lexical unit: a kind plus the literal text it was read
/// from, with the source location for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        literal: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            literal: literal.into(),
            location,
        }
    }

    /// Kind and literal match at once.
    pub fn is(&self, kind: TokenKind, literal: &str) -> bool {
        self.kind == kind && self.literal == literal
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Word => write!(f, "word '{}'", self.literal),
            TokenKind::Str => write!(f, "string literal {}", self.literal),
            _ => write!(f, "'{}'", self.literal),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for Org source code
///
/// One left-to-right pass with one-character lookahead. The running word
/// buffer and quote state are locals of the scan, not struct fields.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, framed with the synthetic block braces.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = vec![Token::new(
            TokenKind::Bracket,
            "{",
            SourceLocation::new(1, 0),
        )];

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token()?);
        }

        tokens.push(Token::new(
            TokenKind::Bracket,
            "}",
            self.current_location(),
        ));

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            location: loc,
        })?;

        match ch {
            // String literals (raw, quotes kept)
            '"' => self.string_literal(loc),

            // Words: identifiers, keywords, numbers
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => Ok(self.word(ch, loc)),

            // Single-character structural tokens
            '{' | '}' => Ok(Token::new(TokenKind::Bracket, ch, loc)),
            '(' | ')' => Ok(Token::new(TokenKind::Parenthesis, ch, loc)),
            '[' | ']' => Ok(Token::new(TokenKind::SquareBracket, ch, loc)),
            ',' => Ok(Token::new(TokenKind::Comma, ch, loc)),
            ';' => Ok(Token::new(TokenKind::Semicolon, ch, loc)),
            ':' => Ok(Token::new(TokenKind::Colon, ch, loc)),

            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::Equals, "==", loc))
                } else {
                    Ok(Token::new(TokenKind::Equal, "=", loc))
                }
            }

            '+' | '-' | '*' | '/' | '%' | '^' => {
                Ok(Token::new(TokenKind::Operator, ch, loc))
            }

            '<' | '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(
                        TokenKind::Comparison,
                        format!("{}=", ch),
                        loc,
                    ))
                } else {
                    Ok(Token::new(TokenKind::Comparison, ch, loc))
                }
            }

            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::NotEqual, "!=", loc))
                } else {
                    Ok(Token::new(TokenKind::Not, "!", loc))
                }
            }

            '&' | '|' => {
                if self.peek() == Some(ch) {
                    self.advance();
                    Ok(Token::new(
                        TokenKind::LogicalOperator,
                        format!("{}{}", ch, ch),
                        loc,
                    ))
                } else {
                    Err(LexError {
                        message: format!(
                            "Stray '{}', expected '{}{}'",
                            ch, ch, ch
                        ),
                        location: loc,
                    })
                }
            }

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Scan a string literal, keeping the quotes and escape sequences
    /// verbatim. A backslash keeps the following character (so an escaped
    /// `"` does not terminate the literal); the builder's unescape routine
    /// interprets the sequences later.
    fn string_literal(
        &mut self,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut raw = String::from('"');

        while let Some(ch) = self.advance() {
            raw.push(ch);

            if ch == '\\' {
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unexpected end of input in string literal"
                        .to_string(),
                    location: self.current_location(),
                })?;
                raw.push(escaped);
            } else if ch == '"' {
                return Ok(Token::new(TokenKind::Str, raw, loc));
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Accumulate a word until the lookahead leaves the word character
    /// class. All-digit words stay words here.
    fn word(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut word = String::new();
        word.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Word, word, loc)
    }

    /// Skip spaces, tabs, and newlines
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_framing() {
        let mut lexer = Lexer::new("var int32 x = 5;");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens.first().unwrap().is(TokenKind::Bracket, "{"));
        assert!(tokens.last().unwrap().is(TokenKind::Bracket, "}"));
    }

    #[test]
    fn test_simple_declaration() {
        let mut lexer = Lexer::new("var int32 x = 5;");
        let tokens = lexer.tokenize().unwrap();

        // Inside the synthetic braces
        assert!(tokens[1].is(TokenKind::Word, "var"));
        assert!(tokens[2].is(TokenKind::Word, "int32"));
        assert!(tokens[3].is(TokenKind::Word, "x"));
        assert!(tokens[4].is(TokenKind::Equal, "="));
        assert!(tokens[5].is(TokenKind::Word, "5"));
        assert!(tokens[6].is(TokenKind::Semicolon, ";"));
    }

    #[test]
    fn test_determinism() {
        let source = "while (x <= 10) { x = x + 1; }";
        let first = Lexer::new(source).tokenize().unwrap();
        let second = Lexer::new(source).tokenize().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_vs_equals() {
        let mut lexer = Lexer::new("x = y == z");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens[2].is(TokenKind::Equal, "="));
        assert!(tokens[4].is(TokenKind::Equals, "=="));
    }

    #[test]
    fn test_comparison_lookahead() {
        let mut lexer = Lexer::new("< <= > >= != !");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens[1].is(TokenKind::Comparison, "<"));
        assert!(tokens[2].is(TokenKind::Comparison, "<="));
        assert!(tokens[3].is(TokenKind::Comparison, ">"));
        assert!(tokens[4].is(TokenKind::Comparison, ">="));
        assert!(tokens[5].is(TokenKind::NotEqual, "!="));
        assert!(tokens[6].is(TokenKind::Not, "!"));
    }

    #[test]
    fn test_logical_operators() {
        let mut lexer = Lexer::new("a && b || c");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens[2].is(TokenKind::LogicalOperator, "&&"));
        assert!(tokens[4].is(TokenKind::LogicalOperator, "||"));
    }

    #[test]
    fn test_stray_ampersand_rejected() {
        let result = Lexer::new("a & b").tokenize();
        assert!(result.is_err());

        let result = Lexer::new("a | b").tokenize();
        assert!(result.is_err());
    }

    #[test]
    fn test_string_literal_raw() {
        let mut lexer = Lexer::new(r#"syscall write("hello")"#);
        let tokens = lexer.tokenize().unwrap();

        // Quotes are retained at token level
        assert!(tokens[4].is(TokenKind::Str, "\"hello\""));
    }

    #[test]
    fn test_string_escaped_quote_stays_inside() {
        let mut lexer = Lexer::new(r#""say \"hi\"""#);
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[1].kind, TokenKind::Str);
        assert_eq!(tokens[1].literal, r#""say \"hi\"""#);
    }

    #[test]
    fn test_unterminated_string() {
        let result = Lexer::new("\"open ended").tokenize();
        assert!(result.is_err());
    }

    #[test]
    fn test_numbers_stay_words() {
        let mut lexer = Lexer::new("123 abc 4d_5");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens[1].is(TokenKind::Word, "123"));
        assert!(tokens[2].is(TokenKind::Word, "abc"));
        assert!(tokens[3].is(TokenKind::Word, "4d_5"));
    }

    #[test]
    fn test_locations_tracked() {
        let mut lexer = Lexer::new("var\n  x");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[1].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 3));
    }
}
