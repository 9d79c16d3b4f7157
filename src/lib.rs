//! # Introduction
//!
//! orgc is the front end of a compiler for Org, a small imperative,
//! systems-oriented language with explicit sized numeric types, pointers,
//! manual memory allocation, and raw system calls.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Builder → Expr (AST)
//! ```
//!
//! 1. [`parser::lexer`] — tokenizes comment-free source into a token
//!    sequence framed by a synthetic `{ }` block.
//! 2. [`parser::parse`] — recursive-descent builder over token windows,
//!    producing the root [`parser::ast::Expr`].
//!
//! Reading source from storage and serializing the resulting tree are the
//! callers' concern; this crate goes from text to tree and nothing else.
//! All errors are fatal: no partial tree is ever returned.
//!
//! ```
//! use orgc::parser::ast::Expr;
//! use orgc::parser::parse::Parser;
//!
//! let parser = Parser::new("var int32 x = 5;")?;
//! let program = parser.parse_program()?;
//! assert!(matches!(program, Expr::Block(_)));
//! # Ok::<(), orgc::parser::parse::SyntaxError>(())
//! ```

pub mod parser;
