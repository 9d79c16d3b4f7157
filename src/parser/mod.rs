//! Org source code front end
//!
//! This module transforms comment-free Org source text into an expression
//! tree:
//! - [`lexer`]: Tokenization (source text → framed token sequence)
//! - [`parse`]: Recursive-descent building (tokens → [`ast::Expr`])
//! - [`delimiters`]: Balanced sub-sequence isolation
//! - [`types`]: Type descriptor resolution and the static keyword tables
//! - [`ast`]: Expression tree definitions
//!
//! # Supported Language
//!
//! A small imperative, systems-oriented language:
//! - Types: signed/unsigned 8/16/32/64-bit integers, `float`, `double`,
//!   `char`, `pointer`, each with an optional `[size]` expression
//! - Statements: `var` declarations, assignment, `realloc`, `if`/`else if`/
//!   `else`, `while`, `return`, `break`, `continue`
//! - Memory: `alloc`, `free`, `get`, `set`
//! - Calls: `syscall` and user `function` declarations/calls
//!
//! # Builder Implementation
//!
//! Hand-written recursive descent over token windows: composite constructs
//! carve a balanced sub-window with the delimiter matcher and recurse, in
//! one pass with no backtracking. The operator split is first-found, not
//! precedence-aware.

pub mod ast;
pub mod delimiters;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
pub mod types;
