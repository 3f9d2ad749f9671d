//! Shared syntax frontend for spec sources: lexer, parser, AST, diagnostics.
//!
//! This crate is dependency-light and intended for reuse across the pipeline,
//! the CLI, and future tooling.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not detect spec
//!   classes, harvest methods, or rewrite assertions; those passes live in the
//!   `specrun` crate and mutate the tree this crate produces.
//!
//! ## Examples
//! ```rust,no_run
//! use specrun_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("pass\n").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
