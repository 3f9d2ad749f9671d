//! Parser for spec sources.
//!
//! Converts a token stream into an AST: a module of ordered statements in
//! which class and function definitions nest freely.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use specrun_syntax::{lexer, parser};
//!
//! let source = "class AdditionSpec:\n    def test_sum(self):\n        1 + 1 == 2\n";
//! let tokens = lexer::lex(source).unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{KeywordId, OperatorId, PunctuationId, Token, TokenKind};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
