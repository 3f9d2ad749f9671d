#![forbid(unsafe_code)]
//! specrun — turns spec-convention source into an executable test suite.
//!
//! Source text written in the spec convention — classes whose name ends in
//! `Spec`, containing bare comparison statements — is parsed, transformed, and
//! executed: detected classes gain the test-case capability, their methods are
//! harvested into a suite manifest, and bare comparisons are rewritten into
//! explicit assertions. The transformed tree is then interpreted directly and
//! the suite reported on the console.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a pipeline bug (logic error), use `unreachable!` with a clear
//!   explanation.

pub mod cli;
pub mod runtime;
pub mod transform;

pub use specrun_syntax::ast;
pub use specrun_syntax::diagnostics;
pub use specrun_syntax::lexer;
pub use specrun_syntax::parser;

pub use runtime::{execute, ConsoleReporter, TestReporter};
pub use transform::{transform, transform_into, SuiteManifest, TransformOutcome};
