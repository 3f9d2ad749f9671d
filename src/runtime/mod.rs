//! Runtime for transformed spec modules.
//!
//! This is phase two of the pipeline: no generated code is compiled or
//! executed by the host. The transformed tree is interpreted directly —
//! [`executor`] materializes the module top level and resolves the suite
//! manifest, [`interp`] evaluates method bodies, and [`reporter`] renders
//! outcomes.
//!
//! ## Modules
//!
//! - `executor` - namespace materialization, suite resolution, suite running
//! - `interp` - tree-walking evaluator and runtime errors
//! - `reporter` - `TestReporter` trait and console implementation
//! - `value` - runtime values

pub mod executor;
pub mod interp;
pub mod reporter;
pub mod value;

pub use executor::{build_suite, execute, materialize, run_suite, ExecError, Namespace};
pub use interp::{Interpreter, RuntimeError};
pub use reporter::{ConsoleReporter, TestCase, TestOutcome, TestReporter, TestSummary};
pub use value::Value;
