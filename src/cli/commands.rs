//! Command implementations.

use std::fs;

use specrun_syntax::diagnostics::{self, CompileError};
use specrun_syntax::{lexer, parser};

use crate::runtime::{self, ConsoleReporter};
use crate::transform;

use super::{CliError, CliResult, ExitCode};

/// Read a source file, mapping I/O errors to CLI errors.
fn read_source(path: &str) -> CliResult<String> {
    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading '{}': {}", path, e)))
}

fn print_compile_errors(path: &str, source: &str, errors: &[CompileError]) {
    for error in errors {
        diagnostics::print_error(path, source, error);
    }
}

/// Tokenize a file and dump the token stream (debug).
pub fn lex_file(path: &str) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    match lexer::lex(&source) {
        Ok(tokens) => {
            for token in &tokens {
                println!("{:?} @ {}..{}", token.kind, token.span.start, token.span.end);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            print_compile_errors(path, &source, &errors);
            Err(CliError::new("", ExitCode::FAILURE))
        }
    }
}

/// Parse a file and dump the tree (debug).
pub fn parse_file(path: &str) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let tokens = lexer::lex(&source).map_err(|errors| {
        print_compile_errors(path, &source, &errors);
        CliError::new("", ExitCode::FAILURE)
    })?;
    match parser::parse(&tokens) {
        Ok(program) => {
            println!("{:#?}", program);
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            print_compile_errors(path, &source, &errors);
            Err(CliError::new("", ExitCode::FAILURE))
        }
    }
}

/// Run a spec file: parse, transform, execute, report.
///
/// Parse errors abort before any transformation; resolution errors abort the
/// run; a failing suite maps to a nonzero exit code.
pub fn run_file(path: &str) -> CliResult<ExitCode> {
    let source = read_source(path)?;

    let tokens = lexer::lex(&source).map_err(|errors| {
        print_compile_errors(path, &source, &errors);
        CliError::new("", ExitCode::FAILURE)
    })?;

    let program = parser::parse(&tokens).map_err(|errors| {
        print_compile_errors(path, &source, &errors);
        CliError::new("", ExitCode::FAILURE)
    })?;

    let outcome = transform::transform(program);
    if outcome.manifest.is_empty() {
        tracing::warn!(file = path, "no spec classes detected");
    }

    let mut reporter = ConsoleReporter;
    let summary = runtime::execute(&outcome.program, &outcome.manifest, &mut reporter)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed by the reporter
        Err(CliError::new("", ExitCode::FAILURE))
    }
}
