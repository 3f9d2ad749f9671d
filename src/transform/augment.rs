//! Module augmentation: the test-framework binding.

use specrun_syntax::ast::{ImportStmt, Program, Spanned, Statement};

use super::TESTKIT_MODULE;

/// Prepend the `import testkit` binding as the module's first statement.
///
/// Safe to invoke more than once; a duplicate binding is harmless. The
/// inserted node carries the placeholder span until the finalizer runs.
pub(super) fn insert_testkit_import(program: &mut Program) {
    let binding = Statement::Import(ImportStmt {
        module: TESTKIT_MODULE.to_string(),
    });
    program.body.insert(0, Spanned::synthesized(binding));
    tracing::debug!(module = TESTKIT_MODULE, "inserted test-framework binding");
}
