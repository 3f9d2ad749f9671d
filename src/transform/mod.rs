//! Syntax-tree transformation pipeline.
//!
//! Turns a parsed spec module into a runnable one:
//!
//! 1. [`augment`] prepends the test-framework binding to the module.
//! 2. [`detect`] finds classes whose name ends in the spec suffix, grants them
//!    the test-case capability, and drives harvesting and rewriting over each.
//! 3. [`finalize`] assigns placeholder spans introduced by the rewrites.
//!
//! The pass returns a [`TransformOutcome`]: the rewritten tree together with
//! the [`SuiteManifest`] of harvested (class, method) pairs. The manifest is an
//! explicit context object threaded by the caller rather than process-global
//! state, so several pipeline runs per process are possible.

mod augment;
mod detect;
mod finalize;
mod harvest;
mod rewrite;

pub use harvest::{ClassManifest, SuiteManifest};

use specrun_syntax::ast::Program;

/// Class-name suffix that marks a spec class.
pub const SPEC_SUFFIX: &str = "Spec";

/// Module name of the test-framework binding inserted by the augmenter.
pub const TESTKIT_MODULE: &str = "testkit";

/// Attribute of [`TESTKIT_MODULE`] appended to a detected class's base list.
pub const TEST_CASE_ATTR: &str = "TestCase";

/// Assertion method the rewriter targets on the implicit `self` receiver.
pub const ASSERT_EQUALS: &str = "assertEquals";

/// Result of the transformation pass.
#[derive(Debug)]
pub struct TransformOutcome {
    pub program: Program,
    pub manifest: SuiteManifest,
}

/// Run the full transformation pipeline over a parsed program.
///
/// Convenience wrapper around [`transform_into`] with a fresh manifest.
#[tracing::instrument(skip_all, fields(stmt_count = program.body.len()))]
pub fn transform(mut program: Program) -> TransformOutcome {
    let mut manifest = SuiteManifest::new();
    transform_into(&mut program, &mut manifest);
    TransformOutcome { program, manifest }
}

/// Run the pipeline, appending harvested methods to a caller-supplied manifest.
///
/// The manifest is appended to and never cleared: driving the same program
/// through twice duplicates every harvested method name.
pub fn transform_into(program: &mut Program, manifest: &mut SuiteManifest) {
    augment::insert_testkit_import(program);
    detect::detect_spec_classes(program, manifest);
    finalize::fix_missing_spans(program);
}
