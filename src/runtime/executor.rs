//! Suite materialization and execution.
//!
//! Phase two of the pipeline: the transformed tree's top level is executed
//! once into a runtime [`Namespace`], the suite manifest is resolved against
//! it, and the resulting suite runs through a [`TestReporter`].

use std::collections::HashMap;
use std::time::Instant;

use specrun_syntax::ast::{ClassDecl, FunctionDecl, Program, Statement};
use thiserror::Error;

use crate::transform::SuiteManifest;

use super::interp::{Interpreter, RuntimeError};
use super::reporter::{TestCase, TestOutcome, TestReporter, TestSummary};
use super::value::Value;

/// Fatal executor errors; any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("cannot resolve class '{0}' in the executed module")]
    UnresolvedClass(String),

    #[error("cannot resolve method '{method}' on class '{class}'")]
    UnresolvedMethod { class: String, method: String },

    #[error("error while executing module top level: {0}")]
    TopLevel(#[from] RuntimeError),
}

/// The runtime namespace produced by executing a transformed module's top
/// level: class definitions by name plus the module-level environment.
#[derive(Debug, Default)]
pub struct Namespace {
    classes: HashMap<String, ClassDecl>,
    globals: HashMap<String, Value>,
}

impl Namespace {
    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }
}

/// Execute the finalized module's top level once, materializing class
/// definitions into a runtime namespace.
///
/// Execution does not enter function bodies; a class declared inside a
/// function is therefore never materialized. A later declaration shadows an
/// earlier one of the same name.
#[tracing::instrument(skip_all, fields(stmt_count = program.body.len()))]
pub fn materialize(program: &Program) -> Result<Namespace, ExecError> {
    let mut ns = Namespace::default();

    for stmt in &program.body {
        match &stmt.node {
            Statement::Import(import) => {
                ns.globals
                    .insert(import.module.clone(), Value::Module(import.module.clone()));
            }
            Statement::Class(class) => {
                ns.classes.insert(class.name.clone(), class.clone());
            }
            Statement::Assign(assign) => {
                let value = Interpreter::new(&ns.globals).eval(&assign.value)?;
                ns.globals.insert(assign.name.clone(), value);
            }
            Statement::Expr(expr) => {
                Interpreter::new(&ns.globals).eval(expr)?;
            }
            // Top-level function bodies run only when called, and nothing in
            // this runtime calls them.
            Statement::Function(_) | Statement::Return(_) | Statement::Pass => {}
        }
    }

    Ok(ns)
}

/// Resolve the manifest against the namespace and build the suite.
///
/// Entries are taken in manifest order, methods in harvest order within each
/// class. A class or method that cannot be resolved aborts suite construction
/// immediately; no partial suite is returned.
pub fn build_suite(ns: &Namespace, manifest: &SuiteManifest) -> Result<Vec<TestCase>, ExecError> {
    let mut suite = Vec::new();

    for entry in manifest.entries() {
        let class = ns
            .class(&entry.class_name)
            .ok_or_else(|| ExecError::UnresolvedClass(entry.class_name.clone()))?;

        for method in &entry.methods {
            let func = find_method(class, method).ok_or_else(|| ExecError::UnresolvedMethod {
                class: entry.class_name.clone(),
                method: method.clone(),
            })?;
            suite.push(TestCase {
                class_name: entry.class_name.clone(),
                method_name: method.clone(),
                body: func.body.clone(),
            });
        }
    }

    Ok(suite)
}

/// A method resolves only if directly declared on the class; harvested names
/// that came from nested scopes do not.
fn find_method<'a>(class: &'a ClassDecl, name: &str) -> Option<&'a FunctionDecl> {
    class.body.iter().find_map(|stmt| match &stmt.node {
        Statement::Function(func) if func.name == name => Some(func),
        _ => None,
    })
}

/// Run a built suite through the reporter, returning the summary.
///
/// A failing or erroring test never halts the remaining suite.
pub fn run_suite(ns: &Namespace, suite: &[TestCase], reporter: &mut dyn TestReporter) -> TestSummary {
    let start = Instant::now();
    let mut failures = 0;
    let mut errors = 0;

    reporter.on_run_start(suite.len());

    for test in suite {
        reporter.on_test_start(test);
        let outcome = run_single_test(ns, test);
        match &outcome {
            TestOutcome::Passed(_) => {}
            TestOutcome::Failed(_, _) => failures += 1,
            TestOutcome::Errored(_, _) => errors += 1,
        }
        reporter.on_test_complete(test, &outcome);
    }

    let summary = TestSummary {
        run: suite.len(),
        failures,
        errors,
        duration: start.elapsed(),
    };
    reporter.on_run_complete(&summary);
    summary
}

fn run_single_test(ns: &Namespace, test: &TestCase) -> TestOutcome {
    let start = Instant::now();

    let mut interp = Interpreter::new(&ns.globals);
    interp.bind("self", Value::Instance(test.class_name.clone()));

    match interp.run(&test.body) {
        Ok(()) => TestOutcome::Passed(start.elapsed()),
        Err(failure @ RuntimeError::AssertionFailure { .. }) => {
            TestOutcome::Failed(start.elapsed(), failure.to_string())
        }
        Err(error) => TestOutcome::Errored(start.elapsed(), error.to_string()),
    }
}

/// Execute a transformed program end to end: materialize, resolve, run.
///
/// Resolution happens before any test executes, so a [`ExecError`] aborts the
/// run with no partial report.
#[tracing::instrument(skip_all)]
pub fn execute(
    program: &Program,
    manifest: &SuiteManifest,
    reporter: &mut dyn TestReporter,
) -> Result<TestSummary, ExecError> {
    let ns = materialize(program)?;
    let suite = build_suite(&ns, manifest)?;
    tracing::debug!(test_count = suite.len(), "suite built");
    Ok(run_suite(&ns, &suite, reporter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::reporter::RecordingReporter;
    use crate::transform;
    use specrun_syntax::{lexer, parser};

    fn pipeline(source: &str) -> transform::TransformOutcome {
        let tokens = lexer::lex(source).unwrap();
        let program = parser::parse(&tokens).unwrap();
        transform::transform(program)
    }

    #[test]
    fn test_materialize_binds_classes_and_imports() {
        let outcome = pipeline("class AdditionSpec:\n  def test_sum(self):\n    1 + 1 == 2\n");
        let ns = materialize(&outcome.program).unwrap();
        assert!(ns.class("AdditionSpec").is_some());
        assert_eq!(ns.globals.get("testkit"), Some(&Value::Module("testkit".into())));
    }

    #[test]
    fn test_unresolved_class_aborts_suite_construction() {
        // A spec class declared inside a function is harvested by the
        // recursive walk but never materialized at top level.
        let outcome = pipeline("def build():\n  class InnerSpec:\n    def test_inner(self):\n      pass\n");
        assert_eq!(outcome.manifest.methods_for("InnerSpec"), Some(&["test_inner".to_string()][..]));

        let ns = materialize(&outcome.program).unwrap();
        let err = build_suite(&ns, &outcome.manifest).unwrap_err();
        assert!(matches!(err, ExecError::UnresolvedClass(name) if name == "InnerSpec"));
    }

    #[test]
    fn test_harvested_nested_function_does_not_resolve() {
        let outcome = pipeline(
            "class OuterSpec:\n  def test_outer(self):\n    def nested_check():\n      pass\n    pass\n",
        );
        let ns = materialize(&outcome.program).unwrap();
        let err = build_suite(&ns, &outcome.manifest).unwrap_err();
        assert!(
            matches!(err, ExecError::UnresolvedMethod { ref method, .. } if method == "nested_check"),
            "nested definitions are harvested but not invocable"
        );
    }

    #[test]
    fn test_suite_runs_in_harvest_order() {
        let outcome = pipeline(
            "class FirstSpec:\n  def test_b(self):\n    1 == 1\n  def test_a(self):\n    2 == 2\n",
        );
        let ns = materialize(&outcome.program).unwrap();
        let suite = build_suite(&ns, &outcome.manifest).unwrap();
        let mut reporter = RecordingReporter::default();
        run_suite(&ns, &suite, &mut reporter);

        let names: Vec<_> = reporter.completed.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, vec!["FirstSpec::test_b", "FirstSpec::test_a"]);
    }

    #[test]
    fn test_failing_test_does_not_halt_suite() {
        let outcome = pipeline(
            "class MixedSpec:\n  def test_fails(self):\n    1 == 2\n  def test_passes(self):\n    3 == 3\n",
        );
        let mut reporter = RecordingReporter::default();
        let summary = execute(&outcome.program, &outcome.manifest, &mut reporter).unwrap();

        assert_eq!(summary.run, 2);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.errors, 0);
        assert!(matches!(reporter.completed[1].1, TestOutcome::Passed(_)));
    }

    #[test]
    fn test_runtime_error_is_recorded_as_error_outcome() {
        let outcome = pipeline("class BrokenSpec:\n  def test_unknown(self):\n    missing == 1\n");
        let mut reporter = RecordingReporter::default();
        let summary = execute(&outcome.program, &outcome.manifest, &mut reporter).unwrap();

        assert_eq!(summary.errors, 1);
        assert!(matches!(reporter.completed[0].1, TestOutcome::Errored(_, _)));
    }
}
