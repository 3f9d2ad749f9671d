//! Test reporting.
//!
//! ## TestReporter Trait
//!
//! The runner uses a `TestReporter` trait to separate reporting from
//! execution. This allows for custom output formats (JSON, TAP, etc.) by
//! implementing the trait; the default [`ConsoleReporter`] prints a verbose
//! per-test line plus a trailing run/failure/error summary.

use std::time::Duration;

use specrun_syntax::ast::{Spanned, Statement};

/// One runnable test: a resolved (class, method) pair with its body.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub class_name: String,
    pub method_name: String,
    pub body: Vec<Spanned<Statement>>,
}

impl TestCase {
    /// Qualified name as printed in reports.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.class_name, self.method_name)
    }
}

/// Result of running a single test.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    Passed(Duration),
    Failed(Duration, String),
    Errored(Duration, String),
}

/// Summary of a test run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    pub run: usize,
    pub failures: usize,
    pub errors: usize,
    pub duration: Duration,
}

impl TestSummary {
    pub fn is_success(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called once before the first test runs.
    fn on_run_start(&mut self, _test_count: usize) {}

    /// Called when a test begins.
    fn on_test_start(&mut self, _test: &TestCase) {}

    /// Called when a test completes.
    fn on_test_complete(&mut self, test: &TestCase, outcome: &TestOutcome);

    /// Called when all tests have completed.
    fn on_run_complete(&mut self, summary: &TestSummary);
}

/// Default console reporter (verbose, unittest-style).
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl TestReporter for ConsoleReporter {
    fn on_run_start(&mut self, test_count: usize) {
        println!("\x1b[1m=================== test session starts ===================\x1b[0m");
        println!("collected {} item(s)", test_count);
        println!();
    }

    fn on_test_complete(&mut self, test: &TestCase, outcome: &TestOutcome) {
        let status = match outcome {
            TestOutcome::Passed(d) => format!("\x1b[32mPASSED\x1b[0m ({:.0}ms)", d.as_millis()),
            TestOutcome::Failed(d, _) => format!("\x1b[31mFAILED\x1b[0m ({:.0}ms)", d.as_millis()),
            TestOutcome::Errored(d, _) => format!("\x1b[31mERROR\x1b[0m ({:.0}ms)", d.as_millis()),
        };
        println!("{} {}", test.qualified_name(), status);

        match outcome {
            TestOutcome::Failed(_, message) | TestOutcome::Errored(_, message) => {
                println!("    {}", message);
            }
            TestOutcome::Passed(_) => {}
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        println!();

        let color = if summary.is_success() { "\x1b[1;32m" } else { "\x1b[1;31m" };

        let mut parts = vec![format!("{} run", summary.run)];
        if summary.failures > 0 {
            parts.push(format!("{} failed", summary.failures));
        }
        if summary.errors > 0 {
            parts.push(format!("{} errored", summary.errors));
        }

        println!(
            "{}=================== {} in {:.2}s ===================\x1b[0m",
            color,
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

/// Recording reporter used by tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub completed: Vec<(String, TestOutcome)>,
    pub summary: Option<TestSummary>,
}

impl TestReporter for RecordingReporter {
    fn on_test_complete(&mut self, test: &TestCase, outcome: &TestOutcome) {
        self.completed.push((test.qualified_name(), outcome.clone()));
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        self.summary = Some(summary.clone());
    }
}
