//! Property-based tests for the transformation pipeline.
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;

use specrun::ast::{CallArg, Expr, Statement};
use specrun::runtime::reporter::RecordingReporter;
use specrun::runtime::{self, TestOutcome};
use specrun::transform;
use specrun::{lexer, parser};

fn pipeline(source: &str) -> transform::TransformOutcome {
    let tokens = lexer::lex(source).unwrap();
    let program = parser::parse(&tokens).unwrap();
    transform::transform(program)
}

// Strategy for generating valid spec-language identifiers
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("Not a keyword", |s| {
        !matches!(s.as_str(), "class" | "def" | "import" | "return" | "pass" | "not")
    })
}

/// Every comparator spelling rewrites to the same `self.assertEquals` call.
#[test]
fn every_comparator_rewrites_to_assert_equals() {
    for op in ["==", "!=", "<", "<=", ">", ">="] {
        let source = format!("class CmpSpec:\n  def test_cmp(self):\n    1 {} 2\n", op);
        let outcome = pipeline(&source);

        let Statement::Class(class) = &outcome.program.body[1].node else {
            panic!("Expected class");
        };
        let Statement::Function(method) = &class.body[0].node else {
            panic!("Expected method");
        };
        let Statement::Expr(value) = &method.body[0].node else {
            panic!("Expected expression statement");
        };
        let Expr::Call(func, args) = &value.node else {
            panic!("`1 {} 2` should have been rewritten to a call", op);
        };
        assert!(
            matches!(&func.node, Expr::Attribute(_, attr) if attr == "assertEquals"),
            "comparator {:?} must collapse into assertEquals",
            op
        );
        assert_eq!(args.len(), 2);
        assert!(matches!(&args[0], CallArg::Positional(_)));
    }
}

proptest! {
    /// Underscore-prefixed names never reach the manifest; everything else does.
    #[test]
    fn underscore_prefix_is_the_sole_filter(name in ident_strategy(), helper in ident_strategy()) {
        let source = format!(
            "class GenSpec:\n  def {name}(self):\n    pass\n  def _{helper}(self):\n    pass\n",
        );
        let outcome = pipeline(&source);

        let methods = outcome.manifest.methods_for("GenSpec").unwrap_or(&[]);
        prop_assert_eq!(methods, &[name.clone()][..]);
        prop_assert!(methods.iter().all(|m| !m.starts_with('_')));
    }

    /// The rewritten test passes exactly when the left operand equals the
    /// first comparand, regardless of the comparator written in the source.
    #[test]
    fn collapse_makes_pass_depend_only_on_equality(a in -1000i64..1000, b in -1000i64..1000) {
        let source = format!("class PropSpec:\n  def test_prop(self):\n    {a} > {b}\n");
        let outcome = pipeline(&source);

        let mut reporter = RecordingReporter::default();
        let summary = runtime::execute(&outcome.program, &outcome.manifest, &mut reporter).unwrap();

        prop_assert_eq!(summary.run, 1);
        if a == b {
            prop_assert!(matches!(reporter.completed[0].1, TestOutcome::Passed(_)));
        } else {
            prop_assert!(matches!(reporter.completed[0].1, TestOutcome::Failed(_, _)));
        }
    }
}
