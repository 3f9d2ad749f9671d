//! Spec class detection and dispatch.

use specrun_syntax::ast::{ClassDecl, Expr, Program, Spanned, Statement};

use super::harvest::MethodHarvester;
use super::rewrite::rewrite_assertions;
use super::{SuiteManifest, SPEC_SUFFIX, TESTKIT_MODULE, TEST_CASE_ATTR};

/// Walk the program and transform every class whose name ends in the spec
/// suffix.
///
/// The walk recurses into all nested scopes, so classes declared inside
/// functions or other classes are detected too. Non-matching classes are
/// visited but never mutated; the predicate is purely name-based and any
/// class shape is accepted.
pub(super) fn detect_spec_classes(program: &mut Program, manifest: &mut SuiteManifest) {
    walk(&mut program.body, manifest);
}

fn walk(stmts: &mut [Spanned<Statement>], manifest: &mut SuiteManifest) {
    for stmt in stmts {
        match &mut stmt.node {
            Statement::Class(class) => {
                if class.name.ends_with(SPEC_SUFFIX) {
                    tracing::debug!(class = %class.name, "detected spec class");
                    grant_test_case_capability(class);
                    // Harvest before rewriting so collected names reflect the
                    // original body.
                    MethodHarvester::new(&class.name, manifest).harvest(&class.body);
                    rewrite_assertions(&mut class.body);
                }
                walk(&mut class.body, manifest);
            }
            Statement::Function(func) => walk(&mut func.body, manifest),
            _ => {}
        }
    }
}

/// Append the `testkit.TestCase` capability reference to the class's base
/// list, making the class runnable by the test framework.
fn grant_test_case_capability(class: &mut ClassDecl) {
    let module = Spanned::synthesized(Expr::Ident(TESTKIT_MODULE.to_string()));
    let capability = Expr::Attribute(Box::new(module), TEST_CASE_ATTR.to_string());
    class.bases.push(Spanned::synthesized(capability));
}

#[cfg(test)]
mod tests {
    use super::*;
    use specrun_syntax::{lexer, parser};

    fn program(source: &str) -> Program {
        let tokens = lexer::lex(source).unwrap();
        parser::parse(&tokens).unwrap()
    }

    fn is_test_case_base(base: &Spanned<Expr>) -> bool {
        matches!(&base.node, Expr::Attribute(module, attr)
            if attr == TEST_CASE_ATTR && matches!(&module.node, Expr::Ident(s) if s == TESTKIT_MODULE))
    }

    #[test]
    fn test_spec_class_gains_capability() {
        let mut program = program("class AdditionSpec:\n  pass\n");
        let mut manifest = SuiteManifest::new();
        detect_spec_classes(&mut program, &mut manifest);

        let Statement::Class(class) = &program.body[0].node else {
            panic!("Expected class");
        };
        assert_eq!(class.bases.len(), 1);
        assert!(is_test_case_base(&class.bases[0]));
    }

    #[test]
    fn test_existing_bases_are_preserved() {
        let mut program = program("class MixedSpec(Base):\n  pass\n");
        let mut manifest = SuiteManifest::new();
        detect_spec_classes(&mut program, &mut manifest);

        let Statement::Class(class) = &program.body[0].node else {
            panic!("Expected class");
        };
        assert_eq!(class.bases.len(), 2);
        assert!(matches!(&class.bases[0].node, Expr::Ident(s) if s == "Base"));
        assert!(is_test_case_base(&class.bases[1]));
    }

    #[test]
    fn test_non_matching_class_is_untouched() {
        let mut prog = program("class Helpers:\n  def test_like(self):\n    1 == 1\n");
        let before = prog.clone();
        let mut manifest = SuiteManifest::new();
        detect_spec_classes(&mut prog, &mut manifest);

        assert_eq!(prog, before, "non-matching classes stay bit-for-bit unchanged");
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_class_nested_in_function_is_detected() {
        let mut prog = program("def build():\n  class InnerSpec:\n    def test_inner(self):\n      pass\n");
        let mut manifest = SuiteManifest::new();
        detect_spec_classes(&mut prog, &mut manifest);

        assert_eq!(manifest.methods_for("InnerSpec"), Some(&["test_inner".to_string()][..]));
    }
}
