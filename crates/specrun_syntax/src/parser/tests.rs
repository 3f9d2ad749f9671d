#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on correctness of specific syntactic forms and on the
/// parser's error recovery behavior (avoiding cascaded errors).
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Program, Vec<CompileError>> {
        let tokens = lexer::lex(source).map_err(|_| vec![])?;
        parse(&tokens)
    }

    #[test]
    fn test_parse_class_without_bases() {
        let source = "class AdditionSpec:\n  pass\n";
        let program = parse_str(source).unwrap();
        assert_eq!(program.body.len(), 1);
        match &program.body[0].node {
            Statement::Class(c) => {
                assert_eq!(c.name, "AdditionSpec");
                assert!(c.bases.is_empty());
                assert_eq!(c.body.len(), 1);
            }
            _ => panic!("Expected class"),
        }
    }

    #[test]
    fn test_parse_class_with_dotted_base() {
        let source = "class FooSpec(testkit.TestCase):\n  pass\n";
        let program = parse_str(source).unwrap();
        match &program.body[0].node {
            Statement::Class(c) => {
                assert_eq!(c.bases.len(), 1);
                match &c.bases[0].node {
                    Expr::Attribute(value, attr) => {
                        assert_eq!(attr, "TestCase");
                        assert!(matches!(&value.node, Expr::Ident(s) if s == "testkit"));
                    }
                    other => panic!("Expected attribute base, got {:?}", other),
                }
            }
            _ => panic!("Expected class"),
        }
    }

    #[test]
    fn test_parse_function() {
        let source = "def add(a, b):\n  return a + b\n";
        let program = parse_str(source).unwrap();
        assert_eq!(program.body.len(), 1);
        match &program.body[0].node {
            Statement::Function(f) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.params, vec!["a".to_string(), "b".to_string()]);
                assert_eq!(f.body.len(), 1);
            }
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_parse_import() {
        let source = "import testkit\n";
        let program = parse_str(source).unwrap();
        match &program.body[0].node {
            Statement::Import(i) => assert_eq!(i.module, "testkit"),
            _ => panic!("Expected import"),
        }
    }

    #[test]
    fn test_parse_bare_comparison_statement() {
        let source = "def test_sum(self):\n  1 + 1 == 2\n";
        let program = parse_str(source).unwrap();
        let Statement::Function(f) = &program.body[0].node else {
            panic!("Expected function");
        };
        match &f.body[0].node {
            Statement::Expr(expr) => match &expr.node {
                Expr::Compare(cmp) => {
                    assert_eq!(cmp.ops, vec![CompareOp::Eq]);
                    assert_eq!(cmp.comparators.len(), 1);
                    assert!(matches!(&cmp.left.node, Expr::Binary(_, BinaryOp::Add, _)));
                }
                other => panic!("Expected comparison, got {:?}", other),
            },
            _ => panic!("Expected expression statement"),
        }
    }

    #[test]
    fn test_parse_chained_comparison() {
        let source = "1 < x <= 10\n";
        let program = parse_str(source).unwrap();
        let Statement::Expr(expr) = &program.body[0].node else {
            panic!("Expected expression statement");
        };
        match &expr.node {
            Expr::Compare(cmp) => {
                assert_eq!(cmp.ops, vec![CompareOp::Lt, CompareOp::LtEq]);
                assert_eq!(cmp.comparators.len(), 2);
            }
            other => panic!("Expected chained comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_call_with_named_argument() {
        let source = "self.assertEquals(1, expected=2)\n";
        let program = parse_str(source).unwrap();
        let Statement::Expr(expr) = &program.body[0].node else {
            panic!("Expected expression statement");
        };
        match &expr.node {
            Expr::Call(func, args) => {
                assert!(matches!(&func.node, Expr::Attribute(_, attr) if attr == "assertEquals"));
                assert_eq!(args.len(), 2);
                assert!(matches!(&args[0], CallArg::Positional(_)));
                assert!(matches!(&args[1], CallArg::Named(name, _) if name == "expected"));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_def_inside_class() {
        let source = "class HelperSpec:\n  def test_outer(self):\n    def inner():\n      pass\n    pass\n";
        let program = parse_str(source).unwrap();
        let Statement::Class(c) = &program.body[0].node else {
            panic!("Expected class");
        };
        let Statement::Function(outer) = &c.body[0].node else {
            panic!("Expected method");
        };
        assert!(matches!(&outer.body[0].node, Statement::Function(inner) if inner.name == "inner"));
    }

    #[test]
    fn test_parse_assignment() {
        let source = "x = 1 + 2\n";
        let program = parse_str(source).unwrap();
        match &program.body[0].node {
            Statement::Assign(a) => assert_eq!(a.name, "x"),
            _ => panic!("Expected assignment"),
        }
    }

    #[test]
    fn test_unexpected_indent_at_toplevel_is_single_clear_error() {
        let source = "  x = 1\n";
        let err = parse_str(source).expect_err("Top-level indentation should be rejected by the parser");
        assert_eq!(err.len(), 1, "Parser should return exactly one error (no cascade)");
        assert!(
            err[0].message.contains("Expected expression") && err[0].message.contains("Indent"),
            "Error message should clearly indicate the unexpected INDENT token; got: {}",
            err[0].message
        );
    }

    #[test]
    fn test_error_recovery_reports_multiple_errors() {
        let source = "def broken(:\n  pass\ndef also_broken(:\n  pass\n";
        let err = parse_str(source).expect_err("Both definitions should fail to parse");
        assert!(err.len() >= 2, "Expected at least two errors, got {:?}", err);
    }
}
