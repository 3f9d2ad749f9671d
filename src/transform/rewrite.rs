//! Assertion rewriting.

use specrun_syntax::ast::{CallArg, CompareExpr, Expr, Literal, Spanned, Statement};

use super::ASSERT_EQUALS;

/// Rewrite every bare comparison statement in a class subtree into an explicit
/// assertion call.
///
/// Only expression statements whose value is exactly a comparison are touched;
/// any other expression statement passes through unmodified as a policy
/// choice. The walk descends into nested functions and classes.
pub(super) fn rewrite_assertions(stmts: &mut [Spanned<Statement>]) {
    for stmt in stmts {
        match &mut stmt.node {
            Statement::Expr(value) => {
                let current = std::mem::replace(&mut value.node, Expr::Literal(Literal::None));
                match current {
                    Expr::Compare(cmp) => *value = assertion_call(cmp),
                    other => value.node = other,
                }
            }
            Statement::Function(func) => rewrite_assertions(&mut func.body),
            Statement::Class(class) => rewrite_assertions(&mut class.body),
            _ => {}
        }
    }
}

/// Build `self.assertEquals(left, first_comparand)`.
///
/// The comparator is discarded entirely and any further chained comparands are
/// silently dropped: ordering and inequality comparisons collapse into an
/// equality assertion. The synthesized nodes carry placeholder spans until the
/// finalizer runs.
fn assertion_call(cmp: CompareExpr) -> Spanned<Expr> {
    let receiver = Spanned::synthesized(Expr::Ident("self".to_string()));
    let callee = Spanned::synthesized(Expr::Attribute(Box::new(receiver), ASSERT_EQUALS.to_string()));

    let mut args = vec![CallArg::Positional(*cmp.left)];
    if let Some(first) = cmp.comparators.into_iter().next() {
        args.push(CallArg::Positional(first));
    }

    Spanned::synthesized(Expr::Call(Box::new(callee), args))
}
