//! Span finalization for synthesized nodes.

use specrun_syntax::ast::{CallArg, Expr, Program, Span, Spanned, Statement};

/// Assign the enclosing node's span to every node still carrying the
/// placeholder span.
///
/// Runs once after all rewrites so diagnostics and reporting always have
/// usable positions; idempotent. No business logic.
pub(super) fn fix_missing_spans(program: &mut Program) {
    // Synthesized top-level statements (the test-framework binding) have no
    // enclosing node; fall back to the first real statement's span.
    let fallback = program
        .body
        .iter()
        .map(|s| s.span)
        .find(|s| !s.is_placeholder())
        .unwrap_or_default();

    for stmt in &mut program.body {
        fix_stmt(stmt, fallback);
    }
}

fn fix_stmt(stmt: &mut Spanned<Statement>, enclosing: Span) {
    if stmt.span.is_placeholder() {
        stmt.span = enclosing;
    }
    let span = stmt.span;

    match &mut stmt.node {
        Statement::Class(class) => {
            for base in &mut class.bases {
                fix_expr(base, span);
            }
            for s in &mut class.body {
                fix_stmt(s, span);
            }
        }
        Statement::Function(func) => {
            for s in &mut func.body {
                fix_stmt(s, span);
            }
        }
        Statement::Assign(assign) => fix_expr(&mut assign.value, span),
        Statement::Return(Some(expr)) => fix_expr(expr, span),
        Statement::Expr(expr) => fix_expr(expr, span),
        Statement::Import(_) | Statement::Return(None) | Statement::Pass => {}
    }
}

fn fix_expr(expr: &mut Spanned<Expr>, enclosing: Span) {
    if expr.span.is_placeholder() {
        expr.span = enclosing;
    }
    let span = expr.span;

    match &mut expr.node {
        Expr::Attribute(value, _) => fix_expr(value, span),
        Expr::Call(func, args) => {
            fix_expr(func, span);
            for arg in args {
                match arg {
                    CallArg::Positional(e) | CallArg::Named(_, e) => fix_expr(e, span),
                }
            }
        }
        Expr::Compare(cmp) => {
            fix_expr(&mut cmp.left, span);
            for comparand in &mut cmp.comparators {
                fix_expr(comparand, span);
            }
        }
        Expr::Binary(left, _, right) => {
            fix_expr(left, span);
            fix_expr(right, span);
        }
        Expr::Unary(_, inner) | Expr::Paren(inner) => fix_expr(inner, span),
        Expr::Ident(_) | Expr::Literal(_) => {}
    }
}
