//! Tree-walking evaluator for spec statements and expressions.

use std::collections::HashMap;

use specrun_syntax::ast::{BinaryOp, CallArg, CompareExpr, CompareOp, Expr, Literal, Spanned, Statement, UnaryOp};
use thiserror::Error;

use crate::transform::ASSERT_EQUALS;

use super::value::Value;

/// Errors raised while interpreting spec code.
///
/// `AssertionFailure` is the test-framework outcome; everything else is
/// recorded as an error outcome by the runner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("assertion failed: {left} != {right}")]
    AssertionFailure { left: String, right: String },

    #[error("name '{0}' is not defined")]
    UnknownName(String),

    #[error("attribute '{attr}' is not defined on '{type_name}'")]
    UnknownAttribute { type_name: &'static str, attr: String },

    #[error("object of type '{0}' is not callable")]
    NotCallable(&'static str),

    #[error("assertEquals expects 2 arguments, got {0}")]
    BadArity(usize),

    #[error("unsupported operand types for '{op}': '{left}' and '{right}'")]
    BadOperands {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("unsupported operand type for '{op}': '{operand}'")]
    BadUnaryOperand { op: &'static str, operand: &'static str },

    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),

    #[error("division by zero")]
    DivisionByZero,
}

/// Control-flow signal produced by a statement.
enum Flow {
    Continue,
    Return,
}

/// Interprets statements against a module environment.
///
/// Locals shadow the module globals; `self` is bound as an ordinary local by
/// the executor before a test method body runs.
pub struct Interpreter<'a> {
    globals: &'a HashMap<String, Value>,
    locals: HashMap<String, Value>,
}

impl<'a> Interpreter<'a> {
    pub fn new(globals: &'a HashMap<String, Value>) -> Self {
        Self {
            globals,
            locals: HashMap::new(),
        }
    }

    /// Bind a local name (used for the `self` receiver).
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.locals.insert(name.into(), value);
    }

    /// Execute a statement sequence to completion or early `return`.
    pub fn run(&mut self, body: &[Spanned<Statement>]) -> Result<(), RuntimeError> {
        for stmt in body {
            if let Flow::Return = self.exec_stmt(stmt)? {
                break;
            }
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Spanned<Statement>) -> Result<Flow, RuntimeError> {
        match &stmt.node {
            Statement::Expr(expr) => {
                self.eval(expr)?;
                Ok(Flow::Continue)
            }
            Statement::Assign(assign) => {
                let value = self.eval(&assign.value)?;
                self.locals.insert(assign.name.clone(), value);
                Ok(Flow::Continue)
            }
            Statement::Return(expr) => {
                if let Some(expr) = expr {
                    self.eval(expr)?;
                }
                Ok(Flow::Return)
            }
            // Nested definitions are not executed; they were already visited
            // by the transformation passes.
            Statement::Function(_) | Statement::Class(_) | Statement::Import(_) | Statement::Pass => {
                Ok(Flow::Continue)
            }
        }
    }

    /// Evaluate an expression to a value.
    pub fn eval(&mut self, expr: &Spanned<Expr>) -> Result<Value, RuntimeError> {
        match &expr.node {
            Expr::Literal(lit) => Ok(literal_value(lit)),
            Expr::Ident(name) => self
                .locals
                .get(name)
                .or_else(|| self.globals.get(name))
                .cloned()
                .ok_or_else(|| RuntimeError::UnknownName(name.clone())),
            Expr::Paren(inner) => self.eval(inner),
            Expr::Unary(op, inner) => {
                let value = self.eval(inner)?;
                eval_unary(*op, value)
            }
            Expr::Binary(left, op, right) => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                eval_binary(*op, left, right)
            }
            Expr::Compare(cmp) => self.eval_comparison(cmp),
            Expr::Call(func, args) => self.eval_call(func, args),
            Expr::Attribute(value, attr) => {
                let receiver = self.eval(value)?;
                Err(RuntimeError::UnknownAttribute {
                    type_name: receiver.type_name(),
                    attr: attr.clone(),
                })
            }
        }
    }

    /// Evaluate a chained comparison: every adjacent pair must hold.
    fn eval_comparison(&mut self, cmp: &CompareExpr) -> Result<Value, RuntimeError> {
        let mut previous = self.eval(&cmp.left)?;
        for (op, comparand) in cmp.ops.iter().zip(&cmp.comparators) {
            let current = self.eval(comparand)?;
            if !compare(*op, &previous, &current)? {
                return Ok(Value::Bool(false));
            }
            previous = current;
        }
        Ok(Value::Bool(true))
    }

    fn eval_call(&mut self, func: &Spanned<Expr>, args: &[CallArg]) -> Result<Value, RuntimeError> {
        // The only callable in this runtime is the test-case capability's
        // assertion method on the bound receiver.
        if let Expr::Attribute(receiver, attr) = &func.node {
            let receiver = self.eval(receiver)?;
            if let Value::Instance(_) = receiver {
                if attr == ASSERT_EQUALS {
                    return self.call_assert_equals(args);
                }
            }
            return Err(RuntimeError::UnknownAttribute {
                type_name: receiver.type_name(),
                attr: attr.clone(),
            });
        }

        let callee = self.eval(func)?;
        Err(RuntimeError::NotCallable(callee.type_name()))
    }

    fn call_assert_equals(&mut self, args: &[CallArg]) -> Result<Value, RuntimeError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let expr = match arg {
                CallArg::Positional(e) | CallArg::Named(_, e) => e,
            };
            values.push(self.eval(expr)?);
        }

        let [left, right] = values.as_slice() else {
            return Err(RuntimeError::BadArity(values.len()));
        };

        if left.loosely_equals(right) {
            Ok(Value::None)
        } else {
            Err(RuntimeError::AssertionFailure {
                left: left.to_string(),
                right: right.to_string(),
            })
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::Str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::None => Value::None,
    }
}

fn eval_unary(op: UnaryOp, value: Value) -> Result<Value, RuntimeError> {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or(RuntimeError::Overflow("-")),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, value) => Err(RuntimeError::BadUnaryOperand {
            op: "-",
            operand: value.type_name(),
        }),
        (UnaryOp::Not, value) => Err(RuntimeError::BadUnaryOperand {
            op: "not",
            operand: value.type_name(),
        }),
    }
}

fn eval_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (op, &left, &right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),

        (_, Value::Int(a), Value::Int(b)) => eval_int_binary(op, *a, *b),
        (_, Value::Float(a), Value::Float(b)) => eval_float_binary(op, *a, *b),
        (_, Value::Int(a), Value::Float(b)) => eval_float_binary(op, *a as f64, *b),
        (_, Value::Float(a), Value::Int(b)) => eval_float_binary(op, *a, *b as f64),

        _ => Err(RuntimeError::BadOperands {
            op: op.to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

fn eval_int_binary(op: BinaryOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add => a.checked_add(b).map(Value::Int).ok_or(RuntimeError::Overflow("+")),
        BinaryOp::Sub => a.checked_sub(b).map(Value::Int).ok_or(RuntimeError::Overflow("-")),
        BinaryOp::Mul => a.checked_mul(b).map(Value::Int).ok_or(RuntimeError::Overflow("*")),
        // True division always yields a float
        BinaryOp::Div => {
            if b == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Int(floor_div(a, b)))
            }
        }
        BinaryOp::Mod => {
            if b == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Int(floor_mod(a, b)))
            }
        }
        BinaryOp::Pow => {
            if b < 0 {
                Ok(Value::Float((a as f64).powi(b as i32)))
            } else {
                u32::try_from(b)
                    .ok()
                    .and_then(|exp| a.checked_pow(exp))
                    .map(Value::Int)
                    .ok_or(RuntimeError::Overflow("**"))
            }
        }
    }
}

fn eval_float_binary(op: BinaryOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => {
            if b == 0.0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Float(a / b))
            }
        }
        BinaryOp::FloorDiv => {
            if b == 0.0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Float((a / b).floor()))
            }
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Float(a - b * (a / b).floor()))
            }
        }
        BinaryOp::Pow => Ok(Value::Float(a.powf(b))),
    }
}

/// Floored integer division (rounds toward negative infinity).
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }
}

/// Floored remainder: the result has the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { r + b } else { r }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    match op {
        CompareOp::Eq => Ok(left.loosely_equals(right)),
        CompareOp::NotEq => Ok(!left.loosely_equals(right)),
        CompareOp::Lt | CompareOp::LtEq | CompareOp::Gt | CompareOp::GtEq => {
            let ordering = match (left, right) {
                (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
                (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
                (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
                (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                _ => None,
            };
            let Some(ordering) = ordering else {
                return Err(RuntimeError::BadOperands {
                    op: op.to_string(),
                    left: left.type_name(),
                    right: right.type_name(),
                });
            };
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::LtEq => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::GtEq => ordering.is_ge(),
                CompareOp::Eq | CompareOp::NotEq => unreachable!("handled above"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specrun_syntax::{lexer, parser};

    fn eval_source(source: &str) -> Result<Value, RuntimeError> {
        let tokens = lexer::lex(source).unwrap();
        let program = parser::parse(&tokens).unwrap();
        let Statement::Expr(expr) = &program.body[0].node else {
            panic!("Expected expression statement");
        };
        let globals = HashMap::new();
        Interpreter::new(&globals).eval(expr)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_source("1 + 2 * 3\n"), Ok(Value::Int(7)));
        assert_eq!(eval_source("2 ** 3 ** 2\n"), Ok(Value::Int(512)));
        assert_eq!(eval_source("7 // 2\n"), Ok(Value::Int(3)));
        assert_eq!(eval_source("-7 // 2\n"), Ok(Value::Int(-4)));
        assert_eq!(eval_source("7 % 3\n"), Ok(Value::Int(1)));
        assert_eq!(eval_source("-7 % 3\n"), Ok(Value::Int(2)));
        assert_eq!(eval_source("1 / 2\n"), Ok(Value::Float(0.5)));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval_source("'foo' + 'bar'\n"), Ok(Value::Str("foobar".into())));
    }

    #[test]
    fn test_chained_comparison_short_circuits() {
        assert_eq!(eval_source("1 < 2 < 3\n"), Ok(Value::Bool(true)));
        assert_eq!(eval_source("1 < 2 < 2\n"), Ok(Value::Bool(false)));
        assert_eq!(eval_source("3 > 2 == 2\n"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval_source("1 / 0\n"), Err(RuntimeError::DivisionByZero));
        assert_eq!(eval_source("1 // 0\n"), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(eval_source("missing\n"), Err(RuntimeError::UnknownName("missing".into())));
    }

    #[test]
    fn test_bad_operands() {
        assert!(matches!(
            eval_source("1 + 'x'\n"),
            Err(RuntimeError::BadOperands { .. })
        ));
        assert!(matches!(
            eval_source("None < 1\n"),
            Err(RuntimeError::BadOperands { .. })
        ));
    }

    #[test]
    fn test_assert_equals_pass_and_fail() {
        let tokens = lexer::lex("self.assertEquals(2, 2)\nself.assertEquals(2, 1)\n").unwrap();
        let program = parser::parse(&tokens).unwrap();
        let globals = HashMap::new();
        let mut interp = Interpreter::new(&globals);
        interp.bind("self", Value::Instance("OrderSpec".into()));

        let Statement::Expr(passing) = &program.body[0].node else {
            panic!("Expected expression statement");
        };
        assert_eq!(interp.eval(passing), Ok(Value::None));

        let Statement::Expr(failing) = &program.body[1].node else {
            panic!("Expected expression statement");
        };
        assert_eq!(
            interp.eval(failing),
            Err(RuntimeError::AssertionFailure {
                left: "2".into(),
                right: "1".into(),
            })
        );
    }

    #[test]
    fn test_assignment_then_use() {
        let tokens = lexer::lex("x = 2 + 3\nself.assertEquals(x, 5)\n").unwrap();
        let program = parser::parse(&tokens).unwrap();
        let globals = HashMap::new();
        let mut interp = Interpreter::new(&globals);
        interp.bind("self", Value::Instance("MathSpec".into()));
        assert_eq!(interp.run(&program.body), Ok(()));
    }

    #[test]
    fn test_return_stops_execution() {
        let tokens = lexer::lex("return\nself.assertEquals(1, 2)\n").unwrap();
        let program = parser::parse(&tokens).unwrap();
        let globals = HashMap::new();
        let mut interp = Interpreter::new(&globals);
        interp.bind("self", Value::Instance("EarlySpec".into()));
        assert_eq!(interp.run(&program.body), Ok(()), "statements after return must not run");
    }
}
