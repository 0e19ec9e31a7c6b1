//! Expression evaluator

use super::catalog::Catalog;
use super::config::Config;
use super::env::{Environment, FrameId};
use super::error::{InterpResult, RuntimeError};
use super::value::{Type, Value};
use crate::ast::{Node, NodeKind};
use std::io::Write;

/// Stack growth parameters for deep recursion
pub(super) const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
pub(super) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter
///
/// Borrows function bodies from the syntax tree (`'ast`) and writes
/// `print` output to `out`.
pub struct Interpreter<'ast, W: Write> {
    pub(super) catalog: Catalog<'ast>,
    pub(super) env: Environment,
    pub(super) out: W,
    pub(super) config: Config,
    /// Current call depth
    pub(super) call_depth: usize,
}

impl<'ast, W: Write> Interpreter<'ast, W> {
    pub fn new(catalog: Catalog<'ast>, out: W, config: Config) -> Self {
        Interpreter {
            catalog,
            env: Environment::new(),
            out,
            config,
            call_depth: 0,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Evaluate an expression with automatic stack growth for deep recursion.
    ///
    /// Only a nested function call can change the environment.
    pub fn evaluate(&mut self, node: &'ast Node, frame: FrameId) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(node, frame))
    }

    fn eval_inner(&mut self, node: &'ast Node, frame: FrameId) -> InterpResult<Value> {
        match node.kind {
            NodeKind::Number => number_literal(&node.text),
            NodeKind::String => Ok(string_literal(&node.text)),
            NodeKind::Character => Ok(char_literal(&node.text)),
            NodeKind::Boolean => Type::Bool.parse_literal(&node.text),
            NodeKind::Identifier => self.env.lookup(frame, &node.text),
            NodeKind::FunctionCall => self.call(node, frame),
            NodeKind::Primary => {
                let inner = node
                    .expression()
                    .ok_or_else(|| RuntimeError::malformed(node.kind, "empty primary expression"))?;
                self.evaluate(inner, frame)
            }
            NodeKind::Unary => self.eval_unary_node(node, frame),
            kind if kind.is_binary_layer() => self.eval_layer(node, frame),
            kind => Err(RuntimeError::malformed(kind, "expected an expression")),
        }
    }

    /// `symbol operand`, or a single pass-through operand
    fn eval_unary_node(&mut self, node: &'ast Node, frame: FrameId) -> InterpResult<Value> {
        match node.children.as_slice() {
            [operand] => self.evaluate(operand, frame),
            [op, operand] if op.is(NodeKind::Symbol) => {
                let val = self.evaluate(operand, frame)?;
                eval_unary(&op.text, val)
            }
            _ => Err(RuntimeError::malformed(node.kind, "expected operator and operand")),
        }
    }

    /// `operand (symbol operand)*`, folded left to right.
    ///
    /// Both operands are always evaluated; `&&` and `||` do not short-circuit.
    fn eval_layer(&mut self, node: &'ast Node, frame: FrameId) -> InterpResult<Value> {
        let (first, rest) = node
            .children
            .split_first()
            .ok_or_else(|| RuntimeError::malformed(node.kind, "no operands"))?;
        if rest.len() % 2 != 0 {
            return Err(RuntimeError::malformed(node.kind, "operator without right operand"));
        }

        let mut acc = self.evaluate(first, frame)?;
        for pair in rest.chunks_exact(2) {
            let (op, rhs) = (&pair[0], &pair[1]);
            if !op.is(NodeKind::Symbol) {
                return Err(RuntimeError::malformed(node.kind, "expected operator"));
            }
            let right = self.evaluate(rhs, frame)?;
            acc = eval_binary(&op.text, acc, right)?;
        }
        Ok(acc)
    }
}

/// Number literal: a `.` makes it a float
fn number_literal(text: &str) -> InterpResult<Value> {
    if text.contains('.') {
        Type::Float.parse_literal(text)
    } else {
        Type::Int.parse_literal(text)
    }
}

/// String literal with its quotes stripped. Unquoted `true` / `false`
/// reach the evaluator as strings from some parser paths and are Bools.
fn string_literal(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    Value::Str(inner.to_string())
}

/// Character literal: the code unit after the opening quote
fn char_literal(text: &str) -> Value {
    let body = text.strip_prefix('\'').unwrap_or(text);
    Value::Char(body.chars().next().unwrap_or('\0'))
}

/// Evaluate unary operation
pub fn eval_unary(op: &str, val: Value) -> InterpResult<Value> {
    match (op, &val) {
        ("-", Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        ("-", Value::Float(f)) => Ok(Value::Float(-f)),
        ("-", _) => Err(RuntimeError::type_error("int or float", val.type_name())),
        ("!", Value::Bool(b)) => Ok(Value::Bool(!b)),
        ("!", _) => Err(RuntimeError::type_error("bool", val.type_name())),
        _ => Err(RuntimeError::malformed(
            NodeKind::Unary,
            &format!("unknown operator {op}"),
        )),
    }
}

/// Evaluate binary operation
pub fn eval_binary(op: &str, left: Value, right: Value) -> InterpResult<Value> {
    let mismatch = || RuntimeError::type_mismatch(op, left.type_name(), right.type_name());
    match op {
        // Logical
        "||" | "&&" => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => {
                Ok(Value::Bool(if op == "||" { *a || *b } else { *a && *b }))
            }
            _ => Err(mismatch()),
        },

        // Equality
        "==" | "!=" => {
            let eq = match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => a == b,
                (Value::Float(a), Value::Float(b)) => a == b,
                (Value::Char(a), Value::Char(b)) => a == b,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Str(a), Value::Str(b)) => a == b,
                _ => return Err(mismatch()),
            };
            Ok(Value::Bool(if op == "==" { eq } else { !eq }))
        }

        // Relational
        "<" | "<=" | ">" | ">=" => {
            let holds = match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => relate(op, a, b),
                (Value::Float(a), Value::Float(b)) => relate(op, a, b),
                (Value::Char(a), Value::Char(b)) => relate(op, a, b),
                _ => return Err(mismatch()),
            };
            Ok(Value::Bool(holds))
        }

        // Arithmetic
        "+" => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
            (Value::Str(_), _) | (_, Value::Str(_)) => {
                Ok(Value::Str(format!("{}{}", left.render(), right.render())))
            }
            _ => numeric(&left, &right)
                .map(|(a, b)| Value::Float(a + b))
                .ok_or_else(mismatch),
        },
        "-" => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
            _ => numeric(&left, &right)
                .map(|(a, b)| Value::Float(a - b))
                .ok_or_else(mismatch),
        },
        "*" => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
            _ => numeric(&left, &right)
                .map(|(a, b)| Value::Float(a * b))
                .ok_or_else(mismatch),
        },
        "/" => {
            // Divisor is checked before the operand kinds
            if matches!(right, Value::Int(0)) || matches!(right, Value::Float(f) if f == 0.0) {
                return Err(RuntimeError::division_by_zero());
            }
            match (&left, &right) {
                // Truncates toward zero
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
                _ => numeric(&left, &right)
                    .map(|(a, b)| Value::Float(a / b))
                    .ok_or_else(mismatch),
            }
        }

        _ => Err(RuntimeError::malformed(
            NodeKind::Symbol,
            &format!("unknown operator {op}"),
        )),
    }
}

fn relate<T: PartialOrd>(op: &str, a: T, b: T) -> bool {
    match op {
        "<" => a < b,
        "<=" => a <= b,
        ">" => a > b,
        _ => a >= b,
    }
}

/// Both operands as floats when both are numeric
fn numeric(left: &Value, right: &Value) -> Option<(f32, f32)> {
    Some((left.as_float()?, right.as_float()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::interp::error::ErrorKind;

    fn eval_in(node: &Node, setup: &[(&str, Value)]) -> InterpResult<Value> {
        let mut interp = Interpreter::new(Catalog::new(), Vec::new(), Config::default());
        let root = interp.env().root();
        for (name, value) in setup {
            interp.env_mut().declare_local(root, name, value.clone());
        }
        interp.evaluate(node, root)
    }

    fn eval(node: &Node) -> InterpResult<Value> {
        eval_in(node, &[])
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval(&int(7)).unwrap(), Value::Int(7));
        assert_eq!(eval(&number("2.5")).unwrap(), Value::Float(2.5));
        assert_eq!(eval(&string("hi")).unwrap(), s("hi"));
        assert_eq!(eval(&character('q')).unwrap(), Value::Char('q'));
        assert_eq!(eval(&boolean(false)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_unquoted_bool_string_literal() {
        let node = Node::leaf(NodeKind::String, "true");
        assert_eq!(eval(&node).unwrap(), Value::Bool(true));
        assert_eq!(eval(&string("true")).unwrap(), s("true"));
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(eval(&binary(int(7), "/", int(2))).unwrap(), Value::Int(3));
        assert_eq!(
            eval(&binary(unary("-", int(7)), "/", int(2))).unwrap(),
            Value::Int(-3)
        );
    }

    #[test]
    fn test_float_division() {
        let node = binary(number("7.0"), "/", number("2.0"));
        assert_eq!(eval(&node).unwrap(), Value::Float(3.5));
    }

    #[test]
    fn test_division_by_zero() {
        for divisor in [int(0), number("0.0")] {
            let err = eval(&binary(int(1), "/", divisor)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::DivisionByZero);
        }
        // Divisor is checked before operand kinds
        let err = eval(&binary(string("a"), "/", int(0))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_numeric_promotion() {
        assert_eq!(eval(&binary(int(1), "+", number("0.5"))).unwrap(), Value::Float(1.5));
        assert_eq!(eval(&binary(number("3.0"), "*", int(2))).unwrap(), Value::Float(6.0));
        assert_eq!(eval(&binary(int(5), "-", int(7))).unwrap(), Value::Int(-2));
    }

    #[test]
    fn test_string_concat() {
        assert_eq!(eval(&binary(string("a"), "+", int(1))).unwrap(), s("a1"));
        assert_eq!(eval(&binary(string("x"), "+", boolean(true))).unwrap(), s("xtrue"));
        assert_eq!(eval(&binary(number("1.5"), "+", string("!"))).unwrap(), s("1.500000!"));
        assert_eq!(eval(&binary(character('c'), "+", string("d"))).unwrap(), s("cd"));
    }

    #[test]
    fn test_left_associative_layer() {
        // 10 - 3 - 2 as one sum layer
        let node = Node::branch(
            NodeKind::Sum,
            vec![int(10), symbol("-"), int(3), symbol("-"), int(2)],
        );
        assert_eq!(eval(&node).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_precedence_from_tree_shape() {
        // 2 + 3 * 4
        let node = binary(int(2), "+", binary(int(3), "*", int(4)));
        assert_eq!(eval(&node).unwrap(), Value::Int(14));
        // (2 + 3) * 4
        let node = binary(paren(binary(int(2), "+", int(3))), "*", int(4));
        assert_eq!(eval(&node).unwrap(), Value::Int(20));
    }

    #[test]
    fn test_logical_requires_bools() {
        let ok = binary(boolean(true), "&&", boolean(false));
        assert_eq!(eval(&ok).unwrap(), Value::Bool(false));
        let ok = binary(boolean(false), "||", boolean(true));
        assert_eq!(eval(&ok).unwrap(), Value::Bool(true));

        let err = eval(&binary(int(1), "&&", boolean(true))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.message.contains("int") && err.message.contains("bool"));
        let err = eval(&binary(int(1), "||", int(0))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_logical_does_not_short_circuit() {
        // The right operand still fails even though the left decides the result
        let node = binary(boolean(false), "&&", ident("missing"));
        let err = eval(&node).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
    }

    #[test]
    fn test_equality() {
        assert_eq!(eval(&binary(string("a"), "==", string("a"))).unwrap(), Value::Bool(true));
        assert_eq!(eval(&binary(character('a'), "!=", character('b'))).unwrap(), Value::Bool(true));
        assert_eq!(eval(&binary(boolean(true), "==", boolean(false))).unwrap(), Value::Bool(false));
        let err = eval(&binary(int(1), "==", number("1.0"))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_relational() {
        assert_eq!(eval(&binary(int(1), "<", int(2))).unwrap(), Value::Bool(true));
        assert_eq!(eval(&binary(number("2.5"), ">=", number("2.5"))).unwrap(), Value::Bool(true));
        assert_eq!(eval(&binary(character('b'), "<=", character('a'))).unwrap(), Value::Bool(false));
        let err = eval(&binary(string("a"), "<", string("b"))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        let err = eval(&binary(boolean(true), ">", boolean(false))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval(&unary("-", int(4))).unwrap(), Value::Int(-4));
        assert_eq!(eval(&unary("-", number("1.5"))).unwrap(), Value::Float(-1.5));
        assert_eq!(eval(&unary("!", boolean(true))).unwrap(), Value::Bool(false));
        assert_eq!(eval(&unary("!", unary("!", boolean(true)))).unwrap(), Value::Bool(true));
        assert_eq!(eval(&unary("-", string("x"))).unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(eval(&unary("!", int(0))).unwrap_err().kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_identifier_and_fixup_on_read() {
        let node = ident("flag");
        assert_eq!(eval_in(&node, &[("flag", Value::Bool(true))]).unwrap(), Value::Bool(true));
        assert_eq!(eval_in(&node, &[("flag", s("false"))]).unwrap(), Value::Bool(false));
        assert_eq!(eval(&node).unwrap_err().kind, ErrorKind::UndefinedVariable);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let node = binary(binary(ident("a"), "*", int(3)), "+", string("!"));
        let mut interp = Interpreter::new(Catalog::new(), Vec::new(), Config::default());
        let root = interp.env().root();
        interp.env_mut().declare_local(root, "a", Value::Int(4));
        let first = interp.evaluate(&node, root).unwrap();
        let second = interp.evaluate(&node, root).unwrap();
        assert_eq!(first, s("12!"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_operator_is_malformed() {
        let err = eval_binary("%", Value::Int(1), Value::Int(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedNode);
    }

    #[test]
    fn test_statement_is_not_an_expression() {
        let err = eval(&print(int(1))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedNode);
    }

    #[test]
    fn test_int_overflow_wraps() {
        let node = binary(int(i32::MAX), "+", int(1));
        assert_eq!(eval(&node).unwrap(), Value::Int(i32::MIN));
    }
}
