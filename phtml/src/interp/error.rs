//! Runtime errors for the interpreter

use crate::ast::NodeKind;
use thiserror::Error;

/// Runtime error during loading or interpretation
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Type name outside the primitive set
    UnknownType,
    /// Bool literal that is neither `true` nor `false`
    InvalidBooleanLiteral,
    UndefinedVariable,
    UndefinedFunction,
    /// Argument count mismatch
    ArityMismatch,
    TypeMismatch,
    DivisionByZero,
    /// No `main` function; reported but not fatal
    MissingEntryPoint,
    /// Syntax tree does not have the expected shape
    MalformedNode,
    /// Call depth exceeded the configured limit
    RecursionLimit,
    /// Writing program output failed
    Io,
}

impl RuntimeError {
    pub fn unknown_type(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UnknownType,
            message: format!("unknown type: {name}"),
        }
    }

    pub fn invalid_boolean(text: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::InvalidBooleanLiteral,
            message: format!("invalid boolean literal: {text}"),
        }
    }

    pub fn undefined_variable(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedVariable,
            message: format!("undefined variable: {name}"),
        }
    }

    pub fn undefined_function(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedFunction,
            message: format!("undefined function: {name}"),
        }
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::ArityMismatch,
            message: format!("function {name} expects {expected} argument(s), got {got}"),
        }
    }

    /// Operator applied to operand kinds it does not support
    pub fn type_mismatch(op: &str, left: &str, right: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeMismatch,
            message: format!("type mismatch: operator {op} on {left} and {right}"),
        }
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeMismatch,
            message: format!("type mismatch: expected {expected}, got {got}"),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn missing_entry_point() -> Self {
        RuntimeError {
            kind: ErrorKind::MissingEntryPoint,
            message: "function 'main' not found".to_string(),
        }
    }

    pub fn malformed(kind: NodeKind, detail: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::MalformedNode,
            message: format!("malformed {kind} node: {detail}"),
        }
    }

    pub fn recursion_limit(limit: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::RecursionLimit,
            message: format!("call depth exceeded limit of {limit}"),
        }
    }

    pub fn io_error(err: &std::io::Error) -> Self {
        RuntimeError {
            kind: ErrorKind::Io,
            message: format!("IO error: {err}"),
        }
    }

    /// Whether the error aborts the run. A missing `main` is only reported.
    pub fn is_fatal(&self) -> bool {
        self.kind != ErrorKind::MissingEntryPoint
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::io_error(&err)
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_variable() {
        let err = RuntimeError::undefined_variable("foo");
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert!(err.message.contains("foo"));
    }

    #[test]
    fn test_type_mismatch_names_both_kinds() {
        let err = RuntimeError::type_mismatch("&&", "int", "bool");
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.message.contains("int"));
        assert!(err.message.contains("bool"));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = RuntimeError::arity_mismatch("foo", 3, 2);
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        assert!(err.message.contains("3"));
        assert!(err.message.contains("2"));
    }

    #[test]
    fn test_malformed_names_node() {
        let err = RuntimeError::malformed(NodeKind::FunctionCall, "missing identifier");
        assert_eq!(err.kind, ErrorKind::MalformedNode);
        assert_eq!(err.to_string(), "malformed function_call node: missing identifier");
    }

    #[test]
    fn test_only_missing_entry_point_is_not_fatal() {
        assert!(!RuntimeError::missing_entry_point().is_fatal());
        assert!(RuntimeError::division_by_zero().is_fatal());
        assert!(RuntimeError::unknown_type("list").is_fatal());
    }
}
