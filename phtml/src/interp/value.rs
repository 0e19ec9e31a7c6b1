//! Runtime values for the interpreter

use super::error::{InterpResult, RuntimeError};
use crate::ast::NodeKind;
use std::fmt;

/// Declared primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Char,
    Bool,
    String,
    Void,
}

impl Type {
    /// Classify a declared type name
    pub fn classify(name: &str) -> InterpResult<Type> {
        match name {
            "int" => Ok(Type::Int),
            "float" => Ok(Type::Float),
            "char" => Ok(Type::Char),
            "bool" => Ok(Type::Bool),
            "string" => Ok(Type::String),
            "void" => Ok(Type::Void),
            _ => Err(RuntimeError::unknown_type(name)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Char => "char",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Void => "void",
        }
    }

    /// Value a declaration of this type starts out with
    pub fn default_value(self) -> Value {
        match self {
            Type::Int => Value::Int(0),
            Type::Float => Value::Float(0.0),
            Type::Char => Value::Char('\0'),
            Type::Bool => Value::Bool(false),
            Type::String => Value::Str(String::new()),
            Type::Void => Value::Void,
        }
    }

    /// Convert literal text to a value of this type
    pub fn parse_literal(self, text: &str) -> InterpResult<Value> {
        match self {
            Type::Int => text
                .trim()
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|_| RuntimeError::malformed(NodeKind::Number, &format!("invalid int literal {text:?}"))),
            Type::Float => text
                .trim()
                .parse::<f32>()
                .map(Value::Float)
                .map_err(|_| RuntimeError::malformed(NodeKind::Number, &format!("invalid float literal {text:?}"))),
            Type::Char => Ok(Value::Char(text.chars().next().unwrap_or('\0'))),
            Type::Bool => match text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(RuntimeError::invalid_boolean(text)),
            },
            Type::String => Ok(Value::Str(text.to_string())),
            Type::Void => Ok(Value::Void),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value
///
/// A `Str` owns its buffer; cloning a value deep-copies it, so two
/// bindings never share string storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Char(char),
    Bool(bool),
    Str(String),
    Void,
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Char(_) => Type::Char,
            Value::Bool(_) => Type::Bool,
            Value::Str(_) => Type::String,
            Value::Void => Type::Void,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Reinterpret a string holding exactly `true` or `false` as a Bool.
    ///
    /// Applied whenever a value is stored into a variable and when a
    /// string-bound variable is read back.
    pub fn fixup(self) -> Value {
        match self {
            Value::Str(s) if s == "true" => Value::Bool(true),
            Value::Str(s) if s == "false" => Value::Bool(false),
            other => other,
        }
    }

    /// Whether [`Value::fixup`] would change this value
    pub fn needs_fixup(&self) -> bool {
        matches!(self, Value::Str(s) if s == "true" || s == "false")
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value promoted to float
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f32),
            _ => None,
        }
    }

    /// Text form used by `print` and string concatenation
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:.6}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Void => Ok(()),
        }
    }
}
