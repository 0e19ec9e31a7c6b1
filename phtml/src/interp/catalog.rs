//! Global function table

use super::error::{InterpResult, RuntimeError};
use super::value::Type;
use crate::ast::Node;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Formal parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

/// A loaded function. The body borrows from the parser's tree.
#[derive(Debug, Clone)]
pub struct FunctionDef<'ast> {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Parameter>,
    /// `command_list` node; `None` for an empty body
    pub body: Option<&'ast Node>,
}

impl FunctionDef<'_> {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for FunctionDef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", p.name, p.ty)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// Flat name → function table shared by every frame
///
/// Entries are reference counted so a call can hold its definition while
/// the interpreter is borrowed mutably.
#[derive(Debug, Default)]
pub struct Catalog<'ast> {
    /// Keyed in first-registration order
    functions: IndexMap<String, Rc<FunctionDef<'ast>>>,
}

impl<'ast> Catalog<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function. A later definition with the same name replaces
    /// the earlier one.
    pub fn register(&mut self, def: FunctionDef<'ast>) {
        tracing::debug!(function = %def, "register function");
        if self.functions.contains_key(&def.name) {
            tracing::warn!(name = %def.name, "function redefined; later definition wins");
        }
        self.functions.insert(def.name.clone(), Rc::new(def));
    }

    pub fn resolve(&self, name: &str) -> InterpResult<&Rc<FunctionDef<'ast>>> {
        self.functions
            .get(name)
            .ok_or_else(|| RuntimeError::undefined_function(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Functions in the order their names were first registered
    pub fn iter(&self) -> impl Iterator<Item = &FunctionDef<'ast>> {
        self.functions.values().map(Rc::as_ref)
    }
}
