//! Syntax tree handed over by the parser
//!
//! The parser is an external collaborator: it turns tag-structured source
//! text into a tree of [`Node`]s, each tagged with a [`NodeKind`]. Leaves
//! carry literal text, interior nodes carry ordered children. The runtime
//! only reads this tree; it never mutates it.

pub mod build;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of a syntax tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // Program structure
    FunctionList,
    FunctionDeclaration,
    ParameterList,
    Parameter,
    CommandList,

    // Statements
    VariableDeclaration,
    Assignment,
    IfStructure,
    ElseOptional,
    WhileStructure,
    FunctionCall,
    ArgsBlock,
    ArgList,
    Arg,
    Return,
    Print,

    // Precedence layers, lowest first
    Expression,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Sum,
    Product,
    Unary,
    Primary,

    // Types
    Type,
    PrimitiveType,

    // Leaves
    String,
    Identifier,
    Number,
    Character,
    Boolean,
    /// Operator or punctuation token (`+`, `&&`, `(`, ...)
    Symbol,
}

impl NodeKind {
    /// Tag name as the parser spells it
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::FunctionList => "function_list",
            NodeKind::FunctionDeclaration => "function_declaration",
            NodeKind::ParameterList => "parameter_list",
            NodeKind::Parameter => "parameter",
            NodeKind::CommandList => "command_list",
            NodeKind::VariableDeclaration => "variable_declaration",
            NodeKind::Assignment => "assignment",
            NodeKind::IfStructure => "if_structure",
            NodeKind::ElseOptional => "else_optional",
            NodeKind::WhileStructure => "while_structure",
            NodeKind::FunctionCall => "function_call",
            NodeKind::ArgsBlock => "args_block",
            NodeKind::ArgList => "arg_list",
            NodeKind::Arg => "arg",
            NodeKind::Return => "return",
            NodeKind::Print => "print",
            NodeKind::Expression => "expression",
            NodeKind::LogicalOr => "logical_or",
            NodeKind::LogicalAnd => "logical_and",
            NodeKind::Equality => "equality",
            NodeKind::Relational => "relational",
            NodeKind::Sum => "sum",
            NodeKind::Product => "product",
            NodeKind::Unary => "unary",
            NodeKind::Primary => "primary",
            NodeKind::Type => "type",
            NodeKind::PrimitiveType => "primitive_type",
            NodeKind::String => "string",
            NodeKind::Identifier => "identifier",
            NodeKind::Number => "number",
            NodeKind::Character => "character",
            NodeKind::Boolean => "boolean",
            NodeKind::Symbol => "symbol",
        }
    }

    /// Binary precedence layers (`operand (symbol operand)*`)
    pub fn is_binary_layer(self) -> bool {
        matches!(
            self,
            NodeKind::Expression
                | NodeKind::LogicalOr
                | NodeKind::LogicalAnd
                | NodeKind::Equality
                | NodeKind::Relational
                | NodeKind::Sum
                | NodeKind::Product
        )
    }

    /// Any node kind that can stand where an expression is expected.
    ///
    /// The parser collapses single-child layers, so an expression slot may
    /// hold anything from `expression` down to a bare literal.
    pub fn is_expression(self) -> bool {
        self.is_binary_layer()
            || matches!(
                self,
                NodeKind::Unary
                    | NodeKind::Primary
                    | NodeKind::FunctionCall
                    | NodeKind::String
                    | NodeKind::Identifier
                    | NodeKind::Number
                    | NodeKind::Character
                    | NodeKind::Boolean
            )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A syntax tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Literal text for leaves (identifier name, number digits, quoted string, ...)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a leaf node
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Node {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create an interior node
    pub fn branch(kind: NodeKind, children: Vec<Node>) -> Self {
        Node {
            kind,
            text: String::new(),
            children,
        }
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// First child of the given kind
    pub fn child(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All children of the given kind, in order
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// First child that can be evaluated as an expression
    pub fn expression(&self) -> Option<&Node> {
        self.children.iter().find(|c| c.kind.is_expression())
    }

    /// Declared type name of a `type` / `primitive_type` node.
    ///
    /// The parser may attach the name to the `type` node itself or to its
    /// nested `primitive_type` child.
    pub fn type_name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Type | NodeKind::PrimitiveType if !self.text.is_empty() => {
                Some(self.text.as_str())
            }
            NodeKind::Type => self
                .child(NodeKind::PrimitiveType)
                .and_then(Node::type_name),
            _ => None,
        }
    }

    /// Declared type child of a declaration node
    pub fn declared_type(&self) -> Option<&str> {
        self.children
            .iter()
            .find(|c| matches!(c.kind, NodeKind::Type | NodeKind::PrimitiveType))
            .and_then(Node::type_name)
    }
}
