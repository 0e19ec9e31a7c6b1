//! Constructors for syntax trees in the parser's shape
//!
//! Lets embedders and tests assemble programs without running the parser.

use super::{Node, NodeKind};

/// `function_list` holding the given declarations
pub fn program(functions: Vec<Node>) -> Node {
    Node::branch(NodeKind::FunctionList, functions)
}

/// `function_declaration`; `params` are [`param`] nodes
pub fn function(name: &str, return_type: &str, params: Vec<Node>, body: Vec<Node>) -> Node {
    let mut children = vec![ident(name), ty(return_type)];
    if !params.is_empty() {
        children.push(Node::branch(NodeKind::ParameterList, params));
    }
    if !body.is_empty() {
        children.push(block(body));
    }
    Node::branch(NodeKind::FunctionDeclaration, children)
}

pub fn param(type_name: &str, name: &str) -> Node {
    Node::branch(NodeKind::Parameter, vec![ty(type_name), ident(name)])
}

/// `type` wrapping a `primitive_type`
pub fn ty(name: &str) -> Node {
    Node::branch(NodeKind::Type, vec![Node::leaf(NodeKind::PrimitiveType, name)])
}

pub fn block(statements: Vec<Node>) -> Node {
    Node::branch(NodeKind::CommandList, statements)
}

pub fn var(type_name: &str, name: &str) -> Node {
    Node::branch(NodeKind::VariableDeclaration, vec![ty(type_name), ident(name)])
}

pub fn assign(name: &str, value: Node) -> Node {
    Node::branch(NodeKind::Assignment, vec![ident(name), expr(value)])
}

pub fn if_(cond: Node, then: Vec<Node>, otherwise: Option<Vec<Node>>) -> Node {
    let mut children = vec![expr(cond)];
    if !then.is_empty() {
        children.push(block(then));
    }
    if let Some(stmts) = otherwise {
        let inner = if stmts.is_empty() { Vec::new() } else { vec![block(stmts)] };
        children.push(Node::branch(NodeKind::ElseOptional, inner));
    }
    Node::branch(NodeKind::IfStructure, children)
}

pub fn while_(cond: Node, body: Vec<Node>) -> Node {
    let mut children = vec![expr(cond)];
    if !body.is_empty() {
        children.push(block(body));
    }
    Node::branch(NodeKind::WhileStructure, children)
}

/// `function_call` with an `args_block > arg_list > arg*` argument shape
pub fn call(name: &str, args: Vec<Node>) -> Node {
    let mut children = vec![ident(name)];
    if !args.is_empty() {
        let list = args
            .into_iter()
            .map(|a| Node::branch(NodeKind::Arg, vec![expr(a)]))
            .collect();
        children.push(Node::branch(
            NodeKind::ArgsBlock,
            vec![Node::branch(NodeKind::ArgList, list)],
        ));
    }
    Node::branch(NodeKind::FunctionCall, children)
}

pub fn ret(value: Node) -> Node {
    Node::branch(NodeKind::Return, vec![expr(value)])
}

/// `return` without an expression
pub fn ret_void() -> Node {
    Node::branch(NodeKind::Return, Vec::new())
}

pub fn print(value: Node) -> Node {
    Node::branch(NodeKind::Print, vec![expr(value)])
}

/// Wrap in an `expression` node, as the parser does for every expression slot
pub fn expr(inner: Node) -> Node {
    if inner.is(NodeKind::Expression) {
        inner
    } else {
        Node::branch(NodeKind::Expression, vec![inner])
    }
}

pub fn ident(name: &str) -> Node {
    Node::leaf(NodeKind::Identifier, name)
}

pub fn int(n: i32) -> Node {
    Node::leaf(NodeKind::Number, n.to_string())
}

/// Number literal from its source text (`"2.5"`, `"10"`)
pub fn number(text: &str) -> Node {
    Node::leaf(NodeKind::Number, text)
}

/// String literal; quotes are added as they appear in source
pub fn string(s: &str) -> Node {
    Node::leaf(NodeKind::String, format!("\"{s}\""))
}

pub fn character(c: char) -> Node {
    Node::leaf(NodeKind::Character, format!("'{c}'"))
}

pub fn boolean(b: bool) -> Node {
    Node::leaf(NodeKind::Boolean, if b { "true" } else { "false" })
}

pub fn symbol(text: &str) -> Node {
    Node::leaf(NodeKind::Symbol, text)
}

/// Binary expression; the precedence layer is chosen from the operator
pub fn binary(lhs: Node, op: &str, rhs: Node) -> Node {
    let kind = match op {
        "||" => NodeKind::LogicalOr,
        "&&" => NodeKind::LogicalAnd,
        "==" | "!=" => NodeKind::Equality,
        "<" | "<=" | ">" | ">=" => NodeKind::Relational,
        "+" | "-" => NodeKind::Sum,
        _ => NodeKind::Product,
    };
    Node::branch(kind, vec![lhs, symbol(op), rhs])
}

pub fn unary(op: &str, operand: Node) -> Node {
    Node::branch(NodeKind::Unary, vec![symbol(op), operand])
}

/// Parenthesized expression
pub fn paren(inner: Node) -> Node {
    Node::branch(NodeKind::Primary, vec![symbol("("), expr(inner), symbol(")")])
}
