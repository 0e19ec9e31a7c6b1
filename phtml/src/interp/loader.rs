//! Program loader: one walk over the tree to build the function catalog

use super::catalog::{Catalog, FunctionDef, Parameter};
use super::error::{InterpResult, RuntimeError};
use super::value::Type;
use crate::ast::{Node, NodeKind};

/// Register every function declaration in `ast`.
///
/// The root may be the `function_list` itself, a wrapper holding one, or a
/// lone `function_declaration`.
pub fn load(ast: &Node) -> InterpResult<Catalog<'_>> {
    let mut catalog = Catalog::new();
    let list = if ast.is(NodeKind::FunctionList) || ast.is(NodeKind::FunctionDeclaration) {
        ast
    } else {
        ast.child(NodeKind::FunctionList).unwrap_or(ast)
    };

    if list.is(NodeKind::FunctionDeclaration) {
        catalog.register(load_function(list)?);
    } else {
        for decl in list.children_of(NodeKind::FunctionDeclaration) {
            catalog.register(load_function(decl)?);
        }
    }
    tracing::debug!(functions = catalog.len(), "program loaded");
    Ok(catalog)
}

fn load_function(decl: &Node) -> InterpResult<FunctionDef<'_>> {
    let name = decl
        .child(NodeKind::Identifier)
        .ok_or_else(|| RuntimeError::malformed(decl.kind, "missing function name"))?;
    let return_type = decl
        .declared_type()
        .ok_or_else(|| RuntimeError::malformed(decl.kind, "missing return type"))?;

    let params = match decl.child(NodeKind::ParameterList) {
        Some(list) => list
            .children_of(NodeKind::Parameter)
            .map(load_parameter)
            .collect::<InterpResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(FunctionDef {
        name: name.text.clone(),
        return_type: Type::classify(return_type)?,
        params,
        body: decl.child(NodeKind::CommandList),
    })
}

fn load_parameter(param: &Node) -> InterpResult<Parameter> {
    let ty = param
        .declared_type()
        .ok_or_else(|| RuntimeError::malformed(param.kind, "missing parameter type"))?;
    let name = param
        .child(NodeKind::Identifier)
        .ok_or_else(|| RuntimeError::malformed(param.kind, "missing parameter name"))?;
    Ok(Parameter {
        name: name.text.clone(),
        ty: Type::classify(ty)?,
    })
}
