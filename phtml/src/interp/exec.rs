//! Statement executor and call protocol

use super::catalog::FunctionDef;
use super::config::ReturnMode;
use super::env::FrameId;
use super::error::{InterpResult, RuntimeError};
use super::eval::{Interpreter, STACK_GROW_SIZE, STACK_RED_ZONE};
use super::value::{Type, Value};
use crate::ast::{Node, NodeKind};
use std::io::Write;
use std::rc::Rc;

/// Binding that carries a function result in [`ReturnMode::Deferred`]
pub const RETURN_SLOT: &str = "return";

/// Outcome of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Carry on with the next statement
    Continue,
    /// A `return` ran; unwind to the enclosing call
    Return(Value),
}

impl<'ast, W: Write> Interpreter<'ast, W> {
    /// Run `main` with no arguments directly in the root frame
    pub fn run_main(&mut self) -> InterpResult<Value> {
        let main = match self.catalog.resolve("main") {
            Ok(def) => Rc::clone(def),
            Err(_) => return Err(RuntimeError::missing_entry_point()),
        };
        if main.arity() != 0 {
            return Err(RuntimeError::arity_mismatch(&main.name, main.arity(), 0));
        }
        let root = self.env.root();
        let result = self.run_body(&main, root);
        self.out.flush()?;
        result
    }

    /// Execute the statements of a `command_list` in `frame`
    pub fn execute_list(&mut self, list: &'ast Node, frame: FrameId) -> InterpResult<Flow> {
        for stmt in &list.children {
            if let Flow::Return(value) = self.execute(stmt, frame)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Continue)
    }

    /// Execute one statement
    pub fn execute(&mut self, stmt: &'ast Node, frame: FrameId) -> InterpResult<Flow> {
        match stmt.kind {
            NodeKind::VariableDeclaration => {
                let ty = stmt
                    .declared_type()
                    .ok_or_else(|| RuntimeError::malformed(stmt.kind, "missing type"))?;
                let name = stmt
                    .child(NodeKind::Identifier)
                    .ok_or_else(|| RuntimeError::malformed(stmt.kind, "missing variable name"))?;
                let value = Type::classify(ty)?.default_value();
                self.env.declare_local(frame, &name.text, value);
                Ok(Flow::Continue)
            }

            NodeKind::Assignment => {
                let mut parts = stmt.children.iter();
                let target = parts
                    .by_ref()
                    .find(|c| c.is(NodeKind::Identifier))
                    .ok_or_else(|| RuntimeError::malformed(stmt.kind, "missing target"))?;
                let expr = parts
                    .find(|c| c.kind.is_expression())
                    .ok_or_else(|| RuntimeError::malformed(stmt.kind, "missing value"))?;
                let value = self.evaluate(expr, frame)?;
                self.env.assign(frame, &target.text, value);
                Ok(Flow::Continue)
            }

            // Branches run in the current frame; no new scope
            NodeKind::IfStructure => {
                if self.condition(stmt, frame)? {
                    match stmt.child(NodeKind::CommandList) {
                        Some(then) => self.execute_list(then, frame),
                        None => Ok(Flow::Continue),
                    }
                } else {
                    match stmt
                        .child(NodeKind::ElseOptional)
                        .and_then(|e| e.child(NodeKind::CommandList))
                    {
                        Some(otherwise) => self.execute_list(otherwise, frame),
                        None => Ok(Flow::Continue),
                    }
                }
            }

            NodeKind::WhileStructure => {
                let body = stmt.child(NodeKind::CommandList);
                while self.condition(stmt, frame)? {
                    if let Some(body) = body {
                        if let Flow::Return(value) = self.execute_list(body, frame)? {
                            return Ok(Flow::Return(value));
                        }
                    }
                }
                Ok(Flow::Continue)
            }

            NodeKind::FunctionCall => {
                self.call(stmt, frame)?;
                Ok(Flow::Continue)
            }

            NodeKind::Print => {
                let expr = stmt
                    .expression()
                    .ok_or_else(|| RuntimeError::malformed(stmt.kind, "missing expression"))?;
                let value = self.evaluate(expr, frame)?;
                writeln!(self.out, "{value}")?;
                Ok(Flow::Continue)
            }

            NodeKind::Return => {
                let value = match stmt.expression() {
                    Some(expr) => self.evaluate(expr, frame)?,
                    None => Value::Void,
                };
                // Both modes store the result through the String -> Bool fixup
                match self.config.return_mode {
                    ReturnMode::EarlyExit => Ok(Flow::Return(value.fixup())),
                    ReturnMode::Deferred => {
                        self.env.declare_local(frame, RETURN_SLOT, value);
                        Ok(Flow::Continue)
                    }
                }
            }

            NodeKind::CommandList => self.execute_list(stmt, frame),

            kind => Err(RuntimeError::malformed(kind, "expected a statement")),
        }
    }

    /// Evaluate the condition of an `if` / `while`; it must be a Bool
    fn condition(&mut self, stmt: &'ast Node, frame: FrameId) -> InterpResult<bool> {
        let expr = stmt
            .expression()
            .ok_or_else(|| RuntimeError::malformed(stmt.kind, "missing condition"))?;
        let value = self.evaluate(expr, frame)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::type_error("bool condition", value.type_name()))
    }

    /// Call protocol for a `function_call` node evaluated in `frame`
    #[tracing::instrument(level = "debug", skip_all, fields(function = tracing::field::Empty))]
    pub(super) fn call(&mut self, node: &'ast Node, frame: FrameId) -> InterpResult<Value> {
        let name = node
            .child(NodeKind::Identifier)
            .ok_or_else(|| RuntimeError::malformed(node.kind, "missing function name"))?;
        tracing::Span::current().record("function", name.text.as_str());

        let def = Rc::clone(self.catalog.resolve(&name.text)?);
        let args = self.eval_args(node, frame)?;
        if args.len() != def.arity() {
            return Err(RuntimeError::arity_mismatch(&def.name, def.arity(), args.len()));
        }
        self.invoke(&def, args, frame)
    }

    /// Arguments of a call, left to right, in the caller's frame
    fn eval_args(&mut self, node: &'ast Node, frame: FrameId) -> InterpResult<Vec<Value>> {
        let mut args = Vec::new();
        let Some(block) = node.child(NodeKind::ArgsBlock) else {
            return Ok(args);
        };
        for child in &block.children {
            match child.kind {
                NodeKind::ArgList => {
                    for arg in child.children_of(NodeKind::Arg) {
                        args.push(self.eval_arg(arg, frame)?);
                    }
                }
                NodeKind::Arg => args.push(self.eval_arg(child, frame)?),
                _ => {}
            }
        }
        Ok(args)
    }

    fn eval_arg(&mut self, arg: &'ast Node, frame: FrameId) -> InterpResult<Value> {
        let expr = arg
            .expression()
            .ok_or_else(|| RuntimeError::malformed(arg.kind, "missing expression"))?;
        self.evaluate(expr, frame)
    }

    /// Invoke a function with already evaluated arguments, with automatic
    /// stack growth for deep recursion
    pub fn invoke(
        &mut self,
        def: &FunctionDef<'ast>,
        args: Vec<Value>,
        caller: FrameId,
    ) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.invoke_inner(def, args, caller)
        })
    }

    fn invoke_inner(
        &mut self,
        def: &FunctionDef<'ast>,
        args: Vec<Value>,
        caller: FrameId,
    ) -> InterpResult<Value> {
        if def.arity() != args.len() {
            return Err(RuntimeError::arity_mismatch(&def.name, def.arity(), args.len()));
        }
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::recursion_limit(self.config.max_call_depth));
        }

        self.call_depth += 1;
        let callee = self.env.child(caller);
        tracing::trace!(function = %def.name, frames = self.env.depth(), "enter call");
        for (param, arg) in def.params.iter().zip(args) {
            self.env.declare_local(callee, &param.name, arg);
        }
        let result = self.run_body(def, callee);
        self.env.release(callee);
        self.call_depth -= 1;
        result
    }

    /// Execute a function body in `frame` and harvest its result
    fn run_body(&mut self, def: &FunctionDef<'ast>, frame: FrameId) -> InterpResult<Value> {
        let flow = match def.body {
            Some(body) => self.execute_list(body, frame)?,
            None => Flow::Continue,
        };
        let value = match flow {
            Flow::Return(value) => value,
            Flow::Continue => match self.config.return_mode {
                ReturnMode::Deferred => self
                    .env
                    .lookup_local(frame, RETURN_SLOT)
                    .cloned()
                    .unwrap_or_else(|| def.return_type.default_value()),
                ReturnMode::EarlyExit => def.return_type.default_value(),
            },
        };
        Ok(value)
    }
}
