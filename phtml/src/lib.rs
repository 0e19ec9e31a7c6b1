//! PHTML runtime library
//!
//! Runs programs written in a small imperative language whose syntax is a
//! tree of tagged elements. The external parser produces an [`ast::Node`]
//! tree; this crate loads its functions and interprets `main`.

pub mod ast;
pub mod interp;

pub use ast::{Node, NodeKind};
pub use interp::{Config, ErrorKind, InterpResult, ReturnMode, RuntimeError, Value};

use std::io::Write;

/// Load `ast` and run its `main` function, writing `print` output to `out`.
///
/// Output produced before an error stays in `out`; nothing runs after it.
pub fn run_program<W: Write>(ast: &Node, out: W, config: Config) -> InterpResult<()> {
    let catalog = interp::loader::load(ast)?;
    let mut interpreter = interp::Interpreter::new(catalog, out, config);
    interpreter.run_main()?;
    Ok(())
}

/// Run a program and collect its output as a string
pub fn run_captured(ast: &Node, config: Config) -> (String, InterpResult<()>) {
    let mut out = Vec::new();
    let result = run_program(ast, &mut out, config);
    (String::from_utf8_lossy(&out).into_owned(), result)
}
