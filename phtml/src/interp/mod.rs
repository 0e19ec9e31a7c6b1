//! Tree-walking interpreter
//!
//! [`loader::load`] builds the [`Catalog`] from the parser's tree once, then
//! an [`Interpreter`] runs `main` against the root frame of an
//! [`Environment`].

pub mod catalog;
pub mod config;
pub mod env;
pub mod error;
mod eval;
mod exec;
pub mod loader;
pub mod value;

pub use catalog::{Catalog, FunctionDef, Parameter};
pub use config::{Config, ReturnMode};
pub use env::{Environment, FrameId};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Interpreter, eval_binary, eval_unary};
pub use exec::Flow;
pub use value::{Type, Value};
