//! Environment for variable bindings
//!
//! Frames are kept in an arena indexed by [`FrameId`]. Each frame records
//! its parent when it is created, so lookups walk the chain outward without
//! shared ownership. Frames follow a strict stack discipline: a call pushes
//! its frame with [`Environment::child`] and drops it with
//! [`Environment::release`] when it returns.

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use indexmap::IndexMap;

/// Handle to one frame in an [`Environment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId(usize);

/// One lexical scope
#[derive(Debug, Default)]
struct Frame {
    /// Bindings in declaration order
    bindings: IndexMap<String, Value>,
    parent: Option<FrameId>,
}

/// Arena of frames, index 0 is the root
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an environment holding only the root frame
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
        }
    }

    pub fn root(&self) -> FrameId {
        FrameId(0)
    }

    /// Push a new frame whose parent is `parent`
    pub fn child(&mut self, parent: FrameId) -> FrameId {
        self.frames.push(Frame {
            bindings: IndexMap::new(),
            parent: Some(parent),
        });
        let id = FrameId(self.frames.len() - 1);
        tracing::trace!(frame = id.0, parent = parent.0, "push frame");
        id
    }

    /// Drop `frame` and everything pushed after it. The root is never released.
    pub fn release(&mut self, frame: FrameId) {
        if frame.0 == 0 || frame.0 >= self.frames.len() {
            return;
        }
        tracing::trace!(frame = frame.0, "release frame");
        self.frames.truncate(frame.0);
    }

    /// Number of live frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Create or overwrite a binding in `frame` only
    pub fn declare_local(&mut self, frame: FrameId, name: &str, value: Value) {
        let value = value.fixup();
        if let Some(f) = self.frames.get_mut(frame.0) {
            f.bindings.insert(name.to_string(), value);
        }
    }

    /// Update the nearest binding of `name` along the chain, or declare it
    /// in `frame` when no frame binds it yet.
    pub fn assign(&mut self, frame: FrameId, name: &str, value: Value) {
        let target = self.resolve(frame, name).unwrap_or(frame);
        self.declare_local(target, name, value);
    }

    /// Read a variable, searching from `frame` outward.
    ///
    /// A string binding holding `true` or `false` is rewritten to a Bool in
    /// place before it is returned.
    pub fn lookup(&mut self, frame: FrameId, name: &str) -> InterpResult<Value> {
        let owner = self
            .resolve(frame, name)
            .ok_or_else(|| RuntimeError::undefined_variable(name))?;
        let slot = self.frames[owner.0]
            .bindings
            .get_mut(name)
            .ok_or_else(|| RuntimeError::undefined_variable(name))?;
        if slot.needs_fixup() {
            *slot = std::mem::replace(slot, Value::Void).fixup();
        }
        Ok(slot.clone())
    }

    /// Binding in `frame` itself, ignoring parents
    pub fn lookup_local(&self, frame: FrameId, name: &str) -> Option<&Value> {
        self.frames.get(frame.0)?.bindings.get(name)
    }

    /// Frame that binds `name`, starting at `frame`
    fn resolve(&self, frame: FrameId, name: &str) -> Option<FrameId> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frames.get(id.0)?;
            if f.bindings.contains_key(name) {
                return Some(id);
            }
            current = f.parent;
        }
        None
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
