//! Interpreter settings

/// Maximum call depth before a run is aborted
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100_000;

/// How a `return` statement interacts with the statements after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnMode {
    /// `return` ends the enclosing function immediately
    #[default]
    EarlyExit,
    /// `return` stores its value in the frame's `return` binding and
    /// execution carries on; the call reads that binding when the body ends.
    /// Matches the behavior of the original tag-language runtime.
    Deferred,
}

/// Runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub max_call_depth: usize,
    pub return_mode: ReturnMode,
}

impl Config {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_return_mode(mut self, mode: ReturnMode) -> Self {
        self.return_mode = mode;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            return_mode: ReturnMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(config.return_mode, ReturnMode::EarlyExit);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_max_call_depth(8)
            .with_return_mode(ReturnMode::Deferred);
        assert_eq!(config.max_call_depth, 8);
        assert_eq!(config.return_mode, ReturnMode::Deferred);
    }
}
