//! Execution context for running a plan
//!
//! The context carries everything a step needs from its surroundings: where to
//! run, which shell to run through and which extra variables to export.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Execution context shared by every step of a plan
#[derive(Debug, Clone)]
pub struct Context {
    /// Current working directory
    pub working_dir: PathBuf,

    /// Extra environment variables exported to commands (e.g. from `.env`)
    pub env: HashMap<String, String>,

    /// Interpreter used for `run` and `condition` (e.g. ["bash", "-c"])
    pub interpreter: Vec<String>,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set exported variables
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = Context::new();
        assert_eq!(ctx.interpreter, vec!["sh", "-c"]);
        assert!(ctx.env.is_empty());
    }

    #[test]
    fn test_with_interpreter() {
        let ctx = Context::new().with_interpreter(vec!["bash".to_string(), "-c".to_string()]);
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
    }

    #[test]
    fn test_with_env() {
        let mut env = HashMap::new();
        env.insert("KEY".to_string(), "value".to_string());

        let ctx = Context::new().with_env(env);
        assert_eq!(ctx.env.get("KEY"), Some(&"value".to_string()));
    }
}
