//! Paque - a small YAML-based task runner
//!
//! Tasks are declared in a paquefile with a command, an optional condition,
//! message and sleep, and dependencies that may carry `key:value` arguments.
//! A requested task is expanded into an ordered, deduplicated plan and run.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;

// Re-export commonly used types
pub use error::{PaqueError, Result};

/// Current version of Paque
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
