//! Error types for Paque

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Paque operations
pub type Result<T> = std::result::Result<T, PaqueError>;

/// Main error type for Paque
#[derive(Error, Debug)]
pub enum PaqueError {
    /// Declaration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Planning errors
    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    /// Plan execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Declaration file discovery and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find a paquefile (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task name '{0}' must be non-empty and contain no whitespace")]
    InvalidTaskName(String),

    #[error("Task '{0}' has an empty dependency reference")]
    EmptyDependency(String),

    #[error("Failed to read '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    #[error("Failed to load environment file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },
}

/// Argument interpolation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("Argument '{0}' is not of the form key:value")]
    MalformedArgument(String),

    #[error("Argument '{0}' is given more than once")]
    DuplicateArgument(String),

    #[error("Argument '{0}' not found")]
    UnknownArgument(String),
}

/// Errors raised while expanding a task into a plan
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("Task '{0}' is not defined")]
    UnknownTask(String),

    /// A dependency can never be scheduled, either because it closes a cycle
    /// (`cycle` holds the path) or because it renders under another name
    #[error("Could not find a plan to solve {task}({args}): {}", stuck_reason(.dependency, .cycle))]
    Unresolvable {
        task: String,
        args: String,
        dependency: String,
        cycle: Option<String>,
    },

    #[error("Dependency chain deeper than {depth} tasks while planning '{task}'")]
    DepthExceeded { depth: usize, task: String },

    #[error("Task '{task}' depends on '{dependency}', which is not part of the plan")]
    DanglingDependency { task: String, dependency: String },

    #[error("Task '{task}': {source}")]
    Interpolation {
        task: String,
        #[source]
        source: InterpolationError,
    },
}

fn stuck_reason(dependency: &str, cycle: &Option<String>) -> String {
    match cycle {
        Some(path) => format!("circular dependency {}", path),
        None => format!("dependency '{}' never becomes available", dependency),
    }
}

/// Plan execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{task}' failed with exit code {code:?}")]
    CommandFailed { task: String, code: Option<i32> },

    #[error("Failed to start '{interpreter}': {error}")]
    Spawn { interpreter: String, error: String },

    #[error("Sleep for task '{task}' should be an integer by now, got '{value}'")]
    InvalidSleep { task: String, value: String },

    #[error("No interpreter configured")]
    NoInterpreter,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

/// Specialized result type for planning operations
pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolvable_message_names_cycle() {
        let err = PlanError::Unresolvable {
            task: "B".to_string(),
            args: String::new(),
            dependency: "A".to_string(),
            cycle: Some("A -> B -> A".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Could not find a plan to solve B(): circular dependency A -> B -> A"
        );
    }

    #[test]
    fn test_unresolvable_message_names_dependency() {
        let err = PlanError::Unresolvable {
            task: "A".to_string(),
            args: String::new(),
            dependency: "C1 x:1".to_string(),
            cycle: None,
        };
        assert_eq!(
            err.to_string(),
            "Could not find a plan to solve A(): dependency 'C1 x:1' never becomes available"
        );
    }
}
