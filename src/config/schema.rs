//! Declaration validation
//!
//! Field shapes are enforced while deserializing; this module checks what serde
//! cannot see: names that would not survive being used as dependency references.

use crate::config::types::{Config, TaskDef};
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete declaration file
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }

    Ok(())
}

/// Validate a single task declaration
pub fn validate_task(name: &str, task: &TaskDef) -> ConfigResult<()> {
    // A space separates a reference from its arguments
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidTaskName(name.to_string()));
    }

    if task.depends.iter().any(|reference| reference.trim().is_empty()) {
        return Err(ConfigError::EmptyDependency(name.to_string()));
    }

    Ok(())
}
