//! Declaration file parsing and discovery

use crate::config::types::Config;
use crate::config::validate_config;
use crate::error::{ConfigError, ConfigResult, PaqueError};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default declaration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["paquefile", "paquefile.yaml", "paquefile.yml"];

/// Environment file loaded next to the declaration file
const ENV_FILE_NAME: &str = ".env";

/// Find the declaration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the declaration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                debug!("File found: {}", config_path.display());
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a declaration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, PaqueError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse and validate declarations from a string
pub fn parse_config(yaml: &str) -> Result<Config, PaqueError> {
    // An empty document declares no tasks
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(yaml)?;
    validate_config(&config)?;

    debug!("Parsed {} task declarations", config.tasks.len());
    Ok(config)
}

/// Parse a declaration file with automatic discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), PaqueError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

/// Load the `.env` file sitting next to the declaration file, if any
pub fn load_env_file(config_path: &Path) -> ConfigResult<HashMap<String, String>> {
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let env_path = base_dir.join(ENV_FILE_NAME);

    if !env_path.is_file() {
        return Ok(HashMap::new());
    }

    let to_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: env_path.clone(),
        error: e.to_string(),
    };

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(&env_path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        vars.insert(key, value);
    }

    debug!("Loaded {} variables from {}", vars.len(), env_path.display());
    Ok(vars)
}
