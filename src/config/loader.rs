//! Pipeline config discovery and loading.

use crate::config::schema::PipelineConfig;
use crate::config::validator::validate;
use crate::error::{PipelineError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "infrapipe.yml";

/// Resolve the config path for a project.
///
/// An explicit path wins; relative explicit paths are taken relative
/// to the project root.
pub fn config_path(project_root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => project_root.join(p),
        None => project_root.join(CONFIG_FILE_NAME),
    }
}

/// Load a single config file and parse it into a [`PipelineConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PipelineError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PipelineError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`PipelineConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<PipelineConfig> {
    serde_yaml::from_str(content).map_err(|e| PipelineError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and validate the pipeline config for a project.
///
/// # Errors
///
/// Returns `ConfigNotFound`, `ConfigParseError`, or `ConfigError` when
/// validation finds problems.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<PipelineConfig> {
    let path = config_path(project_root, explicit);
    tracing::debug!("Loading pipeline config from {}", path.display());

    let config = load_config_file(&path)?;
    validate(&config)?;
    Ok(config)
}
