//! Pipeline configuration loading, parsing, and validation.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Global/step map merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use infrapipe::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("infrapipe.yml"),
//!     "pipeline:\n  steps:\n    - name: network\n      source: modules/network\n",
//! )
//! .unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.step_names(), vec!["network"]);
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{InjectConfig, PipelineConfig, PipelineSection, Settings, StepConfig, ValueMap};

// Loader re-exports
pub use loader::{config_path, load_config, load_config_file, parse_config, CONFIG_FILE_NAME};

// Merger re-exports
pub use merger::{merge_maps, merge_step_map};

// Validator re-exports
pub use validator::{check_step_names, is_step_name, validate, validate_config, ValidationError};

#[cfg(test)]
mod tests {
    #[test]
    fn serde_yaml_preserves_nested_structures() {
        let yaml = r#"
          locals:
            tags:
              owner: ops
          pipeline:
            steps:
              - name: first
              - name: second
        "#;
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed["locals"]["tags"]["owner"], "ops");
        assert_eq!(parsed["pipeline"]["steps"][1]["name"], "second");
    }
}
