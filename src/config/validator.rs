//! Configuration validation rules.
//!
//! This module validates a pipeline config for correctness:
//! - Steps must have a non-empty name and source
//! - Step names must be unique (they key workspaces and state artifacts)
//! - Step names must be usable as a single path component
//! - Inject references must be well-formed
//! - Injects on one module must not map to the same output name
//! - The workspace root must be a dedicated directory inside the project

use crate::config::schema::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::inject::InjectSpec;
use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Step name if error is step-specific
    pub step: Option<String>,
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &PipelineConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_settings(config));
    errors.extend(validate_steps(config));
    errors.extend(validate_injects(config));
    errors.extend(validate_output_names(config));

    errors
}

/// Validate step definitions.
fn validate_steps(config: &PipelineConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, step) in config.pipeline.steps.iter().enumerate() {
        if step.name.trim().is_empty() {
            errors.push(ValidationError {
                rule: "missing-name".to_string(),
                message: format!("Step #{} has no name", index + 1),
                step: None,
            });
            continue;
        }

        if !is_step_name(&step.name) {
            errors.push(ValidationError {
                rule: "invalid-name".to_string(),
                message: format!(
                    "Step name '{}' must be a single path component",
                    step.name
                ),
                step: Some(step.name.clone()),
            });
        }

        if step.source.as_os_str().is_empty() {
            errors.push(ValidationError {
                rule: "missing-source".to_string(),
                message: format!("Step '{}' has no source", step.name),
                step: Some(step.name.clone()),
            });
        }

        if !seen.insert(step.name.as_str()) {
            errors.push(ValidationError {
                rule: "duplicate-step".to_string(),
                message: format!("Step '{}' is declared more than once", step.name),
                step: Some(step.name.clone()),
            });
        }
    }

    errors
}

/// Validate inject references.
fn validate_injects(config: &PipelineConfig) -> Vec<ValidationError> {
    config
        .inject
        .iter()
        .filter_map(|(name, inject)| InjectSpec::parse(name, &inject.source).err())
        .map(|e| ValidationError {
            rule: "invalid-inject".to_string(),
            message: match e {
                PipelineError::ConfigError { message } => message,
                other => other.to_string(),
            },
            step: None,
        })
        .collect()
}

/// Whether `name` can key a workspace directory and a state artifact.
///
/// Step names become a single path component under the workspace root, so
/// separators and the `.`/`..` entries are rejected.
pub fn is_step_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Reject step names that would escape the workspace root.
///
/// Used for destroy targets given on the command line, which never pass
/// through [`validate_config`].
pub fn check_step_names(names: &[String]) -> Result<()> {
    let invalid: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !is_step_name(name))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::config(format!(
            "Step name(s) {} must be a single path component",
            invalid
                .iter()
                .map(|n| format!("'{}'", n))
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Validate the settings section.
///
/// The workspace root is wiped on every apply, so it must be a relative
/// directory below the project root that holds no module source.
fn validate_settings(config: &PipelineConfig) -> Vec<ValidationError> {
    let workspace_dir = &config.settings.workspace_dir;
    let invalid = |message: String| ValidationError {
        rule: "invalid-settings".to_string(),
        message,
        step: None,
    };

    let Some(root) = lexical_relative(workspace_dir) else {
        return vec![invalid(format!(
            "settings.workspace_dir '{}' must be a relative directory inside the project",
            workspace_dir.display()
        ))];
    };

    config
        .pipeline
        .steps
        .iter()
        .filter(|step| {
            lexical_relative(&step.source).is_some_and(|source| source.starts_with(&root))
        })
        .map(|step| ValidationError {
            step: Some(step.name.clone()),
            ..invalid(format!(
                "settings.workspace_dir '{}' contains the source of step '{}'",
                workspace_dir.display(),
                step.name
            ))
        })
        .collect()
}

/// `path` without `.` components, if it is relative, names at least one
/// directory, and never climbs with `..`.
fn lexical_relative(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!normalized.as_os_str().is_empty()).then_some(normalized)
}

/// Injects on one module must map to distinct output names.
///
/// The output name is `<resource_name>_id`, so `net.aws_vpc.main` and
/// `net.aws_subnet.main` would both need `main_id`.
fn validate_output_names(config: &PipelineConfig) -> Vec<ValidationError> {
    let mut owners: BTreeMap<(String, String), (String, String)> = BTreeMap::new();
    let mut errors = Vec::new();

    for (name, inject) in &config.inject {
        let Ok(spec) = InjectSpec::parse(name, &inject.source) else {
            continue;
        };
        let key = (spec.module.clone(), spec.output_name());
        match owners.get(&key) {
            Some((resource_type, first)) if *resource_type != spec.resource_type => {
                errors.push(ValidationError {
                    rule: "output-collision".to_string(),
                    message: format!(
                        "Injects '{}' and '{}' both need output '{}' in module '{}'",
                        first, name, key.1, key.0
                    ),
                    step: None,
                });
            }
            Some(_) => {}
            None => {
                owners.insert(key, (spec.resource_type.clone(), name.clone()));
            }
        }
    }

    errors
}

/// Validate configuration and return the first error as a `PipelineError`.
pub fn validate(config: &PipelineConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        Err(PipelineError::ConfigError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> PipelineConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let config = parse(
            r#"
inject:
  vpc:
    source: network.aws_vpc.main
pipeline:
  steps:
    - name: network
      source: modules/network
    - name: compute
      source: modules/compute
"#,
        );
        assert!(validate_config(&config).is_empty());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn duplicate_step_names_fail() {
        let config = parse(
            r#"
pipeline:
  steps:
    - name: network
      source: a
    - name: network
      source: b
"#,
        );
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "duplicate-step");
        assert_eq!(errors[0].step.as_deref(), Some("network"));
    }

    #[test]
    fn empty_name_and_source_fail() {
        let config = parse(
            r#"
pipeline:
  steps:
    - name: ""
      source: a
    - name: b
      source: ""
"#,
        );
        let rules: Vec<_> = validate_config(&config)
            .into_iter()
            .map(|e| e.rule)
            .collect();
        assert_eq!(rules, vec!["missing-name", "missing-source"]);
    }

    #[test]
    fn path_like_names_fail() {
        let config = parse("pipeline:\n  steps:\n    - name: ../escape\n      source: a\n");
        let errors = validate_config(&config);
        assert_eq!(errors[0].rule, "invalid-name");
    }

    #[test]
    fn malformed_inject_fails() {
        let config = parse("inject:\n  vpc:\n    source: network.aws_vpc\n");
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "invalid-inject");
        assert!(errors[0].message.contains("network.aws_vpc"));
    }

    #[test]
    fn validate_joins_all_messages() {
        let config = parse(
            r#"
inject:
  bad:
    source: one
pipeline:
  steps:
    - name: a
      source: x
    - name: a
      source: y
"#,
        );
        let err = validate(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("declared more than once"));
        assert!(msg.contains("one"));
    }

    #[test]
    fn step_name_rule() {
        for good in ["network", "app-1", "db.primary"] {
            assert!(is_step_name(good), "{}", good);
        }
        for bad in ["", " ", ".", "..", "../modules", "a/b", "a\\b"] {
            assert!(!is_step_name(bad), "{:?}", bad);
        }
    }

    #[test]
    fn check_step_names_lists_offenders() {
        let names = vec!["network".to_string(), "../modules".to_string(), ".".to_string()];
        let err = check_step_names(&names).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, PipelineError::ConfigError { .. }));
        assert!(msg.contains("'../modules'"));
        assert!(msg.contains("'.'"));
        assert!(!msg.contains("'network'"));

        assert!(check_step_names(&["network".to_string()]).is_ok());
        assert!(check_step_names(&[]).is_ok());
    }

    #[test]
    fn workspace_dir_must_be_dedicated_subdirectory() {
        for dir in ["", ".", "./", "..", "../elsewhere", "/tmp/ws", "ws/../.."] {
            let config = parse(&format!(
                "settings:\n  workspace_dir: \"{}\"\npipeline:\n  steps:\n    - name: a\n      source: modules/a\n",
                dir
            ));
            let errors = validate_config(&config);
            assert_eq!(errors.len(), 1, "{:?}", dir);
            assert_eq!(errors[0].rule, "invalid-settings", "{:?}", dir);
        }
    }

    #[test]
    fn workspace_dir_must_not_hold_sources() {
        let config = parse(
            r#"
settings:
  workspace_dir: modules
pipeline:
  steps:
    - name: a
      source: ./modules/a
    - name: b
      source: other/b
"#,
        );
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "invalid-settings");
        assert_eq!(errors[0].step.as_deref(), Some("a"));
    }

    #[test]
    fn nested_workspace_dir_is_accepted() {
        let config = parse(
            "settings:\n  workspace_dir: build/.orchestrator\npipeline:\n  steps:\n    - name: a\n      source: build/modules/a\n",
        );
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn same_resource_name_different_type_collides() {
        let config = parse(
            r#"
inject:
  a_vpc:
    source: net.aws_vpc.main
  b_subnet:
    source: net.aws_subnet.main
"#,
        );
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "output-collision");
        assert!(errors[0].message.contains("main_id"));
        assert!(errors[0].message.contains("a_vpc"));
        assert!(errors[0].message.contains("b_subnet"));
    }

    #[test]
    fn shared_output_names_are_fine_across_modules_or_same_resource() {
        let config = parse(
            r#"
inject:
  vpc:
    source: net.aws_vpc.main
  vpc_again:
    source: net.aws_vpc.main
  db_subnet:
    source: db.aws_subnet.main
"#,
        );
        assert!(validate_config(&config).is_empty());
    }
}
