//! Configuration schema definitions for infrapipe.
//!
//! This module contains the struct definitions that map to the
//! `infrapipe.yml` pipeline config format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A map of variable or local names to their (already parsed) values.
///
/// Ordered so that every rendered fragment is deterministic.
pub type ValueMap = BTreeMap<String, serde_yaml::Value>;

/// Root configuration structure for infrapipe.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Engine settings
    pub settings: Settings,

    /// Global variables, declared in every step
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: ValueMap,

    /// Global locals, merged under each step's own locals
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub locals: ValueMap,

    /// Cross-step injections, keyed by alias
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub inject: BTreeMap<String, InjectConfig>,

    /// The ordered step list
    pub pipeline: PipelineSection,
}

impl PipelineConfig {
    /// Names of all steps in declared order.
    pub fn step_names(&self) -> Vec<String> {
        self.pipeline.steps.iter().map(|s| s.name.clone()).collect()
    }

    /// Look up a step by name.
    pub fn step(&self, name: &str) -> Option<&StepConfig> {
        self.pipeline.steps.iter().find(|s| s.name == name)
    }
}

/// Engine settings that apply to every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Provisioning engine binary (looked up on PATH)
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Workspace root, relative to the project root
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: PathBuf,

    /// Suffix appended to the step name to form its state artifact name
    #[serde(default = "default_state_suffix")]
    pub state_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            workspace_dir: default_workspace_dir(),
            state_suffix: default_state_suffix(),
        }
    }
}

fn default_engine() -> String {
    "terraform".to_string()
}

fn default_workspace_dir() -> PathBuf {
    PathBuf::from(".orchestrator")
}

fn default_state_suffix() -> String {
    "terraform.tfstate".to_string()
}

/// A raw inject declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectConfig {
    /// Dotted `module.type.resource_name` reference
    pub source: String,
}

/// The `pipeline` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Steps in apply order
    pub steps: Vec<StepConfig>,
}

/// One independently provisioned module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepConfig {
    /// Unique step name; keys the workspace and the state artifact
    pub name: String,

    /// Module source directory, relative to the project root
    pub source: PathBuf,

    /// Remote repository cloned into `source` before staging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,

    /// Branch or tag to clone
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,

    /// Step-level variables (win over globals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<ValueMap>,

    /// Step-level locals (win over globals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locals: Option<ValueMap>,
}
