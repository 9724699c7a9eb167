//! Provisioning engine driver.
//!
//! The [`Provisioner`] trait is the seam between the pipeline executor and
//! the external engine. Every operation receives the workspace directory
//! explicitly; nothing here changes the process working directory.
//!
//! - [`terraform`] - driver for Terraform-compatible CLIs
//! - [`state`] - per-step state artifacts

pub mod state;
pub mod terraform;

pub use state::StateHandle;
pub use terraform::{Operation, TerraformDriver};

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Blocking operations against the provisioning engine.
pub trait Provisioner {
    /// Prepare the workspace (providers, modules).
    fn init(&self, workspace: &Path, state: &StateHandle) -> Result<()>;

    /// Create or update the step's resources.
    fn apply(&self, workspace: &Path, state: &StateHandle) -> Result<()>;

    /// Read the engine's output report for the step.
    fn fetch_outputs(&self, workspace: &Path, state: &StateHandle) -> Result<OutputReport>;

    /// Tear down the step's resources.
    fn destroy(&self, workspace: &Path, state: &StateHandle) -> Result<()>;
}

/// Output values reported by the engine, keyed by output name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputReport {
    step: String,
    values: BTreeMap<String, String>,
}

impl OutputReport {
    /// Build a report from already-extracted values.
    pub fn new(step: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        Self {
            step: step.into(),
            values,
        }
    }

    /// Parse the engine's JSON report: `{"name": {"value": ...}, ...}`.
    ///
    /// String values are taken verbatim; anything else is kept as compact JSON.
    pub fn parse(step: &str, json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::new(step, BTreeMap::new()));
        }

        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| {
                anyhow::anyhow!("Unreadable output report for step '{}': {}", step, e)
            })?;

        let values = raw
            .into_iter()
            .map(|(name, entry)| {
                let value = entry.get("value").cloned().unwrap_or(entry);
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect();

        Ok(Self::new(step, values))
    }

    /// The value of `output`.
    ///
    /// # Errors
    ///
    /// Returns `OutputResolutionError` if the report has no such output.
    pub fn require(&self, output: &str) -> Result<&str> {
        self.values
            .get(output)
            .map(String::as_str)
            .ok_or_else(|| PipelineError::OutputResolutionError {
                step: self.step.clone(),
                output: output.to_string(),
            })
    }

    /// Number of reported outputs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
