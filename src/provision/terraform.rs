//! Driver for Terraform-compatible engine CLIs (`terraform`, `tofu`).

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{PipelineError, Result};

use super::{OutputReport, Provisioner, StateHandle};

/// An engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    Apply,
    Output,
    Destroy,
}

impl Operation {
    /// Engine subcommand name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Apply => "apply",
            Operation::Output => "output",
            Operation::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runs a Terraform-compatible binary inside each step workspace.
#[derive(Debug, Clone)]
pub struct TerraformDriver {
    program: String,
}

impl Default for TerraformDriver {
    fn default() -> Self {
        Self::new("terraform")
    }
}

impl TerraformDriver {
    /// Create a driver for the given engine binary.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The engine binary.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command-line arguments for `operation` against `state`.
    pub fn args(operation: Operation, state: &StateHandle) -> Vec<String> {
        let state_arg = format!("-state={}", state.path.display());
        let mut args = vec![operation.as_str().to_string()];
        match operation {
            Operation::Init => args.push("-input=false".to_string()),
            Operation::Apply | Operation::Destroy => {
                args.push("-auto-approve".to_string());
                args.push("-input=false".to_string());
                args.push(state_arg);
            }
            Operation::Output => {
                args.push("-json".to_string());
                args.push(state_arg);
            }
        }
        args
    }

    fn command(&self, operation: Operation, workspace: &Path, state: &StateHandle) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::args(operation, state)).current_dir(workspace);
        cmd
    }

    fn failure(operation: Operation, state: &StateHandle, code: Option<i32>) -> PipelineError {
        PipelineError::ProvisioningError {
            step: state.step.clone(),
            operation: operation.to_string(),
            code,
        }
    }

    /// Run an operation with inherited stdio so the engine's own progress
    /// reaches the terminal.
    fn run(&self, operation: Operation, workspace: &Path, state: &StateHandle) -> Result<()> {
        tracing::info!(
            "{} {} for step '{}'",
            self.program,
            operation,
            state.step
        );

        let status = self
            .command(operation, workspace, state)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| {
                tracing::warn!("Failed to start {}: {}", self.program, e);
                Self::failure(operation, state, None)
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Self::failure(operation, state, status.code()))
        }
    }
}

impl Provisioner for TerraformDriver {
    fn init(&self, workspace: &Path, state: &StateHandle) -> Result<()> {
        self.run(Operation::Init, workspace, state)
    }

    fn apply(&self, workspace: &Path, state: &StateHandle) -> Result<()> {
        self.run(Operation::Apply, workspace, state)
    }

    fn fetch_outputs(&self, workspace: &Path, state: &StateHandle) -> Result<OutputReport> {
        tracing::debug!("Reading outputs of step '{}'", state.step);

        let output = self
            .command(Operation::Output, workspace, state)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                tracing::warn!("Failed to start {}: {}", self.program, e);
                Self::failure(Operation::Output, state, None)
            })?;

        if !output.status.success() {
            tracing::warn!(
                "{} output failed: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(Self::failure(Operation::Output, state, output.status.code()));
        }

        OutputReport::parse(&state.step, &String::from_utf8_lossy(&output.stdout))
    }

    fn destroy(&self, workspace: &Path, state: &StateHandle) -> Result<()> {
        self.run(Operation::Destroy, workspace, state)
    }
}
