//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for settings shared by every command
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, PipelineConfig};
use crate::error::Result;
use crate::provision::TerraformDriver;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root; sources, workspaces and state resolve against it.
    pub project_root: PathBuf,
    /// Explicit config path, if given.
    pub config: Option<PathBuf>,
    /// Engine binary override, if given.
    pub engine: Option<String>,
}

impl CommandContext {
    /// Create a context with no overrides.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config: None,
            engine: None,
        }
    }

    /// Load and validate the pipeline config, applying CLI overrides.
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = load_config(&self.project_root, self.config.as_deref())?;
        if let Some(engine) = &self.engine {
            config.settings.engine = engine.clone();
        }
        Ok(config)
    }

    /// The engine driver for a loaded config.
    pub fn driver(&self, config: &PipelineConfig) -> TerraformDriver {
        TerraformDriver::new(config.settings.engine.clone())
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            context: CommandContext::new(project_root),
        }
    }

    /// Create a dispatcher carrying the global CLI flags.
    pub fn from_cli(project_root: PathBuf, cli: &Cli) -> Self {
        Self {
            context: CommandContext {
                project_root,
                config: cli.config.clone(),
                engine: cli.engine.clone(),
            },
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.context.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Apply(args) => {
                let cmd = super::apply::ApplyCommand::new(self.context.clone(), args.clone());
                cmd.execute(ui)
            }
            Commands::Destroy(args) => {
                let cmd = super::destroy::DestroyCommand::new(self.context.clone(), args.clone());
                cmd.execute(ui)
            }
        }
    }
}
