//! Destroy command implementation.
//!
//! The `infrapipe destroy [STEP]...` command tears steps down. With no steps
//! named it destroys the whole pipeline in reverse declared order.

use crate::cli::args::DestroyArgs;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::provision::Provisioner;
use crate::runner::PipelineExecutor;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::show_progress;

/// The destroy command implementation.
pub struct DestroyCommand {
    context: CommandContext,
    args: DestroyArgs,
}

impl DestroyCommand {
    /// Create a new destroy command.
    pub fn new(context: CommandContext, args: DestroyArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &DestroyArgs {
        &self.args
    }

    /// Destroy steps of `config` using the given provisioner.
    pub fn run_with<P: Provisioner>(
        &self,
        config: &PipelineConfig,
        provisioner: P,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let executor = PipelineExecutor::new(config, &self.context.project_root, provisioner);

        if self.args.steps.is_empty() {
            ui.show_header("Destroying all steps in reverse order");
        } else {
            ui.show_header(&format!("Destroying {}", self.args.steps.join(", ")));
        }

        match executor.destroy_with_progress(&self.args.steps, |progress| {
            show_progress(ui, &progress)
        }) {
            Ok(report) => {
                ui.success(&format!(
                    "Destroyed {} step(s), {} already gone",
                    report.destroyed.len(),
                    report.skipped.len()
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&e.to_string());
                ui.message("Re-run destroy once the problem is fixed; removed steps are skipped.");
                Ok(CommandResult::failure(1))
            }
        }
    }
}

impl Command for DestroyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.context.load_config() {
            Ok(c) => c,
            Err(PipelineError::ConfigNotFound { path }) => {
                ui.error(&format!("No pipeline config found at {}", path.display()));
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };

        let driver = self.context.driver(&config);
        self.run_with(&config, driver, ui)
    }
}
