//! Apply command implementation.
//!
//! The `infrapipe apply` command runs every step of the pipeline.

use crate::cli::args::ApplyArgs;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::provision::Provisioner;
use crate::runner::PipelineExecutor;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::show_progress;

/// The apply command implementation.
pub struct ApplyCommand {
    context: CommandContext,
    args: ApplyArgs,
}

impl ApplyCommand {
    /// Create a new apply command.
    pub fn new(context: CommandContext, args: ApplyArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ApplyArgs {
        &self.args
    }

    /// Apply `config` using the given provisioner.
    pub fn run_with<P: Provisioner>(
        &self,
        config: &PipelineConfig,
        provisioner: P,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let executor = PipelineExecutor::new(config, &self.context.project_root, provisioner);

        ui.show_header(&format!(
            "Applying {} step(s) with {}",
            config.pipeline.steps.len(),
            config.settings.engine
        ));

        match executor.apply_with_progress(|progress| show_progress(ui, &progress)) {
            Ok(report) => {
                ui.success(&format!(
                    "Applied {} step(s), resolved {} output(s) in {:.1}s",
                    report.applied.len(),
                    report.outputs.len(),
                    report.duration.as_secs_f64()
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&e.to_string());
                ui.message("Steps applied before the failure were left in place.");
                Ok(CommandResult::failure(1))
            }
        }
    }
}

impl Command for ApplyCommand {
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
