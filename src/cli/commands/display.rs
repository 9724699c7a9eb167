//! Progress display shared by apply and destroy.

use crate::runner::PipelineProgress;
use crate::ui::UserInterface;

/// Render a pipeline progress event.
pub fn show_progress(ui: &mut dyn UserInterface, progress: &PipelineProgress<'_>) {
    match progress {
        PipelineProgress::StepStarting { name, index, total } => {
            ui.show_step(name, index + 1, *total);
        }
        PipelineProgress::PhaseReached { name, phase } => {
            ui.show_detail(&format!("{} {}", name, phase));
        }
        PipelineProgress::StepSkipped { name, reason } => {
            ui.warning(&format!("'{}' {}, skipping", name, reason));
        }
    }
}
