//! Pipeline execution orchestration.

pub mod pipeline;

pub use pipeline::{
    destroy_order, ApplyReport, DestroyReport, PipelineExecutor, PipelineProgress, StepPhase,
};
