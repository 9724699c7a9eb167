//! Pipeline execution orchestration.
//!
//! Apply walks the declared step list in order; destroy walks it in reverse
//! (or walks an explicit list verbatim). Reverse declared order stands in for
//! real dependency ordering: no graph is built from resource references.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{check_step_names, merge_step_map, validate, PipelineConfig, StepConfig};
use crate::error::Result;
use crate::inject::{resolve_injects, InjectSpec};
use crate::outputs::{OutputStore, ResolvedOutput};
use crate::provision::{Provisioner, StateHandle};
use crate::render::{write_locals, write_lookups, write_outputs, write_variables};
use crate::workspace::{declared_resources, GitFetcher, WorkspaceMaterializer, WorkspaceRoot};

/// Lifecycle phase of a step within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// Not yet touched in this run.
    Pending,
    /// Workspace copied from the module source.
    Staged,
    /// Generated fragments written.
    Rendered,
    /// Engine apply succeeded and outputs were resolved.
    Applied,
    /// Engine destroy succeeded; workspace and state released.
    Destroyed,
    /// Destroy found no workspace.
    Skipped,
}

impl std::fmt::Display for StepPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepPhase::Pending => "pending",
            StepPhase::Staged => "staged",
            StepPhase::Rendered => "rendered",
            StepPhase::Applied => "applied",
            StepPhase::Destroyed => "destroyed",
            StepPhase::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum PipelineProgress<'a> {
    /// A step is about to start.
    StepStarting {
        name: &'a str,
        index: usize,
        total: usize,
    },
    /// A step reached a new phase.
    PhaseReached { name: &'a str, phase: StepPhase },
    /// A step was skipped.
    StepSkipped { name: &'a str, reason: &'a str },
}

/// Result of an apply run.
#[derive(Debug)]
pub struct ApplyReport {
    /// Applied steps, in order.
    pub applied: Vec<String>,
    /// Every output resolved during the run.
    pub outputs: OutputStore,
    /// Total duration.
    pub duration: Duration,
}

/// Result of a destroy run.
#[derive(Debug)]
pub struct DestroyReport {
    /// Destroyed steps, in order.
    pub destroyed: Vec<String>,
    /// Steps whose workspace was already gone.
    pub skipped: Vec<String>,
    /// Total duration.
    pub duration: Duration,
}

/// The order steps are destroyed in.
///
/// With no targets, every declared step in reverse declared order;
/// otherwise the targets exactly as given.
pub fn destroy_order(config: &PipelineConfig, targets: &[String]) -> Vec<String> {
    if targets.is_empty() {
        config.step_names().into_iter().rev().collect()
    } else {
        targets.to_vec()
    }
}

/// Drives every step of a pipeline through apply or destroy.
pub struct PipelineExecutor<'a, P: Provisioner> {
    config: &'a PipelineConfig,
    materializer: WorkspaceMaterializer,
    state_dir: PathBuf,
    provisioner: P,
}

impl<'a, P: Provisioner> PipelineExecutor<'a, P> {
    /// Create an executor for `config` rooted at `project_root`.
    pub fn new(config: &'a PipelineConfig, project_root: &Path, provisioner: P) -> Self {
        Self::with_fetcher(config, project_root, provisioner, GitFetcher::default())
    }

    /// Create an executor with a specific git fetcher.
    pub fn with_fetcher(
        config: &'a PipelineConfig,
        project_root: &Path,
        provisioner: P,
        fetcher: GitFetcher,
    ) -> Self {
        // The engine runs inside each workspace, so state paths must not be relative.
        let project_root =
            std::path::absolute(project_root).unwrap_or_else(|_| project_root.to_path_buf());
        let root = WorkspaceRoot::new(project_root.join(&config.settings.workspace_dir));
        let state_dir = root.state_dir();

        Self {
            config,
            materializer: WorkspaceMaterializer::new(project_root, root, fetcher),
            state_dir,
            provisioner,
        }
    }

    /// The workspace root.
    pub fn workspace_root(&self) -> &WorkspaceRoot {
        self.materializer.root()
    }

    /// The provisioner driving the engine.
    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }

    /// The state artifact handle for a step.
    pub fn state_handle(&self, step: &str) -> StateHandle {
        StateHandle::for_step(&self.state_dir, step, &self.config.settings.state_suffix)
    }

    /// Apply every step in declared order.
    pub fn apply(&self) -> Result<ApplyReport> {
        self.apply_with_progress(|_| {})
    }

    /// Apply every step in declared order with a progress callback.
    ///
    /// The config is validated before the workspace root is touched.
    /// Stops at the first failing step. Steps applied before it keep their
    /// workspace and state.
    pub fn apply_with_progress(
        &self,
        mut on_progress: impl FnMut(PipelineProgress<'_>),
    ) -> Result<ApplyReport> {
        let start = Instant::now();
        validate(self.config)?;
        let injects = resolve_injects(&self.config.inject)?;

        self.materializer.root().reset()?;

        let steps = &self.config.pipeline.steps;
        let mut store = OutputStore::new();
        let mut applied = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            on_progress(PipelineProgress::StepStarting {
                name: &step.name,
                index,
                total: steps.len(),
            });

            let resolved = self
                .apply_step(step, &injects, &store, &mut on_progress)
                .inspect_err(|e| warn!("Step '{}' failed: {}", step.name, e))?;

            store.extend(resolved);
            applied.push(step.name.clone());
        }

        Ok(ApplyReport {
            applied,
            outputs: store,
            duration: start.elapsed(),
        })
    }

    fn apply_step(
        &self,
        step: &StepConfig,
        injects: &[InjectSpec],
        store: &OutputStore,
        on_progress: &mut impl FnMut(PipelineProgress<'_>),
    ) -> Result<Vec<ResolvedOutput>> {
        let name = step.name.as_str();

        let workspace = self.materializer.stage(step)?;
        on_progress(PipelineProgress::PhaseReached {
            name,
            phase: StepPhase::Staged,
        });

        let declared = declared_resources(&workspace.dir)?;
        let variables = merge_step_map(&self.config.variables, step.variables.as_ref());
        let locals = merge_step_map(&self.config.locals, step.locals.as_ref());

        write_variables(&workspace.dir, &variables)?;
        write_locals(&workspace.dir, &locals)?;
        write_lookups(&workspace.dir, store.all())?;
        let matched = write_outputs(&workspace.dir, injects, &declared)?;
        on_progress(PipelineProgress::PhaseReached {
            name,
            phase: StepPhase::Rendered,
        });

        let state = self.state_handle(name);
        self.provisioner.init(&workspace.dir, &state)?;
        self.provisioner.apply(&workspace.dir, &state)?;
        let report = self.provisioner.fetch_outputs(&workspace.dir, &state)?;

        let resolved = matched
            .iter()
            .map(|inject| {
                report
                    .require(&inject.output_name())
                    .map(|id| ResolvedOutput::from_inject(inject, id))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Applied step '{}' ({} outputs)", name, resolved.len());
        on_progress(PipelineProgress::PhaseReached {
            name,
            phase: StepPhase::Applied,
        });
        Ok(resolved)
    }

    /// Destroy steps; see [`destroy_order`] for which and in what order.
    pub fn destroy(&self, targets: &[String]) -> Result<DestroyReport> {
        self.destroy_with_progress(targets, |_| {})
    }

    /// Destroy steps with a progress callback.
    ///
    /// Explicit targets must be plain step names; anything that would
    /// resolve outside the workspace root is rejected before any step runs.
    /// A step without a workspace is treated as already torn down. Any
    /// engine failure ends the run; running destroy again skips the steps
    /// already removed.
    pub fn destroy_with_progress(
        &self,
        targets: &[String],
        mut on_progress: impl FnMut(PipelineProgress<'_>),
    ) -> Result<DestroyReport> {
        let start = Instant::now();
        validate(self.config)?;
        check_step_names(targets)?;
        let order = destroy_order(self.config, targets);
        let mut destroyed = Vec::new();
        let mut skipped = Vec::new();

        for (index, name) in order.iter().enumerate() {
            on_progress(PipelineProgress::StepStarting {
                name,
                index,
                total: order.len(),
            });

            let Some(workspace) = self.workspace_root().existing(name) else {
                debug!("Step '{}' already gone, skipping", name);
                on_progress(PipelineProgress::StepSkipped {
                    name,
                    reason: "already gone",
                });
                skipped.push(name.clone());
                continue;
            };

            let state = self.state_handle(name);
            self.provisioner
                .init(&workspace.dir, &state)
                .and_then(|_| self.provisioner.destroy(&workspace.dir, &state))
                .inspect_err(|e| warn!("Step '{}' failed: {}", name, e))?;

            workspace.release()?;
            state.release()?;

            info!("Destroyed step '{}'", name);
            on_progress(PipelineProgress::PhaseReached {
                name,
                phase: StepPhase::Destroyed,
            });
            destroyed.push(name.clone());
        }

        Ok(DestroyReport {
            destroyed,
            skipped,
            duration: start.elapsed(),
        })
    }
}
