//! Per-step workspace materialization.
//!
//! Every step gets its own directory under the workspace root
//! (`.orchestrator/<step>` by default) holding a copy of its module source
//! plus the generated fragments. The workspace root is exclusively owned by
//! the engine: an apply run wipes it before staging anything.
//!
//! - [`git`] - remote source cloning
//! - [`resources`] - declared resource discovery

pub mod git;
pub mod resources;

pub use git::GitFetcher;
pub use resources::{declared_resources, DeclaredResources};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StepConfig;
use crate::error::{PipelineError, Result};

/// The directory holding every step workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    path: PathBuf,
}

impl WorkspaceRoot {
    /// Create a handle for the root at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Root directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory a step's workspace lives in.
    pub fn step_dir(&self, step: &str) -> PathBuf {
        self.path.join(step)
    }

    /// Directory state artifacts live in: one level above the root.
    pub fn state_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Wipe and recreate the root.
    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            tracing::info!("Clearing workspace root {}", self.path.display());
            fs::remove_dir_all(&self.path)?;
        }
        fs::create_dir_all(&self.path)?;
        Ok(())
    }

    /// The workspace of an already-staged step, if present.
    pub fn existing(&self, step: &str) -> Option<Workspace> {
        let dir = self.step_dir(step);
        dir.is_dir().then(|| Workspace {
            step: step.to_string(),
            dir,
        })
    }
}

/// A staged directory bound to exactly one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Owning step name.
    pub step: String,
    /// Workspace directory.
    pub dir: PathBuf,
}

impl Workspace {
    /// Delete the workspace directory.
    pub fn release(self) -> Result<()> {
        tracing::debug!("Removing workspace {}", self.dir.display());
        fs::remove_dir_all(&self.dir)?;
        Ok(())
    }
}

/// Stages step workspaces from their module sources.
#[derive(Debug, Clone)]
pub struct WorkspaceMaterializer {
    project_root: PathBuf,
    root: WorkspaceRoot,
    fetcher: GitFetcher,
}

impl WorkspaceMaterializer {
    /// Create a materializer resolving sources relative to `project_root`.
    pub fn new(project_root: impl Into<PathBuf>, root: WorkspaceRoot, fetcher: GitFetcher) -> Self {
        Self {
            project_root: project_root.into(),
            root,
            fetcher,
        }
    }

    /// The workspace root this materializer stages into.
    pub fn root(&self) -> &WorkspaceRoot {
        &self.root
    }

    /// Stage a step: clone its remote source if declared, then copy the
    /// source directory into a fresh workspace.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError` if the clone fails, the source is missing,
    /// or the workspace already exists.
    pub fn stage(&self, step: &StepConfig) -> Result<Workspace> {
        let source = self.project_root.join(&step.source);

        if let Some(url) = &step.git {
            self.fetcher
                .fetch_into(url, &source, step.git_ref.as_deref())
                .map_err(|e| PipelineError::workspace(&step.name, format!("{:#}", e)))?;
        }

        if !source.is_dir() {
            return Err(PipelineError::workspace(
                &step.name,
                format!("source path {} does not exist", source.display()),
            ));
        }

        if contains_path(&source, self.root.path()) {
            return Err(PipelineError::workspace(
                &step.name,
                format!(
                    "source path {} contains the workspace root {}",
                    source.display(),
                    self.root.path().display()
                ),
            ));
        }

        let dest = self.root.step_dir(&step.name);
        if dest.exists() {
            return Err(PipelineError::workspace(
                &step.name,
                format!("workspace {} already exists", dest.display()),
            ));
        }

        tracing::debug!("Copying {} into {}", source.display(), dest.display());
        copy_dir(&source, &dest)?;

        Ok(Workspace {
            step: step.name.clone(),
            dir: dest,
        })
    }
}

/// Whether `inner` is `outer` or lies below it, comparing resolved paths.
fn contains_path(outer: &Path, inner: &Path) -> bool {
    let resolve = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    resolve(inner).starts_with(resolve(outer))
}

/// Recursive copy that never follows symlinked directories.
fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = to.join(entry.file_name());
        if file_type.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else if file_type.is_symlink() && entry.path().is_dir() {
            tracing::warn!("Skipping symlinked directory {}", entry.path().display());
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn step(name: &str, source: &str) -> StepConfig {
        StepConfig {
            name: name.to_string(),
            source: PathBuf::from(source),
            ..Default::default()
        }
    }

    fn materializer(project: &Path) -> WorkspaceMaterializer {
        WorkspaceMaterializer::new(
            project,
            WorkspaceRoot::new(project.join(".orchestrator")),
            GitFetcher::default(),
        )
    }

    #[test]
    fn stage_copies_source_tree() {
        let temp = TempDir::new().unwrap();
        let module = temp.path().join("modules/network");
        fs::create_dir_all(module.join("nested")).unwrap();
        fs::write(module.join("main.tf"), "resource \"aws_vpc\" \"main\" {}").unwrap();
        fs::write(module.join("nested/extra.txt"), "x").unwrap();

        let m = materializer(temp.path());
        m.root().reset().unwrap();
        let ws = m.stage(&step("network", "modules/network")).unwrap();

        assert_eq!(ws.step, "network");
        assert_eq!(ws.dir, temp.path().join(".orchestrator/network"));
        assert!(ws.dir.join("main.tf").is_file());
        assert!(ws.dir.join("nested/extra.txt").is_file());
    }

    #[test]
    fn stage_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let m = materializer(temp.path());
        m.root().reset().unwrap();

        let result = m.stage(&step("network", "modules/missing"));
        assert!(matches!(
            result,
            Err(PipelineError::WorkspaceError { ref step, .. }) if step == "network"
        ));
    }

    #[test]
    fn stage_refuses_to_merge_into_existing_workspace() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("modules/a")).unwrap();
        let m = materializer(temp.path());
        m.root().reset().unwrap();

        m.stage(&step("a", "modules/a")).unwrap();
        let again = m.stage(&step("a", "modules/a"));
        assert!(matches!(again, Err(PipelineError::WorkspaceError { .. })));
    }

    #[test]
    fn stage_with_failing_clone_is_workspace_error() {
        let temp = TempDir::new().unwrap();
        let m = WorkspaceMaterializer::new(
            temp.path(),
            WorkspaceRoot::new(temp.path().join(".orchestrator")),
            GitFetcher::new("definitely-not-a-git-binary-xyz"),
        );
        let mut s = step("remote", "modules/remote");
        s.git = Some("https://example.com/remote.git".to_string());

        let result = m.stage(&s);
        assert!(matches!(result, Err(PipelineError::WorkspaceError { .. })));
    }

    #[test]
    fn reset_wipes_previous_workspaces() {
        let temp = TempDir::new().unwrap();
        let root = WorkspaceRoot::new(temp.path().join(".orchestrator"));
        fs::create_dir_all(root.step_dir("old")).unwrap();

        root.reset().unwrap();

        assert!(root.path().is_dir());
        assert!(root.existing("old").is_none());
    }

    #[test]
    fn existing_and_release() {
        let temp = TempDir::new().unwrap();
        let root = WorkspaceRoot::new(temp.path().join(".orchestrator"));
        fs::create_dir_all(root.step_dir("b")).unwrap();

        let ws = root.existing("b").unwrap();
        assert_eq!(ws.step, "b");
        ws.release().unwrap();
        assert!(root.existing("b").is_none());
    }

    #[test]
    fn state_dir_is_parent_of_root() {
        let root = WorkspaceRoot::new("/project/.orchestrator");
        assert_eq!(root.state_dir(), PathBuf::from("/project"));

        let relative = WorkspaceRoot::new(".orchestrator");
        assert_eq!(relative.state_dir(), PathBuf::from("."));
    }

    #[test]
    fn stage_rejects_source_holding_workspace_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.tf"), "resource \"aws_vpc\" \"main\" {}").unwrap();
        let m = materializer(temp.path());
        m.root().reset().unwrap();

        let result = m.stage(&step("single", "."));

        assert!(matches!(
            result,
            Err(PipelineError::WorkspaceError { ref step, ref message })
                if step == "single" && message.contains("contains the workspace root")
        ));
        assert!(!m.root().step_dir("single").exists());
    }

    #[cfg(unix)]
    #[test]
    fn stage_skips_symlinked_directories() {
        let temp = TempDir::new().unwrap();
        let module = temp.path().join("modules/net");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join("main.tf"), "").unwrap();
        fs::write(temp.path().join("shared.tf"), "locals {}\n").unwrap();
        std::os::unix::fs::symlink(&module, module.join("loop")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("shared.tf"), module.join("shared.tf"))
            .unwrap();

        let m = materializer(temp.path());
        m.root().reset().unwrap();
        let ws = m.stage(&step("net", "modules/net")).unwrap();

        assert!(ws.dir.join("main.tf").is_file());
        assert!(!ws.dir.join("loop").exists());
        assert_eq!(
            fs::read_to_string(ws.dir.join("shared.tf")).unwrap(),
            "locals {}\n"
        );
    }
}
