//! Per-step state artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// The provisioning engine's state artifact for one step.
///
/// Named `<step>.<suffix>` inside the state directory and owned exclusively
/// by that step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateHandle {
    /// Owning step name.
    pub step: String,
    /// Absolute or project-relative artifact path.
    pub path: PathBuf,
}

impl StateHandle {
    /// The handle for `step` in `state_dir`.
    pub fn for_step(state_dir: &Path, step: &str, suffix: &str) -> Self {
        Self {
            step: step.to_string(),
            path: state_dir.join(format!("{}.{}", step, suffix)),
        }
    }

    /// The artifact plus any sibling the engine derived from it
    /// (e.g. `<step>.terraform.tfstate.backup`).
    pub fn artifacts(&self) -> Result<Vec<PathBuf>> {
        let (Some(dir), Some(prefix)) = (self.path.parent(), self.path.file_name()) else {
            return Ok(Vec::new());
        };
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let prefix = prefix.to_string_lossy();
        let mut found: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix.as_ref()))
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        found.sort();
        Ok(found)
    }

    /// Delete every artifact of this step.
    pub fn release(&self) -> Result<()> {
        for artifact in self.artifacts()? {
            tracing::debug!("Removing state artifact {}", artifact.display());
            fs::remove_file(artifact)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn path_uses_step_and_suffix() {
        let handle = StateHandle::for_step(Path::new("/project"), "network", "terraform.tfstate");
        assert_eq!(handle.step, "network");
        assert_eq!(
            handle.path,
            PathBuf::from("/project/network.terraform.tfstate")
        );
    }

    #[test]
    fn release_removes_state_and_backup_only() {
        let temp = TempDir::new().unwrap();
        let handle = StateHandle::for_step(temp.path(), "net", "terraform.tfstate");
        fs::write(&handle.path, "{}").unwrap();
        fs::write(temp.path().join("net.terraform.tfstate.backup"), "{}").unwrap();
        fs::write(temp.path().join("network.terraform.tfstate"), "{}").unwrap();

        assert!(handle.path.is_file());
        assert_eq!(handle.artifacts().unwrap().len(), 2);

        handle.release().unwrap();

        assert!(!handle.path.is_file());
        assert!(!temp.path().join("net.terraform.tfstate.backup").exists());
        assert!(temp.path().join("network.terraform.tfstate").exists());
    }

    #[test]
    fn release_without_artifacts_is_noop() {
        let temp = TempDir::new().unwrap();
        let handle = StateHandle::for_step(temp.path(), "ghost", "terraform.tfstate");
        handle.release().unwrap();
        assert!(handle.artifacts().unwrap().is_empty());
    }
}
