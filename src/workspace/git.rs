//! Remote module source fetching.
//!
//! Clones a module repository into the step's declared source path. The
//! target path is owned by the engine: whatever is there gets replaced.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Fetches module sources from git repositories.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    /// git binary to invoke.
    program: String,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitFetcher {
    /// Create a fetcher that runs the given git binary.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for a shallow clone of `url` (at `git_ref`, if given) into `dest`.
    pub fn clone_args(url: &str, dest: &Path, git_ref: Option<&str>) -> Vec<String> {
        let mut args = vec!["clone".to_string(), "--depth".to_string(), "1".to_string()];
        if let Some(r) = git_ref {
            args.push("--branch".to_string());
            args.push(r.to_string());
        }
        args.push(url.to_string());
        args.push(dest.to_string_lossy().to_string());
        args
    }

    /// Replace `dest` with a fresh clone of `url`.
    pub fn fetch_into(&self, url: &str, dest: &Path, git_ref: Option<&str>) -> Result<()> {
        if dest.exists() {
            tracing::warn!(
                "Replacing {} with a fresh clone of {}",
                dest.display(),
                url
            );
            std::fs::remove_dir_all(dest)
                .with_context(|| format!("Failed to clear {}", dest.display()))?;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!("Cloning {} into {}", url, dest.display());
        let output = Command::new(&self.program)
            .args(Self::clone_args(url, dest, git_ref))
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            bail!(
                "Git clone failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn clone_args_without_ref() {
        let args = GitFetcher::clone_args(
            "https://example.com/net.git",
            &PathBuf::from("modules/net"),
            None,
        );
        assert_eq!(
            args,
            vec![
                "clone",
                "--depth",
                "1",
                "https://example.com/net.git",
                "modules/net"
            ]
        );
    }

    #[test]
    fn clone_args_with_ref() {
        let args = GitFetcher::clone_args(
            "https://example.com/net.git",
            &PathBuf::from("modules/net"),
            Some("v1.0"),
        );
        assert_eq!(&args[3..5], &["--branch", "v1.0"]);
    }

    #[test]
    fn failed_clone_is_error() {
        let temp = TempDir::new().unwrap();
        let fetcher = GitFetcher::new("definitely-not-a-git-binary-xyz");
        let result = fetcher.fetch_into(
            "https://example.com/net.git",
            &temp.path().join("net"),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn existing_destination_is_cleared_before_clone() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("net");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("stale.tf"), "").unwrap();

        let fetcher = GitFetcher::new("definitely-not-a-git-binary-xyz");
        let _ = fetcher.fetch_into("https://example.com/net.git", &dest, None);

        assert!(!dest.join("stale.tf").exists());
    }
}
