//! Test infrastructure for git-workflow integration tests.
#![allow(dead_code)]

use anyhow::Result;
use git_workflow_rust::config::{Config, Verbosity};
use git_workflow_rust::git::run_git;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Quiet configuration with default protected branches and `origin`.
pub fn test_config() -> Config {
    Config::new(Verbosity::Quiet)
}

fn configure_identity(path: &Path) -> Result<()> {
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    run_git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// A temporary git repository for testing, optionally with a bare remote.
/// Automatically cleaned up when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
    remote: Option<TempDir>,
}

impl TestRepo {
    /// Creates a repository with an initial commit on `branch`.
    pub fn new(branch: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();

        run_git(&path, &["init", "-b", branch])?;
        configure_identity(&path)?;

        std::fs::write(path.join("README.md"), "# Test Repo\n")?;
        run_git(&path, &["add", "README.md"])?;
        run_git(&path, &["commit", "-m", "Initial commit"])?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
            remote: None,
        })
    }

    /// Creates a repository whose `branch` is pushed to a bare `origin`
    /// with upstream tracking.
    pub fn with_remote(branch: &str) -> Result<Self> {
        let remote_dir = TempDir::new()?;
        run_git(remote_dir.path(), &["init", "--bare", "-b", branch])?;

        let mut local = Self::new(branch)?;
        let remote_url = remote_dir.path().to_string_lossy().to_string();
        run_git(&local.path, &["remote", "add", "origin", &remote_url])?;
        run_git(&local.path, &["push", "-u", "origin", branch])?;

        local.remote = Some(remote_dir);
        Ok(local)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.path, args)
    }

    /// Removes the bare remote from disk so any network step fails.
    pub fn drop_remote(&mut self) {
        self.remote = None;
    }

    /// Clones the bare remote into a second working copy checked out on `branch`.
    pub fn clone_remote(&self, branch: &str) -> Result<(TempDir, PathBuf)> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("repository has no remote"))?;
        let dir = TempDir::new()?;
        let path = dir.path().join("clone");
        let remote_url = remote.path().to_string_lossy().to_string();
        let target = path.to_string_lossy().to_string();
        run_git(dir.path(), &["clone", "-b", branch, &remote_url, &target])?;
        configure_identity(&path)?;
        Ok((dir, path))
    }

    /// Hash of `branch` as stored in the bare remote.
    pub fn remote_head(&self, branch: &str) -> Result<Option<String>> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("repository has no remote"))?;
        let output = run_git(remote.path(), &["branch", "--list", branch])?;
        if output.is_empty() {
            return Ok(None);
        }
        Ok(Some(run_git(remote.path(), &["rev-parse", branch])?))
    }

    pub fn current_branch(&self) -> Result<String> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn head(&self, rev: &str) -> Result<String> {
        self.git(&["rev-parse", rev])
    }

    pub fn create_branch(&self, name: &str) -> Result<()> {
        self.git(&["branch", name])?;
        Ok(())
    }

    pub fn branches(&self) -> Result<Vec<String>> {
        let output = self.git(&["branch", "--format=%(refname:short)"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Writes `content` to `file` and commits it on the current branch.
    pub fn commit_file(&self, file: &str, content: &str, message: &str) -> Result<()> {
        std::fs::write(self.path.join(file), content)?;
        self.git(&["add", file])?;
        self.git(&["commit", "-m", message])?;
        Ok(())
    }

    /// Modifies the tracked README.
    pub fn make_dirty(&self) -> Result<()> {
        std::fs::write(self.path.join("README.md"), "# Modified\n")?;
        Ok(())
    }

    pub fn make_untracked(&self) -> Result<()> {
        std::fs::write(self.path.join("untracked.txt"), "untracked\n")?;
        Ok(())
    }

    pub fn has_stash(&self) -> Result<bool> {
        Ok(!self.git(&["stash", "list"])?.is_empty())
    }

    pub fn status(&self) -> Result<String> {
        self.git(&["status", "--porcelain"])
    }

    pub fn file_exists(&self, file: &str) -> bool {
        self.path.join(file).exists()
    }

    pub fn read_file(&self, file: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.path.join(file))?)
    }
}
