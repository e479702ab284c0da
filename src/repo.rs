// Repository collaborator: the capability surface the workflows drive.

use crate::error::WorkflowError;
use crate::git::{self, GitLogger};
use std::path::{Path, PathBuf};

/// Version-control operations the workflows depend on.
///
/// Every call reports success or a failure with a reason; the workflows
/// decide which failures are fatal.
pub trait Repository {
    fn has_pending_changes(&self) -> anyhow::Result<bool>;
    fn current_branch(&self) -> anyhow::Result<String>;
    fn local_branch_exists(&self, branch: &str) -> anyhow::Result<bool>;
    fn remote_branch_exists(&self, remote: &str, branch: &str) -> anyhow::Result<bool>;
    /// Returns whether anything was actually stashed.
    fn stash_push(&self, message: &str) -> anyhow::Result<bool>;
    fn stash_pop(&self) -> anyhow::Result<()>;
    fn fetch(&self, remote: &str) -> anyhow::Result<()>;
    fn checkout(&self, branch: &str) -> anyhow::Result<()>;
    fn create_branch(&self, branch: &str) -> anyhow::Result<()>;
    fn pull(&self, remote: &str, branch: &str) -> anyhow::Result<()>;
    fn merge(&self, branch: &str) -> anyhow::Result<()>;
    fn push(&self, remote: &str, branch: &str) -> anyhow::Result<()>;
    fn push_set_upstream(&self, remote: &str, branch: &str) -> anyhow::Result<()>;
    fn reset_hard(&self) -> anyhow::Result<()>;
    fn clean_untracked(&self) -> anyhow::Result<()>;
    fn stage_all(&self) -> anyhow::Result<()>;
    fn commit(&self, message: &str) -> anyhow::Result<()>;
}

/// A git work tree driven through the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    path: PathBuf,
    logger: GitLogger,
}

impl GitCli {
    /// Opens the repository containing `path`.
    pub fn discover(path: &Path, logger: GitLogger) -> Result<Self, WorkflowError> {
        let inside =
            git::is_inside_work_tree(path, logger).map_err(WorkflowError::GitUnavailable)?;
        if !inside {
            return Err(WorkflowError::NotARepository(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            logger,
        })
    }
}

impl Repository for GitCli {
    fn has_pending_changes(&self) -> anyhow::Result<bool> {
        git::has_uncommitted_changes(&self.path, self.logger)
    }

    fn current_branch(&self) -> anyhow::Result<String> {
        git::get_current_branch(&self.path, self.logger)
    }

    fn local_branch_exists(&self, branch: &str) -> anyhow::Result<bool> {
        git::local_branch_exists(&self.path, branch, self.logger)
    }

    fn remote_branch_exists(&self, remote: &str, branch: &str) -> anyhow::Result<bool> {
        git::remote_branch_exists(&self.path, remote, branch, self.logger)
    }

    fn stash_push(&self, message: &str) -> anyhow::Result<bool> {
        git::stash_push(&self.path, message, self.logger)
    }

    fn stash_pop(&self) -> anyhow::Result<()> {
        git::stash_pop(&self.path, self.logger)
    }

    fn fetch(&self, remote: &str) -> anyhow::Result<()> {
        git::fetch_prune(&self.path, remote, self.logger)
    }

    fn checkout(&self, branch: &str) -> anyhow::Result<()> {
        git::checkout(&self.path, branch, self.logger)
    }

    fn create_branch(&self, branch: &str) -> anyhow::Result<()> {
        git::checkout_new_branch(&self.path, branch, self.logger)
    }

    fn pull(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        git::pull(&self.path, remote, branch, self.logger)
    }

    fn merge(&self, branch: &str) -> anyhow::Result<()> {
        git::merge(&self.path, branch, self.logger)
    }

    fn push(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        git::push(&self.path, remote, branch, self.logger)
    }

    fn push_set_upstream(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        git::push_set_upstream(&self.path, remote, branch, self.logger)
    }

    fn reset_hard(&self) -> anyhow::Result<()> {
        git::reset_hard(&self.path, self.logger)
    }

    fn clean_untracked(&self) -> anyhow::Result<()> {
        git::clean_untracked(&self.path, self.logger)
    }

    fn stage_all(&self) -> anyhow::Result<()> {
        git::stage_all(&self.path, self.logger)
    }

    fn commit(&self, message: &str) -> anyhow::Result<()> {
        git::commit(&self.path, message, self.logger)
    }
}
