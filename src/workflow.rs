//! Branch-management procedures.
//!
//! Each procedure is a straight-line list of [`WorkflowStep`]s run against a
//! [`Repository`]. The first failing step stops the procedure and is reported
//! in [`WorkflowError::Step`]. Nothing already done is undone: a merge that
//! fails at the push step stays committed locally, and the user resolves
//! from wherever the run stopped. The only soft failure is restoring a
//! stash, which becomes a warning.

use crate::config::Config;
use crate::constants::{MAIN_BRANCH, MASTER_BRANCH, STASH_LABEL_PREFIX};
use crate::error::WorkflowError;
use crate::git;
use crate::repo::Repository;
use std::fmt;

/// A command selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewBranch { branch: String },
    MergeMain { branch: String },
    MergeMainWithStash { branch: String },
    Clean,
    QuickCommit { message: String, push: bool },
}

impl Command {
    fn label(&self) -> &'static str {
        match self {
            Command::NewBranch { .. } => "new-branch",
            Command::MergeMain { .. } => "merge-main",
            Command::MergeMainWithStash { .. } => "merge-main-with-stash",
            Command::Clean => "clean",
            Command::QuickCommit { .. } => "quick-commit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStep {
    ResolvingMainBranch,
    CheckingChanges,
    Stashing,
    Fetching,
    CheckingOut { branch: String },
    Pulling { branch: String },
    CreatingBranch { branch: String },
    Publishing { branch: String },
    LookingUpRemote { branch: String },
    Merging { from: String, into: String },
    Pushing { branch: String },
    RestoringStash,
    Resetting,
    RemovingUntracked,
    Staging,
    Committing,
    DetectingBranch,
    Completed,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStep::ResolvingMainBranch => write!(f, "Resolving main branch"),
            WorkflowStep::CheckingChanges => write!(f, "Checking for uncommitted changes"),
            WorkflowStep::Stashing => write!(f, "Stashing uncommitted changes"),
            WorkflowStep::Fetching => write!(f, "Fetching from remote"),
            WorkflowStep::CheckingOut { branch } => write!(f, "Checking out '{}'", branch),
            WorkflowStep::Pulling { branch } => write!(f, "Pulling '{}'", branch),
            WorkflowStep::CreatingBranch { branch } => write!(f, "Creating branch '{}'", branch),
            WorkflowStep::Publishing { branch } => write!(f, "Publishing '{}'", branch),
            WorkflowStep::LookingUpRemote { branch } => {
                write!(f, "Looking up '{}' on remote", branch)
            }
            WorkflowStep::Merging { from, into } => {
                write!(f, "Merging '{}' into '{}'", from, into)
            }
            WorkflowStep::Pushing { branch } => write!(f, "Pushing '{}'", branch),
            WorkflowStep::RestoringStash => write!(f, "Restoring stashed changes"),
            WorkflowStep::Resetting => write!(f, "Resetting working tree"),
            WorkflowStep::RemovingUntracked => write!(f, "Removing untracked files"),
            WorkflowStep::Staging => write!(f, "Staging changes"),
            WorkflowStep::Committing => write!(f, "Committing"),
            WorkflowStep::DetectingBranch => write!(f, "Detecting current branch"),
            WorkflowStep::Completed => write!(f, "Completed"),
        }
    }
}

/// Progress hooks for a running workflow.
pub trait WorkflowCallbacks {
    /// Called right before a step executes.
    fn on_step(&self, step: &WorkflowStep);
    /// Called for problems that do not stop the workflow.
    fn on_warning(&self, message: &str);
}

/// Callbacks that ignore everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl WorkflowCallbacks for NoOpCallbacks {
    fn on_step(&self, _step: &WorkflowStep) {}
    fn on_warning(&self, _message: &str) {}
}

/// Whether the capture step actually shelved anything.
///
/// Not `Clone`; restoring consumes the token.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum StashToken {
    Stashed,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StashOutcome {
    /// There was nothing to stash.
    NotNeeded,
    Restored,
    /// `stash pop` failed; the changes remain in the stash or half-applied.
    Conflicted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchResolution {
    /// The requested branch is the main branch itself.
    AlreadyMain,
    /// An existing remote branch was checked out and pulled.
    TrackedRemote,
    /// A new branch was created and published with upstream tracking.
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    BranchReady {
        branch: String,
        main_branch: String,
        resolution: BranchResolution,
        stash: StashOutcome,
    },
    Merged {
        branch: String,
        main_branch: String,
        stash: StashOutcome,
    },
    Cleaned,
    CleanDeclined,
    Committed {
        message: String,
        pushed_to: Option<String>,
    },
    NothingToCommit,
}

struct Runner<'a, R: ?Sized, C: ?Sized> {
    repo: &'a R,
    config: &'a Config,
    callbacks: &'a C,
}

fn at_step<T>(step: WorkflowStep, result: anyhow::Result<T>) -> Result<T, WorkflowError> {
    result.map_err(|source| WorkflowError::Step { step, source })
}

/// Runs one command to completion.
///
/// `confirm` is only consulted by [`Command::Clean`].
pub fn run<R, C, F>(
    command: &Command,
    repo: &R,
    config: &Config,
    callbacks: &C,
    confirm: F,
) -> Result<Completion, WorkflowError>
where
    R: Repository + ?Sized,
    C: WorkflowCallbacks + ?Sized,
    F: FnOnce() -> anyhow::Result<bool>,
{
    let runner = Runner {
        repo,
        config,
        callbacks,
    };

    let completion = match command {
        Command::NewBranch { branch } => runner.new_branch(branch, command.label()),
        Command::MergeMain { branch } => runner.merge_main(branch, None),
        Command::MergeMainWithStash { branch } => {
            runner.merge_main(branch, Some(command.label()))
        }
        Command::Clean => runner.clean(confirm),
        Command::QuickCommit { message, push } => runner.quick_commit(message, *push),
    }?;

    callbacks.on_step(&WorkflowStep::Completed);
    Ok(completion)
}

fn validate_name(branch: &str) -> Result<(), WorkflowError> {
    if branch.trim().is_empty() {
        return Err(WorkflowError::Validation(
            "Branch name is required".to_string(),
        ));
    }
    git::validate_branch_name(branch).map_err(|e| WorkflowError::Validation(e.to_string()))
}

impl<R, C> Runner<'_, R, C>
where
    R: Repository + ?Sized,
    C: WorkflowCallbacks + ?Sized,
{
    fn step<T>(
        &self,
        step: WorkflowStep,
        op: impl FnOnce(&R) -> anyhow::Result<T>,
    ) -> Result<T, WorkflowError> {
        self.callbacks.on_step(&step);
        at_step(step, op(self.repo))
    }

    fn remote(&self) -> &str {
        &self.config.remote
    }

    /// `main` if it exists locally or on the remote, else `master`, else `main`.
    fn resolve_main_branch(&self) -> Result<String, WorkflowError> {
        self.step(WorkflowStep::ResolvingMainBranch, |repo| {
            for candidate in [MAIN_BRANCH, MASTER_BRANCH] {
                if repo.local_branch_exists(candidate)?
                    || repo.remote_branch_exists(&self.config.remote, candidate)?
                {
                    return Ok(candidate.to_string());
                }
            }
            Ok(MAIN_BRANCH.to_string())
        })
    }

    fn capture_stash(&self, label: &str) -> Result<StashToken, WorkflowError> {
        let dirty = self.step(WorkflowStep::CheckingChanges, |repo| {
            repo.has_pending_changes()
        })?;
        if !dirty {
            return Ok(StashToken::None);
        }

        let message = format!("{}: {}", STASH_LABEL_PREFIX, label);
        let stashed = self.step(WorkflowStep::Stashing, |repo| repo.stash_push(&message))?;
        Ok(if stashed {
            StashToken::Stashed
        } else {
            StashToken::None
        })
    }

    fn restore_stash(&self, token: StashToken) -> StashOutcome {
        match token {
            StashToken::None => StashOutcome::NotNeeded,
            StashToken::Stashed => {
                self.callbacks.on_step(&WorkflowStep::RestoringStash);
                match self.repo.stash_pop() {
                    Ok(()) => StashOutcome::Restored,
                    Err(e) => {
                        let reason = format!("{:#}", e);
                        self.callbacks.on_warning(&format!(
                            "Could not restore stashed changes cleanly; resolve manually ({})",
                            reason
                        ));
                        StashOutcome::Conflicted(reason)
                    }
                }
            }
        }
    }

    fn checkout(&self, branch: &str) -> Result<(), WorkflowError> {
        self.step(
            WorkflowStep::CheckingOut {
                branch: branch.to_string(),
            },
            |repo| repo.checkout(branch),
        )
    }

    fn pull(&self, branch: &str) -> Result<(), WorkflowError> {
        self.step(
            WorkflowStep::Pulling {
                branch: branch.to_string(),
            },
            |repo| repo.pull(self.remote(), branch),
        )
    }

    fn new_branch(&self, branch: &str, label: &str) -> Result<Completion, WorkflowError> {
        validate_name(branch)?;
        if self.config.protected_branches.contains(branch) {
            return Err(WorkflowError::Validation(format!(
                "Branch '{}' is protected and cannot be used here",
                branch
            )));
        }

        let main_branch = self.resolve_main_branch()?;
        let token = self.capture_stash(label)?;

        self.step(WorkflowStep::Fetching, |repo| repo.fetch(self.remote()))?;
        self.checkout(&main_branch)?;
        self.pull(&main_branch)?;

        let resolution = if branch == main_branch {
            BranchResolution::AlreadyMain
        } else {
            let on_remote = self.step(
                WorkflowStep::LookingUpRemote {
                    branch: branch.to_string(),
                },
                |repo| repo.remote_branch_exists(self.remote(), branch),
            )?;

            if on_remote {
                self.checkout(branch)?;
                self.pull(branch)?;
                BranchResolution::TrackedRemote
            } else {
                self.step(
                    WorkflowStep::CreatingBranch {
                        branch: branch.to_string(),
                    },
                    |repo| repo.create_branch(branch),
                )?;
                self.step(
                    WorkflowStep::Publishing {
                        branch: branch.to_string(),
                    },
                    |repo| repo.push_set_upstream(self.remote(), branch),
                )?;
                BranchResolution::Created
            }
        };

        let stash = self.restore_stash(token);

        Ok(Completion::BranchReady {
            branch: branch.to_string(),
            main_branch,
            resolution,
            stash,
        })
    }

    /// Brings `branch` up to date with main and pushes it. With a stash
    /// label, pending changes are shelved around the run and an explicit
    /// fetch precedes the checkout.
    fn merge_main(
        &self,
        branch: &str,
        stash_label: Option<&str>,
    ) -> Result<Completion, WorkflowError> {
        validate_name(branch)?;
        let exists = self.step(WorkflowStep::DetectingBranch, |repo| {
            repo.local_branch_exists(branch)
        })?;
        if !exists {
            return Err(WorkflowError::Validation(format!(
                "Branch '{}' does not exist locally",
                branch
            )));
        }

        let main_branch = self.resolve_main_branch()?;

        let token = match stash_label {
            Some(label) => {
                let token = self.capture_stash(label)?;
                self.step(WorkflowStep::Fetching, |repo| repo.fetch(self.remote()))?;
                token
            }
            None => StashToken::None,
        };

        self.checkout(&main_branch)?;
        self.pull(&main_branch)?;
        self.checkout(branch)?;
        self.step(
            WorkflowStep::Merging {
                from: main_branch.clone(),
                into: branch.to_string(),
            },
            |repo| repo.merge(&main_branch),
        )?;
        self.step(
            WorkflowStep::Pushing {
                branch: branch.to_string(),
            },
            |repo| repo.push(self.remote(), branch),
        )?;

        let stash = self.restore_stash(token);

        Ok(Completion::Merged {
            branch: branch.to_string(),
            main_branch,
            stash,
        })
    }

    fn clean<F>(&self, confirm: F) -> Result<Completion, WorkflowError>
    where
        F: FnOnce() -> anyhow::Result<bool>,
    {
        if !confirm().map_err(WorkflowError::Prompt)? {
            return Ok(Completion::CleanDeclined);
        }

        self.step(WorkflowStep::Resetting, |repo| repo.reset_hard())?;
        self.step(WorkflowStep::RemovingUntracked, |repo| repo.clean_untracked())?;
        Ok(Completion::Cleaned)
    }

    fn quick_commit(&self, message: &str, push: bool) -> Result<Completion, WorkflowError> {
        if message.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "Commit message is required".to_string(),
            ));
        }

        let dirty = self.step(WorkflowStep::CheckingChanges, |repo| {
            repo.has_pending_changes()
        })?;
        if !dirty {
            self.callbacks.on_warning("No changes to commit");
            return Ok(Completion::NothingToCommit);
        }

        self.step(WorkflowStep::Staging, |repo| repo.stage_all())?;
        self.step(WorkflowStep::Committing, |repo| repo.commit(message))?;

        let pushed_to = if push {
            let branch = self.step(WorkflowStep::DetectingBranch, |repo| {
                repo.current_branch()
            })?;
            self.step(
                WorkflowStep::Pushing {
                    branch: branch.clone(),
                },
                |repo| repo.push(self.remote(), &branch),
            )?;
            Some(branch)
        } else {
            None
        };

        Ok(Completion::Committed {
            message: message.to_string(),
            pushed_to,
        })
    }
}
