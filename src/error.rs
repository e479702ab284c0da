//! Typed workflow failures.

use crate::workflow::WorkflowStep;
use std::path::PathBuf;

/// Why a workflow stopped.
///
/// `Step` carries the step that failed so callers can tell how far a
/// procedure got; earlier steps are never rolled back.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Bad or missing argument, caught before anything is mutated.
    #[error("{0}")]
    Validation(String),

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// git could not be started at all.
    #[error("Could not run git: {0:#}")]
    GitUnavailable(anyhow::Error),

    /// The confirmation prompt could not be shown or read.
    #[error("Confirmation prompt failed: {0:#}")]
    Prompt(anyhow::Error),

    #[error("{step} failed: {source:#}")]
    Step {
        step: WorkflowStep,
        source: anyhow::Error,
    },
}

impl WorkflowError {
    /// The step that failed, if the error came from a git operation.
    #[must_use]
    pub fn failed_step(&self) -> Option<&WorkflowStep> {
        match self {
            WorkflowError::Step { step, .. } => Some(step),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Validation(_))
    }
}
