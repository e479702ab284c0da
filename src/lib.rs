//! Git branching workflow library.
//!
//! This crate automates common git branch sequences:
//! - Starting a branch from an up-to-date main (or switching to it)
//! - Merging the latest main into a branch and pushing it
//! - Doing the same while stashing local changes around the run
//! - Discarding all local changes after confirmation
//! - Staging and committing everything in one go

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod output;
pub mod repo;
pub mod workflow;
