//! Configuration types for CLI verbosity and workflow options.

use crate::constants::{
    DEFAULT_PROTECTED_BRANCHES, DEFAULT_REMOTE, PROTECTED_BRANCHES_ENV, REMOTE_ENV,
};
use crate::git::{self, GitLogger};
use std::collections::BTreeSet;

/// Runtime configuration derived from CLI arguments and the environment.
///
/// Built once at startup and passed down by reference; nothing reads
/// configuration from globals after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
    /// Names the new-branch workflow refuses to target.
    pub protected_branches: ProtectedBranches,
    /// Remote used for fetch, pull and push.
    pub remote: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Verbosity::default())
    }
}

impl Config {
    /// Configuration with built-in defaults.
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            protected_branches: ProtectedBranches::default(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    /// Configuration with defaults overridden by `GIT_WORKFLOW_*` variables.
    ///
    /// Blank values are ignored and fall back to the defaults.
    #[must_use]
    pub fn from_env(verbosity: Verbosity) -> Self {
        let mut config = Self::new(verbosity);

        if let Some(list) = std::env::var(PROTECTED_BRANCHES_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            config.protected_branches = ProtectedBranches::parse(&list);
        }

        if let Some(remote) = std::env::var(REMOTE_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            config.remote = remote;
        }

        config
    }

    #[must_use]
    pub fn with_protected_branches(mut self, protected_branches: ProtectedBranches) -> Self {
        self.protected_branches = protected_branches;
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Returns the appropriate git logger based on verbosity settings.
    ///
    /// Config only picks which logger to use; the loggers themselves live
    /// in the git module.
    #[must_use]
    pub fn git_logger(&self) -> GitLogger {
        if self.is_verbose() {
            git::verbose_logger
        } else {
            git::no_op_logger
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Maps the `--quiet` / `--verbose` flags; verbose wins if both are set.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (_, true) => Verbosity::Verbose,
            (true, false) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Immutable set of branch names that must never be created or targeted
/// directly by the new-branch workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBranches(BTreeSet<String>);

impl Default for ProtectedBranches {
    fn default() -> Self {
        DEFAULT_PROTECTED_BRANCHES.iter().copied().collect()
    }
}

impl ProtectedBranches {
    /// Parses a comma-separated list, skipping empty entries.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, branch: &str) -> bool {
        self.0.contains(branch)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ProtectedBranches {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
