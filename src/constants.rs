//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic strings throughout the codebase.

/// Canonical branch names probed when resolving the main branch, in priority order.
pub const MAIN_BRANCH: &str = "main";
pub const MASTER_BRANCH: &str = "master";

/// Remote used for fetch, pull and push unless overridden.
pub const DEFAULT_REMOTE: &str = "origin";

/// Branch names the new-branch workflow refuses to create or switch to.
pub const DEFAULT_PROTECTED_BRANCHES: &[&str] = &["HEAD", "develop", "staging", "production"];

/// Prefix for the message attached to automatic stashes.
pub const STASH_LABEL_PREFIX: &str = "git-workflow auto-stash";

/// Comma-separated override for the protected branch set.
///
/// Example: `GIT_WORKFLOW_PROTECTED_BRANCHES=develop,release git-workflow -n feature/x`
pub const PROTECTED_BRANCHES_ENV: &str = "GIT_WORKFLOW_PROTECTED_BRANCHES";

/// Override for the remote name.
pub const REMOTE_ENV: &str = "GIT_WORKFLOW_REMOTE";

/// Spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;
