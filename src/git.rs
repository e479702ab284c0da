//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution, logging and error formatting.

use anyhow::Context;
use colored::Colorize;
use std::path::Path;

/// Callback invoked with the arguments of every git command before it runs.
pub type GitLogger = fn(&[&str]);

/// Echoes the git command line, dimmed, to stderr.
pub fn verbose_logger(args: &[&str]) {
    eprintln!("  {}", format!("$ git {}", args.join(" ")).dimmed());
}

pub fn no_op_logger(_args: &[&str]) {}

fn spawn(repo: &Path, args: &[&str]) -> anyhow::Result<std::process::Output> {
    std::process::Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .with_context(|| format!("Failed to spawn git command: git {}", args.join(" ")))
}

/// Runs git in `repo` and returns trimmed stdout, or an error carrying git's
/// diagnostic output.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = spawn(repo, args)?;

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        // merge reports conflicts on stdout
        let detail = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        anyhow::bail!("git {} failed: {}", args.join(" "), detail)
    }
}

fn run_logged(repo: &Path, args: &[&str], logger: GitLogger) -> anyhow::Result<String> {
    logger(args);
    run_git(repo, args)
}

/// Runs a probing command whose exit status is the answer.
///
/// Only a failure to spawn git is an error.
fn git_succeeds(repo: &Path, args: &[&str], logger: GitLogger) -> anyhow::Result<bool> {
    logger(args);
    Ok(spawn(repo, args)?.status.success())
}

/// Rejects names git would misread or that could smuggle in options.
pub fn validate_branch_name(branch: &str) -> anyhow::Result<()> {
    if branch.is_empty()
        || branch.contains('\0')
        || branch.contains('\n')
        || branch.starts_with('-')
        || branch.chars().any(char::is_whitespace)
    {
        anyhow::bail!("Invalid branch name: {:?}", branch);
    }
    Ok(())
}

/// `Ok(false)` when git runs but `path` is not in a work tree; an error only
/// when git itself cannot be run there.
pub fn is_inside_work_tree(path: &Path, logger: GitLogger) -> anyhow::Result<bool> {
    let args = ["rev-parse", "--is-inside-work-tree"];
    logger(&args);
    let output = spawn(path, &args)?;
    Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
}

pub fn get_current_branch(repo: &Path, logger: GitLogger) -> anyhow::Result<String> {
    run_logged(repo, &["rev-parse", "--abbrev-ref", "HEAD"], logger)
        .context("Failed to get current branch")
}

pub fn has_uncommitted_changes(repo: &Path, logger: GitLogger) -> anyhow::Result<bool> {
    run_logged(repo, &["status", "--porcelain"], logger)
        .map(|output| !output.is_empty())
        .context("Failed to check for uncommitted changes")
}

pub fn local_branch_exists(repo: &Path, branch: &str, logger: GitLogger) -> anyhow::Result<bool> {
    validate_branch_name(branch)?;
    let reference = format!("refs/heads/{}", branch);
    git_succeeds(
        repo,
        &["show-ref", "--verify", "--quiet", &reference],
        logger,
    )
    .with_context(|| format!("Failed to look up local branch '{}'", branch))
}

pub fn remote_branch_exists(
    repo: &Path,
    remote: &str,
    branch: &str,
    logger: GitLogger,
) -> anyhow::Result<bool> {
    validate_branch_name(branch)?;
    let reference = format!("refs/remotes/{}/{}", remote, branch);
    git_succeeds(
        repo,
        &["show-ref", "--verify", "--quiet", &reference],
        logger,
    )
    .with_context(|| format!("Failed to look up remote branch '{}/{}'", remote, branch))
}

/// Stashes tracked and untracked changes under `message`.
///
/// Returns `false` when git had nothing to save.
pub fn stash_push(repo: &Path, message: &str, logger: GitLogger) -> anyhow::Result<bool> {
    let output = run_logged(
        repo,
        &["stash", "push", "--include-untracked", "-m", message],
        logger,
    )
    .context("Failed to stash changes")?;
    Ok(!output.contains("No local changes to save"))
}

pub fn stash_pop(repo: &Path, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["stash", "pop"], logger).context("Failed to pop stash")?;
    Ok(())
}

pub fn fetch_prune(repo: &Path, remote: &str, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["fetch", "--prune", remote], logger)
        .with_context(|| format!("Failed to fetch from remote '{}'", remote))?;
    Ok(())
}

pub fn checkout(repo: &Path, branch: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_branch_name(branch)?;
    run_logged(repo, &["checkout", branch], logger)
        .with_context(|| format!("Failed to checkout branch '{}'", branch))?;
    Ok(())
}

pub fn checkout_new_branch(repo: &Path, branch: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_branch_name(branch)?;
    run_logged(repo, &["checkout", "-b", branch], logger)
        .with_context(|| format!("Failed to create branch '{}'", branch))?;
    Ok(())
}

pub fn pull(repo: &Path, remote: &str, branch: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_branch_name(branch)?;
    run_logged(repo, &["pull", "--no-rebase", remote, branch], logger)
        .with_context(|| format!("Failed to pull '{}' from '{}'", branch, remote))?;
    Ok(())
}

/// Merges `branch` into the current branch. A conflict leaves the merge in
/// progress.
pub fn merge(repo: &Path, branch: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_branch_name(branch)?;
    run_logged(repo, &["merge", "--no-edit", branch], logger)
        .with_context(|| format!("Failed to merge '{}'", branch))?;
    Ok(())
}

pub fn push(repo: &Path, remote: &str, branch: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_branch_name(branch)?;
    run_logged(repo, &["push", remote, branch], logger)
        .with_context(|| format!("Failed to push '{}' to '{}'", branch, remote))?;
    Ok(())
}

pub fn push_set_upstream(
    repo: &Path,
    remote: &str,
    branch: &str,
    logger: GitLogger,
) -> anyhow::Result<()> {
    validate_branch_name(branch)?;
    run_logged(repo, &["push", "-u", remote, branch], logger)
        .with_context(|| format!("Failed to publish '{}' to '{}'", branch, remote))?;
    Ok(())
}

pub fn reset_hard(repo: &Path, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["reset", "--hard", "HEAD"], logger).context("Failed to reset working tree")?;
    Ok(())
}

pub fn clean_untracked(repo: &Path, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["clean", "-fd"], logger).context("Failed to remove untracked files")?;
    Ok(())
}

pub fn stage_all(repo: &Path, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["add", "-A"], logger).context("Failed to stage changes")?;
    Ok(())
}

pub fn commit(repo: &Path, message: &str, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["commit", "-m", message], logger).context("Failed to commit changes")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_branch_name_accepts_common_names() {
        assert!(validate_branch_name("main").is_ok());
        assert!(validate_branch_name("feature/x").is_ok());
        assert!(validate_branch_name("fix-123_thing.v2").is_ok());
    }

    #[test]
    fn test_validate_branch_name_rejects_bad_names() {
        assert!(validate_branch_name("").is_err());
        assert!(validate_branch_name("-rf").is_err());
        assert!(validate_branch_name("two words").is_err());
        assert!(validate_branch_name("line\nbreak").is_err());
        assert!(validate_branch_name("nul\0byte").is_err());
    }

    #[test]
    fn test_run_git_reports_spawn_failure_for_missing_path() {
        let result = run_git(Path::new("/no/such/repo/for/test"), &["status"]);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to spawn git command"));
    }
}
