mod common;

use assert_cmd::Command;
use common::TestRepo;
use predicates::prelude::*;
use tempfile::TempDir;

fn git_workflow() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_git-workflow"));
    cmd.env("NO_COLOR", "1")
        .env_remove("GIT_WORKFLOW_PROTECTED_BRANCHES")
        .env_remove("GIT_WORKFLOW_REMOTE");
    cmd
}

#[test]
fn test_help_exits_zero() {
    git_workflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--merge-stash"))
        .stdout(predicate::str::contains("--quick-commit"));
}

#[test]
fn test_no_arguments_prints_usage() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    git_workflow()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn test_unknown_option_exits_one() {
    git_workflow()
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("--bogus"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_push_without_quick_commit_changes_nothing() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote("main")?;
    git_workflow()
        .current_dir(repo.path())
        .args(["-n", "feature/x", "--push"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("--quick-commit"));
    assert_eq!(repo.current_branch()?, "main");
    assert!(!repo.branches()?.iter().any(|b| b == "feature/x"));
    Ok(())
}

#[test]
fn test_outside_repository_exits_one() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    git_workflow()
        .current_dir(dir.path())
        .args(["-n", "feature/x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not a git repository"));
    Ok(())
}

#[test]
fn test_protected_branch_exits_one() -> anyhow::Result<()> {
    let repo = TestRepo::new("main")?;
    git_workflow()
        .current_dir(repo.path())
        .args(["-n", "develop"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("protected"));
    Ok(())
}

#[test]
fn test_protected_set_comes_from_environment() -> anyhow::Result<()> {
    let repo = TestRepo::new("main")?;
    git_workflow()
        .current_dir(repo.path())
        .env("GIT_WORKFLOW_PROTECTED_BRANCHES", "release, hotfix")
        .args(["--new", "hotfix"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("protected"));
    Ok(())
}

#[test]
fn test_quick_commit_short_verb() -> anyhow::Result<()> {
    let repo = TestRepo::new("main")?;
    repo.make_dirty()?;

    git_workflow()
        .current_dir(repo.path())
        .args(["-qc", "fix bug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[SUCCESS]"));

    assert_eq!(repo.git(&["log", "-1", "--format=%s"])?, "fix bug");
    Ok(())
}

#[test]
fn test_quick_commit_without_changes_warns_and_succeeds() -> anyhow::Result<()> {
    let repo = TestRepo::new("main")?;
    git_workflow()
        .current_dir(repo.path())
        .args(["-qc", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[WARNING]"));
    Ok(())
}

#[test]
fn test_merge_missing_branch_exits_one() -> anyhow::Result<()> {
    let repo = TestRepo::new("main")?;
    git_workflow()
        .current_dir(repo.path())
        .args(["-m", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist locally"));
    assert_eq!(repo.current_branch()?, "main");
    Ok(())
}

#[test]
fn test_clean_declined_from_pipe_changes_nothing() -> anyhow::Result<()> {
    for answer in ["n\n", "", "yes\n"] {
        let repo = TestRepo::new("main")?;
        repo.make_dirty()?;
        repo.make_untracked()?;
        let status_before = repo.status()?;

        git_workflow()
            .current_dir(repo.path())
            .arg("--clean")
            .write_stdin(answer)
            .assert()
            .success()
            .stdout(predicate::str::contains("Clean cancelled"));

        assert_eq!(repo.status()?, status_before, "answer {:?}", answer);
        assert!(repo.file_exists("untracked.txt"));
        assert_eq!(repo.read_file("README.md")?, "# Modified\n");
    }
    Ok(())
}

#[test]
fn test_clean_confirmed_from_pipe_discards_changes() -> anyhow::Result<()> {
    let repo = TestRepo::new("main")?;
    repo.make_dirty()?;
    repo.make_untracked()?;

    git_workflow()
        .current_dir(repo.path())
        .arg("-c")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[SUCCESS]"));

    assert!(repo.status()?.is_empty());
    assert!(!repo.file_exists("untracked.txt"));
    assert_eq!(repo.read_file("README.md")?, "# Test Repo\n");
    Ok(())
}

#[test]
fn test_verbose_echoes_git_commands() -> anyhow::Result<()> {
    let repo = TestRepo::new("main")?;
    repo.make_dirty()?;
    git_workflow()
        .current_dir(repo.path())
        .args(["-v", "-qc", "verbose commit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("$ git commit -m verbose commit"));
    Ok(())
}
