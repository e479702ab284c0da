//! Tagged console output, step spinner and confirmation prompt.
//!
//! Diagnostics go to stdout with a severity tag; errors go to stderr.
//! In normal mode a spinner shows the running step, in verbose mode every
//! step is printed on its own line.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::workflow::{
    BranchResolution, Completion, StashOutcome, WorkflowCallbacks, WorkflowStep,
};
use anyhow::Context;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::OnceCell;
use std::io::{BufRead, IsTerminal};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn tag(self) -> colored::ColoredString {
        match self {
            Severity::Info => "[INFO]".cyan().bold(),
            Severity::Success => "[SUCCESS]".green().bold(),
            Severity::Warning => "[WARNING]".yellow().bold(),
            Severity::Error => "[ERROR]".red().bold(),
        }
    }
}

/// Formats a single tagged diagnostic line.
#[must_use]
pub fn format_line(severity: Severity, message: &str) -> String {
    format!("{} {}", severity.tag(), message)
}

pub fn info(config: &Config, message: &str) {
    if config.is_quiet() {
        return;
    }
    println!("{}", format_line(Severity::Info, message));
}

pub fn success(config: &Config, message: &str) {
    if config.is_quiet() {
        return;
    }
    println!("{}", format_line(Severity::Success, message));
}

pub fn warning(message: &str) {
    println!("{}", format_line(Severity::Warning, message));
}

pub fn error(message: &str) {
    eprintln!("{}", format_line(Severity::Error, message));
}

const CLEAN_PROMPT: &str = "Discard ALL uncommitted changes and untracked files?";

/// Asks before `--clean` throws work away. Anything but an explicit "y"
/// counts as no.
///
/// Without a terminal the answer is read as one line from stdin, so
/// `echo y | git-workflow -c` works and EOF means no.
pub fn confirm_clean() -> anyhow::Result<bool> {
    if !console::Term::stderr().is_term() || !std::io::stdin().is_terminal() {
        eprint!("{} [y/N] ", CLEAN_PROMPT);
        return read_confirmation(std::io::stdin().lock());
    }

    let answer = dialoguer::Confirm::new()
        .with_prompt(CLEAN_PROMPT)
        .default(false)
        .interact_opt()?;
    Ok(answer == Some(true))
}

/// Reads a single answer line; only `y` or `Y` confirms.
pub fn read_confirmation(mut input: impl BufRead) -> anyhow::Result<bool> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y"))
}

/// Console callbacks: spinner in normal mode, step lines in verbose mode,
/// silence in quiet mode. Warnings are always shown.
pub struct ConsoleCallbacks {
    config: Config,
    // created on the first step so it never overlaps the confirmation prompt
    spinner: OnceCell<Option<ProgressBar>>,
}

impl ConsoleCallbacks {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            spinner: OnceCell::new(),
        }
    }

    fn spinner(&self) -> Option<&ProgressBar> {
        self.spinner
            .get_or_init(|| create_spinner(&self.config))
            .as_ref()
    }

    /// Clears the spinner; call before printing the final result.
    pub fn finish(&self) {
        if let Some(Some(spinner)) = self.spinner.get() {
            spinner.finish_and_clear();
        }
    }
}

impl WorkflowCallbacks for ConsoleCallbacks {
    fn on_step(&self, step: &WorkflowStep) {
        if matches!(step, WorkflowStep::Completed) {
            return;
        }
        if self.config.is_verbose() {
            eprintln!("  {}...", step.to_string().dimmed());
        } else if let Some(spinner) = self.spinner() {
            spinner.set_message(format!("{}...", step));
        }
    }

    fn on_warning(&self, message: &str) {
        match self.spinner.get() {
            Some(Some(spinner)) => spinner.suspend(|| warning(message)),
            _ => warning(message),
        }
    }
}

/// Returns `None` in quiet or verbose mode.
fn create_spinner(config: &Config) -> Option<ProgressBar> {
    if config.is_quiet() || config.is_verbose() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
    Some(spinner)
}

/// One-line summary of a finished workflow.
#[must_use]
pub fn completion_message(completion: &Completion) -> (Severity, String) {
    match completion {
        Completion::BranchReady {
            branch,
            main_branch,
            resolution,
            stash,
        } => {
            let what = match resolution {
                BranchResolution::AlreadyMain => {
                    format!("On '{}' and up to date", main_branch)
                }
                BranchResolution::TrackedRemote => {
                    format!("Switched to existing remote branch '{}'", branch)
                }
                BranchResolution::Created => {
                    format!(
                        "Created '{}' from '{}' and published it with upstream tracking",
                        branch, main_branch
                    )
                }
            };
            (Severity::Success, format!("{}{}", what, stash_suffix(stash)))
        }
        Completion::Merged {
            branch,
            main_branch,
            stash,
        } => (
            Severity::Success,
            format!(
                "Merged '{}' into '{}' and pushed{}",
                main_branch,
                branch,
                stash_suffix(stash)
            ),
        ),
        Completion::Cleaned => (
            Severity::Success,
            "Working tree reset and untracked files removed".to_string(),
        ),
        Completion::CleanDeclined => (Severity::Info, "Clean cancelled".to_string()),
        Completion::Committed { message, pushed_to } => {
            let pushed = match pushed_to {
                Some(branch) => format!(" and pushed '{}'", branch),
                None => String::new(),
            };
            (
                Severity::Success,
                format!("Committed \"{}\"{}", message, pushed),
            )
        }
        Completion::NothingToCommit => (Severity::Info, "Nothing committed".to_string()),
    }
}

fn stash_suffix(stash: &StashOutcome) -> &'static str {
    match stash {
        StashOutcome::NotNeeded => "",
        StashOutcome::Restored => " (stash restored)",
        StashOutcome::Conflicted(_) => " (stash needs manual resolution)",
    }
}

/// Prints the completion summary with the matching severity.
pub fn print_completion(config: &Config, completion: &Completion) {
    let (severity, message) = completion_message(completion);
    match severity {
        Severity::Success => success(config, &message),
        Severity::Warning => warning(&message),
        Severity::Error => error(&message),
        Severity::Info => info(config, &message),
    }
}
