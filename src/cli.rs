//! Command-line surface.

use crate::config::Verbosity;
use crate::workflow::Command;
use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser};
use std::ffi::OsString;

const AFTER_HELP: &str = "\
Failed steps are never rolled back. If a run stops part-way (for example a
merge conflict, or a push rejected after a successful merge), the repository
is left exactly where it stopped for you to resolve.

Environment:
  GIT_WORKFLOW_PROTECTED_BRANCHES  comma-separated names --new refuses
  GIT_WORKFLOW_REMOTE              remote to fetch, pull and push (default: origin)";

#[derive(Debug, Parser)]
#[command(
    name = "git-workflow",
    version,
    about = "Shortcuts for common git branching and merging sequences",
    after_help = AFTER_HELP,
    group(ArgGroup::new("verb").multiple(false))
)]
pub struct Cli {
    /// Sync main, then switch to BRANCH (creating and publishing it if needed)
    #[arg(short = 'n', long = "new", value_name = "BRANCH", group = "verb")]
    pub new: Option<String>,

    /// Merge the latest main into BRANCH and push it
    #[arg(short = 'm', long = "merge", value_name = "BRANCH", group = "verb")]
    pub merge: Option<String>,

    /// Like --merge, stashing local changes around the run [short: -ms]
    #[arg(long = "merge-stash", value_name = "BRANCH", group = "verb")]
    pub merge_stash: Option<String>,

    /// Discard all local changes and untracked files (asks first)
    #[arg(short = 'c', long = "clean", group = "verb")]
    pub clean: bool,

    /// Stage everything and commit with MESSAGE [short: -qc]
    #[arg(
        long = "quick-commit",
        value_name = "MESSAGE",
        group = "verb",
        allow_hyphen_values = true
    )]
    pub quick_commit: Option<String>,

    /// Push after --quick-commit
    #[arg(short = 'p', long = "push")]
    pub push: bool,

    /// Show each git command as it runs
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    /// Parses arguments, accepting the `-ms` and `-qc` short verbs.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let cli = Self::try_parse_from(normalize_args(args))?;
        // the verb group keeps clap from enforcing `requires` on --push
        if cli.push && cli.quick_commit.is_none() {
            let mut command = <Self as CommandFactory>::command();
            return Err(command.error(
                ErrorKind::MissingRequiredArgument,
                "--push can only be used with --quick-commit",
            ));
        }
        Ok(cli)
    }

    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// The selected verb, or `None` when only usage should be printed.
    #[must_use]
    pub fn to_command(&self) -> Option<Command> {
        if let Some(branch) = &self.new {
            return Some(Command::NewBranch {
                branch: branch.clone(),
            });
        }
        if let Some(branch) = &self.merge {
            return Some(Command::MergeMain {
                branch: branch.clone(),
            });
        }
        if let Some(branch) = &self.merge_stash {
            return Some(Command::MergeMainWithStash {
                branch: branch.clone(),
            });
        }
        if self.clean {
            return Some(Command::Clean);
        }
        self.quick_commit.as_ref().map(|message| Command::QuickCommit {
            message: message.clone(),
            push: self.push,
        })
    }
}

/// The first line of a clap error without its `error:` prefix, for
/// printing under our own tag.
#[must_use]
pub fn error_summary(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default().trim();
    first.strip_prefix("error:").unwrap_or(first).trim().to_string()
}

/// Rewrites the two-letter short verbs clap cannot express into their long
/// forms. Only whole arguments are rewritten, so values such as a commit
/// message of "-ms" after `--quick-commit` are not touched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut expecting_value = false;

    for arg in args.into_iter().map(Into::into) {
        if expecting_value {
            expecting_value = false;
            out.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("-ms") => Some("--merge-stash"),
            Some("-qc") => Some("--quick-commit"),
            _ => None,
        };

        expecting_value = matches!(
            arg.to_str(),
            Some("-n" | "--new" | "-m" | "--merge" | "-ms" | "--merge-stash" | "-qc" | "--quick-commit")
        );

        out.push(rewritten.map(OsString::from).unwrap_or(arg));
    }

    out
}
