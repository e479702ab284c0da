use clap::CommandFactory;
use clap::error::ErrorKind;
use git_workflow_rust::cli::{self, Cli};
use git_workflow_rust::config::Config;
use git_workflow_rust::output::{self, ConsoleCallbacks};
use git_workflow_rust::repo::GitCli;
use git_workflow_rust::workflow;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                output::error(&cli::error_summary(&err));
                let _ = Cli::command().print_help();
                println!();
                return ExitCode::FAILURE;
            }
        },
    };

    let Some(command) = cli.to_command() else {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    let config = Config::from_env(cli.verbosity());

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            output::error(&format!("Cannot read current directory: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let repo = match GitCli::discover(&cwd, config.git_logger()) {
        Ok(repo) => repo,
        Err(e) => {
            output::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let callbacks = ConsoleCallbacks::new(&config);
    let result = workflow::run(&command, &repo, &config, &callbacks, output::confirm_clean);
    callbacks.finish();

    match result {
        Ok(completion) => {
            output::print_completion(&config, &completion);
            ExitCode::SUCCESS
        }
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
