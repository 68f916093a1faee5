//! selkit CLI
//!
//! Inspect extensions, resolve actions for a text and run them.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(found) => {
            if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs the selected command; `Ok(false)` means nothing matched.
fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::List { format } => commands::list::run_list(&cli, *format),
        Commands::Actions {
            text,
            context,
            format,
        } => commands::actions::run_actions(&cli, text, &context.to_context(), *format),
        Commands::Resolve {
            reference,
            package,
            from,
            repository,
        } => commands::resolve::run_resolve(
            &cli,
            reference,
            package,
            from.as_deref(),
            repository.as_deref(),
        ),
        Commands::Run {
            extension,
            action,
            text,
            context,
            format,
        } => commands::run::run_action(
            &cli,
            extension,
            action,
            text,
            &context.to_context(),
            *format,
        ),
    }
}
