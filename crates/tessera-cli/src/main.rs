//! Tessera CLI - semantic table annotation pipeline.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Annotate {
            tables,
            targets,
            output,
            kb,
            cache,
            timeout,
            language,
        } => commands::annotate::run(
            tables,
            targets,
            output,
            kb,
            cache,
            timeout,
            language,
            cli.verbose,
        ),

        Commands::Score {
            task,
            submission,
            ground_truth,
            json,
        } => commands::score::run(task, submission, ground_truth, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
