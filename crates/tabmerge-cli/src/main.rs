//! tabmerge CLI.

use clap::Parser;
use tabmerge_cli::cli::{Cli, Command};
use tabmerge_cli::commands::{print_outcome, run_datasets, run_etl, run_serve};
use tabmerge_cli::logging::init_logging;

fn main() {
    // A missing .env is fine; the environment and flags still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Datasets(args) => run_datasets(args),
        Command::Run(args) => run_etl(args).map(|outcome| print_outcome(&outcome)),
    };
    if let Err(error) = result {
        tracing::error!(error = %format!("{error:#}"), "Command failed");
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
