use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::error;

use trackdata::utils::{setup_logging, validate_args};
use trackdata::{resolve_invocation, run_aggregate, run_filter, Cli, Command};

fn main() -> ExitCode {
    let Some(argv) = resolve_invocation(std::env::args_os()) else {
        print!("{}", Cli::command().render_usage());
        println!();
        return ExitCode::from(1);
    };

    let cli = Cli::parse_from(argv);
    setup_logging();

    if let Err(e) = validate_args(&cli) {
        Cli::command().error(ErrorKind::ValueValidation, e).exit();
    }

    let outcome = match &cli.command {
        Command::Filter(args) => run_filter(args),
        Command::Aggregate(args) => run_aggregate(args),
    };

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
