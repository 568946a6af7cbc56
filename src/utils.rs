use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use time::macros::format_description;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Command};
use crate::error::TrackError;

/// Columns every input layout must provide.
pub const REQUIRED_INPUT_COLUMNS: [&str; 3] = ["url", "start", "end"];

/// Diagnostics go to stderr so stdout stays a clean data stream.
/// `RUST_LOG` overrides the default `warn` level.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_timer(UtcTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .init();
}

pub fn validate_args(cli: &Cli) -> std::result::Result<(), TrackError> {
    let input = match &cli.command {
        Command::Filter(args) => &args.input,
        Command::Aggregate(args) => &args.input,
    };
    input.input_columns.require(&REQUIRED_INPUT_COLUMNS)
}

pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {:?}", path))?;
            info!(action = "open", component = "input", file_path = ?path, "Reading from file");
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!(action = "open", component = "input", "Reading from stdin");
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            info!(action = "open", component = "output", file_path = ?path, "Writing to file");
            Ok(Box::new(BufWriter::new(file)))
        }
        None => {
            info!(action = "open", component = "output", "Writing to stdout");
            Ok(Box::new(BufWriter::new(io::stdout().lock())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Read;

    #[test]
    fn validate_requires_url_start_end() {
        let cli = Cli::try_parse_from(["trackdata", "filter"]).unwrap();
        assert!(validate_args(&cli).is_ok());

        let argv = ["trackdata", "aggregate", "--input-columns", "url,start"];
        let cli = Cli::try_parse_from(argv).unwrap();
        let err = validate_args(&cli).unwrap_err();
        assert!(err.to_string().contains("\"end\""));
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_input(Some(&dir.path().join("absent.tsv"))).err().unwrap();
        assert!(err.to_string().contains("absent.tsv"));
    }

    #[test]
    fn output_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        {
            let mut out = open_output(Some(&path)).unwrap();
            out.write_all(b"a\tb\n").unwrap();
            out.flush().unwrap();
        }
        let mut text = String::new();
        open_input(Some(&path)).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "a\tb\n");
    }
}
