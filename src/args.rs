use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::columns::ColumnLayout;
use crate::date::parse_bound;
use crate::stats::SortKey;

/// Subcommand names, also accepted as the program name.
pub const COMMANDS: [&str; 2] = ["aggregate", "filter"];

#[derive(Parser, Debug)]
#[command(
    name = "trackdata",
    about = "Tools for analyzing tracking data",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter input data by start date
    Filter(FilterArgs),
    /// Aggregate time spent per site
    Aggregate(AggregateArgs),
}

// Command-specific flags come first; the shared input flags are flattened in
// after them.

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Do not write a header line
    #[arg(long)]
    pub output_no_header: bool,

    /// Comma-separated output columns
    #[arg(long, default_value = "url,start,end", value_parser = ColumnLayout::parse)]
    pub output_columns: ColumnLayout,

    /// Output file (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Keep rows starting at or after this date (YYYYMMDD.[+-]HHMM)
    #[arg(long, value_parser = parse_bound)]
    pub after: Option<DateTime<FixedOffset>>,

    /// Keep rows starting at or before this date (YYYYMMDD.[+-]HHMM)
    #[arg(long, value_parser = parse_bound)]
    pub before: Option<DateTime<FixedOffset>>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Do not write a header line
    #[arg(long)]
    pub output_no_header: bool,

    /// Comma-separated output columns
    #[arg(long, default_value = "site,time", value_parser = ColumnLayout::parse)]
    pub output_columns: ColumnLayout,

    /// Output file (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Sort output by this column
    #[arg(long, value_enum, default_value = "site")]
    pub sort_by: SortKey,

    /// Reverse output order
    #[arg(long)]
    pub reverse: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input has no header line
    #[arg(long)]
    pub input_no_header: bool,

    /// Comma-separated input columns
    #[arg(long, default_value = "url,start,end", value_parser = ColumnLayout::parse)]
    pub input_columns: ColumnLayout,

    /// Input file (defaults to stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// Normalizes argv so the subcommand is always the first argument.
///
/// A program named after a subcommand (e.g. a `filter` symlink) selects it
/// directly; otherwise the first argument must name one. Returns `None` when
/// neither resolves.
pub fn resolve_invocation<I, T>(argv: I) -> Option<Vec<OsString>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();

    let by_program_name = argv
        .first()
        .and_then(|program| Path::new(program).file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| COMMANDS.contains(stem))
        .map(OsString::from);

    if let Some(command) = by_program_name {
        argv.insert(1, command);
        return Some(argv);
    }

    let first = argv.get(1)?.to_str()?;
    if COMMANDS.contains(&first) {
        Some(argv)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(argv: &[&str]) -> Option<Vec<String>> {
        resolve_invocation(argv.iter().copied()).map(|args| {
            args.into_iter()
                .map(|arg| arg.into_string().unwrap())
                .collect()
        })
    }

    #[test]
    fn resolves_first_argument() {
        assert_eq!(
            resolved(&["trackdata", "aggregate", "--reverse"]),
            Some(vec![
                "trackdata".to_string(),
                "aggregate".to_string(),
                "--reverse".to_string()
            ])
        );
    }

    #[test]
    fn resolves_program_name() {
        assert_eq!(
            resolved(&["/usr/local/bin/filter", "--after", "20200301.+0000"]),
            Some(vec![
                "/usr/local/bin/filter".to_string(),
                "filter".to_string(),
                "--after".to_string(),
                "20200301.+0000".to_string()
            ])
        );
        assert_eq!(
            resolved(&["aggregate.exe"]),
            Some(vec!["aggregate.exe".to_string(), "aggregate".to_string()])
        );
    }

    #[test]
    fn unresolvable_invocations() {
        assert_eq!(resolved(&["trackdata"]), None);
        assert_eq!(resolved(&["trackdata", "summarize"]), None);
        assert_eq!(resolved(&["trackdata", "--help"]), None);
        assert_eq!(resolved(&[]), None);
    }

    #[test]
    fn filter_defaults() {
        let cli = Cli::try_parse_from(["trackdata", "filter"]).unwrap();
        let Command::Filter(args) = cli.command else {
            panic!("expected filter");
        };
        assert_eq!(args.output_columns.to_string(), "url,start,end");
        assert_eq!(args.input.input_columns.to_string(), "url,start,end");
        assert!(args.after.is_none() && args.before.is_none());
        assert!(!args.output_no_header && !args.input.input_no_header);
        assert!(args.input.input.is_none() && args.output.is_none());
    }

    #[test]
    fn aggregate_defaults_and_flags() {
        let cli = Cli::try_parse_from(["trackdata", "aggregate"]).unwrap();
        let Command::Aggregate(args) = cli.command else {
            panic!("expected aggregate");
        };
        assert_eq!(args.output_columns.to_string(), "site,time");
        assert_eq!(args.sort_by, SortKey::Site);
        assert!(!args.reverse);

        let cli = Cli::try_parse_from([
            "trackdata",
            "aggregate",
            "--sort-by",
            "time",
            "--reverse",
            "--input-no-header",
            "--input-columns",
            "start,end,url",
        ])
        .unwrap();
        let Command::Aggregate(args) = cli.command else {
            panic!("expected aggregate");
        };
        assert_eq!(args.sort_by, SortKey::Time);
        assert!(args.reverse && args.input.input_no_header);
        assert_eq!(args.input.input_columns.index_of("url"), Some(2));
    }

    #[test]
    fn parses_bounds_at_startup() {
        let cli = Cli::try_parse_from([
            "trackdata",
            "filter",
            "--after",
            "20200301.+0000",
            "--before",
            "20200401.-0700",
        ])
        .unwrap();
        let Command::Filter(args) = cli.command else {
            panic!("expected filter");
        };
        assert_eq!(args.after, Some(parse_bound("20200301.+0000").unwrap()));
        assert_eq!(args.before, Some(parse_bound("20200401.-0700").unwrap()));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(Cli::try_parse_from(["trackdata", "filter", "--after", "2020-03-01"]).is_err());
        assert!(
            Cli::try_parse_from(["trackdata", "filter", "--output-columns", "url,url"]).is_err()
        );
        assert!(Cli::try_parse_from(["trackdata", "aggregate", "--sort-by", "url"]).is_err());
        assert!(Cli::try_parse_from(["trackdata", "filter", "--reverse"]).is_err());
    }
}
