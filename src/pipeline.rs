use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info};

use crate::args::{AggregateArgs, FilterArgs};
use crate::codec::{RecordReader, RecordWriter};
use crate::domain::site_of;
use crate::error::TrackError;
use crate::filter::DateRange;
use crate::record::Record;
use crate::stats::SiteTotals;
use crate::utils::{open_input, open_output};

/// Row counts for one run, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub read: usize,
    pub skipped: usize,
    pub written: usize,
}

pub fn run_filter(args: &FilterArgs) -> Result<RunSummary> {
    let input = open_input(args.input.input.as_deref())?;
    let output = open_output(args.output.as_deref())?;
    filter_stream(input, output, args).context("Filter failed")
}

pub fn run_aggregate(args: &AggregateArgs) -> Result<RunSummary> {
    let input = open_input(args.input.input.as_deref())?;
    let output = open_output(args.output.as_deref())?;
    aggregate_stream(input, output, args).context("Aggregate failed")
}

/// Streams rows whose start falls in the configured range, one at a time and
/// in input order.
pub fn filter_stream<R: BufRead, W: Write>(
    input: R,
    output: W,
    args: &FilterArgs,
) -> Result<RunSummary, TrackError> {
    let start_time = Instant::now();
    let range = DateRange::new(args.after, args.before);
    info!(
        action = "start",
        component = "filter",
        after = ?range.after,
        before = ?range.before,
        "Starting filter"
    );

    let mut reader = RecordReader::new(
        input,
        &args.input.input_columns,
        !args.input.input_no_header,
    );
    let mut writer = RecordWriter::new(output, &args.output_columns, !args.output_no_header)?;

    let mut read = 0;
    for record in reader.by_ref() {
        let record = record?;
        read += 1;
        if range.matches(&record) {
            writer.write(&record)?;
        }
    }

    let summary = RunSummary {
        read,
        skipped: reader.skipped(),
        written: writer.written(),
    };
    writer.finish()?;

    info!(
        action = "complete",
        component = "filter",
        rows_read = summary.read,
        rows_skipped = summary.skipped,
        rows_written = summary.written,
        duration_ms = start_time.elapsed().as_millis(),
        "Filter completed"
    );
    Ok(summary)
}

/// Folds records into per-site totals. Records whose URL has no site are
/// left out.
pub fn aggregate_records<I>(records: I) -> Result<SiteTotals, TrackError>
where
    I: IntoIterator<Item = Result<Record, TrackError>>,
{
    let mut totals = SiteTotals::new();
    for record in records {
        let record = record?;
        let (Some(url), Some(start), Some(end)) = (record.url(), record.start(), record.end())
        else {
            continue;
        };
        let Some(site) = site_of(url) else {
            debug!(action = "skip", component = "aggregate", url = url, "URL has no site");
            continue;
        };
        totals.add(site, (*end - *start).num_seconds());
    }
    Ok(totals)
}

pub fn aggregate_stream<R: BufRead, W: Write>(
    input: R,
    output: W,
    args: &AggregateArgs,
) -> Result<RunSummary, TrackError> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "aggregate",
        sort_by = ?args.sort_by,
        reverse = args.reverse,
        "Starting aggregation"
    );

    let mut reader = RecordReader::new(
        input,
        &args.input.input_columns,
        !args.input.input_no_header,
    );
    let mut read = 0;
    let totals = aggregate_records(reader.by_ref().inspect(|_| read += 1))?;
    info!(
        action = "aggregate",
        component = "aggregate",
        unique_sites = totals.len(),
        "Aggregated sites"
    );

    let mut writer = RecordWriter::new(output, &args.output_columns, !args.output_no_header)?;
    for row in totals.into_sorted_rows(args.sort_by, args.reverse) {
        writer.write(&row.to_record())?;
    }

    let summary = RunSummary {
        read,
        skipped: reader.skipped(),
        written: writer.written(),
    };
    writer.finish()?;

    info!(
        action = "complete",
        component = "aggregate",
        rows_read = summary.read,
        rows_skipped = summary.skipped,
        rows_written = summary.written,
        duration_ms = start_time.elapsed().as_millis(),
        "Aggregation completed"
    );
    Ok(summary)
}
