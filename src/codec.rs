use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

use crate::columns::ColumnLayout;
use crate::date::parse_instant;
use crate::error::{Result, TrackError};
use crate::record::{Field, Record, INSTANT_COLUMNS};

/// Decodes one tab-delimited line against `layout`.
pub fn decode_line(layout: &ColumnLayout, line: &str) -> Result<Record> {
    let raw: Vec<&str> = line.split('\t').collect();
    if raw.len() != layout.len() {
        return Err(TrackError::RowShape {
            expected: layout.len(),
            found: raw.len(),
            line: line.to_string(),
        });
    }

    let mut record = Record::new();
    for (name, value) in layout.names().zip(raw) {
        let value = value.trim();
        let field = if INSTANT_COLUMNS.contains(&name) {
            Field::Instant(parse_instant(value)?)
        } else {
            Field::Text(value.to_string())
        };
        record = record.with(name, field);
    }
    Ok(record)
}

/// Lazily decodes records from a line source.
///
/// Rows with the wrong number of fields, unparsable timestamps or bytes that
/// are not UTF-8 are logged and skipped; only I/O failures reach the caller.
pub struct RecordReader<'a, R> {
    layout: &'a ColumnLayout,
    source: R,
    skip_header: bool,
    skipped: usize,
}

impl<'a, R: BufRead> RecordReader<'a, R> {
    pub fn new(source: R, layout: &'a ColumnLayout, has_header: bool) -> Self {
        RecordReader {
            layout,
            source,
            skip_header: has_header,
            skipped: 0,
        }
    }

    /// Number of rows dropped so far for shape, date or encoding errors.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Next raw line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> Option<io::Result<Vec<u8>>> {
        let mut buf = Vec::new();
        match self.source.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.ends_with(b"\n") {
                    buf.pop();
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                }
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

fn decode_bytes(layout: &ColumnLayout, bytes: Vec<u8>) -> Result<Record> {
    let line = String::from_utf8(bytes).map_err(|e| TrackError::Encoding {
        line: String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })?;
    decode_line(layout, &line)
}

impl<R: BufRead> Iterator for RecordReader<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip_header {
            self.skip_header = false;
            if let Err(e) = self.next_line()? {
                return Some(Err(e.into()));
            }
        }

        loop {
            let bytes = match self.next_line()? {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(e.into())),
            };

            match decode_bytes(self.layout, bytes) {
                Ok(record) => return Some(Ok(record)),
                Err(e) if e.is_row_level() => {
                    warn!(
                        action = "skip",
                        component = "record_reader",
                        reason = %e,
                        "Skipping row"
                    );
                    self.skipped += 1;
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Writes records as fixed-width tab-delimited rows in `layout` order.
pub struct RecordWriter<'a, W: Write> {
    layout: &'a ColumnLayout,
    out: W,
    written: usize,
}

impl<'a, W: Write> RecordWriter<'a, W> {
    /// Emits the header line immediately when `header` is set, so an empty
    /// result still produces one.
    pub fn new(mut out: W, layout: &'a ColumnLayout, header: bool) -> Result<Self> {
        if header {
            writeln!(out, "{}", layout.header())?;
        }
        Ok(RecordWriter {
            layout,
            out,
            written: 0,
        })
    }

    pub fn write(&mut self, record: &Record) -> Result<()> {
        let mut row = vec![String::new(); self.layout.len()];
        for (name, value) in record.fields() {
            match self.layout.index_of(name) {
                Some(index) => row[index] = value.to_string(),
                None => debug!(
                    action = "drop",
                    component = "record_writer",
                    column = name,
                    "Column not in output layout"
                ),
            }
        }
        writeln!(self.out, "{}", row.join("\t"))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and hands back the underlying sink.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
