use chrono::{DateTime, FixedOffset};

use crate::record::Record;

/// Inclusive bounds on a record's `start`. Missing bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub after: Option<DateTime<FixedOffset>>,
    pub before: Option<DateTime<FixedOffset>>,
}

impl DateRange {
    pub fn new(
        after: Option<DateTime<FixedOffset>>,
        before: Option<DateTime<FixedOffset>>,
    ) -> Self {
        DateRange { after, before }
    }

    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    /// Comparison is by absolute instant, so bounds and starts may carry
    /// different offsets.
    pub fn contains(&self, start: &DateTime<FixedOffset>) -> bool {
        self.after.map_or(true, |after| *start >= after)
            && self.before.map_or(true, |before| *start <= before)
    }

    /// A record without a `start` passes only an unbounded range.
    pub fn matches(&self, record: &Record) -> bool {
        match record.start() {
            Some(start) => self.contains(start),
            None => self.is_unbounded(),
        }
    }
}
