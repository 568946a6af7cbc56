use clap::ValueEnum;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::record::{Field, Record};

/// Column an aggregate result is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Hostname, string order (default)
    #[default]
    Site,
    /// Total seconds, numeric order
    Time,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRow {
    pub site: String,
    pub time: i64,
}

impl AggregationRow {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("site", Field::Text(self.site.clone()))
            .with("time", Field::Seconds(self.time))
    }

    fn compare(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::Site => self.site.cmp(&other.site),
            SortKey::Time => self.time.cmp(&other.time),
        }
    }
}

/// Running seconds per site. Unseen sites read as zero; sites keep the order
/// they were first added in.
#[derive(Debug, Default)]
pub struct SiteTotals {
    index: HashMap<String, usize>,
    rows: Vec<AggregationRow>,
}

impl SiteTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_zero(&self, site: &str) -> i64 {
        self.index
            .get(site)
            .map(|&position| self.rows[position].time)
            .unwrap_or(0)
    }

    pub fn add(&mut self, site: &str, seconds: i64) {
        let time = self.get_or_zero(site) + seconds;
        match self.index.get(site) {
            Some(&position) => self.rows[position].time = time,
            None => {
                self.index.insert(site.to_string(), self.rows.len());
                self.rows.push(AggregationRow {
                    site: site.to_string(),
                    time,
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the totals into rows ordered by `key`. Equal keys keep
    /// first-seen order in both directions.
    pub fn into_sorted_rows(self, key: SortKey, reverse: bool) -> Vec<AggregationRow> {
        let mut rows = self.rows;
        if reverse {
            rows.sort_by(|a, b| b.compare(a, key));
        } else {
            rows.sort_by(|a, b| a.compare(b, key));
        }
        rows
    }
}
