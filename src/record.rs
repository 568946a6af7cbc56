use chrono::{DateTime, FixedOffset};
use std::fmt;

use crate::date::format_instant;

/// Columns whose values are timestamps rather than plain text.
pub const INSTANT_COLUMNS: [&str; 2] = ["start", "end"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(String),
    Instant(DateTime<FixedOffset>),
    Seconds(i64),
}

impl Field {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Field::Instant(instant) => Some(instant),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(text) => f.write_str(text),
            Field::Instant(instant) => f.write_str(&format_instant(instant)),
            Field::Seconds(seconds) => write!(f, "{}", seconds),
        }
    }
}

/// One decoded row: column name to value, in the order the columns were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Field)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Field) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url").and_then(Field::as_text)
    }

    pub fn start(&self) -> Option<&DateTime<FixedOffset>> {
        self.get("start").and_then(Field::as_instant)
    }

    pub fn end(&self) -> Option<&DateTime<FixedOffset>> {
        self.get("end").and_then(Field::as_instant)
    }
}
