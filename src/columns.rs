use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackError};

/// Ordered column names for one side of a run. Position in the list is the
/// field index on read and on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    names: Vec<String>,
}

impl ColumnLayout {
    pub fn parse(text: &str) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        for name in text.split(',') {
            if names.iter().any(|existing| existing == name) {
                return Err(TrackError::argument(format!(
                    "Duplicate column \"{}\" in \"{}\"",
                    name, text
                )));
            }
            names.push(name.to_string());
        }
        Ok(ColumnLayout { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Fails with an argument error naming the first missing column.
    pub fn require(&self, required: &[&str]) -> Result<()> {
        match required.iter().find(|name| !self.contains(name)) {
            Some(missing) => Err(TrackError::argument(format!(
                "Column \"{}\" is required but missing from \"{}\"",
                missing, self
            ))),
            None => Ok(()),
        }
    }

    /// The header line for this layout, without the trailing newline.
    pub fn header(&self) -> String {
        self.names.join("\t")
    }
}

impl FromStr for ColumnLayout {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        ColumnLayout::parse(s)
    }
}

impl fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(","))
    }
}
