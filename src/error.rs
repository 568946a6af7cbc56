use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Expected {expected} columns but found {found}: {line}")]
    RowShape {
        expected: usize,
        found: usize,
        line: String,
    },

    #[error("Could not parse date: {input}")]
    DateParse { input: String },

    #[error("Line is not valid UTF-8: {line}")]
    Encoding { line: String },

    #[error("{0}")]
    Argument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrackError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        TrackError::Argument(message.into())
    }

    /// Row-level errors skip the offending line; everything else ends the run.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            TrackError::RowShape { .. } | TrackError::DateParse { .. } | TrackError::Encoding { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
