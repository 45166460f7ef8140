//! Error types for notebox.

use std::fmt;

/// Result type alias for notebox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for layout, editing and persistence operations.
#[derive(Debug)]
pub enum Error {
    /// A visual line index outside the current layout.
    LineOutOfRange { line: usize, line_count: usize },
    /// A character index outside a logical line.
    CharOutOfRange {
        line: usize,
        char_index: usize,
        len: usize,
    },
    /// A box property was given a value it cannot hold (negative or NaN).
    InvalidValue { name: &'static str, value: f64 },
    /// The measurer could not produce metrics for a grapheme.
    Measure { grapheme: String, reason: String },
    /// A layout pass was started while another one was still running.
    LayoutInProgress,
    /// Record (de)serialization failed.
    Serialization(serde_json::Error),
}

impl Error {
    /// Build a measurement error for `grapheme`.
    pub fn measure(grapheme: &str, reason: impl Into<String>) -> Self {
        Self::Measure {
            grapheme: grapheme.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineOutOfRange { line, line_count } => {
                write!(
                    f,
                    "line-out-of-range: visual line {line} not in layout of {line_count} lines"
                )
            }
            Self::CharOutOfRange {
                line,
                char_index,
                len,
            } => {
                write!(
                    f,
                    "char index {char_index} out of range for line {line} of length {len}"
                )
            }
            Self::InvalidValue { name, value } => write!(f, "invalid value for {name}: {value}"),
            Self::Measure { grapheme, reason } => {
                write!(f, "failed to measure grapheme {grapheme:?}: {reason}")
            }
            Self::LayoutInProgress => write!(f, "layout pass already in progress"),
            Self::Serialization(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
