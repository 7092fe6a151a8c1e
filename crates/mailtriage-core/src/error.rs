//! Error types for the core library.

use thiserror::Error;

/// Kind of record that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A mailbox message.
    Message,
    /// A calendar event.
    Event,
}

impl RecordKind {
    /// Lowercase name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Event => "event",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A message or event is missing a required field or has an ill-typed one.
    #[error("Malformed {kind} record: {source}")]
    MalformedRecord {
        /// Which kind of record failed.
        kind: RecordKind,
        /// Underlying decode error, naming the offending field.
        #[source]
        source: serde_json::Error,
    },

    /// The rule set could not be decoded.
    #[error("Invalid rule set: {0}")]
    InvalidRules(#[source] serde_json::Error),

    /// The subject filter is not a valid regular expression.
    #[error("Invalid subject filter: {0}")]
    InvalidFilter(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
