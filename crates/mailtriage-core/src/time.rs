//! Local time normalization.
//!
//! Calendar services hand out naive UTC timestamps
//! (`2025-11-26T07:30:00.0000000`). For display they are shifted by the
//! host's fixed UTC offset, detected once per run through an
//! [`OffsetProvider`]. Detection failure is never an error: the
//! [`TimeNormalizer`] falls back to UTC.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use mailtriage_core::time::{FixedOffsetProvider, TimeNormalizer};
//!
//! let provider = FixedOffsetProvider::parse("+0100", "CET").unwrap();
//! let normalizer = TimeNormalizer::detect(&provider);
//!
//! let utc = NaiveDate::from_ymd_opt(2025, 11, 26).unwrap().and_hms_opt(7, 30, 0).unwrap();
//! assert_eq!(normalizer.to_local(utc).to_string(), "2025-11-26 08:30:00");
//! assert_eq!(normalizer.zone(), "CET");
//! ```

use std::process::Command;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use tracing::{debug, warn};

use crate::calendar::Event;

/// Errors from local offset detection.
#[derive(Debug, thiserror::Error)]
pub enum OffsetError {
    /// The detection command could not be run.
    #[error("Failed to run offset command: {0}")]
    Command(#[from] std::io::Error),

    /// The detection command exited unsuccessfully.
    #[error("Offset command failed: {0}")]
    Status(String),

    /// The reported offset could not be parsed.
    #[error("Invalid UTC offset: {0:?}")]
    Invalid(String),
}

/// A fixed UTC offset with its zone label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalOffset {
    /// Offset east of UTC.
    pub offset: FixedOffset,
    /// Zone label, e.g. `CET`.
    pub zone: String,
}

impl LocalOffset {
    /// Zero offset labelled `UTC`.
    #[must_use]
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
            zone: "UTC".to_string(),
        }
    }

    /// Offset in fractional hours (`+0530` is `5.5`).
    #[must_use]
    pub fn hours(&self) -> f64 {
        f64::from(self.offset.local_minus_utc()) / 3600.0
    }
}

impl Default for LocalOffset {
    fn default() -> Self {
        Self::utc()
    }
}

/// Source of the caller's local UTC offset.
pub trait OffsetProvider {
    /// Detect the local offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset cannot be determined.
    fn local_offset(&self) -> Result<LocalOffset, OffsetError>;
}

/// Parse a `±HHMM`, `±HH:MM` or `±HH` offset.
///
/// # Errors
///
/// Returns [`OffsetError::Invalid`] for anything else.
pub fn parse_offset(text: &str) -> Result<FixedOffset, OffsetError> {
    let invalid = || OffsetError::Invalid(text.to_string());
    let trimmed = text.trim();

    let (sign, rest) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };

    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return Err(invalid());
    }
    // A colon may only separate hours from minutes.
    let (hours, minutes) = match (rest.len(), rest.find(':')) {
        (2, None) => (rest, "0"),
        (4, None) => rest.split_at(2),
        (5, Some(2)) => (&rest[..2], &rest[3..]),
        _ => return Err(invalid()),
    };

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Detects the offset from the host's `date` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateCommandOffsetProvider;

impl DateCommandOffsetProvider {
    fn run(format: &str) -> Result<String, OffsetError> {
        let output = Command::new("date").arg(format).output()?;
        if !output.status.success() {
            return Err(OffsetError::Status(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl OffsetProvider for DateCommandOffsetProvider {
    fn local_offset(&self) -> Result<LocalOffset, OffsetError> {
        let offset = parse_offset(&Self::run("+%z")?)?;
        let zone = Self::run("+%Z")?;
        let zone = if zone.is_empty() {
            offset.to_string()
        } else {
            zone
        };
        Ok(LocalOffset { offset, zone })
    }
}

/// Supplies a configured offset.
#[derive(Debug, Clone)]
pub struct FixedOffsetProvider(pub LocalOffset);

impl FixedOffsetProvider {
    /// Build from offset text and zone label.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is not a valid `±HHMM` offset.
    pub fn parse(offset: &str, zone: impl Into<String>) -> Result<Self, OffsetError> {
        Ok(Self(LocalOffset {
            offset: parse_offset(offset)?,
            zone: zone.into(),
        }))
    }
}

impl OffsetProvider for FixedOffsetProvider {
    fn local_offset(&self) -> Result<LocalOffset, OffsetError> {
        Ok(self.0.clone())
    }
}

/// Shifts UTC timestamps to a fixed local offset.
#[derive(Debug, Clone, Default)]
pub struct TimeNormalizer {
    local: LocalOffset,
}

impl TimeNormalizer {
    /// Normalizer for a known offset.
    #[must_use]
    pub const fn new(local: LocalOffset) -> Self {
        Self { local }
    }

    /// Normalizer that leaves times in UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::default()
    }

    /// Detect the local offset, falling back to UTC on failure.
    pub fn detect(provider: &impl OffsetProvider) -> Self {
        match provider.local_offset() {
            Ok(local) => {
                debug!(offset = %local.offset, zone = %local.zone, "Detected local offset");
                Self { local }
            }
            Err(e) => {
                warn!(error = %e, "Could not detect timezone, using UTC");
                Self::utc()
            }
        }
    }

    /// Zone label for display.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.local.zone
    }

    /// The offset in use.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.local.offset
    }

    /// Shift a naive UTC timestamp to local wall time.
    #[must_use]
    pub fn to_local(&self, utc: NaiveDateTime) -> NaiveDateTime {
        utc.and_utc().with_timezone(&self.local.offset).naive_local()
    }

    /// Convert a UTC instant to the local offset.
    #[must_use]
    pub fn to_local_datetime(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        utc.with_timezone(&self.local.offset)
    }

    /// Convert a mail-service UTC timestamp string to local time.
    ///
    /// Unparseable input is returned unchanged.
    #[must_use]
    pub fn convert_graph_time(&self, utc: &str) -> String {
        graph_time::parse(utc).map_or_else(
            || {
                warn!(time = utc, "Could not convert time");
                utc.to_string()
            },
            |t| graph_time::format(self.to_local(t)),
        )
    }

    /// Shift an event's start and end to local time and label its zone.
    #[must_use]
    pub fn localize_event(&self, mut event: Event) -> Event {
        event.start = self.to_local(event.start);
        event.end = self.to_local(event.end);
        event.timezone = Some(self.local.zone.clone());
        event
    }
}

/// Mail-service timestamp format: `2025-11-26T07:30:00.0000000`.
///
/// Usable as a serde `with` module for `NaiveDateTime` fields. Parsing
/// drops a trailing `Z` and any fractional seconds.
pub mod graph_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.0000000";

    /// Parse a timestamp, or `None` if it is not in the expected shape.
    #[must_use]
    pub fn parse(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim().trim_end_matches('Z');
        let whole_seconds = text.split('.').next().unwrap_or(text);
        NaiveDateTime::parse_from_str(whole_seconds, PARSE_FORMAT).ok()
    }

    /// Render a timestamp with the service's seven-digit fraction.
    #[must_use]
    pub fn format(time: NaiveDateTime) -> String {
        time.format(OUTPUT_FORMAT).to_string()
    }

    /// Serialize in service format.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    #[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde with= signature
    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*time))
    }

    /// Deserialize from service format.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a timestamp string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {text:?}")))
    }
}
