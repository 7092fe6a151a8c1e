//! Calendar data models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::time::graph_time;
use crate::{Error, RecordKind, Result};

/// The user's response to a meeting invitation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseStatus {
    /// Invitation accepted.
    Accepted,
    /// Tentatively accepted.
    Tentative,
    /// Invitation declined.
    Declined,
    /// No response recorded.
    #[default]
    None,
    /// Any other status reported by the service (e.g. `organizer`).
    Other(String),
}

impl ResponseStatus {
    /// Parse from the service's string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "accepted" => Self::Accepted,
            "tentative" | "tentativelyaccepted" => Self::Tentative,
            "declined" => Self::Declined,
            "none" | "" => Self::None,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Accepted => "accepted",
            Self::Tentative => "tentative",
            Self::Declined => "declined",
            Self::None => "none",
            Self::Other(s) => s,
        }
    }

    /// Whether the event takes part in collision detection.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Declined | Self::None)
    }
}

impl From<String> for ResponseStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ResponseStatus> for String {
    fn from(status: ResponseStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::str::FromStr for ResponseStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// A calendar event as handed over by the calendar service.
///
/// `start` and `end` form the half-open interval `[start, end)`. Both sides
/// must be in the same timezone; use
/// [`TimeNormalizer::localize_event`](crate::TimeNormalizer::localize_event)
/// before mixing sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Service-side event identifier.
    pub id: String,
    /// Event subject (empty if the service sent none or `null`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    /// Start instant.
    #[serde(with = "graph_time")]
    pub start: NaiveDateTime,
    /// End instant (exclusive).
    #[serde(with = "graph_time")]
    pub end: NaiveDateTime,
    /// The user's response; `none` when absent.
    #[serde(
        default,
        rename = "my_response",
        alias = "response",
        deserialize_with = "null_as_default"
    )]
    pub response: ResponseStatus,
    /// Whether the organizer cancelled the event.
    #[serde(default)]
    pub is_cancelled: bool,
    /// Zone label of `start`/`end` once localized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Decode `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Creates an event with no response.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            start,
            end,
            response: ResponseStatus::None,
            is_cancelled: false,
            timezone: None,
        }
    }

    /// Sets the response status.
    #[must_use]
    pub fn with_response(mut self, response: ResponseStatus) -> Self {
        self.response = response;
        self
    }

    /// Marks the event cancelled.
    #[must_use]
    pub fn cancelled(mut self) -> Self {
        self.is_cancelled = true;
        self
    }

    /// Half-open interval overlap; touching endpoints do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Decode one event from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if a required field is missing or
    /// a timestamp cannot be parsed.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|source| Error::MalformedRecord {
            kind: RecordKind::Event,
            source,
        })
    }

    /// Decode a JSON array of events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] on the first invalid event.
    pub fn parse_batch(text: &str) -> Result<Vec<Self>> {
        serde_json::from_str(text).map_err(|source| Error::MalformedRecord {
            kind: RecordKind::Event,
            source,
        })
    }
}

/// Another event an annotated event collides with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionRef {
    /// Identifier of the other event.
    pub id: String,
    /// Subject of the other event.
    pub subject: String,
    /// Start of the other event.
    #[serde(with = "graph_time")]
    pub start: NaiveDateTime,
    /// End of the other event.
    #[serde(with = "graph_time")]
    pub end: NaiveDateTime,
}

impl From<&Event> for CollisionRef {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            subject: event.subject.clone(),
            start: event.start,
            end: event.end,
        }
    }
}

/// An event with its collision annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedEvent {
    /// The event, unchanged.
    #[serde(flatten)]
    pub event: Event,
    /// Whether the event overlaps another active event.
    pub has_collision: bool,
    /// The events it overlaps with.
    pub collides_with: Vec<CollisionRef>,
}
