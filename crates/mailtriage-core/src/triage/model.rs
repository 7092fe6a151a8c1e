//! Triage data models.

use serde::{Deserialize, Serialize};

use crate::rules::{Action, Disposition};
use crate::{Error, RecordKind, Result};

/// A mailbox message as handed over by the mail service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Service-side message identifier.
    pub id: String,
    /// Sender address.
    pub from: String,
    /// Sender display name (if known).
    #[serde(default)]
    pub from_name: Option<String>,
    /// Message subject.
    pub subject: String,
    /// Whether the message has been read.
    pub is_read: bool,
}

impl Message {
    /// Creates a new unread message.
    #[must_use]
    pub fn new(id: impl Into<String>, from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            from_name: None,
            subject: subject.into(),
            is_read: false,
        }
    }

    /// Sets the sender display name.
    #[must_use]
    pub fn with_from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    /// Sets the read flag.
    #[must_use]
    pub fn read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    /// Decode one message from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if a required field is missing or
    /// has the wrong type.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|source| Error::MalformedRecord {
            kind: RecordKind::Message,
            source,
        })
    }

    /// Decode a JSON array of messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] on the first invalid message.
    pub fn parse_batch(text: &str) -> Result<Vec<Self>> {
        serde_json::from_str(text).map_err(|source| Error::MalformedRecord {
            kind: RecordKind::Message,
            source,
        })
    }
}

/// One classified message in a triage summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageEntry {
    /// Message identifier.
    pub id: String,
    /// Sender address.
    pub from: String,
    /// Sender display name.
    pub from_name: Option<String>,
    /// Message subject.
    pub subject: String,
    /// Why the message got its action.
    pub reason: String,
    /// Display priority; lower sorts first.
    pub priority: u8,
}

impl TriageEntry {
    /// Build an entry from a message and its disposition.
    #[must_use]
    pub fn new(message: &Message, disposition: &Disposition) -> Self {
        Self {
            id: message.id.clone(),
            from: message.from.clone(),
            from_name: message.from_name.clone(),
            subject: message.subject.clone(),
            reason: disposition.reason.clone(),
            priority: disposition.priority,
        }
    }
}

/// Triage results grouped by action.
///
/// Serializes to `{"mark_important": [...], "archive": [...], "flag": [...], "keep": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageSummary {
    /// Messages marked important.
    pub mark_important: Vec<TriageEntry>,
    /// Messages archived.
    pub archive: Vec<TriageEntry>,
    /// Messages flagged for follow-up.
    pub flag: Vec<TriageEntry>,
    /// Messages left in the inbox.
    pub keep: Vec<TriageEntry>,
}

impl TriageSummary {
    /// Entries for one action.
    #[must_use]
    pub fn entries(&self, action: Action) -> &[TriageEntry] {
        match action {
            Action::MarkImportant => &self.mark_important,
            Action::Archive => &self.archive,
            Action::Flag => &self.flag,
            Action::Keep => &self.keep,
        }
    }

    fn entries_mut(&mut self, action: Action) -> &mut Vec<TriageEntry> {
        match action {
            Action::MarkImportant => &mut self.mark_important,
            Action::Archive => &mut self.archive,
            Action::Flag => &mut self.flag,
            Action::Keep => &mut self.keep,
        }
    }

    /// Append an entry to the group for `action`.
    pub fn push(&mut self, action: Action, entry: TriageEntry) {
        self.entries_mut(action).push(entry);
    }

    /// Sort each group by ascending priority, keeping input order for ties.
    pub fn sort_by_priority(&mut self) {
        for action in Action::ALL {
            self.entries_mut(action).sort_by_key(|e| e.priority);
        }
    }

    /// Total number of classified messages.
    #[must_use]
    pub fn total(&self) -> usize {
        Action::ALL.iter().map(|a| self.entries(*a).len()).sum()
    }

    /// Returns true if nothing was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
