//! Event listing filter.

use regex::{Regex, RegexBuilder};

use super::model::{Event, ResponseStatus};
use crate::Result;

/// Selects which events are listed.
///
/// By default cancelled and declined events are dropped and every subject
/// matches.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    include_cancelled: bool,
    subject: Option<Regex>,
}

impl EventFilter {
    /// Creates the default filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep cancelled and declined events.
    #[must_use]
    pub fn include_cancelled(mut self, include: bool) -> Self {
        self.include_cancelled = include;
        self
    }

    /// Only keep events whose subject matches `pattern` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`](crate::Error::InvalidFilter) if the
    /// pattern is not a valid regular expression.
    pub fn subject_pattern(mut self, pattern: &str) -> Result<Self> {
        self.subject = Some(RegexBuilder::new(pattern).case_insensitive(true).build()?);
        Ok(self)
    }

    /// Returns true if the event passes the filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if !self.include_cancelled
            && (event.is_cancelled || event.response == ResponseStatus::Declined)
        {
            return false;
        }

        self.subject
            .as_ref()
            .is_none_or(|re| re.is_match(&event.subject))
    }

    /// Keep the matching events, preserving order.
    #[must_use]
    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}
