//! Batch triage over a dispatcher.

use tracing::{debug, info};

use super::model::{Message, TriageEntry, TriageSummary};
use crate::rules::{Action, RuleEngine, RuleSet};

/// Folder archived messages are moved to unless configured otherwise.
pub const DEFAULT_ARCHIVE_FOLDER: &str = "archive";

/// Mailbox operations the runner needs from the mail service.
///
/// Errors are returned to the caller of [`TriageRunner::run`] unchanged.
pub trait ActionDispatcher {
    /// Error raised by the mail service.
    type Error;

    /// Mark a message as important.
    ///
    /// # Errors
    ///
    /// Returns the mail service's error.
    fn mark_important(&mut self, id: &str) -> Result<(), Self::Error>;

    /// Set or clear a message's read flag.
    ///
    /// # Errors
    ///
    /// Returns the mail service's error.
    fn mark_read(&mut self, id: &str, is_read: bool) -> Result<(), Self::Error>;

    /// Move a message to the named folder.
    ///
    /// # Errors
    ///
    /// Returns the mail service's error.
    fn move_to_folder(&mut self, id: &str, folder: &str) -> Result<(), Self::Error>;
}

impl<D: ActionDispatcher + ?Sized> ActionDispatcher for &mut D {
    type Error = D::Error;

    fn mark_important(&mut self, id: &str) -> Result<(), Self::Error> {
        (**self).mark_important(id)
    }

    fn mark_read(&mut self, id: &str, is_read: bool) -> Result<(), Self::Error> {
        (**self).mark_read(id, is_read)
    }

    fn move_to_folder(&mut self, id: &str, folder: &str) -> Result<(), Self::Error> {
        (**self).move_to_folder(id, folder)
    }
}

/// Applies a rule set to message batches.
#[derive(Debug, Clone)]
pub struct TriageRunner {
    engine: RuleEngine,
    archive_folder: String,
}

impl TriageRunner {
    /// Creates a runner for the given rules.
    #[must_use]
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            engine: RuleEngine::new(rules),
            archive_folder: DEFAULT_ARCHIVE_FOLDER.to_string(),
        }
    }

    /// Sets the folder archived messages are moved to.
    #[must_use]
    pub fn with_archive_folder(mut self, folder: impl Into<String>) -> Self {
        self.archive_folder = folder.into();
        self
    }

    /// Triage a batch of messages.
    ///
    /// Unless `dry_run` is set, already-read messages are skipped and each
    /// classified message's action is dispatched as soon as it is
    /// classified. Groups in the returned summary are sorted by priority.
    ///
    /// # Errors
    ///
    /// Returns the first dispatcher error. Actions dispatched before the
    /// failure are not rolled back.
    pub fn run<D: ActionDispatcher>(
        &self,
        messages: &[Message],
        mut dispatcher: D,
        dry_run: bool,
    ) -> Result<TriageSummary, D::Error> {
        let mut summary = TriageSummary::default();
        let mut skipped = 0usize;

        for message in messages {
            if message.is_read && !dry_run {
                skipped += 1;
                continue;
            }

            let disposition = self.engine.classify(message);
            debug!(
                id = %message.id,
                action = %disposition.action,
                priority = disposition.priority,
                reason = %disposition.reason,
                "Classified message"
            );

            if !dry_run {
                self.dispatch(&mut dispatcher, &message.id, disposition.action)?;
            }

            summary.push(disposition.action, TriageEntry::new(message, &disposition));
        }

        summary.sort_by_priority();

        info!(
            total = summary.total(),
            skipped,
            important = summary.mark_important.len(),
            archived = summary.archive.len(),
            flagged = summary.flag.len(),
            kept = summary.keep.len(),
            dry_run,
            "Triage complete"
        );

        Ok(summary)
    }

    fn dispatch<D: ActionDispatcher>(
        &self,
        dispatcher: &mut D,
        id: &str,
        action: Action,
    ) -> Result<(), D::Error> {
        match action {
            Action::MarkImportant => {
                dispatcher.mark_important(id)?;
                dispatcher.mark_read(id, true)
            }
            Action::Archive => dispatcher.move_to_folder(id, &self.archive_folder),
            Action::Flag | Action::Keep => Ok(()),
        }
    }
}
