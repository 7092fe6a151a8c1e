//! Inbox triage.
//!
//! The [`TriageRunner`] walks a batch of already-fetched messages, classifies
//! each with the [`RuleEngine`](crate::RuleEngine), and applies the matching
//! mailbox action through an [`ActionDispatcher`]:
//!
//! | Action           | Dispatcher calls                           |
//! |------------------|--------------------------------------------|
//! | `mark_important` | `mark_important(id)`, `mark_read(id, true)` |
//! | `archive`        | `move_to_folder(id, archive_folder)`       |
//! | `flag`           | none, recorded only                        |
//! | `keep`           | none                                       |
//!
//! In dry-run mode nothing is dispatched and already-read messages are
//! classified too, so the summary reports on the whole batch.

mod model;
mod runner;

pub use model::{Message, TriageEntry, TriageSummary};
pub use runner::{ActionDispatcher, DEFAULT_ARCHIVE_FOLDER, TriageRunner};
