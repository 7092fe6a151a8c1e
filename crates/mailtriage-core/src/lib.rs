//! # mailtriage-core
//!
//! Mailbox triage and calendar conflict engine for `mailtriage`.
//!
//! This crate provides:
//! - **Rule Engine** - First-match-wins classification of messages into
//!   dispositions (important, archive, flag, keep)
//! - **Triage Runner** - Applies the rules to a batch and dispatches the
//!   resulting mailbox actions (or simulates them in dry-run mode)
//! - **Collision Detector** - Finds overlapping meetings and cross-references them
//! - **Time Normalizer** - Shifts UTC timestamps to the local offset for display
//!
//! Records are fetched by the caller; nothing in this crate touches the network.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod calendar;
mod error;
pub mod rules;
pub mod time;
pub mod triage;

pub use calendar::{
    AnnotatedEvent, CollisionGroup, CollisionRef, Event, EventFilter, ResponseStatus, annotate,
    detect_collisions, find_collisions,
};
pub use error::{Error, RecordKind, Result};
pub use rules::{Action, Disposition, Rule, RuleEngine, RuleSet, classify};
pub use time::{
    DateCommandOffsetProvider, FixedOffsetProvider, LocalOffset, OffsetError, OffsetProvider,
    TimeNormalizer, parse_offset,
};
pub use triage::{ActionDispatcher, Message, TriageEntry, TriageRunner, TriageSummary};
