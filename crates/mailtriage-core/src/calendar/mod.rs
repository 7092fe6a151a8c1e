//! Calendar collision detection.
//!
//! Overlap is tested pairwise over *active* events (anything not declined
//! and not unanswered) using half-open intervals, so back-to-back meetings
//! never collide. Overlapping pairs are merged into [`CollisionGroup`]s
//! incrementally: a pair joins the first group that already holds either
//! of its events, otherwise it starts a new group. Groups are not merged
//! with each other afterwards.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use mailtriage_core::calendar::{Event, ResponseStatus, find_collisions};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 11, 26).unwrap();
//! let at = |h, m| day.and_hms_opt(h, m, 0).unwrap();
//!
//! let events = vec![
//!     Event::new("a", "Standup", at(10, 0), at(11, 0)).with_response(ResponseStatus::Accepted),
//!     Event::new("b", "Review", at(10, 30), at(11, 30)).with_response(ResponseStatus::Accepted),
//!     Event::new("c", "Lunch", at(11, 30), at(12, 30)).with_response(ResponseStatus::Accepted),
//! ];
//!
//! let annotated = find_collisions(&events);
//! assert!(annotated[0].has_collision);
//! assert_eq!(annotated[0].collides_with[0].subject, "Review");
//! assert!(!annotated[2].has_collision);
//! ```

mod collision;
mod filter;
mod model;

pub use collision::{CollisionGroup, annotate, detect_collisions, find_collisions};
pub use filter::EventFilter;
pub use model::{AnnotatedEvent, CollisionRef, Event, ResponseStatus};
