//! Pairwise overlap detection and annotation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{AnnotatedEvent, CollisionRef, Event};

/// Identifiers of events that overlap each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroup {
    /// Member event identifiers, in the order they joined.
    pub event_ids: Vec<String>,
}

impl CollisionGroup {
    fn pair(a: &str, b: &str) -> Self {
        let mut group = Self::default();
        group.insert(a);
        group.insert(b);
        group
    }

    /// Returns true if the event is a member.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.event_ids.iter().any(|member| member == id)
    }

    fn insert(&mut self, id: &str) {
        if !self.contains(id) {
            self.event_ids.push(id.to_string());
        }
    }
}

/// Find groups of overlapping active events.
///
/// Pairs are visited in input order. Each overlapping pair is added to the
/// first existing group that holds either event, or starts a new group.
#[must_use]
pub fn detect_collisions(events: &[Event]) -> Vec<CollisionGroup> {
    let active: Vec<&Event> = events.iter().filter(|e| e.response.is_active()).collect();
    let mut groups: Vec<CollisionGroup> = Vec::new();

    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if !a.overlaps(b) {
                continue;
            }
            debug!(first = %a.id, second = %b.id, "Events overlap");

            match groups
                .iter_mut()
                .find(|g| g.contains(&a.id) || g.contains(&b.id))
            {
                Some(group) => {
                    group.insert(&a.id);
                    group.insert(&b.id);
                }
                None => groups.push(CollisionGroup::pair(&a.id, &b.id)),
            }
        }
    }

    groups
}

/// Attach collision flags and cross-references to every event.
///
/// Inactive events are returned without collisions and are never listed in
/// another event's `collides_with`.
#[must_use]
pub fn annotate(events: &[Event], groups: &[CollisionGroup]) -> Vec<AnnotatedEvent> {
    let lookup = |id: &str| {
        events
            .iter()
            .find(|e| e.id == id && e.response.is_active())
    };

    events
        .iter()
        .map(|event| {
            let mut collides_with: Vec<CollisionRef> = Vec::new();
            let mut has_collision = false;

            if event.response.is_active() {
                for group in groups.iter().filter(|g| g.contains(&event.id)) {
                    has_collision = true;
                    for other_id in group.event_ids.iter().filter(|id| **id != event.id) {
                        if collides_with.iter().any(|c| c.id == *other_id) {
                            continue;
                        }
                        if let Some(other) = lookup(other_id.as_str()) {
                            collides_with.push(CollisionRef::from(other));
                        }
                    }
                }
            }

            AnnotatedEvent {
                event: event.clone(),
                has_collision,
                collides_with,
            }
        })
        .collect()
}

/// Detect collisions and annotate the events in one step.
#[must_use]
pub fn find_collisions(events: &[Event]) -> Vec<AnnotatedEvent> {
    let groups = detect_collisions(events);
    debug!(
        events = events.len(),
        groups = groups.len(),
        "Collision detection complete"
    );
    annotate(events, &groups)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::calendar::ResponseStatus;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 26)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn accepted(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event::new(id, format!("Meeting {id}"), start, end).with_response(ResponseStatus::Accepted)
    }

    fn ids(event: &AnnotatedEvent) -> Vec<&str> {
        event.collides_with.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_overlap_and_touching_endpoints() {
        let events = vec![
            accepted("A", at(10, 0), at(11, 0)),
            accepted("B", at(10, 30), at(11, 30)),
            accepted("C", at(11, 30), at(12, 0)),
        ];

        let groups = detect_collisions(&events);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].event_ids, vec!["A", "B"]);

        let annotated = annotate(&events, &groups);
        assert_eq!(ids(&annotated[0]), ["B"]);
        assert_eq!(ids(&annotated[1]), ["A"]);
        assert!(!annotated[2].has_collision);
        assert!(annotated[2].collides_with.is_empty());
    }

    #[test]
    fn test_declined_and_unanswered_are_ignored() {
        let events = vec![
            accepted("A", at(10, 0), at(11, 0)),
            accepted("B", at(10, 0), at(11, 0)).with_response(ResponseStatus::Declined),
            accepted("C", at(10, 0), at(11, 0)).with_response(ResponseStatus::None),
        ];

        let annotated = find_collisions(&events);
        assert!(annotated.iter().all(|e| !e.has_collision));
        assert!(annotated.iter().all(|e| e.collides_with.is_empty()));
    }

    #[test]
    fn test_tentative_counts_as_active() {
        let events = vec![
            accepted("A", at(9, 0), at(10, 0)),
            accepted("B", at(9, 30), at(9, 45)).with_response(ResponseStatus::Tentative),
        ];

        let annotated = find_collisions(&events);
        assert!(annotated[0].has_collision);
        assert!(annotated[1].has_collision);
    }

    #[test]
    fn test_chain_joins_first_group() {
        let events = vec![
            accepted("A", at(9, 0), at(10, 0)),
            accepted("B", at(9, 30), at(10, 30)),
            accepted("C", at(10, 15), at(11, 0)),
        ];

        let groups = detect_collisions(&events);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].event_ids, vec!["A", "B", "C"]);

        // A and C do not overlap but share a group, so they reference each other.
        let annotated = annotate(&events, &groups);
        assert_eq!(ids(&annotated[0]), ["B", "C"]);
        assert_eq!(ids(&annotated[2]), ["A", "B"]);
    }

    #[test]
    fn test_groups_are_not_merged_afterwards() {
        // A-D and B-C start separate groups; the later B-D pair joins the
        // first group holding either member and leaves the second in place.
        let events = vec![
            accepted("A", at(9, 0), at(9, 30)),
            accepted("B", at(10, 0), at(11, 0)),
            accepted("C", at(10, 30), at(11, 30)),
            accepted("D", at(9, 15), at(10, 15)),
        ];

        let groups = detect_collisions(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].event_ids, vec!["A", "D", "B"]);
        assert_eq!(groups[1].event_ids, vec!["B", "C"]);

        let annotated = annotate(&events, &groups);
        assert_eq!(ids(&annotated[1]), ["A", "D", "C"]);
    }

    #[test]
    fn test_interval_data_unchanged() {
        let events = vec![
            accepted("A", at(10, 0), at(11, 0)),
            accepted("B", at(10, 30), at(11, 30)),
        ];

        let annotated = find_collisions(&events);
        for (original, annotated) in events.iter().zip(&annotated) {
            assert_eq!(&annotated.event, original);
        }
        assert_eq!(annotated[0].collides_with[0].start, at(10, 30));
        assert_eq!(annotated[0].collides_with[0].subject, "Meeting B");
    }

    #[test]
    fn test_empty_input() {
        assert!(detect_collisions(&[]).is_empty());
        assert!(find_collisions(&[]).is_empty());
    }
}
