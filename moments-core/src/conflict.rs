//! Overlap checking for candidate events.

use chrono::{DateTime, Utc};

use crate::error::{MomentsError, MomentsResult};
use crate::event::CalendarEvent;

/// Every event in `existing` whose interval overlaps `[start, end)`.
///
/// An existing event `[a, b)` conflicts when the candidate starts inside it,
/// ends inside it, or contains it. Touching endpoints don't conflict.
/// Requires `start < end`.
pub fn find_conflicts<'a>(
    existing: &'a [CalendarEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> MomentsResult<Vec<&'a CalendarEvent>> {
    if start >= end {
        return Err(MomentsError::InvalidInterval);
    }

    Ok(existing
        .iter()
        .filter(|event| overlaps(event, start, end))
        .collect())
}

fn overlaps(event: &CalendarEvent, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let (a, b) = (event.start, event.end);

    (start >= a && start < b) || (end > a && end <= b) || (start <= a && end >= b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, hour, minute, 0).unwrap()
    }

    fn event(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            start,
            end,
            description: String::new(),
            location: String::new(),
        }
    }

    #[test]
    fn back_to_back_is_not_a_conflict() {
        let existing = vec![event("morning", at(9, 0), at(10, 0))];

        assert!(find_conflicts(&existing, at(10, 0), at(11, 0)).unwrap().is_empty());
        assert!(find_conflicts(&existing, at(8, 0), at(9, 0)).unwrap().is_empty());
    }

    #[test]
    fn partial_overlap_is_reported() {
        let existing = vec![event("morning", at(9, 0), at(10, 0))];

        let conflicts = find_conflicts(&existing, at(9, 30), at(10, 30)).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "morning");
    }

    #[test]
    fn containment_either_way_is_reported() {
        let existing = vec![event("lunch", at(12, 0), at(13, 0))];

        assert_eq!(find_conflicts(&existing, at(11, 0), at(14, 0)).unwrap().len(), 1);
        assert_eq!(find_conflicts(&existing, at(12, 15), at(12, 45)).unwrap().len(), 1);
        assert_eq!(find_conflicts(&existing, at(12, 0), at(13, 0)).unwrap().len(), 1);
    }

    #[test]
    fn returns_every_conflicting_event() {
        let existing = vec![
            event("a", at(9, 0), at(10, 0)),
            event("b", at(10, 0), at(11, 0)),
            event("c", at(15, 0), at(16, 0)),
        ];

        let ids: Vec<_> = find_conflicts(&existing, at(9, 30), at(10, 30))
            .unwrap()
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn rejects_empty_or_inverted_candidate() {
        let existing = vec![event("a", at(9, 0), at(10, 0))];

        assert!(matches!(
            find_conflicts(&existing, at(9, 0), at(9, 0)),
            Err(MomentsError::InvalidInterval)
        ));
        assert!(matches!(
            find_conflicts(&existing, at(10, 0), at(9, 0)),
            Err(MomentsError::InvalidInterval)
        ));
    }

    #[test]
    fn matches_interval_intersection_and_is_repeatable() {
        // Every pair of quarter-hour intervals across a morning
        let slots: Vec<_> = (0..12).map(|i| at(8, 0) + Duration::minutes(15 * i)).collect();

        for (i, &a_start) in slots.iter().enumerate() {
            for &a_end in &slots[i + 1..] {
                let existing = vec![event("a", a_start, a_end)];
                for (j, &b_start) in slots.iter().enumerate() {
                    for &b_end in &slots[j + 1..] {
                        let intersects = a_start < b_end && b_start < a_end;
                        let first = find_conflicts(&existing, b_start, b_end).unwrap();
                        let second = find_conflicts(&existing, b_start, b_end).unwrap();

                        assert_eq!(!first.is_empty(), intersects);
                        assert_eq!(first, second);
                    }
                }
            }
        }
    }
}
