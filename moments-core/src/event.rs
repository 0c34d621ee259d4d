//! Calendar event types.
//!
//! Providers hand back `RawEvent` records shaped like their API responses.
//! Everything else in moments works with the normalized `CalendarEvent`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar event as the planner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
    pub location: String,
}

/// Start or end of a provider record: a timed instant or an all-day date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

/// An event record as returned by an event source, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

/// Fields sent to an event source to create an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA zone the event was scheduled in (e.g. "Europe/London")
    pub time_zone: String,
}

impl EventTime {
    /// Resolve to an instant. All-day dates start at local midnight in `tz`.
    pub fn to_utc(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            EventTime::DateTime(dt) => Some(*dt),
            EventTime::Date(d) => tz
                .from_local_datetime(&d.and_hms_opt(0, 0, 0)?)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl CalendarEvent {
    /// Normalize a provider record.
    ///
    /// Missing text fields become empty strings. Records without a usable
    /// start, or whose end precedes the start, yield `None`. A missing end
    /// takes the start.
    pub fn from_raw(raw: RawEvent, tz: Tz) -> Option<Self> {
        let start = raw.start.as_ref()?.to_utc(tz)?;
        let end = match raw.end.as_ref() {
            Some(end) => end.to_utc(tz)?,
            None => start,
        };

        if end < start {
            return None;
        }

        Some(CalendarEvent {
            id: raw.id.unwrap_or_default(),
            title: raw.summary.unwrap_or_default(),
            start,
            end,
            description: raw.description.unwrap_or_default(),
            location: raw.location.unwrap_or_default(),
        })
    }

    /// Normalize a batch of records, dropping the ones that can't be placed.
    pub fn from_raw_all(raws: Vec<RawEvent>, tz: Tz) -> Vec<Self> {
        raws.into_iter()
            .filter_map(|raw| {
                let id = raw.id.clone().unwrap_or_default();
                let event = Self::from_raw(raw, tz);
                if event.is_none() {
                    tracing::warn!(event_id = %id, "dropping event without a valid time range");
                }
                event
            })
            .collect()
    }

    /// Start and end formatted as "HH:MM - HH:MM" in the viewer zone.
    pub fn render_time_range(&self, tz: Tz) -> String {
        format!(
            "{} - {}",
            self.start.with_timezone(&tz).format("%H:%M"),
            self.end.with_timezone(&tz).format("%H:%M")
        )
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "(No title)")
        } else {
            write!(f, "{}", self.title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::London;

    #[test]
    fn from_raw_defaults_missing_text_to_empty() {
        let raw = RawEvent {
            id: Some("abc".to_string()),
            start: Some(EventTime::DateTime(
                Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap(),
            )),
            end: Some(EventTime::DateTime(
                Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap(),
            )),
            ..Default::default()
        };

        let event = CalendarEvent::from_raw(raw, London).unwrap();
        assert_eq!(event.id, "abc");
        assert_eq!(event.title, "");
        assert_eq!(event.description, "");
        assert_eq!(event.location, "");
    }

    #[test]
    fn from_raw_all_day_starts_at_local_midnight() {
        let raw = RawEvent {
            id: Some("day".to_string()),
            summary: Some("Holiday".to_string()),
            start: Some(EventTime::Date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())),
            end: Some(EventTime::Date(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap())),
            ..Default::default()
        };

        let event = CalendarEvent::from_raw(raw, London).unwrap();
        // BST is UTC+1
        assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 6, 30, 23, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2025, 7, 1, 23, 0, 0).unwrap());
    }

    #[test]
    fn from_raw_rejects_missing_start_and_inverted_range() {
        let no_start = RawEvent {
            id: Some("x".to_string()),
            ..Default::default()
        };
        assert!(CalendarEvent::from_raw(no_start, London).is_none());

        let inverted = RawEvent {
            start: Some(EventTime::DateTime(
                Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap(),
            )),
            end: Some(EventTime::DateTime(
                Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap(),
            )),
            ..Default::default()
        };
        assert!(CalendarEvent::from_raw(inverted, London).is_none());
    }

    #[test]
    fn from_raw_missing_end_takes_start() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap();
        let raw = RawEvent {
            start: Some(EventTime::DateTime(start)),
            ..Default::default()
        };

        let event = CalendarEvent::from_raw(raw, London).unwrap();
        assert_eq!(event.end, start);
    }

    #[test]
    fn from_raw_all_keeps_fetch_order() {
        let at = |h| {
            Some(EventTime::DateTime(
                Utc.with_ymd_and_hms(2025, 3, 20, h, 0, 0).unwrap(),
            ))
        };
        let raws = vec![
            RawEvent { id: Some("b".into()), start: at(11), end: at(12), ..Default::default() },
            RawEvent { id: Some("bad".into()), ..Default::default() },
            RawEvent { id: Some("a".into()), start: at(9), end: at(10), ..Default::default() },
        ];

        let ids: Vec<_> = CalendarEvent::from_raw_all(raws, London)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
