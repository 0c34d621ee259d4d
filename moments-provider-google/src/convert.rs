//! Conversion between Google Calendar API events and moments events.

use google_calendar::types::{Event as GoogleEvent, EventDateTime};
use moments_core::event::{EventTime, NewEvent, RawEvent};

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn from_google_time(time: Option<EventDateTime>) -> Option<EventTime> {
    let time = time?;
    if let Some(dt) = time.date_time {
        Some(EventTime::DateTime(dt))
    } else {
        time.date.map(EventTime::Date)
    }
}

/// A Google event as a raw record. Timed starts win over all-day dates.
pub fn raw_from_google(event: GoogleEvent) -> RawEvent {
    RawEvent {
        id: non_empty(event.id),
        summary: non_empty(event.summary),
        description: non_empty(event.description),
        location: non_empty(event.location),
        start: from_google_time(event.start),
        end: from_google_time(event.end),
    }
}

/// The insert payload for a new moment.
///
/// Google assigns the id, so none is sent.
pub fn to_google(event: &NewEvent) -> GoogleEvent {
    let time = |dt: chrono::DateTime<chrono::Utc>| EventDateTime {
        date: None,
        date_time: Some(dt),
        time_zone: event.time_zone.clone(),
    };

    GoogleEvent {
        summary: event.title.clone(),
        description: event.description.clone(),
        start: Some(time(event.start)),
        end: Some(time(event.end)),
        ..Default::default()
    }
}

/// Sort key for a raw record's start; all-day dates sort at midnight UTC.
pub fn start_key(raw: &RawEvent) -> Option<chrono::DateTime<chrono::Utc>> {
    match raw.start.as_ref()? {
        EventTime::DateTime(dt) => Some(*dt),
        EventTime::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
    }
}
