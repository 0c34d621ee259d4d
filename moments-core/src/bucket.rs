//! Assigning events to the calendar day they start on.
//!
//! "Same day" is always judged in one viewer zone: the event's UTC start is
//! converted to `tz` before its date is taken.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::event::CalendarEvent;
use crate::window::EventWindow;

/// The calendar date an event starts on, in the viewer zone.
pub fn start_date(event: &CalendarEvent, tz: Tz) -> NaiveDate {
    event.start.with_timezone(&tz).date_naive()
}

/// Events starting on `day`, in the order they were fetched.
pub fn events_on_day<'a>(
    events: &'a [CalendarEvent],
    day: NaiveDate,
    tz: Tz,
) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| start_date(event, tz) == day)
        .collect()
}

/// Events in progress at any point of `day`, including ones that started
/// earlier and run into it. This is the set a new moment can clash with.
pub fn events_overlapping_day<'a>(
    events: &'a [CalendarEvent],
    day: NaiveDate,
    tz: Tz,
) -> Vec<&'a CalendarEvent> {
    let window = EventWindow::day_of(day, tz);
    events
        .iter()
        .filter(|event| window.overlaps(event.start, event.end))
        .collect()
}
