//! The visible month and the events loaded for it.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;

use crate::bucket::{events_on_day, events_overlapping_day};
use crate::error::MomentsResult;
use crate::event::{CalendarEvent, RawEvent};
use crate::grid::MonthGrid;
use crate::source::EventSource;
use crate::window::{EventWindow, first_of_month, first_of_next_month, first_of_previous_month};

/// Hands out increasing tickets so that only the newest fetch gets applied.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    month: NaiveDate,
}

impl FetchTicket {
    pub fn month(&self) -> NaiveDate {
        self.month
    }
}

impl FetchSequencer {
    pub fn issue(&self, month: NaiveDate) -> FetchTicket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket { seq, month }
    }

    /// True if no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.seq
    }
}

pub struct MonthView {
    month: NaiveDate,
    week_start: Weekday,
    tz: Tz,
    events: Vec<CalendarEvent>,
    loaded_month: Option<NaiveDate>,
    sequencer: FetchSequencer,
}

impl MonthView {
    pub fn new(reference: NaiveDate, week_start: Weekday, tz: Tz) -> Self {
        MonthView {
            month: first_of_month(reference),
            week_start,
            tz,
            events: Vec::new(),
            loaded_month: None,
            sequencer: FetchSequencer::default(),
        }
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Whether the loaded events belong to the month currently shown.
    pub fn is_loaded(&self) -> bool {
        self.loaded_month == Some(self.month)
    }

    pub fn previous(&mut self) {
        self.month = first_of_previous_month(self.month);
    }

    pub fn next(&mut self) {
        self.month = first_of_next_month(self.month);
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.month = first_of_month(date);
    }

    /// Start a fetch for the current month.
    pub fn begin_fetch(&self) -> (FetchTicket, EventWindow) {
        let ticket = self.sequencer.issue(self.month);
        let window = EventWindow::month_of(self.month, self.tz);
        (ticket, window)
    }

    /// Apply a fetch result. Responses to anything but the newest ticket are
    /// discarded; returns whether the events were applied.
    pub fn apply(&mut self, ticket: FetchTicket, raws: Vec<RawEvent>) -> bool {
        if !self.sequencer.is_current(&ticket) {
            tracing::debug!(month = %ticket.month, "discarding stale fetch");
            return false;
        }

        self.events = CalendarEvent::from_raw_all(raws, self.tz);
        self.loaded_month = Some(ticket.month);
        tracing::debug!(month = %ticket.month, count = self.events.len(), "month events loaded");
        true
    }

    /// Fetch the current month from `source` and apply it.
    pub async fn refresh<S: EventSource>(&mut self, source: &S) -> MomentsResult<()> {
        let (ticket, window) = self.begin_fetch();
        let raws = source.list_events(&window).await?;
        self.apply(ticket, raws);
        Ok(())
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::with_events(self.month, self.week_start, &self.events, self.tz)
    }

    /// The loaded events starting on `day`, in fetch order.
    pub fn events_on(&self, day: NaiveDate) -> Vec<CalendarEvent> {
        events_on_day(&self.events, day, self.tz)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The loaded events in progress at any point of `day`, including ones
    /// that started the day before. Moments on `day` are checked against these.
    pub fn events_overlapping(&self, day: NaiveDate) -> Vec<CalendarEvent> {
        events_overlapping_day(&self.events, day, self.tz)
            .into_iter()
            .cloned()
            .collect()
    }
}
