//! Month grid: the days of a month laid out on a 7-column week.

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::bucket::events_on_day;
use crate::event::CalendarEvent;
use crate::window::first_of_month;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GridCell {
    /// Leading blank used only to align day 1 with its weekday column.
    Padding,
    Day {
        date: NaiveDate,
        events: Vec<CalendarEvent>,
    },
}

impl GridCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            GridCell::Padding => None,
            GridCell::Day { date, .. } => Some(*date),
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        match self {
            GridCell::Padding => &[],
            GridCell::Day { events, .. } => events,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    /// First day of the month this grid shows
    pub month: NaiveDate,
    pub week_start: Weekday,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    /// Build the (event-less) grid for the month containing `reference`.
    ///
    /// The grid starts with one padding cell per weekday between
    /// `week_start` and the weekday of the 1st, followed by every day of the
    /// month in order. No trailing padding is added.
    pub fn build(reference: NaiveDate, week_start: Weekday) -> Self {
        let month = first_of_month(reference);
        let padding = padding_for(month, week_start);

        let mut cells: Vec<GridCell> = (0..padding).map(|_| GridCell::Padding).collect();
        cells.extend(
            month
                .iter_days()
                .take_while(|d| d.month() == month.month())
                .map(|date| GridCell::Day {
                    date,
                    events: Vec::new(),
                }),
        );

        MonthGrid {
            month,
            week_start,
            cells,
        }
    }

    /// Build the grid and place each event in the cell of the day it starts on
    /// (judged in `tz`).
    pub fn with_events(
        reference: NaiveDate,
        week_start: Weekday,
        events: &[CalendarEvent],
        tz: Tz,
    ) -> Self {
        let mut grid = Self::build(reference, week_start);

        for cell in &mut grid.cells {
            if let GridCell::Day { date, events: day_events } = cell {
                *day_events = events_on_day(events, *date, tz)
                    .into_iter()
                    .cloned()
                    .collect();
            }
        }

        grid
    }

    pub fn padding(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| matches!(c, GridCell::Padding))
            .count()
    }

    pub fn days(&self) -> usize {
        self.cells.len() - self.padding()
    }

    /// Cells chunked into rows of seven (the last row may be shorter).
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    /// Column headers starting from the week start, e.g. "Sun".."Sat".
    pub fn weekday_labels(&self) -> Vec<String> {
        let mut day = self.week_start;
        (0..7)
            .map(|_| {
                let label = format!("{:?}", day);
                day = day.succ();
                label
            })
            .collect()
    }
}

/// Number of leading padding cells for a month starting on `first`.
pub fn padding_for(first: NaiveDate, week_start: Weekday) -> usize {
    let first_idx = first.weekday().num_days_from_monday();
    let start_idx = week_start.num_days_from_monday();
    ((first_idx + 7 - start_idx) % 7) as usize
}
