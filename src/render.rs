//! TUI rendering for moments types.
//!
//! Layout helpers return plain strings; colors are applied on top with
//! owo_colors.

use chrono::NaiveDate;
use chrono_tz::Tz;
use moments_core::event::CalendarEvent;
use moments_core::grid::{GridCell, MonthGrid};
use moments_core::priorities::WeeklyPriorities;
use moments_core::records::{Appreciation, Desire, ScheduledMoment};
use owo_colors::OwoColorize;

/// Width of one grid column, including the separating space.
const CELL_WIDTH: usize = 5;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Desire {
    fn render(&self) -> String {
        let mode = if self.is_hot {
            "hot".red().to_string()
        } else {
            "calm".blue().to_string()
        };
        let category = self
            .category
            .as_ref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();

        format!(
            "{} {} {}{} {}",
            format!("{:>3}", self.priority).bold(),
            self.title,
            mode,
            category.dimmed(),
            format!("({}, {})", self.author, short_id(&self.id)).dimmed()
        )
    }
}

impl Render for Appreciation {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.date.format("%d/%m/%Y").dimmed(),
            self.text,
            format!("- {} ({})", self.author, short_id(&self.id)).dimmed()
        )
    }
}

impl Render for ScheduledMoment {
    fn render(&self) -> String {
        let from_desire = if self.desire_id.is_some() { " ♥" } else { "" };
        format!(
            "{} {}{} {}",
            self.date.format("%d/%m/%Y %H:%M").dimmed(),
            self.title,
            from_desire.red(),
            format!("({})", short_id(&self.id)).dimmed()
        )
    }
}

impl Render for WeeklyPriorities {
    fn render(&self) -> String {
        (1..=moments_core::constants::PRIORITY_SLOTS)
            .map(|rank| match self.get(rank) {
                Some(p) => format!("{}. {}", rank, p.text),
                None => format!("{}. {}", rank, "(not set)".dimmed()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One event on a line: time range, title, location.
pub fn render_event(event: &CalendarEvent, tz: Tz) -> String {
    let location = if event.location.is_empty() {
        String::new()
    } else {
        format!(" @ {}", event.location)
    };

    format!(
        "  {} {}{}",
        event.render_time_range(tz).dimmed(),
        event,
        location.dimmed()
    )
}

/// "Today", "Tomorrow", or e.g. "Wed Feb 25".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Plain-text rows of the grid: the weekday header, then one row per week.
/// Days with events carry a `*`.
pub fn grid_rows(grid: &MonthGrid) -> Vec<String> {
    let header = grid
        .weekday_labels()
        .iter()
        .map(|l| format!("{:>width$}", l, width = CELL_WIDTH - 1))
        .collect::<Vec<_>>()
        .join(" ");

    let mut rows = vec![header];
    for week in grid.weeks() {
        let row = week
            .iter()
            .map(|cell| format!("{:>width$}", cell_text(cell), width = CELL_WIDTH - 1))
            .collect::<Vec<_>>()
            .join(" ");
        rows.push(row.trim_end().to_string());
    }
    rows
}

fn cell_text(cell: &GridCell) -> String {
    match cell {
        GridCell::Padding => String::new(),
        GridCell::Day { date, events } => {
            let marker = if events.is_empty() { " " } else { "*" };
            format!("{}{}", date.format("%-d"), marker)
        }
    }
}

/// The month grid with a title line, today highlighted.
pub fn render_month(grid: &MonthGrid, today: NaiveDate) -> String {
    let mut lines = vec![grid.month.format("%B %Y").bold().to_string()];

    let rows = grid_rows(grid);
    if let Some((header, weeks)) = rows.split_first() {
        lines.push(header.dimmed().to_string());

        let today_text = grid
            .cells
            .iter()
            .find(|c| c.date() == Some(today))
            .map(cell_text);

        for row in weeks {
            match &today_text {
                Some(text) if row_has_cell(row, text) => {
                    lines.push(highlight_cell(row, text));
                }
                _ => lines.push(row.clone()),
            }
        }
    }

    lines.join("\n")
}

fn row_has_cell(row: &str, text: &str) -> bool {
    row.split_whitespace()
        .any(|cell| cell == text.trim_end())
}

fn highlight_cell(row: &str, text: &str) -> String {
    let needle = text.trim_end();
    row.split(' ')
        .map(|part| {
            if part == needle {
                part.cyan().bold().to_string()
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Events of a month grouped under their day.
pub fn render_event_list(grid: &MonthGrid, today: NaiveDate, tz: Tz) -> String {
    let mut lines = Vec::new();

    for cell in &grid.cells {
        if let GridCell::Day { date, events } = cell
            && !events.is_empty()
        {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(day_label(*date, today).bold().to_string());
            lines.extend(events.iter().map(|e| render_event(e, tz)));
        }
    }

    if lines.is_empty() {
        return "No events this month".dimmed().to_string();
    }

    lines.join("\n")
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc, Weekday};

    fn event(title: &str, day: u32, hour: u32) -> CalendarEvent {
        CalendarEvent {
            id: format!("{}-{}", title, day),
            title: title.to_string(),
            start: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, day, hour + 1, 0, 0).unwrap(),
            description: String::new(),
            location: String::new(),
        }
    }

    #[test]
    fn grid_rows_align_day_one_under_its_weekday() {
        // March 2025 starts on a Saturday
        let grid = MonthGrid::build(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), Weekday::Sun);
        let rows = grid_rows(&grid);

        assert_eq!(rows[0], " Sun  Mon  Tue  Wed  Thu  Fri  Sat");
        assert_eq!(rows[1], format!("{}  1", " ".repeat(30)));
        assert_eq!(rows[2], "  2    3    4    5    6    7    8");
        // 6 padding + 31 days = 37 cells = 6 rows
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[6], " 30   31");
    }

    #[test]
    fn days_with_events_are_marked() {
        let grid = MonthGrid::with_events(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Weekday::Mon,
            &[event("Dinner", 4, 18)],
            chrono_tz::UTC,
        );
        let rows = grid_rows(&grid);

        assert!(rows[2].contains("4*"));
        assert!(!rows[2].contains("5*"));
    }

    #[test]
    fn event_list_groups_by_day() {
        let grid = MonthGrid::with_events(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Weekday::Sun,
            &[event("Standup", 20, 9), event("Dinner", 20, 18), event("Gym", 22, 7)],
            chrono_tz::UTC,
        );
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        let list = render_event_list(&grid, today, chrono_tz::UTC);

        assert!(list.contains("Today"));
        assert!(list.contains("Sat Mar 22"));
        assert!(list.contains("09:00 - 10:00"));
        let standup = list.find("Standup").unwrap();
        let dinner = list.find("Dinner").unwrap();
        assert!(standup < dinner);
    }

    #[test]
    fn day_labels() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 24).unwrap();
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2025, 2, 26).unwrap(), today),
            "Wed Feb 26"
        );
    }

    #[test]
    fn short_ids_are_truncated() {
        assert_eq!(short_id("0f8fad5b-d9cb-469f-a165-70867728950e"), "0f8fad5b");
        assert_eq!(short_id("abc"), "abc");
    }
}
