use anyhow::Result;
use chrono::Utc;
use moments_core::event::CalendarEvent;
use moments_core::source::EventSource;
use moments_core::window::EventWindow;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render;
use crate::utils::tui;

pub async fn run(app: &App, days: i64) -> Result<()> {
    let source = app.event_source()?;
    let events = fetch(app, &source, days).await?;

    if events.is_empty() {
        println!("{}", format!("Nothing planned in the next {} days", days).dimmed());
        return Ok(());
    }

    let today = app.today();
    let mut current_day = None;

    for event in &events {
        let day = event.start.with_timezone(&app.tz).date_naive();

        if current_day != Some(day) {
            if current_day.is_some() {
                println!();
            }
            println!("{}", render::day_label(day, today).bold());
            current_day = Some(day);
        }

        println!("{}", render::render_event(event, app.tz));
    }

    Ok(())
}

/// Events starting within the next `days` days, in start order.
pub async fn fetch<S: EventSource>(app: &App, source: &S, days: i64) -> Result<Vec<CalendarEvent>> {
    let window = EventWindow::upcoming(Utc::now(), days);
    let raws = tui::with_spinner("Fetching events", source.list_events(&window)).await?;

    Ok(CalendarEvent::from_raw_all(raws, app.tz))
}
