use anyhow::Result;
use chrono::NaiveDate;
use moments_core::source::EventSource;
use moments_core::view::MonthView;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render;
use crate::utils::tui;

/// Which month to show, relative to `date`.
pub enum Shift {
    Previous,
    Current,
    Next,
}

pub async fn run(app: &App, date: Option<NaiveDate>, shift: Shift) -> Result<()> {
    let source = app.event_source()?;

    let mut view = MonthView::new(date.unwrap_or_else(|| app.today()), app.week_start, app.tz);
    match shift {
        Shift::Previous => view.previous(),
        Shift::Current => {}
        Shift::Next => view.next(),
    }

    load(&mut view, &source).await?;
    print_month(app, &view);

    Ok(())
}

/// Fetch the view's month behind a spinner.
pub async fn load<S: EventSource>(view: &mut MonthView, source: &S) -> Result<()> {
    let label = view.month().format("%B %Y").to_string();
    tui::with_spinner(&label, view.refresh(source)).await?;
    Ok(())
}

pub fn print_month(app: &App, view: &MonthView) {
    let grid = view.grid();
    let today = app.today();

    println!("{}\n", render::render_month(&grid, today));
    println!("{}", render::render_event_list(&grid, today, app.tz));
}

pub fn print_day(app: &App, view: &MonthView, day: NaiveDate) {
    println!("{}", render::day_label(day, app.today()).bold());

    let events = view.events_on(day);
    if events.is_empty() {
        println!("  {}", "Nothing planned".dimmed());
    }
    for event in &events {
        println!("{}", render::render_event(event, app.tz));
    }
}
