//! Interactive month browser.

use anyhow::Result;
use dialoguer::Select;
use moments_core::refresh::RefreshSignal;
use moments_core::view::MonthView;
use moments_core::window::first_of_month;

use crate::app::App;
use crate::commands::month;
use crate::commands::schedule::{self, MomentArgs};

const ACTIONS: [&str; 6] = [
    "Previous month",
    "Next month",
    "Show a day",
    "Schedule a moment",
    "Refresh",
    "Quit",
];

pub async fn run(app: &App) -> Result<()> {
    let source = app.event_source()?;
    let mut refresh = app.bus.subscribe();
    let mut view = MonthView::new(app.today(), app.week_start, app.tz);

    loop {
        if !view.is_loaded() {
            month::load(&mut view, &source).await?;
        }

        println!();
        month::print_month(app, &view);
        println!();

        let action = Select::new()
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        match action {
            0 => view.previous(),
            1 => view.next(),
            2 => {
                let day = schedule::prompt_day(app.today(), default_day(app, &view))?;
                if first_of_month(day) != view.month() {
                    view.go_to(day);
                    month::load(&mut view, &source).await?;
                }
                println!();
                month::print_day(app, &view, day);
            }
            3 => {
                let day = schedule::prompt_day(app.today(), default_day(app, &view))?;
                if first_of_month(day) != view.month() {
                    view.go_to(day);
                    month::load(&mut view, &source).await?;
                }
                if let Err(e) =
                    schedule::schedule_on_day(app, &source, &view, day, MomentArgs::default())
                        .await
                {
                    eprintln!("  {:#}", e);
                }
            }
            4 => {
                app.bus.publish(RefreshSignal::Manual);
            }
            _ => return Ok(()),
        }

        // Anything that changed the calendar asks for a re-fetch
        let mut stale = false;
        while let Some(signal) = refresh.try_recv() {
            tracing::debug!(?signal, "refresh requested");
            stale = true;
        }
        if stale {
            month::load(&mut view, &source).await?;
        }
    }
}

/// Today if it's in the shown month, else the 1st.
fn default_day(app: &App, view: &MonthView) -> chrono::NaiveDate {
    let today = app.today();
    if first_of_month(today) == view.month() {
        today
    } else {
        view.month()
    }
}
