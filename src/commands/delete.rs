use anyhow::Result;
use dialoguer::{Confirm, Select};
use moments_core::refresh::RefreshSignal;
use moments_core::source::EventSource;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::commands::upcoming;
use crate::render;
use crate::utils::tui;

/// How far ahead to look when picking an event to delete.
const PICK_DAYS: i64 = 31;

pub async fn run(app: &App, event_id: Option<String>, force: bool) -> Result<()> {
    let source = app.event_source()?;

    let (event_id, label) = match event_id {
        Some(id) => (id.clone(), id),
        None => {
            let events = upcoming::fetch(app, &source, PICK_DAYS).await?;
            if events.is_empty() {
                println!("{}", "No upcoming events to delete".dimmed());
                return Ok(());
            }

            let items: Vec<String> = events
                .iter()
                .map(|e| {
                    let day = e.start.with_timezone(&app.tz).date_naive();
                    format!("{} {}", render::day_label(day, app.today()), render::render_event(e, app.tz))
                })
                .collect();

            let selection = Select::new()
                .with_prompt("Delete which event?")
                .items(&items)
                .default(0)
                .interact()?;

            let event = &events[selection];
            (event.id.clone(), event.to_string())
        }
    };

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete \"{}\"?", label))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    tui::with_spinner("Deleting", source.delete_event(&event_id)).await?;

    tracing::info!(%event_id, "event deleted");
    app.bus.publish(RefreshSignal::EventDeleted { event_id });

    println!("{}", format!("Deleted: {}", label).green());
    Ok(())
}
