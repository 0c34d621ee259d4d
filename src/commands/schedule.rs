use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveTime};
use dialoguer::{Confirm, Input, Select};
use moments_core::error::MomentsError;
use moments_core::event::CalendarEvent;
use moments_core::records::{Desire, ScheduledMoment};
use moments_core::scheduler::{FormState, MomentMode, ScheduleForm, Scheduler};
use moments_core::source::EventSource;
use moments_core::view::MonthView;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::commands::month;
use crate::render::{self, Render};
use crate::utils::ids::resolve_id;
use crate::utils::parse::{parse_day, parse_time};
use crate::utils::tui;

/// Values given on the command line; anything missing is prompted for.
#[derive(Debug, Default)]
pub struct MomentArgs {
    pub day: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub desire: Option<String>,
}

impl MomentArgs {
    fn is_interactive(&self) -> bool {
        self.title.is_none() && self.desire.is_none()
    }
}

pub async fn run(app: &App, args: MomentArgs) -> Result<()> {
    let source = app.event_source()?;

    let day = match &args.day {
        Some(input) => parse_day(input, app.today())?,
        None => prompt_day(app.today(), app.today())?,
    };

    let mut view = MonthView::new(day, app.week_start, app.tz);
    month::load(&mut view, &source).await?;

    schedule_on_day(app, &source, &view, day, args).await?;
    Ok(())
}

/// Fill in and submit the form for `day`, checking against the events
/// `view` has loaded for it.
pub async fn schedule_on_day<S: EventSource>(
    app: &App,
    source: &S,
    view: &MonthView,
    day: NaiveDate,
    args: MomentArgs,
) -> Result<Option<CalendarEvent>> {
    let interactive = args.is_interactive();
    let desires = app.collection::<Desire>()?.get_all();

    let mut scheduler = Scheduler::new(app.tz, app.bus.clone());
    scheduler.select_day(day);

    match &args.desire {
        Some(prefix) => use_desire_prefix(&mut scheduler, prefix, &desires)?,
        None if interactive => choose_template(&mut scheduler, &desires)?,
        None => {}
    }

    if scheduler.form().mode == MomentMode::Custom {
        let title = match args.title {
            Some(title) => title,
            None => Input::<String>::new().with_prompt("  Title").interact_text()?,
        };
        scheduler.set_title(&title)?;

        let description = match args.description {
            Some(description) => description,
            None if interactive => Input::<String>::new()
                .with_prompt("  Description (skip)")
                .default(String::new())
                .show_default(false)
                .interact_text()?,
            None => String::new(),
        };
        scheduler.set_description(&description)?;
    }

    let day_events = view.events_overlapping(day);
    if interactive {
        println!();
        month::print_day(app, view, day);
        println!();
    }

    let (mut start, mut end) = match (&args.start, &args.end) {
        (Some(start), Some(end)) => (parse_time(start)?, parse_time(end)?),
        _ if interactive => prompt_times()?,
        (start, end) => (
            start.as_deref().map(parse_time).transpose()?.unwrap_or_else(ScheduleForm::default_start),
            end.as_deref().map(parse_time).transpose()?.unwrap_or_else(ScheduleForm::default_end),
        ),
    };

    loop {
        scheduler.set_times(start, end);

        let outcome = tui::with_spinner("Scheduling", scheduler.submit(source, &day_events))
            .await
            .map(|state| state.clone());

        match outcome {
            Ok(FormState::Success { event, desire_id }) => {
                record_moment(app, &event, desire_id)?;
                println!(
                    "{}",
                    format!("  Scheduled: {} ({})", event, event.render_time_range(app.tz)).green()
                );
                return Ok(Some(event));
            }
            Ok(FormState::ConflictRejected { conflicts }) => {
                eprintln!("{}", "  That time overlaps with:".red());
                for conflict in &conflicts {
                    eprintln!("{}", render::render_event(conflict, app.tz));
                }

                if !interactive {
                    bail!(
                        "Moment conflicts with {} existing event(s)",
                        conflicts.len()
                    );
                }
                if !Confirm::new()
                    .with_prompt("  Pick another time?")
                    .default(true)
                    .interact()?
                {
                    return Ok(None);
                }
                (start, end) = prompt_times()?;
            }
            Ok(FormState::Failed { message }) => bail!("{}", message),
            Ok(other) => bail!("Scheduling stopped in an unexpected state: {:?}", other),
            Err(e @ (MomentsError::Validation(_) | MomentsError::InvalidInterval))
                if interactive =>
            {
                eprintln!("  {}", e.to_string().red());
                (start, end) = prompt_times()?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn record_moment(app: &App, event: &CalendarEvent, desire_id: Option<String>) -> Result<()> {
    let moments = app.collection::<ScheduledMoment>()?;
    moments.add(ScheduledMoment {
        id: String::new(),
        title: event.title.clone(),
        description: event.description.clone(),
        date: event.start,
        desire_id,
    })?;
    Ok(())
}

/// Template from a desire id as shown in `desires list`, or any unique prefix.
fn use_desire_prefix(scheduler: &mut Scheduler, prefix: &str, desires: &[Desire]) -> Result<()> {
    let id = resolve_id(desires, prefix)?;
    scheduler.use_desire_id(&id, desires)?;
    Ok(())
}

fn choose_template(scheduler: &mut Scheduler, desires: &[Desire]) -> Result<()> {
    if desires.is_empty() {
        return Ok(());
    }

    let mut items = vec!["Custom moment".to_string()];
    items.extend(desires.iter().map(|d| d.render()));

    let selection = Select::new()
        .with_prompt("  What would you like to do?")
        .items(&items)
        .default(0)
        .interact()?;

    match selection.checked_sub(1).and_then(|i| desires.get(i)) {
        Some(desire) => {
            scheduler.use_desire(desire);
            println!("  {}", format!("Using \"{}\"", desire.title).dimmed());
        }
        None => scheduler.use_custom(),
    }

    Ok(())
}

pub fn prompt_day(today: NaiveDate, default: NaiveDate) -> Result<NaiveDate> {
    loop {
        let input: String = Input::new()
            .with_prompt("  Which day?")
            .default(default.format("%Y-%m-%d").to_string())
            .interact_text()?;
        match parse_day(&input, today) {
            Ok(day) => return Ok(day),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

fn prompt_time(prompt: &str, default: NaiveTime) -> Result<NaiveTime> {
    loop {
        let input: String = Input::new()
            .with_prompt(prompt)
            .default(default.format("%H:%M").to_string())
            .interact_text()?;
        match parse_time(&input) {
            Ok(time) => return Ok(time),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

fn prompt_times() -> Result<(NaiveTime, NaiveTime)> {
    let start = prompt_time("  Start", ScheduleForm::default_start())?;
    let end = prompt_time("  End", ScheduleForm::default_end())?;
    Ok((start, end))
}
