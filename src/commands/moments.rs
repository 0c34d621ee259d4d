use anyhow::Result;
use clap::Subcommand;
use moments_core::records::ScheduledMoment;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::Render;
use crate::utils::ids::resolve_id;

#[derive(Subcommand)]
pub enum MomentCommand {
    /// Moments scheduled so far, newest first
    List {
        /// Only moments planned from a desire
        #[arg(long)]
        from_desires: bool,
    },
    /// Forget a scheduled moment (the calendar event stays)
    Remove { id: String },
}

pub fn run(app: &App, command: MomentCommand) -> Result<()> {
    let moments = app.collection::<ScheduledMoment>()?;

    match command {
        MomentCommand::List { from_desires } => {
            let mut all = moments.get_all();
            if from_desires {
                all.retain(|m| m.desire_id.is_some());
            }
            all.sort_by(|a, b| b.date.cmp(&a.date));

            if all.is_empty() {
                println!("{}", "No moments scheduled yet".dimmed());
            }
            for moment in &all {
                println!("{}", moment.render());
            }
        }
        MomentCommand::Remove { id } => {
            let id = resolve_id(&moments.get_all(), &id)?;
            moments.delete(&id)?;
            println!("{}", "Moment removed".green());
        }
    }

    Ok(())
}
