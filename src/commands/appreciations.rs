use anyhow::{Result, bail};
use chrono::Utc;
use clap::Subcommand;
use dialoguer::{Confirm, Input};
use moments_core::records::Appreciation;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::Render;
use crate::utils::ids::resolve_id;

#[derive(Subcommand)]
pub enum AppreciationCommand {
    /// Note something you appreciate about your partner
    Add {
        text: Option<String>,

        /// Defaults to the configured sender_name
        #[arg(short, long)]
        author: Option<String>,
    },
    List,
    Remove {
        id: String,
    },
    /// Remove every appreciation
    Clear {
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(app: &App, command: AppreciationCommand) -> Result<()> {
    let appreciations = app.collection::<Appreciation>()?;

    match command {
        AppreciationCommand::Add { text, author } => {
            let text = match text {
                Some(t) => t,
                None => Input::<String>::new()
                    .with_prompt("  What do you appreciate?")
                    .interact_text()?,
            };
            if text.trim().is_empty() {
                bail!("Appreciation text is required");
            }

            appreciations.add(Appreciation {
                id: String::new(),
                text: text.trim().to_string(),
                date: Utc::now(),
                author: app.author(author),
            })?;

            println!("{}", "Appreciation saved".green());
        }
        AppreciationCommand::List => {
            let mut all = appreciations.get_all();
            all.sort_by(|a, b| b.date.cmp(&a.date));

            if all.is_empty() {
                println!("{}", "No appreciations yet".dimmed());
            }
            for appreciation in &all {
                println!("{}", appreciation.render());
            }
        }
        AppreciationCommand::Remove { id } => {
            let id = resolve_id(&appreciations.get_all(), &id)?;
            appreciations.delete(&id)?;
            println!("{}", "Appreciation removed".green());
        }
        AppreciationCommand::Clear { force } => {
            let count = appreciations.get_all().len();
            if count == 0 {
                println!("{}", "Nothing to clear".dimmed());
                return Ok(());
            }

            if !force
                && !Confirm::new()
                    .with_prompt(format!("Remove all {} appreciations?", count))
                    .default(false)
                    .interact()?
            {
                return Ok(());
            }

            appreciations.clear()?;
            println!("{}", format!("Removed {} appreciations", count).green());
        }
    }

    Ok(())
}
