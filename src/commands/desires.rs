use anyhow::{Result, bail};
use chrono::Utc;
use clap::Subcommand;
use dialoguer::Input;
use moments_core::records::Desire;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::Render;
use crate::utils::ids::resolve_id;

#[derive(Subcommand)]
pub enum DesireCommand {
    /// Add something you'd like to do together
    Add {
        title: Option<String>,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Defaults to the configured sender_name
        #[arg(short, long)]
        author: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        priority: i32,

        /// File under hot desires instead of calm ones
        #[arg(long)]
        hot: bool,

        #[arg(short, long)]
        category: Option<String>,
    },
    List {
        #[arg(short, long)]
        author: Option<String>,

        /// Only hot desires
        #[arg(long, conflicts_with = "calm")]
        hot: bool,

        /// Only calm desires
        #[arg(long)]
        calm: bool,

        #[arg(short, long)]
        category: Option<String>,
    },
    /// Highest-priority desires of one author
    Top {
        #[arg(short, long)]
        author: Option<String>,

        #[arg(short, long, default_value_t = 3)]
        limit: usize,
    },
    /// Change a desire's priority
    Prioritize { id: String, priority: i32 },
    Remove { id: String },
}

pub fn run(app: &App, command: DesireCommand) -> Result<()> {
    let desires = app.collection::<Desire>()?;

    match command {
        DesireCommand::Add {
            title,
            description,
            author,
            priority,
            hot,
            category,
        } => {
            let title = match title {
                Some(t) => t,
                None => Input::<String>::new().with_prompt("  Title").interact_text()?,
            };
            if title.trim().is_empty() {
                bail!("Title is required");
            }

            let id = desires.add(Desire {
                id: String::new(),
                title: title.trim().to_string(),
                description,
                date: Utc::now(),
                author: app.author(author),
                priority,
                is_hot: hot,
                category,
            })?;

            println!("{}", format!("Added desire {}", id).green());
        }
        DesireCommand::List {
            author,
            hot,
            calm,
            category,
        } => {
            let mut list = match (&author, hot, calm) {
                (Some(author), _, _) => desires.by_author(author),
                (None, true, _) => desires.by_mode(true),
                (None, _, true) => desires.by_mode(false),
                _ => desires.get_all(),
            };
            // Author selects first; mode and category narrow further
            if author.is_some() && (hot || calm) {
                list.retain(|d| d.is_hot == hot);
            }
            if let Some(category) = &category {
                let in_category: Vec<String> =
                    desires.by_category(category).into_iter().map(|d| d.id).collect();
                list.retain(|d| in_category.contains(&d.id));
            }

            print_desires(&list);
        }
        DesireCommand::Top { author, limit } => {
            let author = app.author(author);
            print_desires(&desires.top_for(&author, limit));
        }
        DesireCommand::Prioritize { id, priority } => {
            let id = resolve_id(&desires.get_all(), &id)?;
            desires.update(&id, |d| d.priority = priority)?;
            println!("{}", format!("Priority set to {}", priority).green());
        }
        DesireCommand::Remove { id } => {
            let id = resolve_id(&desires.get_all(), &id)?;
            desires.delete(&id)?;
            println!("{}", "Desire removed".green());
        }
    }

    Ok(())
}

fn print_desires(desires: &[Desire]) {
    if desires.is_empty() {
        println!("{}", "No desires yet".dimmed());
    }
    for desire in desires {
        println!("{}", desire.render());
    }
}
