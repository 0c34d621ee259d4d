use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Subcommand;
use dialoguer::{Confirm, Input};
use moments_core::constants::PRIORITY_SLOTS;
use moments_core::notify::Notifier;
use moments_core::MomentsResult;
use moments_core::priorities::{
    SHARE_ERROR_MESSAGE, SHARE_FAILED_MESSAGE, WeeklyPriorities, WeeklyPriority, WellbeingUpdate,
};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::notifier::WebhookNotifier;
use crate::render::Render;
use crate::utils::tui;

const PRIORITIES_FILE: &str = "weekly-priorities.json";

#[derive(Subcommand)]
pub enum PriorityCommand {
    /// This week's priorities
    Show,
    /// Set (or clear, with no text) one ranked priority
    Set {
        /// 1, 2 or 3
        rank: u8,

        text: Option<String>,

        /// Ways your partner can help; up to three
        #[arg(short, long = "support")]
        support: Vec<String>,
    },
    /// Email this week's priorities and how you're doing to your partner
    Share {
        /// How you're feeling this week
        #[arg(short, long)]
        wellbeing: Option<String>,

        /// Send without the preview prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &App, command: PriorityCommand) -> Result<()> {
    let path = app.config.data_path().join(PRIORITIES_FILE);
    let priorities = load(&path)?;

    match command {
        PriorityCommand::Show => {
            println!("{}", "Weekly priorities".bold());
            println!("{}", priorities.render());
        }
        PriorityCommand::Set {
            rank,
            text,
            support,
        } => {
            let text = text.unwrap_or_default();
            let updated = if support.is_empty() || text.trim().is_empty() {
                priorities.with_priority(rank, &text)?
            } else {
                let entry = WeeklyPriority::new(rank, text.trim())?.with_support_points(support)?;
                priorities.with_entry(entry)?
            };

            save(&path, &updated)?;
            println!("{}", updated.render());
        }
        PriorityCommand::Share { wellbeing, yes } => {
            share(app, &path, priorities, wellbeing, yes).await?;
        }
    }

    Ok(())
}

async fn share(
    app: &App,
    path: &Path,
    mut priorities: WeeklyPriorities,
    wellbeing: Option<String>,
    yes: bool,
) -> Result<()> {
    let webhook = app.config.notify_webhook.clone().context(
        "No notify_webhook configured.\n\n\
        Add one to your config:\n  \
        notify_webhook = \"https://...\"",
    )?;

    // Fill in whatever ranks are still missing
    if !priorities.is_complete() {
        for rank in 1..=PRIORITY_SLOTS {
            if priorities.get(rank).is_none() {
                let text: String = Input::new()
                    .with_prompt(format!("  Priority {}", rank))
                    .interact_text()?;
                priorities = priorities.with_priority(rank, &text)?;
            }
        }
        save(path, &priorities)?;
    }

    let wellbeing = match wellbeing {
        Some(w) => w,
        None => Input::<String>::new()
            .with_prompt("  How are you doing?")
            .interact_text()?,
    };

    let update =
        WellbeingUpdate::compose(app.config.sender(), &priorities, &wellbeing, Utc::now(), app.tz)?;

    if !yes {
        println!("\n{}", update.subject.bold());
        println!("{}\n", update.body.dimmed());

        let to = app.config.partner_name.as_deref().unwrap_or("your partner");
        if !Confirm::new()
            .with_prompt(format!("Send to {}?", to))
            .default(true)
            .interact()?
        {
            return Ok(());
        }
    }

    let notifier = WebhookNotifier::new(webhook, app.config.partner_name.clone());
    let result = tui::with_spinner(
        "Sending",
        notifier.send_email(&update.subject, &update.body),
    )
    .await;

    share_outcome(result)?;
    println!("{}", "Shared with your partner".green());
    Ok(())
}

/// A refusal and a transport error get different messages.
fn share_outcome(result: MomentsResult<bool>) -> Result<()> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => bail!(SHARE_FAILED_MESSAGE),
        Err(e) => {
            tracing::error!(error = %e, "failed to send wellbeing email");
            bail!(SHARE_ERROR_MESSAGE)
        }
    }
}

/// The saved set, or an empty one before anything was set.
fn load(path: &Path) -> Result<WeeklyPriorities> {
    if !path.exists() {
        return Ok(WeeklyPriorities::new());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read priorities from {}", path.display()))?;
    let saved: WeeklyPriorities = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse priorities from {}", path.display()))?;

    // Re-check ranks in case the file was edited by hand
    Ok(WeeklyPriorities::from_entries(saved.entries().to_vec())?)
}

fn save(path: &Path, priorities: &WeeklyPriorities) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(priorities)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write priorities to {}", path.display()))?;

    Ok(())
}
