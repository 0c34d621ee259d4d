mod app;
mod commands;
mod notifier;
mod render;
mod utils;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use moments_core::constants::{DEFAULT_UPCOMING_DAYS, MAX_UPCOMING_DAYS};
use tracing_subscriber::EnvFilter;

use app::App;
use commands::appreciations::AppreciationCommand;
use commands::desires::DesireCommand;
use commands::moments::MomentCommand;
use commands::month::Shift;
use commands::priorities::PriorityCommand;
use commands::schedule::MomentArgs;
use utils::parse::parse_month;

#[derive(Parser)]
#[command(name = "moments")]
#[command(about = "Plan time together from your shared calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to Google Calendar
    Auth {
        /// Run the consent flow even if a session is saved
        #[arg(long)]
        force: bool,
    },
    /// Show a month of events (this month by default)
    Month {
        /// Any day in the month to show, e.g. "2025-03" or "2025-03-14"
        #[arg(short, long, value_parser = parse_month)]
        date: Option<NaiveDate>,

        #[arg(long, conflicts_with = "next")]
        prev: bool,

        #[arg(long)]
        next: bool,
    },
    /// Events coming up in the next few days
    Upcoming {
        /// How many days ahead to look (1-366)
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_UPCOMING_DAYS,
            value_parser = clap::value_parser!(i64).range(1..=MAX_UPCOMING_DAYS)
        )]
        days: i64,
    },
    /// Schedule a moment, prompting for anything not given
    Schedule {
        /// "today", "tomorrow" or a date like 2025-03-14
        #[arg(long)]
        day: Option<String>,

        /// Start time, e.g. "18:30"
        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long, conflicts_with = "desire")]
        title: Option<String>,

        #[arg(long, conflicts_with = "desire")]
        description: Option<String>,

        /// Use a saved desire as the template (id or id prefix)
        #[arg(long)]
        desire: Option<String>,
    },
    /// Delete an event from the calendar
    Delete {
        /// Event id; picked from upcoming events when omitted
        id: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Browse months and schedule interactively
    Browse,
    /// Things you'd like to do together
    #[command(subcommand)]
    Desires(DesireCommand),
    /// Notes of appreciation
    #[command(subcommand)]
    Appreciations(AppreciationCommand),
    /// Moments scheduled so far
    #[command(subcommand)]
    Moments(MomentCommand),
    /// Weekly priorities and wellbeing check-ins
    #[command(subcommand)]
    Priorities(PriorityCommand),
    /// Show config paths and current settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MOMENTS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut app = App::load()?;

    match cli.command {
        Commands::Auth { force } => commands::auth::run(&mut app, force).await,
        Commands::Month { date, prev, next } => {
            let shift = match (prev, next) {
                (true, _) => Shift::Previous,
                (_, true) => Shift::Next,
                _ => Shift::Current,
            };
            commands::month::run(&app, date, shift).await
        }
        Commands::Upcoming { days } => commands::upcoming::run(&app, days).await,
        Commands::Schedule {
            day,
            start,
            end,
            title,
            description,
            desire,
        } => {
            let args = MomentArgs {
                day,
                start,
                end,
                title,
                description,
                desire,
            };
            commands::schedule::run(&app, args).await
        }
        Commands::Delete { id, force } => commands::delete::run(&app, id, force).await,
        Commands::Browse => commands::browse::run(&app).await,
        Commands::Desires(command) => commands::desires::run(&app, command),
        Commands::Appreciations(command) => commands::appreciations::run(&app, command),
        Commands::Moments(command) => commands::moments::run(&app, command),
        Commands::Priorities(command) => commands::priorities::run(&app, command).await,
        Commands::Config => commands::config::run(&app),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upcoming_days_default_to_a_week() {
        let cli = Cli::try_parse_from(["moments", "upcoming"]).unwrap();
        assert!(matches!(cli.command, Commands::Upcoming { days: 7 }));
    }

    #[test]
    fn upcoming_days_out_of_range_are_rejected() {
        assert!(Cli::try_parse_from(["moments", "upcoming", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["moments", "upcoming", "--days", "367"]).is_err());
        assert!(
            Cli::try_parse_from(["moments", "upcoming", "--days", "9223372036854775807"]).is_err()
        );
        assert!(Cli::try_parse_from(["moments", "upcoming", "--days", "366"]).is_ok());
    }
}
