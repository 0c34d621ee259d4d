use anyhow::Result;
use moments_core::config::MomentsConfig;
use moments_provider_google::app_config;
use owo_colors::OwoColorize;

use crate::app::App;

pub fn run(app: &App) -> Result<()> {
    let config_path = MomentsConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Data:       {}", app.config.data_path().display());
    println!("  Google:     {}", app_config::base_dir()?.display());

    println!("\n{}", "Settings".bold());
    println!(
        "  Account:    {}",
        app.config.google_account.as_deref().unwrap_or("(not signed in)")
    );
    println!("  Calendar:   {}", app.config.calendar_id);
    println!("  Time zone:  {}", app.tz.name());
    println!("  Week start: {:?}", app.week_start);
    println!(
        "  Notify:     {}",
        app.config.notify_webhook.as_deref().unwrap_or("(no webhook)")
    );

    Ok(())
}
