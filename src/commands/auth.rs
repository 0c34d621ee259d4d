use anyhow::{Context, Result};
use moments_core::source::AuthProvider;
use moments_provider_google::GoogleAuth;
use owo_colors::OwoColorize;

use crate::app::App;

pub async fn run(app: &mut App, force: bool) -> Result<()> {
    let remembered = if force {
        None
    } else {
        app.config.google_account.clone()
    };
    let auth = GoogleAuth::new(remembered);

    if auth.is_authenticated() {
        println!("Checking Google session...");
    } else {
        println!("Connecting to Google Calendar...\n");
    }

    // Reuses a valid session, otherwise runs the browser consent flow
    auth.sign_in().await?;

    let account = auth
        .account()
        .context("Sign-in finished without an account")?;

    if app.config.google_account.as_deref() != Some(account.as_str()) {
        app.config.google_account = Some(account.clone());
        app.config.save()?;
    }

    println!("{}", format!("Authenticated as: {}", account).green());
    Ok(())
}
