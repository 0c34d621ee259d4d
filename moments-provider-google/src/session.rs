//! Creates a valid Google session (access token) that we can use to call the gcal API

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app_config::{AppConfig, base_dir};

pub struct Session {
    account_email: String,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData::from_tokens(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            tokens.expires_in,
        )
    }
}

impl SessionData {
    pub fn from_tokens(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        let expires_at = Utc::now() + Duration::seconds(expires_in);

        SessionData {
            access_token,
            refresh_token,
            expires_at,
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl Session {
    /// ~/.config/moments/providers/google/session/<account>.toml
    pub fn path_for_account_email(account_email: &str) -> Result<PathBuf> {
        Ok(session_path_in(&base_dir()?, account_email))
    }

    fn path(&self) -> Result<PathBuf> {
        Self::path_for_account_email(&self.account_email)
    }

    pub fn new(account_email: &str, session_data: SessionData) -> Self {
        Session {
            account_email: account_email.to_string(),
            data: session_data,
        }
    }

    pub fn account_email(&self) -> &str {
        &self.account_email
    }

    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    pub fn client(&self) -> Result<Client> {
        let app_config = AppConfig::load()?;

        Ok(Client::new(
            app_config.client_id,
            app_config.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    /// Whether a session file exists for the account.
    pub fn exists(account_email: &str) -> bool {
        Self::path_for_account_email(account_email)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    // Load a session and refresh it if expired:
    pub async fn load_valid(account_email: &str) -> Result<Self> {
        let mut session = Self::load(account_email)?;

        if session.data.is_expired() {
            tracing::debug!(account = %account_email, "access token expired, refreshing");
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load(account_email: &str) -> Result<Self> {
        let path = Self::path_for_account_email(account_email)?;

        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session for {} not found!\nRun `moments auth` first.",
                account_email
            );
        }

        let session_data = read_session_data(&path)?;

        Ok(Session {
            account_email: account_email.to_string(),
            data: session_data,
        })
    }

    pub fn save(&self) -> Result<()> {
        write_session_data(&self.path()?, &self.data)
    }

    async fn refresh(&mut self) -> Result<()> {
        let client = self.client()?;

        let mut tokens = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()?;

        Ok(())
    }
}

fn session_path_in(base: &Path, account_email: &str) -> PathBuf {
    let email_slug = account_email.replace(['/', '\\', ':'], "_");

    base.join("session").join(format!("{}.toml", email_slug))
}

fn read_session_data(path: &Path) -> Result<SessionData> {
    let contents = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read Google OAuth session from {}",
            path.display()
        )
    })?;

    toml::from_str(&contents).with_context(|| {
        format!(
            "Failed to parse Google OAuth session from {}",
            path.display()
        )
    })
}

fn write_session_data(path: &Path, data: &SessionData) -> Result<()> {
    let contents = toml::to_string_pretty(data).context("Failed to serialize session")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write session to {}", path.display()))?;

    // Owner-only, the file holds OAuth tokens
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}
