//! Settings and handles shared by every command.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use moments_core::config::MomentsConfig;
use moments_core::refresh::RefreshBus;
use moments_core::source::AuthProvider;
use moments_core::store::{Collection, Record};
use moments_provider_google::{GoogleAuth, GoogleEventSource};

pub struct App {
    pub config: MomentsConfig,
    pub tz: Tz,
    pub week_start: Weekday,
    pub bus: RefreshBus,
}

impl App {
    pub fn load() -> Result<Self> {
        let config = MomentsConfig::load()?;
        let tz = config.viewer_tz()?;
        let week_start = config.week_start()?;

        tracing::debug!(zone = %tz.name(), ?week_start, "settings loaded");

        Ok(App {
            config,
            tz,
            week_start,
            bus: RefreshBus::new(),
        })
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// The signed-in calendar. Fails with a hint when nobody has signed in.
    pub fn event_source(&self) -> Result<GoogleEventSource> {
        let auth = GoogleAuth::new(self.config.google_account.clone());

        let account = match auth.account() {
            Some(account) if auth.is_authenticated() => account,
            _ => anyhow::bail!(
                "Not signed in to Google Calendar.\n\n\
                Sign in with:\n  \
                moments auth"
            ),
        };

        Ok(GoogleEventSource::new(account, self.config.calendar_id.clone()))
    }

    pub fn collection<T: Record>(&self) -> Result<Collection<T>> {
        let data_path = self.config.data_path();
        Collection::open(&data_path)
            .with_context(|| format!("Failed to open {} in {}", T::COLLECTION, data_path.display()))
    }

    /// Author for new records: the explicit one, else the configured sender.
    pub fn author(&self, explicit: Option<String>) -> String {
        explicit.unwrap_or_else(|| self.config.sender().to_string())
    }
}
