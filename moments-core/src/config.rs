//! Global moments configuration.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use chrono_tz::Tz;
use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CALENDAR_ID;
use crate::error::{MomentsError, MomentsResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/moments";
static DEFAULT_WEEK_START: &str = "sunday";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_week_start() -> String {
    DEFAULT_WEEK_START.to_string()
}

/// Configuration at ~/.config/moments/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MomentsConfig {
    /// Where desires, appreciations and scheduled moments are stored
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_account: Option<String>,

    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// IANA zone name; the system zone when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    #[serde(default = "default_week_start")]
    pub week_start: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_webhook: Option<String>,
}

impl Default for MomentsConfig {
    fn default() -> Self {
        MomentsConfig {
            data_dir: default_data_dir(),
            google_account: None,
            calendar_id: default_calendar_id(),
            time_zone: None,
            week_start: default_week_start(),
            sender_name: None,
            partner_name: None,
            notify_webhook: None,
        }
    }
}

impl MomentsConfig {
    /// ~/.config/moments
    pub fn config_dir() -> MomentsResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| MomentsError::Config("Could not determine config directory".into()))?
            .join("moments"))
    }

    pub fn config_path() -> MomentsResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file, writing a commented default on first run.
    pub fn load() -> MomentsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> MomentsResult<Self> {
        let config: MomentsConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| MomentsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| MomentsError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn save(&self) -> MomentsResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> MomentsResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| MomentsError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| MomentsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> MomentsResult<()> {
        let contents = format!(
            "\
# moments configuration

# Where desires, appreciations and scheduled moments are stored:
# data_dir = \"{}\"

# Google account to use (set by `moments auth`):
# google_account = \"you@gmail.com\"

# Calendar to read and write:
# calendar_id = \"{}\"

# Time zone for the month grid and new moments (defaults to the system zone):
# time_zone = \"Europe/London\"

# First column of the month grid:
# week_start = \"{}\"

# Names used in the weekly wellbeing email:
# sender_name = \"Sam\"
# partner_name = \"Alex\"

# Webhook that delivers the weekly wellbeing email:
# notify_webhook = \"https://example.com/hooks/moments\"
",
            DEFAULT_DATA_DIR, DEFAULT_CALENDAR_ID, DEFAULT_WEEK_START
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MomentsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| MomentsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The zone all day comparisons and new moments use.
    pub fn viewer_tz(&self) -> MomentsResult<Tz> {
        if let Some(name) = &self.time_zone {
            return name
                .parse::<Tz>()
                .map_err(|_| MomentsError::Config(format!("Unknown time zone: {}", name)));
        }

        match iana_time_zone::get_timezone() {
            Ok(name) => Ok(name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(zone = %name, "system time zone not recognised, using UTC");
                Tz::UTC
            })),
            Err(e) => {
                tracing::warn!(error = %e, "could not determine system time zone, using UTC");
                Ok(Tz::UTC)
            }
        }
    }

    pub fn week_start(&self) -> MomentsResult<Weekday> {
        self.week_start
            .parse::<Weekday>()
            .map_err(|_| MomentsError::Config(format!("Invalid week_start: {}", self.week_start)))
    }

    /// Name used when sending the wellbeing email.
    pub fn sender(&self) -> &str {
        self.sender_name.as_deref().unwrap_or("Me")
    }
}
