//! Bot configuration loaded from `review-watch.toml` plus the environment.
//!
//! [`BotConfig`] is built once in `main` and passed down by reference. Every
//! non-secret field has a default, so the file is optional. The three
//! credentials come from `PRACTICUM_TOKEN`, `TELEGRAM_TOKEN` and
//! `TELEGRAM_CHAT_ID`, which take precedence over the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::verdict::Verdicts;

pub const DEFAULT_CONFIG_PATH: &str = "review-watch.toml";

const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Clone, Deserialize)]
pub struct BotConfig {
    /// OAuth token for the homework status API.
    #[serde(default)]
    pub practicum_token: String,

    /// Telegram bot token.
    #[serde(default)]
    pub telegram_token: String,

    /// Chat that receives the notifications.
    #[serde(default)]
    pub telegram_chat_id: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Pause between two polls, in seconds.
    #[serde(default = "default_retry_period_secs")]
    pub retry_period_secs: u64,

    /// Upper bound for a single HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional file that receives a copy of the log output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub verdicts: Verdicts,
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            practicum_token: String::new(),
            telegram_token: String::new(),
            telegram_chat_id: String::new(),
            endpoint: default_endpoint(),
            telegram_api_url: default_telegram_api_url(),
            retry_period_secs: default_retry_period_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            log_file: None,
            verdicts: Verdicts::default(),
        }
    }
}

// Tokens never reach the logs.
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period_secs", &self.retry_period_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl BotConfig {
    /// Loads the config file at `path` (if it exists) and applies the
    /// process environment on top.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            Some(text)
        } else {
            None
        };
        Self::from_sources(contents.as_deref(), |name| std::env::var(name).ok())
    }

    /// Builds a config from optional TOML text and an environment lookup.
    pub fn from_sources(
        toml_text: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match toml_text {
            Some(text) => {
                toml::from_str::<BotConfig>(text).map_err(|e| ConfigError::Toml(e.to_string()))?
            }
            None => Self::default(),
        };

        for (name, slot) in [
            (PRACTICUM_TOKEN, &mut config.practicum_token),
            (TELEGRAM_TOKEN, &mut config.telegram_token),
            (TELEGRAM_CHAT_ID, &mut config.telegram_chat_id),
        ] {
            if let Some(value) = env(name)
                && !value.is_empty()
            {
                *slot = value;
            }
        }

        Ok(config)
    }

    /// Fails with every missing credential, always in the same order, then
    /// rejects zero intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<&'static str> = [
            (PRACTICUM_TOKEN, &self.practicum_token),
            (TELEGRAM_TOKEN, &self.telegram_token),
            (TELEGRAM_CHAT_ID, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        if self.retry_period_secs == 0 {
            return Err(ConfigError::ZeroDuration("retry_period_secs"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("request_timeout_secs"));
        }
        Ok(())
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
