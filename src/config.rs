use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_VAR: &str = "OPENWEATHER_BASE_URL";
pub const TIMEOUT_VAR: &str = "WEATHER_DASH_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENWEATHER_API_KEY is not set")]
    MissingApiKey,
    #[error("OPENWEATHER_BASE_URL is not a valid url: {0}")]
    InvalidBaseUrl(String),
    #[error("WEATHER_DASH_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    /// Without trailing slash.
    pub base_url: String,
    /// Ignored by the web build.
    pub timeout: Duration,
}

impl Config {
    /// Reads the process environment, then the values baked in at build time.
    /// The web build only has the latter.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| build_time(key)))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = match lookup(BASE_URL_VAR) {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                Url::parse(&url).map_err(|_| ConfigError::InvalidBaseUrl(url.clone()))?;
                url
            }
            None => DEFAULT_BASE_URL.to_string(),
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(secs) => match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(secs)),
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_key,
            base_url,
            timeout,
        })
    }
}

fn build_time(key: &str) -> Option<String> {
    let value = match key {
        API_KEY_VAR => option_env!("OPENWEATHER_API_KEY"),
        BASE_URL_VAR => option_env!("OPENWEATHER_BASE_URL"),
        TIMEOUT_VAR => option_env!("WEATHER_DASH_TIMEOUT_SECS"),
        _ => None,
    };
    value.map(String::from)
}
