use std::time::Duration;

use anyhow::{Context, Result};

/// Default re-fetch interval while a job is pending or processing.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Tracker configuration loaded from environment variables.
/// Fails at startup if the backend URL is missing or a number does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: require_env("TRACKER_API_URL")?,
            poll_interval: Duration::from_millis(parse_env_or(
                "POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )?),
            http_timeout: Duration::from_secs(parse_env_or(
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, interval_ms: Option<u64>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(ms) = interval_ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        self
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            api_url: "http://localhost:8000".to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    #[test]
    fn test_overrides_replace_url_and_interval() {
        let config = base().with_overrides(Some("http://backend:9000".to_string()), Some(250));
        assert_eq!(config.api_url, "http://backend:9000");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_no_overrides_keeps_environment_values() {
        let config = base().with_overrides(None, None);
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
    }

    #[test]
    fn test_parse_env_or_falls_back_when_unset() {
        let value = parse_env_or("TRACKER_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
