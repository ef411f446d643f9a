//! Configuration management for the uptime monitor

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_TARGET_URL: &str = "https://www.uol.com.br";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL probed on every iteration
    pub target_url: String,

    /// Pause between two consecutive probes
    pub poll_interval: Duration,

    /// Upper bound for a single probe
    pub probe_timeout: Duration,

    /// A run stops by itself once it has been active this long
    pub max_run_duration: Duration,

    /// Status code that classifies a probe as successful
    pub healthy_status_code: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            poll_interval: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(5),
            max_run_duration: Duration::from_secs(2 * 60 * 60),
            healthy_status_code: 200,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their default; set but unparsable or
    /// non-positive values are rejected.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(target_url) = lookup("TARGET_URL") {
            config.target_url = target_url.trim().to_string();
        }

        if let Some(interval) = lookup("POLL_INTERVAL_SECONDS") {
            config.poll_interval = parse_seconds("POLL_INTERVAL_SECONDS", &interval)?;
        }

        if let Some(timeout) = lookup("PROBE_TIMEOUT_SECONDS") {
            config.probe_timeout = parse_seconds("PROBE_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Some(max_duration) = lookup("MAX_RUN_DURATION_SECONDS") {
            config.max_run_duration = parse_seconds("MAX_RUN_DURATION_SECONDS", &max_duration)?;
        }

        if let Some(code) = lookup("HEALTHY_STATUS_CODE") {
            config.healthy_status_code = code.trim().parse().map_err(|e| {
                format!("HEALTHY_STATUS_CODE '{}' is not a status code: {}", code, e)
            })?;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.target()?;

        if self.poll_interval.is_zero() {
            return Err("poll_interval must be greater than 0".to_string());
        }

        if self.probe_timeout.is_zero() {
            return Err("probe_timeout must be greater than 0".to_string());
        }

        if self.max_run_duration.is_zero() {
            return Err("max_run_duration must be greater than 0".to_string());
        }

        if !(100..=599).contains(&self.healthy_status_code) {
            return Err(format!(
                "healthy_status_code {} is not a valid HTTP status",
                self.healthy_status_code
            ));
        }

        Ok(())
    }

    /// Parse the target into a URL, rejecting anything that is not http(s)
    pub fn target(&self) -> Result<Url, String> {
        if self.target_url.is_empty() {
            return Err("target_url cannot be empty".to_string());
        }

        let url = Url::parse(&self.target_url)
            .map_err(|e| format!("target_url '{}' is not a valid URL: {}", self.target_url, e))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "target_url scheme must be http or https, got '{}'",
                url.scheme()
            ));
        }

        if url.host_str().is_none() {
            return Err(format!("target_url '{}' has no host", self.target_url));
        }

        Ok(url)
    }
}

/// Parse a strictly positive, possibly fractional, number of seconds
fn parse_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("{} '{}' is not a number of seconds: {}", name, raw, e))?;

    if seconds <= 0.0 {
        return Err(format!("{} must be greater than 0, got {}", name, raw));
    }

    Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("{} '{}' is out of range: {}", name, raw, e))
}
