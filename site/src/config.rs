//! Configuration management for the Attendeez site.
//!
//! Loads configuration from environment variables with sensible defaults.

use chrono::{FixedOffset, Local, Offset};
use reqwest::Url;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A URL setting could not be parsed or is not http(s)
    #[error("{key} is not a valid http(s) URL: {value}")]
    InvalidUrl {
        /// Environment variable name
        key: &'static str,
        /// Offending value
        value: String,
    },

    /// `ATTENDEEZ_UTC_OFFSET` is not of the form `+HH:MM`
    #[error("ATTENDEEZ_UTC_OFFSET must look like +02:00 or -05:30, got {0}")]
    InvalidOffset(String),

    /// The request timeout is zero
    #[error("ATTENDEEZ_REQUEST_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

/// Site configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Presentation configuration
    pub site: SiteConfig,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Serve the seeded in-memory catalogue instead of calling the backend
    pub demo: bool,
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST API
    pub base_url: String,
    /// Upper bound for every request
    pub request_timeout: Duration,
}

/// Presentation configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base of the links copied by the share action
    pub public_url: String,
    /// Offset used to read the backend's wall-clock timestamps
    pub utc_offset: FixedOffset,
    /// Delay before an attendee search is sent; zero sends immediately
    pub search_debounce: Duration,
}

const DEFAULT_API_URL: &str = "http://localhost:5000";

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOffset`] if `ATTENDEEZ_UTC_OFFSET` is
    /// set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOffset`] if `ATTENDEEZ_UTC_OFFSET` is
    /// set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("ATTENDEEZ_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let utc_offset = match lookup("ATTENDEEZ_UTC_OFFSET") {
            Some(raw) => parse_offset(&raw)?,
            None => Local::now().offset().fix(),
        };

        Ok(Self {
            api: ApiConfig {
                request_timeout: Duration::from_secs(
                    lookup("ATTENDEEZ_REQUEST_TIMEOUT_SECS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(10),
                ),
                base_url: base_url.clone(),
            },
            site: SiteConfig {
                public_url: lookup("ATTENDEEZ_PUBLIC_URL").unwrap_or(base_url),
                utc_offset,
                search_debounce: Duration::from_millis(
                    lookup("ATTENDEEZ_SEARCH_DEBOUNCE_MS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0),
                ),
            },
            log_level: lookup("ATTENDEEZ_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            demo: lookup("ATTENDEEZ_DEMO")
                .is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes")),
        })
    }

    /// Check the loaded values.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("ATTENDEEZ_API_URL", &self.api.base_url)?;
        check_url("ATTENDEEZ_PUBLIC_URL", &self.site.public_url)?;

        if self.api.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}

fn check_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        }),
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `Z` or `UTC`.
fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset(raw.to_string());
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("ATTENDEEZ_UTC_OFFSET", "Z")]).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.site.public_url, "http://localhost:5000");
        assert_eq!(config.api.request_timeout, Duration::from_secs(10));
        assert_eq!(config.site.search_debounce, Duration::ZERO);
        assert_eq!(config.log_level, "info");
        assert!(!config.demo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("ATTENDEEZ_API_URL", "https://api.example.com"),
            ("ATTENDEEZ_PUBLIC_URL", "https://events.example.com"),
            ("ATTENDEEZ_REQUEST_TIMEOUT_SECS", "3"),
            ("ATTENDEEZ_SEARCH_DEBOUNCE_MS", "250"),
            ("ATTENDEEZ_UTC_OFFSET", "-05:30"),
            ("ATTENDEEZ_DEMO", "true"),
        ])
        .unwrap();

        assert_eq!(config.site.public_url, "https://events.example.com");
        assert_eq!(config.api.request_timeout, Duration::from_secs(3));
        assert_eq!(config.site.search_debounce, Duration::from_millis(250));
        assert_eq!(config.site.utc_offset.local_minus_utc(), -(5 * 3600 + 30 * 60));
        assert!(config.demo);
    }

    #[test]
    fn malformed_offset_is_rejected() {
        assert!(matches!(
            load(&[("ATTENDEEZ_UTC_OFFSET", "two hours")]),
            Err(ConfigError::InvalidOffset(_))
        ));
        assert!(load(&[("ATTENDEEZ_UTC_OFFSET", "+02:75")]).is_err());
    }

    #[test]
    fn validate_rejects_bad_urls_and_zero_timeout() {
        let config = load(&[
            ("ATTENDEEZ_UTC_OFFSET", "+00:00"),
            ("ATTENDEEZ_API_URL", "localhost:5000/api"),
        ])
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { key: "ATTENDEEZ_API_URL", .. })
        ));

        let config = load(&[
            ("ATTENDEEZ_UTC_OFFSET", "+00:00"),
            ("ATTENDEEZ_REQUEST_TIMEOUT_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
