use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConsoleError, Result};
use crate::table::PAGE_SIZE_OPTIONS;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: usize = crate::table::DEFAULT_PAGE_SIZE;

pub mod env_keys {
    pub const API_BASE_URL: &str = "CLAIMS_API_BASE_URL";
    pub const API_TIMEOUT_SECS: &str = "CLAIMS_API_TIMEOUT_SECS";
    pub const SESSION_FILE: &str = "CLAIMS_SESSION_FILE";
    pub const PAGE_SIZE: &str = "CLAIMS_PAGE_SIZE";
}

/// Runtime settings for the console, usually read from the environment
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    pub session_file: PathBuf,
    pub page_size: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: default_session_file(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(env_keys::API_BASE_URL) {
            config.api_base_url = normalize_base_url(&url)?;
        }

        if let Some(raw) = lookup(env_keys::API_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ConsoleError::Config(format!(
                    "{} must be a whole number of seconds, got {raw:?}",
                    env_keys::API_TIMEOUT_SECS
                ))
            })?;
            if secs == 0 {
                return Err(ConsoleError::Config(format!(
                    "{} must be greater than zero",
                    env_keys::API_TIMEOUT_SECS
                )));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(path) = lookup(env_keys::SESSION_FILE) {
            config.session_file = PathBuf::from(path);
        }

        if let Some(raw) = lookup(env_keys::PAGE_SIZE) {
            config.page_size = parse_page_size(&raw)?;
        }

        debug!(
            api_base_url = %config.api_base_url,
            timeout_secs = config.timeout.as_secs(),
            session_file = %config.session_file.display(),
            page_size = config.page_size,
            "Loaded console configuration"
        );

        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: &str) -> Result<Self> {
        self.api_base_url = normalize_base_url(url)?;
        Ok(self)
    }
}

fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConsoleError::Config(format!(
            "API base URL must start with http:// or https://, got {url:?}"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn parse_page_size(raw: &str) -> Result<usize> {
    let size = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| ConsoleError::Config(format!("page size must be a number, got {raw:?}")))?;
    if !PAGE_SIZE_OPTIONS.contains(&size) {
        return Err(ConsoleError::Config(format!(
            "page size must be one of {PAGE_SIZE_OPTIONS:?}, got {size}"
        )));
    }
    Ok(size)
}

fn default_session_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claims-console")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ConsoleConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 10);
        assert!(config.session_file.ends_with(".claims-console/session.json"));
    }

    #[test]
    fn overrides_are_read_and_trailing_slash_removed() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            (env_keys::API_BASE_URL, "https://claims.example.com/api/"),
            (env_keys::API_TIMEOUT_SECS, "5"),
            (env_keys::PAGE_SIZE, "50"),
            (env_keys::SESSION_FILE, "/tmp/s.json"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://claims.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ConsoleConfig::from_lookup(lookup(&[(env_keys::API_BASE_URL, "localhost:8000")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[(env_keys::API_TIMEOUT_SECS, "0")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[(env_keys::PAGE_SIZE, "7")])).is_err());
    }
}
