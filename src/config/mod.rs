use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::services::DEFAULT_POLL_INTERVAL;
use crate::view::export::DEFAULT_EXPORT_FILENAME;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Base URL of the fixture site serving `/api/partidos`.
    pub api_url: String,
    pub poll_interval: Duration,
    pub export_filename: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let poll_interval = match lookup("FIXTURE_POLL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("FIXTURE_POLL_SECS must be a whole number of seconds, got '{}'", raw))?;
                anyhow::ensure!(secs > 0, "FIXTURE_POLL_SECS must be greater than zero");
                Duration::from_secs(secs)
            }
            None => defaults.poll_interval,
        };

        Ok(Self {
            api_url: lookup("FIXTURE_API_URL").unwrap_or(defaults.api_url),
            poll_interval,
            export_filename: lookup("FIXTURE_EXPORT_FILENAME").unwrap_or(defaults.export_filename),
        })
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }
}
