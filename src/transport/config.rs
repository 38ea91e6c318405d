use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3500";

/// Settings for [`HttpTransport`](super::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin serving the `/todos` resource, without a trailing slash
    pub base_url: String,

    /// Whole-request timeout
    pub timeout: Duration,

    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
        }
    }

    /// Set the whole-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Reads `TODO_API_BASE_URL`, `TODO_API_TIMEOUT_MS` and
    /// `TODO_API_CONNECT_TIMEOUT_MS`, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("TODO_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url);

        if let Ok(raw) = env::var("TODO_API_TIMEOUT_MS") {
            let millis = raw
                .parse::<u64>()
                .context("TODO_API_TIMEOUT_MS must be a valid u64")?;
            config = config.timeout(Duration::from_millis(millis));
        }

        if let Ok(raw) = env::var("TODO_API_CONNECT_TIMEOUT_MS") {
            let millis = raw
                .parse::<u64>()
                .context("TODO_API_CONNECT_TIMEOUT_MS must be a valid u64")?;
            config = config.connect_timeout(Duration::from_millis(millis));
        }

        Ok(config)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
