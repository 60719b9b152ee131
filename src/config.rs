use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,reqwest=warn,hyper_util=warn";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the product API (default: "http://localhost:3000")
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Rows per page in the product list (default: 5)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long notifications stay visible, in milliseconds (default: 3000)
    #[serde(default = "default_notify_duration_ms")]
    pub notify_duration_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_page_size() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_notify_duration_ms() -> u64 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            notify_duration_ms: default_notify_duration_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI arguments
    pub fn load(
        config_path: Option<&PathBuf>,
        cli_api_url: Option<&str>,
        cli_timeout_secs: Option<u64>,
    ) -> anyhow::Result<Self> {
        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else if let Ok(content) = std::fs::read_to_string("catalog.toml") {
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("CATALOG_API_URL") {
            config.api_url = url;
        }
        if let Ok(size) = std::env::var("CATALOG_PAGE_SIZE") {
            if let Ok(s) = size.parse() {
                config.page_size = s;
            }
        }
        if let Ok(timeout) = std::env::var("CATALOG_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                config.timeout_secs = t;
            }
        }
        if let Ok(ms) = std::env::var("CATALOG_NOTIFY_MS") {
            if let Ok(m) = ms.parse() {
                config.notify_duration_ms = m;
            }
        }

        if let Some(url) = cli_api_url {
            config.api_url = url.to_string();
        }
        if let Some(timeout) = cli_timeout_secs {
            config.timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.trim().is_empty() {
            anyhow::bail!("api_url must not be empty");
        }
        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than 0");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
