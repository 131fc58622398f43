use crate::engine::EngineMode;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sumi-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of targets crawled at the same time
    pub concurrency: u32,

    /// Which engine variant drives the crawl
    pub mode: EngineMode,

    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// Browser executable for the headless engine
    #[serde(rename = "browser-path")]
    pub browser_path: Option<PathBuf>,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            mode: EngineMode::Standard,
            timeout: 10,
            browser_path: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Custom field selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    /// Field config file; the per-user default is bootstrapped when unset
    #[serde(rename = "config-path")]
    pub config_path: Option<String>,

    /// Delimiter-separated names of the fields to activate
    pub selected: String,
}

impl FieldsConfig {
    /// Returns the configured path with a leading `~` expanded
    pub fn expanded_config_path(&self) -> Option<PathBuf> {
        self.config_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            selected: "email".to_string(),
        }
    }
}
