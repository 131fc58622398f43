//! Crawling engines
//!
//! The orchestrator only depends on the [`Engine`] capability: crawl one
//! target, and be closed once the run is over. Two variants ship with the
//! crate:
//! - [`StandardEngine`] fetches pages over HTTP
//! - [`HeadlessEngine`] renders pages in a headless browser
//!
//! Both hand the fetched document to [`analyze_page`], which captures the
//! active custom fields.

mod headless;
mod page;
mod standard;

pub use headless::HeadlessEngine;
pub use page::{analyze_page, parse_html, PageReport, ParsedPage};
pub use standard::{build_http_client, StandardEngine};

use crate::config::Config;
use crate::fields::FieldRegistry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by an engine while being built or while crawling
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid crawl target: {0}")]
    InvalidTarget(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("timed out crawling {url}")]
    Timeout { url: String },

    #[error("engine is closed")]
    Closed,
}

/// Which engine variant drives a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    #[default]
    Standard,
    Headless,
}

impl EngineMode {
    /// Maps a `--headless` style switch onto a mode
    pub fn from_headless(headless: bool) -> Self {
        if headless {
            EngineMode::Headless
        } else {
            EngineMode::Standard
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineMode::Standard => write!(f, "standard"),
            EngineMode::Headless => write!(f, "headless"),
        }
    }
}

/// Something that can crawl one target at a time, from many tasks at once
#[async_trait]
pub trait Engine: Send + Sync {
    /// Crawls a single target
    async fn crawl(&self, target: &str) -> Result<(), EngineError>;

    /// Releases the engine's resources; called once, after every crawl
    async fn close(&self);

    fn name(&self) -> &'static str;
}

/// Builds engine variants on demand
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn standard(&self) -> Result<Arc<dyn Engine>, EngineError>;

    async fn headless(&self) -> Result<Arc<dyn Engine>, EngineError>;
}

/// Builds the engine for `mode`
pub async fn build_engine(
    factory: &dyn EngineFactory,
    mode: EngineMode,
) -> Result<Arc<dyn Engine>, EngineError> {
    match mode {
        EngineMode::Standard => factory.standard().await,
        EngineMode::Headless => factory.headless().await,
    }
}

/// Settings shared by the shipped engines
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub browser_path: Option<PathBuf>,
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.header_value(),
            timeout: config.crawler.timeout(),
            browser_path: config.crawler.browser_path.clone(),
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Factory for [`StandardEngine`] and [`HeadlessEngine`]
pub struct DefaultEngineFactory {
    options: EngineOptions,
    registry: Arc<FieldRegistry>,
}

impl DefaultEngineFactory {
    pub fn new(options: EngineOptions, registry: Arc<FieldRegistry>) -> Self {
        Self { options, registry }
    }
}

#[async_trait]
impl EngineFactory for DefaultEngineFactory {
    async fn standard(&self) -> Result<Arc<dyn Engine>, EngineError> {
        let engine = StandardEngine::new(&self.options, self.registry.clone())?;
        Ok(Arc::new(engine))
    }

    async fn headless(&self) -> Result<Arc<dyn Engine>, EngineError> {
        let engine = HeadlessEngine::launch(&self.options, self.registry.clone()).await?;
        Ok(Arc::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_headless_flag() {
        assert_eq!(EngineMode::from_headless(true), EngineMode::Headless);
        assert_eq!(EngineMode::from_headless(false), EngineMode::Standard);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(EngineMode::Standard.to_string(), "standard");
        assert_eq!(EngineMode::Headless.to_string(), "headless");
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.crawler.timeout = 3;
        config.user_agent.crawler_name = "Bot".to_string();
        config.user_agent.crawler_version = "9".to_string();

        let options = EngineOptions::from_config(&config);

        assert_eq!(options.timeout, Duration::from_secs(3));
        assert_eq!(options.user_agent, "Bot/9");
        assert!(options.browser_path.is_none());
    }

    #[tokio::test]
    async fn test_default_factory_builds_standard_engine() {
        let factory = DefaultEngineFactory::new(EngineOptions::default(), Arc::new(FieldRegistry::new()));

        let engine = build_engine(&factory, EngineMode::Standard).await.unwrap();

        assert_eq!(engine.name(), "standard");
        engine.close().await;
    }
}
