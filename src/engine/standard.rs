//! HTTP engine
//!
//! Fetches each target with a single GET and analyses whatever body comes
//! back. The `reqwest` client owns the timeout and redirect policy.

use crate::engine::page::analyze_page;
use crate::engine::{Engine, EngineError, EngineOptions};
use crate::fields::FieldRegistry;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use url::Url;

const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use sumi_harvest::engine::{build_http_client, EngineOptions};
///
/// let client = build_http_client(&EngineOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &EngineOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout)
        .connect_timeout(options.timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP-based crawling engine
pub struct StandardEngine {
    client: Client,
    registry: Arc<FieldRegistry>,
}

impl StandardEngine {
    pub fn new(options: &EngineOptions, registry: Arc<FieldRegistry>) -> Result<Self, EngineError> {
        let client = build_http_client(options)?;
        Ok(Self { client, registry })
    }
}

#[async_trait]
impl Engine for StandardEngine {
    async fn crawl(&self, target: &str) -> Result<(), EngineError> {
        let url = Url::parse(target)
            .map_err(|e| EngineError::InvalidTarget(format!("{}: {}", target, e)))?;

        tracing::debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;

        analyze_page(&final_url, &body, &self.registry).log();
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("Standard engine closed");
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_options() -> EngineOptions {
        EngineOptions {
            user_agent: "TestCrawler/1.0".to_string(),
            timeout: Duration::from_secs(5),
            browser_path: None,
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&create_test_options()).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_target_is_rejected_before_fetching() {
        let engine = StandardEngine::new(&create_test_options(), Arc::new(FieldRegistry::new())).unwrap();

        let err = engine.crawl("not a url").await.unwrap_err();

        assert!(matches!(err, EngineError::InvalidTarget(_)));
    }
}
