//! Browser engine
//!
//! Drives a local Chrome/Chromium through the DevTools protocol. One browser
//! process serves every task; each crawl gets its own tab.

use crate::engine::page::analyze_page;
use crate::engine::{Engine, EngineError, EngineOptions};
use crate::fields::FieldRegistry;
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use url::Url;

fn browser_error(e: impl Display) -> EngineError {
    EngineError::Browser(e.to_string())
}

/// Headless-browser crawling engine
pub struct HeadlessEngine {
    browser: RwLock<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    registry: Arc<FieldRegistry>,
    user_agent: String,
    timeout: Duration,
}

impl HeadlessEngine {
    /// Launches the browser and starts its event loop
    pub async fn launch(
        options: &EngineOptions,
        registry: Arc<FieldRegistry>,
    ) -> Result<Self, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(options.timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &options.browser_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(EngineError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
        });

        tracing::info!("Launched headless browser");

        Ok(Self {
            browser: RwLock::new(Some(browser)),
            handler: Mutex::new(Some(handle)),
            registry,
            user_agent: options.user_agent.clone(),
            timeout: options.timeout,
        })
    }

    /// Opens a tab, navigates to `url`, and returns the rendered document
    ///
    /// The deadline covers opening the tab and loading the page. The tab is
    /// closed afterwards whether the load finished, failed, or timed out.
    async fn render(&self, browser: &Browser, url: &str) -> Result<String, EngineError> {
        let deadline = Instant::now() + self.timeout;

        let page = timeout_at(deadline, browser.new_page("about:blank"))
            .await
            .map_err(|_| EngineError::Timeout {
                url: url.to_string(),
            })?
            .map_err(browser_error)?;

        let load = async {
            page.set_user_agent(self.user_agent.as_str()).await?;
            page.goto(url).await?;
            Ok::<_, CdpError>(page.content().await?)
        };
        let tab = page.clone();
        let close_tab = async move {
            if let Err(e) = tab.close().await {
                tracing::debug!("Could not close tab for {}: {}", url, e);
            }
        };

        load_then_cleanup(deadline, url, load, close_tab).await
    }
}

/// Runs `load` until `deadline`, then runs `cleanup` whatever the outcome
async fn load_then_cleanup<T, E, L, C>(
    deadline: Instant,
    url: &str,
    load: L,
    cleanup: C,
) -> Result<T, EngineError>
where
    L: Future<Output = Result<T, E>>,
    E: Display,
    C: Future<Output = ()>,
{
    let outcome = match timeout_at(deadline, load).await {
        Ok(result) => result.map_err(browser_error),
        Err(_) => Err(EngineError::Timeout {
            url: url.to_string(),
        }),
    };
    cleanup.await;
    outcome
}

#[async_trait]
impl Engine for HeadlessEngine {
    async fn crawl(&self, target: &str) -> Result<(), EngineError> {
        let url = Url::parse(target)
            .map_err(|e| EngineError::InvalidTarget(format!("{}: {}", target, e)))?;

        let guard = self.browser.read().await;
        let browser = guard.as_ref().ok_or(EngineError::Closed)?;

        tracing::debug!("Rendering {}", url);
        let content = self.render(browser, url.as_str()).await?;
        drop(guard);

        analyze_page(&url, &content, &self.registry).log();
        Ok(())
    }

    async fn close(&self) {
        let browser = self.browser.write().await.take();
        if let Some(mut browser) = browser {
            if let Err(e) = browser.close().await {
                tracing::warn!("Could not close headless browser: {}", e);
            }
            if let Err(e) = browser.wait().await {
                tracing::debug!("Headless browser did not exit cleanly: {}", e);
            }
        }

        if let Some(handle) = self.handler.lock().await.take() {
            handle.abort();
        }
        tracing::debug!("Headless engine closed");
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_launch_fails_without_browser_binary() {
        let options = EngineOptions {
            user_agent: "TestCrawler/1.0".to_string(),
            timeout: Duration::from_secs(5),
            browser_path: Some("/nonexistent/chromium".into()),
        };

        let result = HeadlessEngine::launch(&options, Arc::new(FieldRegistry::new())).await;

        assert!(matches!(result, Err(EngineError::Browser(_))));
    }

    #[tokio::test]
    async fn test_cleanup_runs_after_timeout() {
        let cleaned = std::sync::atomic::AtomicBool::new(false);
        let deadline = Instant::now() + Duration::from_millis(20);

        let result: Result<String, EngineError> = load_then_cleanup(
            deadline,
            "https://slow.example/",
            std::future::pending::<Result<String, CdpError>>(),
            async { cleaned.store(true, std::sync::atomic::Ordering::SeqCst) },
        )
        .await;

        match result {
            Err(EngineError::Timeout { url }) => assert_eq!(url, "https://slow.example/"),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(cleaned.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cleanup_runs_after_load_error() {
        let cleaned = std::sync::atomic::AtomicBool::new(false);
        let deadline = Instant::now() + Duration::from_secs(5);

        let result: Result<String, EngineError> = load_then_cleanup(
            deadline,
            "https://broken.example/",
            async { Err::<String, _>("navigation failed") },
            async { cleaned.store(true, std::sync::atomic::Ordering::SeqCst) },
        )
        .await;

        assert!(matches!(result, Err(EngineError::Browser(msg)) if msg == "navigation failed"));
        assert!(cleaned.load(std::sync::atomic::Ordering::SeqCst));
    }
}
