//! Crawl orchestration
//!
//! The orchestrator builds one engine per run and dispatches one task per
//! target, gated by a counting semaphore. A failing target is logged and
//! recorded; it never cancels its siblings. The engine is closed once every
//! task has finished.
//!
//! No deadline or cancellation is plumbed through here. A hung engine call
//! holds its permit until the engine's own timeout fires.

use crate::crawler::report::{RunReport, TaskError, TaskFailure};
use crate::engine::{build_engine, Engine, EngineFactory, EngineMode};
use crate::HarvestError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Drives a set of targets through one engine
pub struct Orchestrator {
    factory: Arc<dyn EngineFactory>,
    mode: EngineMode,
    concurrency: usize,
}

impl Orchestrator {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `factory` - Builds the engine at the start of each run
    /// * `mode` - Which engine variant to build
    /// * `concurrency` - Maximum number of targets crawled at once; clamped to
    ///   `1..=Semaphore::MAX_PERMITS`
    pub fn new(factory: Arc<dyn EngineFactory>, mode: EngineMode, concurrency: usize) -> Self {
        let clamped = concurrency.clamp(1, Semaphore::MAX_PERMITS);
        if clamped != concurrency {
            tracing::warn!(
                "Concurrency of {} is out of range, using {}",
                concurrency,
                clamped
            );
        }
        let concurrency = clamped;

        Self {
            factory,
            mode,
            concurrency,
        }
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Crawls every target and waits for all of them
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - Every task finished; individual failures are in the report
    /// * `Err(HarvestError::NoInput)` - `targets` is empty; nothing was started
    /// * `Err(HarvestError::EngineConstruction)` - The engine could not be built
    pub async fn run(&self, targets: Vec<String>) -> Result<RunReport, HarvestError> {
        if targets.is_empty() {
            return Err(HarvestError::NoInput);
        }

        let engine = build_engine(self.factory.as_ref(), self.mode)
            .await
            .map_err(|source| HarvestError::EngineConstruction {
                mode: self.mode,
                source,
            })?;

        tracing::info!(
            "Crawling {} targets with the {} engine ({} at a time)",
            targets.len(),
            engine.name(),
            self.concurrency
        );

        let report = self.dispatch(engine.clone(), targets).await;
        engine.close().await;

        tracing::info!(
            "Run finished: {} succeeded, {} failed in {:?}",
            report.succeeded(),
            report.failures.len(),
            report.elapsed
        );

        Ok(report)
    }

    /// Spawns one task per target and waits for all of them
    async fn dispatch(&self, engine: Arc<dyn Engine>, targets: Vec<String>) -> RunReport {
        let started_at = Utc::now();
        let start_time = Instant::now();
        let total = targets.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let mut handles: Vec<(String, JoinHandle<Result<(), TaskError>>)> =
            Vec::with_capacity(total);

        for target in targets {
            let engine = engine.clone();
            let semaphore = semaphore.clone();
            let task_target = target.clone();

            let handle = tokio::spawn(async move {
                // Only fails once the semaphore is closed, and this one never is
                let _permit = semaphore.acquire_owned().await.ok();

                engine.crawl(&task_target).await.map_err(|e| {
                    tracing::warn!("{}: {}", task_target, e);
                    TaskError::Engine(e)
                })
            });

            handles.push((target, handle));
        }

        let mut failures = Vec::new();
        for (target, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    tracing::warn!("{}: crawl task aborted: {}", target, join_error);
                    Err(TaskError::Aborted(join_error))
                }
            };

            if let Err(error) = outcome {
                failures.push(TaskFailure { target, error });
            }
        }

        RunReport {
            started_at,
            elapsed: start_time.elapsed(),
            total,
            failures,
        }
    }
}
