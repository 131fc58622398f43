//! Run results
//!
//! A run never fails because of a single target. Each failed target is kept
//! here with its error so callers can inspect what went wrong.

use crate::engine::EngineError;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Why one crawl task did not succeed
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("crawl task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

/// A target that could not be crawled
#[derive(Debug)]
pub struct TaskFailure {
    pub target: String,
    pub error: TaskError,
}

/// Outcome of one orchestrator run
#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub total: usize,
    pub failures: Vec<TaskFailure>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.total - self.failures.len()
    }

    /// True when every target was crawled without error
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Targets per second over the whole run
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints a run summary to stdout
pub fn print_report(report: &RunReport) {
    println!("=== Sumi-Harvest Run Summary ===\n");
    println!("Started: {}", report.started_at.to_rfc3339());
    println!("Duration: {:.2}s", report.elapsed.as_secs_f64());
    println!("Targets: {}", report.total);
    println!("  Succeeded: {}", report.succeeded());
    println!("  Failed: {}", report.failures.len());
    println!("  Rate: {:.2} targets/sec", report.rate());

    if !report.failures.is_empty() {
        println!("\nFailures:");
        for failure in &report.failures {
            println!("  - {}: {}", failure.target, failure.error);
        }
    }
}
