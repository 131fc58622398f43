//! Crawl orchestration
//!
//! This module contains:
//! - The orchestrator that fans targets out to an engine
//! - The run report that collects per-target failures

mod orchestrator;
mod report;

pub use orchestrator::Orchestrator;
pub use report::{print_report, RunReport, TaskError, TaskFailure};
