//! Sumi-Harvest: a field-harvesting crawl runner
//!
//! This crate fans a set of seed targets out to a crawling engine under a
//! bounded concurrency limit, and captures operator-defined regex fields from
//! every crawled page.

pub mod config;
pub mod crawler;
pub mod engine;
pub mod fields;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sumi-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("no input provided for crawling")]
    NoInput,

    #[error("could not create {mode} crawler: {source}")]
    EngineConstruction {
        mode: engine::EngineMode,
        source: engine::EngineError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Field config error: {0}")]
    Field(#[from] FieldError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Custom field configuration errors
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("could not read field config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode field config {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not encode field config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("could not create field config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write field config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not get home directory")]
    HomeDir,

    #[error("wrong custom field name {0:?}")]
    InvalidName(String),

    #[error("could not register custom field. \"{0}\" already pre-defined field")]
    Reserved(String),

    #[error("could not register custom field. \"{0}\" custom field already exists")]
    Duplicate(String),

    #[error("could not parse regex {pattern:?} in field {name}: {source}")]
    Regex {
        name: String,
        pattern: String,
        source: regex::Error,
    },
}

/// Result type alias for Sumi-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for field configuration operations
pub type FieldResult<T> = std::result::Result<T, FieldError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Orchestrator, RunReport};
pub use engine::{Engine, EngineError, EngineFactory, EngineMode};
pub use fields::{FieldDefinition, FieldRegistry};
