//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest crawl runner.

use anyhow::Context;
use clap::Parser;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_harvest::config::{load_config_with_hash, Config};
use sumi_harvest::crawler::{print_report, Orchestrator};
use sumi_harvest::engine::{DefaultEngineFactory, EngineMode, EngineOptions};
use sumi_harvest::fields::{
    ensure_config_file, load_field_config, load_validated_field_config, validate_field_config,
    FieldRegistry,
};
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: crawl targets and capture custom fields
///
/// Every target is crawled by one engine (plain HTTP by default, a headless
/// browser with --headless). Regex fields from the field config are captured
/// from each page and reported in the log.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version)]
#[command(about = "Crawl targets and capture custom fields", long_about = None)]
struct Cli {
    /// URLs to crawl
    #[arg(value_name = "TARGET")]
    targets: Vec<String>,

    /// File with one target per line ("-" reads stdin)
    #[arg(short, long, value_name = "FILE")]
    list: Option<PathBuf>,

    /// Path to TOML run configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Crawl with the headless browser engine
    #[arg(long)]
    headless: bool,

    /// Number of targets crawled at the same time
    #[arg(short = 'c', long, value_name = "N")]
    concurrency: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom field config file (validated before use)
    #[arg(long, value_name = "FILE")]
    field_config: Option<PathBuf>,

    /// Fields to capture, comma separated
    #[arg(short, long, value_name = "LIST")]
    fields: Option<String>,

    /// Validate the field config and exit
    #[arg(long)]
    validate_fields: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let registry = Arc::new(FieldRegistry::new());

    if cli.validate_fields {
        return handle_validate_fields(&config);
    }

    load_fields(&config, &registry)?;

    let targets = resolve_targets(&cli)?;

    let factory = Arc::new(DefaultEngineFactory::new(
        EngineOptions::from_config(&config),
        registry,
    ));
    let orchestrator = Orchestrator::new(
        factory,
        config.crawler.mode,
        config.crawler.concurrency as usize,
    );

    let report = orchestrator.run(targets).await?;
    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the run configuration and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("could not load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.headless {
        config.crawler.mode = EngineMode::from_headless(true);
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout = timeout;
    }
    if let Some(path) = &cli.field_config {
        config.fields.config_path = Some(path.display().to_string());
    }
    if let Some(fields) = &cli.fields {
        config.fields.selected = fields.clone();
    }

    sumi_harvest::config::validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles --validate-fields: checks names and patterns of the field file
///
/// Patterns are compiled into a scratch registry, so nothing is activated.
fn handle_validate_fields(config: &Config) -> anyhow::Result<()> {
    let scratch = FieldRegistry::new();

    let path = match config.fields.expanded_config_path() {
        Some(path) => {
            validate_field_config(&path)
                .with_context(|| format!("field config {} is invalid", path.display()))?;
            path
        }
        None => ensure_config_file()?,
    };

    load_field_config(&path, "", &scratch)
        .with_context(|| format!("field config {} is invalid", path.display()))?;
    println!("✓ Field config {} is valid", path.display());
    Ok(())
}

/// Populates the registry before any crawl starts
///
/// An operator-supplied file is validated first. The bootstrapped default
/// file only holds built-in fields, so it is loaded as is.
fn load_fields(config: &Config, registry: &FieldRegistry) -> anyhow::Result<()> {
    let selected = config.fields.selected.as_str();

    let activated = match config.fields.expanded_config_path() {
        Some(path) => load_validated_field_config(&path, selected, registry)
            .with_context(|| format!("could not load field config {}", path.display()))?,
        None => {
            let path = ensure_config_file()?;
            load_field_config(&path, selected, registry)
                .with_context(|| format!("could not load field config {}", path.display()))?
        }
    };

    tracing::info!("Active fields: {:?}", activated);
    Ok(())
}

/// Collects targets from the command line and the --list file
fn resolve_targets(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut targets: Vec<String> = cli.targets.clone();

    if let Some(list) = &cli.list {
        let lines = if list == Path::new("-") {
            read_targets(std::io::stdin().lock())?
        } else {
            let file = std::fs::File::open(list)
                .with_context(|| format!("could not open target list {}", list.display()))?;
            read_targets(std::io::BufReader::new(file))?
        };
        targets.extend(lines);
    }

    Ok(targets)
}

/// Reads one target per line, skipping blanks and `#` comments
fn read_targets(reader: impl BufRead) -> anyhow::Result<Vec<String>> {
    let mut targets = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        targets.push(line.to_string());
    }
    Ok(targets)
}
