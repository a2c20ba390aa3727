use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::crawler::{CrawlerConfig, DEFAULT_USER_AGENT};

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
/// Receives all program arguments, while CrawlerConfig
/// describes only the crawl itself
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// URL the crawl starts from
    #[arg(short, long)]
    pub base_url: String,
    /// Pages at this many links from the base url are not fetched
    #[arg(long, default_value = "2")]
    pub max_depth: usize,
    /// Number of concurrent workers
    #[arg(long, default_value = "10")]
    pub max_workers: usize,
    /// Timeout for a single request in seconds
    #[arg(short, long, default_value = "20")]
    pub timeout_seconds: u64,
    /// Where to write the site map, defaults to a timestamped file in the current directory
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,
    /// Stop starting new fetches after this many seconds
    #[arg(long)]
    pub deadline_seconds: Option<u64>,
    /// User agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.deadline_seconds == Some(0) {
            anyhow::bail!("deadline_seconds must be greater than 0");
        }
        self.crawler_config().validate()?;
        Ok(())
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        let mut config = CrawlerConfig::new(self.base_url.clone())
            .with_max_depth(self.max_depth)
            .with_max_workers(self.max_workers)
            .with_request_timeout(Duration::from_secs(self.timeout_seconds))
            .with_user_agent(self.user_agent.clone());
        if let Some(seconds) = self.deadline_seconds {
            config = config.with_crawl_deadline(Duration::from_secs(seconds));
        }
        config
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
