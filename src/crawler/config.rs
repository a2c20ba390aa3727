use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default timeout for link requests in seconds
pub const LINK_REQUEST_TIMEOUT_SEC: u64 = 20;

/// User agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors that make a crawler configuration unusable
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_workers must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("base url {0:?} is not an absolute http(s) url")]
    InvalidBaseUrl(String),
}

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub max_depth: usize,
    pub max_workers: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Overall crawl budget; when it runs out no new fetches are started
    pub crawl_deadline: Option<Duration>,
}

impl CrawlerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_depth: 2,
            max_workers: 10,
            request_timeout: Duration::from_secs(LINK_REQUEST_TIMEOUT_SEC),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            crawl_deadline: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_crawl_deadline(mut self, deadline: Duration) -> Self {
        self.crawl_deadline = Some(deadline);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers < 1 {
            return Err(ConfigError::InvalidWorkerCount(self.max_workers));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        match Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(ConfigError::InvalidBaseUrl(self.base_url.clone())),
        }
    }
}

pub type CrawlerConfigRef = Arc<CrawlerConfig>;
