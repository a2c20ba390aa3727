pub mod state;
pub mod config;
pub mod fetch;
pub mod frontier;
pub mod scrape;
pub mod runner;


pub use state::{CrawlerState, CrawlerStateRef, CrawlStats, SiteMap, VisitTracker, site_map_from_state};
pub use config::{ConfigError, CrawlerConfig, CrawlerConfigRef, DEFAULT_USER_AGENT, LINK_REQUEST_TIMEOUT_SEC};
pub use fetch::{fetch_page, FetchError};
pub use frontier::{CrawlTask, Frontier};
pub use scrape::{extract_links, is_absolute_http_link};
pub use runner::{crawl, TaskOutcome};
