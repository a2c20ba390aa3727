use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::frontier::{CrawlTask, Frontier};

/// Visited page -> links found on it, in document order
pub type SiteMap = BTreeMap<String, Vec<String>>;

/// Set of URLs that some worker has taken ownership of
#[derive(Debug, Default)]
pub struct VisitTracker {
    claimed: Mutex<HashSet<String>>,
}

impl VisitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true for exactly one caller per URL; that caller owns the fetch.
    pub async fn try_claim(&self, url: &str) -> bool {
        self.claimed.lock().await.insert(url.to_string())
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.claimed.lock().await.contains(url)
    }

    pub async fn len(&self) -> usize {
        self.claimed.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claimed.lock().await.is_empty()
    }

    pub async fn claimed_urls(&self) -> HashSet<String> {
        self.claimed.lock().await.clone()
    }
}

/// Running totals, only used for reporting
#[derive(Debug, Default)]
pub struct CrawlStats {
    pub pages_recorded: AtomicUsize,
    pub fetch_failures: AtomicUsize,
    pub duplicate_claims: AtomicUsize,
    pub depth_discarded: AtomicUsize,
    pub aborted_tasks: AtomicUsize,
}

impl std::fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pages recorded, {} fetch failures, {} duplicate claims, {} beyond max depth, {} aborted",
            self.pages_recorded.load(Ordering::Relaxed),
            self.fetch_failures.load(Ordering::Relaxed),
            self.duplicate_claims.load(Ordering::Relaxed),
            self.depth_discarded.load(Ordering::Relaxed),
            self.aborted_tasks.load(Ordering::Relaxed),
        )
    }
}

/// Current state of the crawler
pub struct CrawlerState {
    /// Pending tasks and the outstanding-task counter
    pub frontier: Frontier,
    /// URLs claimed for processing
    pub visited: VisitTracker,
    /// Result mapping, one insert per claimed URL
    pub site_map: Mutex<SiteMap>,
    pub stats: CrawlStats,
    /// Stops workers from picking up new tasks
    pub cancel: CancellationToken,
    #[cfg(test)]
    pub(crate) panic_points: std::collections::HashMap<(String, usize), PanicPoint>,
}

/// Where the task for a given (url, depth) should blow up, to exercise worker recovery
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PanicPoint {
    BeforeClaim,
    AfterClaim,
}

impl CrawlerState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            frontier: Frontier::with_seed(CrawlTask::new(base_url, 0)),
            visited: VisitTracker::new(),
            site_map: Mutex::new(SiteMap::new()),
            stats: CrawlStats::default(),
            cancel: CancellationToken::new(),
            #[cfg(test)]
            panic_points: std::collections::HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_panic_at(mut self, url: impl Into<String>, depth: usize, point: PanicPoint) -> Self {
        self.panic_points.insert((url.into(), depth), point);
        self
    }

    #[cfg(test)]
    pub(crate) fn maybe_panic(&self, task: &CrawlTask, point: PanicPoint) {
        if self.panic_points.get(&(task.url.clone(), task.depth)) == Some(&point) {
            panic!("injected failure for {} at depth {} ({:?})", task.url, task.depth, point);
        }
    }

    pub async fn record(&self, url: &str, links: Vec<String>) {
        let previous = self.site_map.lock().await.insert(url.to_string(), links);
        debug_assert!(previous.is_none(), "{url} recorded twice");
    }

    /// Give a URL an empty entry unless its task recorded it before dying.
    /// Only the task that claimed `url` may call this.
    pub async fn record_aborted(&self, url: &str) {
        self.site_map.lock().await.entry(url.to_string()).or_default();
    }

    /// Stop the crawl; in-flight tasks still finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

pub type CrawlerStateRef = Arc<CrawlerState>;

/// Copy of the result mapping
pub async fn site_map_from_state(state: &CrawlerStateRef) -> SiteMap {
    state.site_map.lock().await.clone()
}
