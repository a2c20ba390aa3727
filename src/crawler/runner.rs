use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use anyhow::{Context, Result};
use log2::*;
use reqwest::Client;
use tokio::task::JoinHandle;

use super::config::CrawlerConfigRef;
use super::fetch::{fetch_page, FetchError};
use super::frontier::CrawlTask;
use super::scrape::extract_links;
use super::state::CrawlerStateRef;

/// What happened to a single task pulled from the frontier
#[derive(Debug)]
pub enum TaskOutcome {
    /// Page fetched and recorded with this many links
    Recorded(usize),
    /// Another task already claimed the url
    Skipped,
    /// Task depth reached `max_depth`, nothing recorded
    DepthExceeded,
    /// Fetch failed, page recorded without links
    Failed(FetchError),
}

/// Drain the frontier with `max_workers` workers until no task is outstanding
/// or the crawl is cancelled. Results end up in `state.site_map`.
pub async fn crawl(crawler_state_ref: CrawlerStateRef, crawler_cfg_ref: CrawlerConfigRef) -> Result<()> {
    crawler_cfg_ref.validate()?;

    let client = Client::builder()
        .user_agent(crawler_cfg_ref.user_agent.as_str())
        .build()
        .context("failed to build http client")?;

    let deadline = crawler_cfg_ref.crawl_deadline.map(|limit| {
        let cancel = crawler_state_ref.cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            info!("Crawl deadline of {:?} reached, no new pages will be fetched", limit);
            cancel.cancel();
        })
    });

    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    for worker_id in 0..crawler_cfg_ref.max_workers {
        let state = Arc::clone(&crawler_state_ref);
        let config = Arc::clone(&crawler_cfg_ref);
        let client = client.clone();

        let handle = tokio::spawn(async move {
            debug!("Worker {} started", worker_id);

            while let Some(task) = state.frontier.next(&state.cancel).await {
                let url = task.url.clone();
                let claimed = Arc::new(AtomicBool::new(false));
                let job = tokio::spawn(process_task(
                    Arc::clone(&state),
                    Arc::clone(&config),
                    client.clone(),
                    task,
                    Arc::clone(&claimed),
                    worker_id,
                ));

                match job.await {
                    Ok(outcome) => trace!("Worker {}: {} -> {:?}", worker_id, url, outcome),
                    Err(e) => {
                        error!("Worker {}: task for {} aborted: {}", worker_id, url, e);
                        state.stats.aborted_tasks.fetch_add(1, Ordering::Relaxed);
                        // a task that never owned the url must not touch its entry
                        if claimed.load(Ordering::SeqCst) {
                            state.record_aborted(&url).await;
                        }
                    }
                }

                state.frontier.complete();
            }

            debug!("Worker {} finished", worker_id);
        });

        handles.push(handle);
    }

    let joined = join_workers(handles).await;

    if let Some(timer) = deadline {
        timer.abort();
    }

    if crawler_state_ref.cancel.is_cancelled() && crawler_state_ref.frontier.outstanding() > 0 {
        info!("Crawl stopped early with {} tasks still outstanding", crawler_state_ref.frontier.outstanding());
    }
    info!("Crawl finished: {}", crawler_state_ref.stats);

    joined
}

/// Wait for every worker, even after one has failed, so nothing is still
/// writing to the state when the caller reads it. Reports the first failure.
pub(crate) async fn join_workers(handles: Vec<JoinHandle<()>>) -> Result<()> {
    let mut first_failure = None;
    for handle in handles {
        if let Err(e) = handle.await {
            error!("Worker stopped unexpectedly: {}", e);
            first_failure.get_or_insert(e);
        }
    }

    match first_failure {
        Some(e) => Err(e).context("crawl worker failed"),
        None => Ok(()),
    }
}

/// Claim, fetch, record and expand one task. Children are submitted before
/// this returns so the outstanding count stays above zero meanwhile.
async fn process_task(
    state: CrawlerStateRef,
    config: CrawlerConfigRef,
    client: Client,
    task: CrawlTask,
    claimed: Arc<AtomicBool>,
    worker_id: usize,
) -> TaskOutcome {
    if task.depth >= config.max_depth {
        trace!("Worker {}: Max depth {} reached for {}", worker_id, config.max_depth, task.url);
        state.stats.depth_discarded.fetch_add(1, Ordering::Relaxed);
        return TaskOutcome::DepthExceeded;
    }

    #[cfg(test)]
    state.maybe_panic(&task, super::state::PanicPoint::BeforeClaim);

    if !state.visited.try_claim(&task.url).await {
        state.stats.duplicate_claims.fetch_add(1, Ordering::Relaxed);
        return TaskOutcome::Skipped;
    }
    claimed.store(true, Ordering::SeqCst);

    #[cfg(test)]
    state.maybe_panic(&task, super::state::PanicPoint::AfterClaim);

    info!("Worker {}: Crawling {} at depth {}", worker_id, task.url, task.depth);

    let body = match fetch_page(&client, &task.url, config.request_timeout).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Worker {}: Failed to fetch {}: {}", worker_id, task.url, e);
            state.record(&task.url, Vec::new()).await;
            state.stats.fetch_failures.fetch_add(1, Ordering::Relaxed);
            return TaskOutcome::Failed(e);
        }
    };

    let links = extract_links(&String::from_utf8_lossy(&body));
    let link_count = links.len();
    debug!("Found {} links on page {}", link_count, task.url);

    state.record(&task.url, links.clone()).await;
    state.stats.pages_recorded.fetch_add(1, Ordering::Relaxed);

    for link in links {
        state.frontier.submit(CrawlTask::new(link, task.depth + 1)).await;
    }

    TaskOutcome::Recorded(link_count)
}
