use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify};
use tokio_util::sync::CancellationToken;

/// A page waiting to be crawled and how many edges away from the seed it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth: usize,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self { url: url.into(), depth }
    }
}

/// Shared work queue for the worker pool.
///
/// `outstanding` counts tasks that were submitted but not yet completed,
/// whether they are still queued or held by a worker. The crawl is over only
/// when that count is zero; an empty queue alone says nothing because a
/// worker holding a task may still submit children.
pub struct Frontier {
    queue: Mutex<VecDeque<CrawlTask>>,
    outstanding: AtomicUsize,
    wakeup: Notify,
}

impl Frontier {
    pub fn with_seed(seed: CrawlTask) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(seed);

        Self {
            queue: Mutex::new(queue),
            outstanding: AtomicUsize::new(1),
            wakeup: Notify::new(),
        }
    }

    pub async fn submit(&self, task: CrawlTask) {
        // count first so the total never dips to zero while the task is in transit
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().await.push_back(task);
        self.wakeup.notify_one();
    }

    /// Wait for the next task. Returns `None` once every submitted task has
    /// completed or the crawl was cancelled.
    pub async fn next(&self, cancel: &CancellationToken) -> Option<CrawlTask> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }

            let notified = self.wakeup.notified();
            tokio::pin!(notified);
            // registered before checking, so a wake-up between check and await is not lost
            notified.as_mut().enable();

            if let Some(task) = self.queue.lock().await.pop_front() {
                return Some(task);
            }
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return None;
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = cancel.cancelled() => return None,
            }
        }
    }

    /// Mark a task taken from [`Frontier::next`] as done. Must be called after
    /// all of its children have been submitted.
    pub fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.wakeup.notify_waiters();
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub async fn queued(&self) -> usize {
        self.queue.lock().await.len()
    }
}
