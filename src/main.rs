use anyhow::{Context, Result};
use log2::*;
use std::sync::Arc;
use std::time::Instant;

use site_mapper::{config, crawler, snapshot};

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("site_mapper"))
        .compress(false)
        .level(cfg.log_level.to_string())
        .start();
    cfg.validate()?;

    let output_path = cfg
        .output_path
        .clone()
        .unwrap_or_else(|| snapshot::default_output_path(chrono::Local::now().naive_local()));

    let crawler_config = Arc::new(cfg.crawler_config());
    let state = Arc::new(crawler::CrawlerState::new(cfg.base_url.clone()));

    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing in-flight pages");
                state.cancel();
            }
        });
    }

    // configuration was checked above, so whatever was recorded is worth saving
    let crawl_result = crawler::crawl(state.clone(), crawler_config).await;
    if let Err(e) = &crawl_result {
        error!("Crawl did not finish cleanly: {:#}", e);
    }

    let site_map = crawler::site_map_from_state(&state).await;
    match site_map.get(&cfg.base_url) {
        Some(links) => info!("{} page is {} links long", cfg.base_url, links.len()),
        None => info!("{} was not crawled (max depth {})", cfg.base_url, cfg.max_depth),
    }

    snapshot::write_snapshot(&site_map, &output_path)
        .with_context(|| format!("could not save site map of {} pages", site_map.len()))?;
    info!(
        "Site map with {} pages written to {:?} in {:.2?}",
        site_map.len(),
        output_path,
        START_TIME.elapsed()
    );

    crawl_result
}
