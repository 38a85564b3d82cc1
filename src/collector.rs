//! Clone traffic collection.
//!
//! A collection run lists the account's repositories, pulls each one's
//! recent clone window and merges it into the store, then rebuilds the
//! cumulative series. Per-repository failures are logged and skipped.

use crate::analysis::{recompute_cumulative, summarize};
use crate::github::{FetchError, TrafficSource};
use crate::models::{MergeOutcome, Store, StoreSummary};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Outcome of one collection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSummary {
    /// Repositories returned by the listing.
    pub repositories_found: usize,
    /// Repositories whose traffic was fetched and merged this run.
    pub repositories_fetched: usize,
    /// Repositories skipped because their traffic could not be fetched.
    pub repositories_skipped: usize,
    /// Dates inserted or replaced across all repositories.
    pub days_changed: usize,
    /// Store-wide figures after the cumulative rebuild.
    pub store: StoreSummary,
}

impl CollectionSummary {
    /// Repositories in the store holding at least one day, against the
    /// number listed this run.
    pub fn with_clone_data(&self) -> (usize, usize) {
        (self.store.repositories_tracked, self.repositories_found)
    }
}

/// Run a full collection against `source`, updating `store` in memory.
pub async fn collect<S: TrafficSource>(
    source: &S,
    store: &mut Store,
    show_progress: bool,
) -> CollectionSummary {
    info!("Collecting clone traffic for {}", source.account());

    let repos = source.list_repositories().await;
    println!("📦 Found {} repositories", repos.len());
    info!("Listing returned {} repositories", repos.len());

    let mut summary = CollectionSummary {
        repositories_found: repos.len(),
        ..Default::default()
    };

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(repos.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    for repo in &repos {
        progress_bar.set_message(repo.name.clone());
        debug!(
            "Processing {} (private: {}, fork: {})",
            repo.name, repo.private, repo.fork
        );

        match process_repository(source, store, &repo.name).await {
            Some(outcome) => {
                summary.repositories_fetched += 1;
                summary.days_changed += outcome.changed();
            }
            None => summary.repositories_skipped += 1,
        }

        progress_bar.inc(1);
    }
    progress_bar.finish_and_clear();

    info!("Calculating cumulative statistics");
    recompute_cumulative(store);
    summary.store = summarize(store);

    summary
}

/// Fetch and merge one repository. `None` means nothing was merged.
async fn process_repository<S: TrafficSource>(
    source: &S,
    store: &mut Store,
    name: &str,
) -> Option<MergeOutcome> {
    let traffic = match source.clone_traffic(name).await {
        Ok(traffic) => traffic,
        Err(FetchError::Forbidden) => {
            warn!(
                "No access to clone stats for {} (might be private without proper permissions)",
                name
            );
            return None;
        }
        Err(e) => {
            warn!("Error fetching clone stats for {}: {}", name, e);
            return None;
        }
    };

    let Some(observations) = traffic.observations() else {
        warn!("Clone stats for {} had no daily breakdown", name);
        return None;
    };

    let outcome = store.record_mut(name).merge_daily_clones(&observations);
    info!("✓ {}: {} days of data", name, observations.len());
    debug!(
        "{}: window totals {} clones, {} unique",
        name, traffic.count, traffic.uniques
    );
    debug!(
        "{}: {} inserted, {} replaced, {} kept",
        name, outcome.inserted, outcome.replaced, outcome.kept
    );

    Some(outcome)
}
