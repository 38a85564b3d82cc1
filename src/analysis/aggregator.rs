//! Clone aggregation and ranking.
//!
//! This module reduces the per-repository daily records into the
//! cross-repository cumulative series and the rankings used by the
//! reporter. Everything here is a pure function of the repository map.

use crate::models::{
    CumulativeEntry, RepositoryRecord, RepositoryTotal, Store, StoreSummary, TrendPoint,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Build the cumulative series from scratch.
///
/// Daily sums are accumulated per date over every repository, then walked in
/// ascending date order while keeping a running total.
pub fn cumulative_series(
    repositories: &BTreeMap<String, RepositoryRecord>,
) -> BTreeMap<NaiveDate, CumulativeEntry> {
    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for record in repositories.values() {
        for (date, day) in &record.daily_clones {
            *daily.entry(*date).or_default() += day.count;
        }
    }

    let mut running_total = 0u64;
    daily
        .into_iter()
        .map(|(date, daily_clones)| {
            running_total += daily_clones;
            (
                date,
                CumulativeEntry {
                    total_clones: running_total,
                    daily_clones,
                },
            )
        })
        .collect()
}

/// Discard `store.cumulative` and rebuild it from `store.repositories`.
pub fn recompute_cumulative(store: &mut Store) {
    store.cumulative = cumulative_series(&store.repositories);
}

/// Rank repositories by all-time clones, highest first.
///
/// Repositories without any clones are left out. The sort is stable, so
/// ties keep the store's (alphabetical) order.
pub fn top_repositories_by_total_clones(store: &Store, n: usize) -> Vec<RepositoryTotal> {
    let mut totals: Vec<RepositoryTotal> = store
        .repositories
        .iter()
        .map(|(name, record)| RepositoryTotal {
            name: name.clone(),
            total: record.total_clones(),
        })
        .filter(|entry| entry.total > 0)
        .collect();

    totals.sort_by_key(|entry| std::cmp::Reverse(entry.total));
    totals.truncate(n);

    totals
}

/// Running clone total of a single repository, one point per recorded date.
pub fn repository_trend(record: &RepositoryRecord) -> Vec<TrendPoint> {
    let mut total = 0u64;

    record
        .daily_clones
        .iter()
        .map(|(date, day)| {
            total += day.count;
            TrendPoint {
                date: *date,
                cumulative: total,
            }
        })
        .collect()
}

/// Trend lines for the top `n` repositories, in ranking order.
pub fn top_repository_trends(store: &Store, n: usize) -> Vec<(String, Vec<TrendPoint>)> {
    top_repositories_by_total_clones(store, n)
        .into_iter()
        .filter_map(|entry| {
            store
                .repositories
                .get(&entry.name)
                .map(|record| (entry.name, repository_trend(record)))
        })
        .collect()
}

/// Headline numbers for the console and markdown summaries.
pub fn summarize(store: &Store) -> StoreSummary {
    let latest = store.cumulative.iter().next_back();
    let total_clones = latest.map(|(_, entry)| entry.total_clones).unwrap_or(0);
    let days_tracked = store.cumulative.len();

    let average_daily_clones = if days_tracked > 0 {
        total_clones as f64 / days_tracked as f64
    } else {
        0.0
    };

    StoreSummary {
        total_clones,
        days_tracked,
        average_daily_clones,
        repositories_tracked: store
            .repositories
            .values()
            .filter(|record| record.has_data())
            .count(),
        latest_date: latest.map(|(date, _)| *date),
    }
}
