//! Data models for the clone tracker.
//!
//! This module contains the persisted store layout, the per-repository
//! daily records, the GitHub API payloads consumed by the collector and
//! the reduced views used by the reporter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Clone counters for a single repository on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayStat {
    /// Number of clones on that day.
    pub count: u64,
    /// Number of unique cloners on that day.
    pub uniques: u64,
}

/// One daily sample as reported by the traffic endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneObservation {
    pub date: NaiveDate,
    pub count: u64,
    pub uniques: u64,
}

impl CloneObservation {
    pub fn new(date: NaiveDate, count: u64, uniques: u64) -> Self {
        Self {
            date,
            count,
            uniques,
        }
    }

    fn stat(&self) -> DayStat {
        DayStat {
            count: self.count,
            uniques: self.uniques,
        }
    }
}

/// What happened while merging one window of observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Dates seen for the first time.
    pub inserted: usize,
    /// Dates whose stored entry was dominated by a larger count.
    pub replaced: usize,
    /// Dates left untouched (equal or smaller count).
    pub kept: usize,
}

impl MergeOutcome {
    /// Number of dates whose stored value changed.
    pub fn changed(&self) -> usize {
        self.inserted + self.replaced
    }
}

/// Recorded clone history of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Daily counters keyed by calendar date.
    #[serde(default)]
    pub daily_clones: BTreeMap<NaiveDate, DayStat>,
}

impl RepositoryRecord {
    /// Merge a window of observations into this record.
    ///
    /// A date that is not yet recorded is inserted. A recorded date is only
    /// replaced when the new `count` is strictly greater; the whole entry
    /// (including `uniques`) is swapped, never merged field by field. Merging
    /// the same or a smaller observation again is a no-op.
    pub fn merge_daily_clones(&mut self, observations: &[CloneObservation]) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for observation in observations {
            match self.daily_clones.entry(observation.date) {
                Entry::Vacant(slot) => {
                    slot.insert(observation.stat());
                    outcome.inserted += 1;
                }
                Entry::Occupied(mut slot) => {
                    if observation.count > slot.get().count {
                        slot.insert(observation.stat());
                        outcome.replaced += 1;
                    } else {
                        outcome.kept += 1;
                    }
                }
            }
        }

        outcome
    }

    /// Sum of clone counts over every recorded day.
    pub fn total_clones(&self) -> u64 {
        self.daily_clones.values().map(|day| day.count).sum()
    }

    /// Whether at least one day has been recorded.
    pub fn has_data(&self) -> bool {
        !self.daily_clones.is_empty()
    }
}

/// Cross-repository figures for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CumulativeEntry {
    /// Running sum of `daily_clones` up to and including this date.
    pub total_clones: u64,
    /// Sum of every repository's count for this date.
    pub daily_clones: u64,
}

/// The persisted clone store.
///
/// `cumulative` is derived from `repositories` and rebuilt on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryRecord>,
    #[serde(default)]
    pub cumulative: BTreeMap<NaiveDate, CumulativeEntry>,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

impl Store {
    /// Get the record for a repository, creating an empty one on first sight.
    pub fn record_mut(&mut self, name: &str) -> &mut RepositoryRecord {
        self.repositories.entry(name.to_string()).or_default()
    }
}

/// Repository entry from the `/user/repos` listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
}

/// One day in a traffic response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloneDay {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
    pub uniques: u64,
}

/// Response of `/repos/{owner}/{repo}/traffic/clones`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloneTraffic {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
    /// Absent when the API returned an unexpected body.
    #[serde(default)]
    pub clones: Option<Vec<CloneDay>>,
}

impl CloneTraffic {
    /// Daily samples keyed by their UTC calendar date, if the response had any.
    pub fn observations(&self) -> Option<Vec<CloneObservation>> {
        self.clones.as_ref().map(|days| {
            days.iter()
                .map(|day| CloneObservation::new(day.timestamp.date_naive(), day.count, day.uniques))
                .collect()
        })
    }
}

/// A repository and its all-time clone count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryTotal {
    pub name: String,
    pub total: u64,
}

/// A point on a single repository's cumulative trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub cumulative: u64,
}

/// Headline numbers derived from a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSummary {
    /// Running total at the latest tracked date.
    pub total_clones: u64,
    /// Number of dates in the cumulative series.
    pub days_tracked: usize,
    /// `total_clones / days_tracked`, zero when nothing is tracked.
    pub average_daily_clones: f64,
    /// Repositories with at least one recorded day.
    pub repositories_tracked: usize,
    /// Latest date in the cumulative series.
    pub latest_date: Option<NaiveDate>,
}
