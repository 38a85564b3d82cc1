//! Chart and summary output.
//!
//! Every output is derived from the store alone. A step with no data is
//! skipped, a step that fails is logged and the remaining ones still run.

pub mod charts;
pub mod font;
pub mod generator;

pub use generator::generate_stats_summary;

use self::charts::ChartSize;
use crate::analysis::{top_repositories_by_total_clones, top_repository_trends};
use crate::config::ReportConfig;
use crate::models::Store;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CUMULATIVE_CHART: &str = "cumulative_clones.png";
pub const DAILY_CHART: &str = "daily_activity.png";
pub const BREAKDOWN_CHART: &str = "repository_breakdown.png";
pub const TRENDS_CHART: &str = "repository_trends.png";
pub const SUMMARY_FILE: &str = "STATS_SUMMARY.md";

/// Files produced by one visualizer run.
#[derive(Debug, Default)]
pub struct ReportOutcome {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

/// Render all charts and the markdown summary into `output_dir`.
///
/// Only failing to create the output directory is an error.
pub fn generate_reports(store: &Store, output_dir: &Path, options: &ReportConfig) -> Result<ReportOutcome> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory {}", output_dir.display())
    })?;

    let size = ChartSize::new(options.chart_width, options.chart_height);
    let mut outcome = ReportOutcome::default();

    let has_days = !store.cumulative.is_empty();
    run_step(&mut outcome, output_dir, CUMULATIVE_CHART, has_days, |path| {
        charts::render_cumulative_clones(&store.cumulative, size, path)
    });
    run_step(&mut outcome, output_dir, DAILY_CHART, has_days, |path| {
        charts::render_daily_activity(&store.cumulative, size, path)
    });

    let breakdown = top_repositories_by_total_clones(store, options.breakdown_top);
    run_step(&mut outcome, output_dir, BREAKDOWN_CHART, !breakdown.is_empty(), |path| {
        charts::render_repository_breakdown(&breakdown, size, path)
    });

    let trends = top_repository_trends(store, options.trend_top);
    run_step(&mut outcome, output_dir, TRENDS_CHART, !trends.is_empty(), |path| {
        charts::render_repository_trends(&trends, size, path)
    });

    run_step(&mut outcome, output_dir, SUMMARY_FILE, true, |path| {
        let markdown = generate_stats_summary(store, options.summary_top);
        std::fs::write(path, markdown)
            .with_context(|| format!("Failed to write {}", path.display()))
    });

    Ok(outcome)
}

fn run_step<F>(outcome: &mut ReportOutcome, output_dir: &Path, name: &'static str, has_data: bool, step: F)
where
    F: FnOnce(&Path) -> Result<()>,
{
    if !has_data {
        warn!("No data available for {}, skipping", name);
        println!("⚠️  No data available for {}", name);
        outcome.skipped.push(name);
        return;
    }

    let path = output_dir.join(name);
    match step(&path) {
        Ok(()) => {
            info!("Saved {}", path.display());
            println!("✅ Saved: {}", path.display());
            outcome.written.push(path);
        }
        Err(e) => {
            warn!("Failed to generate {}: {:#}", name, e);
            outcome.failed.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::recompute_cumulative;
    use crate::models::CloneObservation;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn small_options() -> ReportConfig {
        ReportConfig {
            chart_width: 480,
            chart_height: 320,
            ..ReportConfig::default()
        }
    }

    #[test]
    fn test_generate_reports_writes_every_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("graphs");

        let mut store = Store::default();
        store.record_mut("a").merge_daily_clones(&[
            CloneObservation::new(date("2024-01-01"), 5, 3),
            CloneObservation::new(date("2024-01-02"), 3, 1),
        ]);
        store
            .record_mut("b")
            .merge_daily_clones(&[CloneObservation::new(date("2024-01-01"), 2, 2)]);
        recompute_cumulative(&mut store);

        let outcome = generate_reports(&store, &output, &small_options()).unwrap();

        assert_eq!(outcome.written.len(), 5);
        assert!(outcome.skipped.is_empty());
        assert!(outcome.failed.is_empty());
        for name in [CUMULATIVE_CHART, DAILY_CHART, BREAKDOWN_CHART, TRENDS_CHART, SUMMARY_FILE] {
            assert!(output.join(name).exists(), "{}", name);
        }
    }

    #[test]
    fn test_generate_reports_on_empty_store_only_writes_summary() {
        let dir = TempDir::new().unwrap();

        let outcome = generate_reports(&Store::default(), dir.path(), &small_options()).unwrap();

        assert_eq!(outcome.written, vec![dir.path().join(SUMMARY_FILE)]);
        assert_eq!(
            outcome.skipped,
            vec![CUMULATIVE_CHART, DAILY_CHART, BREAKDOWN_CHART, TRENDS_CHART]
        );
    }

    #[test]
    fn test_zero_clone_repositories_skip_ranking_charts() {
        let dir = TempDir::new().unwrap();

        let mut store = Store::default();
        store
            .record_mut("quiet")
            .merge_daily_clones(&[CloneObservation::new(date("2024-01-01"), 0, 0)]);
        recompute_cumulative(&mut store);

        let outcome = generate_reports(&store, dir.path(), &small_options()).unwrap();

        assert!(outcome.skipped.contains(&BREAKDOWN_CHART));
        assert!(outcome.skipped.contains(&TRENDS_CHART));
        assert!(dir.path().join(CUMULATIVE_CHART).exists());
    }
}
