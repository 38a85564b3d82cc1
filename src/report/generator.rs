//! Markdown summary generation.
//!
//! This module builds `STATS_SUMMARY.md` from the clone store: overall
//! totals, repository counts and the top repositories by clones.

use crate::analysis::{summarize, top_repositories_by_total_clones};
use crate::models::{RepositoryTotal, Store, StoreSummary};
use chrono::NaiveDateTime;

/// Generate the complete markdown summary.
pub fn generate_stats_summary(store: &Store, top_n: usize) -> String {
    let summary = summarize(store);
    let mut output = String::new();

    output.push_str("# 📊 Clone Statistics Summary\n\n");
    output.push_str(&format!(
        "**Last Updated:** {}\n\n",
        format_last_updated(store.last_updated)
    ));

    output.push_str(&generate_overall_section(&summary));
    output.push_str(&generate_repository_section(&summary));
    output.push_str(&generate_top_repositories_section(
        top_n,
        &top_repositories_by_total_clones(store, top_n),
    ));

    output
}

fn format_last_updated(last_updated: Option<NaiveDateTime>) -> String {
    last_updated
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Overall statistics, omitted when no day is tracked.
fn generate_overall_section(summary: &StoreSummary) -> String {
    if summary.days_tracked == 0 {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Overall Statistics\n\n");
    section.push_str(&format!(
        "- **Total Clones (All Time):** {}\n",
        format_thousands(summary.total_clones)
    ));
    section.push_str(&format!("- **Days Tracked:** {}\n", summary.days_tracked));
    section.push_str(&format!(
        "- **Average Daily Clones:** {:.1}\n\n",
        summary.average_daily_clones
    ));

    section
}

fn generate_repository_section(summary: &StoreSummary) -> String {
    let mut section = String::new();

    section.push_str("## Repository Statistics\n\n");
    section.push_str(&format!(
        "- **Repositories Tracked:** {}\n\n",
        summary.repositories_tracked
    ));

    section
}

fn generate_top_repositories_section(top_n: usize, top: &[RepositoryTotal]) -> String {
    if top.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str(&format!("## Top {} Repositories by Clones\n\n", top_n));
    for (i, entry) in top.iter().enumerate() {
        section.push_str(&format!(
            "{}. **{}**: {} clones\n",
            i + 1,
            entry.name,
            format_thousands(entry.total)
        ));
    }

    section
}

/// Format an integer with `,` thousands separators.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::recompute_cumulative;
    use crate::models::CloneObservation;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_store() -> Store {
        let mut store = Store::default();
        store.record_mut("big").merge_daily_clones(&[
            CloneObservation::new(date("2024-01-01"), 1200, 40),
            CloneObservation::new(date("2024-01-02"), 300, 20),
        ]);
        store
            .record_mut("small")
            .merge_daily_clones(&[CloneObservation::new(date("2024-01-02"), 4, 2)]);
        store.record_mut("never-cloned");
        store.last_updated = NaiveDate::from_ymd_opt(2024, 1, 3)
            .and_then(|d| d.and_hms_opt(4, 5, 6));
        recompute_cumulative(&mut store);
        store
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(100000), "100,000");
    }

    #[test]
    fn test_generate_stats_summary() {
        let markdown = generate_stats_summary(&create_test_store(), 10);

        assert!(markdown.starts_with("# 📊 Clone Statistics Summary"));
        assert!(markdown.contains("**Last Updated:** 2024-01-03 04:05:06"));
        assert!(markdown.contains("- **Total Clones (All Time):** 1,504"));
        assert!(markdown.contains("- **Days Tracked:** 2"));
        assert!(markdown.contains("- **Average Daily Clones:** 752.0"));
        assert!(markdown.contains("- **Repositories Tracked:** 2"));
        // The heading names the configured size even with fewer entries.
        assert!(markdown.contains("## Top 10 Repositories by Clones"));

        let big = markdown.find("1. **big**: 1,500 clones").unwrap();
        let small = markdown.find("2. **small**: 4 clones").unwrap();
        assert!(big < small);
        assert!(!markdown.contains("never-cloned"));
    }

    #[test]
    fn test_summary_respects_top_n() {
        let markdown = generate_stats_summary(&create_test_store(), 1);
        assert!(markdown.contains("## Top 1 Repositories by Clones"));
        assert!(!markdown.contains("**small**"));
    }

    #[test]
    fn test_empty_store_summary() {
        let markdown = generate_stats_summary(&Store::default(), 10);

        assert!(markdown.contains("**Last Updated:** Unknown"));
        assert!(!markdown.contains("## Overall Statistics"));
        assert!(markdown.contains("- **Repositories Tracked:** 0"));
        assert!(!markdown.contains("## Top"));
    }
}
