//! Aggregate usage totals for a user's cached files.

use chrono::{DateTime, Utc};

use crate::{age_days, temporal_weight, FileUsage};

/// Recomputed usage for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTotals {
    /// Byte-day usage against the temporal quota.
    pub quota_used: i64,
    /// Raw byte usage, no time weighting.
    pub total_used: i64,
}

/// Sum temporal and raw usage over all of a user's cached files.
pub fn usage_totals(files: &[FileUsage], now: DateTime<Utc>) -> UsageTotals {
    let mut totals = UsageTotals::default();
    for f in files {
        totals.quota_used += temporal_weight(f.size, age_days(f.first_seen, now));
        totals.total_used += f.size;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn file(id: i64, size: i64, days_ago: i64, now: DateTime<Utc>) -> FileUsage {
        FileUsage {
            file_id: id,
            path: format!("user_cache/fred/file{}", id),
            size,
            first_seen: now - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_usage_totals_empty() {
        assert_eq!(usage_totals(&[], Utc::now()), UsageTotals::default());
    }

    #[test]
    fn test_usage_totals_weights_by_age() {
        // Files of 60 bytes seen 5 days and 1 day ago: 60*6 + 60*2 = 480
        // byte-days, 120 raw bytes.
        let now = Utc::now();
        let files = vec![file(1, 60, 5, now), file(2, 60, 1, now)];
        let totals = usage_totals(&files, now);
        assert_eq!(totals.quota_used, 480);
        assert_eq!(totals.total_used, 120);
    }

    #[test]
    fn test_usage_totals_fresh_file_counts_one_day() {
        let now = Utc::now();
        let files = vec![file(1, 1000, 0, now)];
        let totals = usage_totals(&files, now);
        assert_eq!(totals.quota_used, 1000);
        assert_eq!(totals.total_used, 1000);
    }
}
