//! Greedy victim selection for the deletion scheduler.
//!
//! Files are considered strictly in discovery order (`first_seen` ascending),
//! never by last access. The walk accumulates candidates until both the
//! temporal-quota and hard-limit overages are covered, then keeps advancing
//! only to pick up files that have outlived the maximum persistence window,
//! which are evicted unconditionally.

use chrono::{DateTime, Utc};

use crate::{age_days, temporal_weight, FileUsage};

/// How far a user is over their budgets. Either value may be negative or
/// zero, in which case that budget exerts no pressure on the walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvictionPressure {
    /// `quota_used - quota_size`, in byte-days.
    pub over_quota: i64,
    /// `total_used - hard_limit_size`, in bytes.
    pub over_limit: i64,
}

impl EvictionPressure {
    fn quota_covered(&self, quota_delete: i64) -> bool {
        self.over_quota <= 0 || quota_delete > self.over_quota
    }

    fn limit_covered(&self, hard_delete: i64) -> bool {
        self.over_limit <= 0 || hard_delete > self.over_limit
    }
}

/// Whether any budget or persistence trigger requires a scheduling pass.
pub fn needs_eviction(
    pressure: EvictionPressure,
    files: &[FileUsage],
    now: DateTime<Utc>,
    max_persistence_days: i64,
) -> bool {
    pressure.over_quota > 0
        || pressure.over_limit > 0
        || files
            .iter()
            .any(|f| age_days(f.first_seen, now) >= max_persistence_days)
}

/// Select the ordered victim set for one user.
///
/// The returned files are in discovery order. The set is empty when no
/// pressure exists and no file is over-age.
pub fn select_victims(
    mut files: Vec<FileUsage>,
    now: DateTime<Utc>,
    pressure: EvictionPressure,
    max_persistence_days: i64,
) -> Vec<FileUsage> {
    files.sort_by(|a, b| {
        a.first_seen
            .cmp(&b.first_seen)
            .then(a.file_id.cmp(&b.file_id))
    });

    let mut quota_delete = 0i64;
    let mut hard_delete = 0i64;
    let mut victims = Vec::new();

    for f in files {
        let age = age_days(f.first_seen, now);
        let over_age = age >= max_persistence_days;
        let covered = pressure.quota_covered(quota_delete) && pressure.limit_covered(hard_delete);
        if covered && !over_age {
            // Budgets are satisfied; only over-age stragglers are still taken.
            continue;
        }
        quota_delete += temporal_weight(f.size, age);
        hard_delete += f.size;
        victims.push(f);
    }

    victims
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
    fn test_no_pressure_no_victims() {
        let now = Utc::now();
        let files = vec![file(1, 10, 3, now), file(2, 20, 1, now)];
        let pressure = EvictionPressure {
            over_quota: -50,
            over_limit: -50,
        };
        assert!(!needs_eviction(pressure, &files, now, 365));
        assert!(select_victims(files, now, pressure, 365).is_empty());
    }

    #[test]
    fn test_oldest_file_selected_first() {
        // quota_size=100, a: 60 bytes seen 5 days ago, b: 60 bytes seen 1 day
        // ago. quota_used = 60*6 + 60*2 = 480, over_quota = 380. The walk
        // takes `a` (360 byte-days, not yet > 380), then `b` (480 > 380).
        let now = Utc::now();
        let files = vec![file(2, 60, 1, now), file(1, 60, 5, now)];
        let pressure = EvictionPressure {
            over_quota: 380,
            over_limit: -1,
        };
        let victims = select_victims(files, now, pressure, 365);
        assert_eq!(
            victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_walk_stops_once_quota_covered() {
        let now = Utc::now();
        // Oldest file alone covers the overage; the rest survive.
        let files = vec![file(1, 100, 9, now), file(2, 100, 1, now), file(3, 100, 0, now)];
        let pressure = EvictionPressure {
            over_quota: 500,
            over_limit: -1,
        };
        let victims = select_victims(files, now, pressure, 365);
        assert_eq!(
            victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn test_hard_limit_pressure_extends_walk() {
        let now = Utc::now();
        // Temporal pressure is covered by the first file, but the byte
        // overage still needs a second one.
        let files = vec![file(1, 100, 9, now), file(2, 100, 1, now), file(3, 100, 0, now)];
        let pressure = EvictionPressure {
            over_quota: 500,
            over_limit: 150,
        };
        let victims = select_victims(files, now, pressure, 365);
        assert_eq!(
            victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_over_age_file_always_selected() {
        let now = Utc::now();
        let files = vec![file(1, 10, 400, now), file(2, 10, 2, now)];
        let pressure = EvictionPressure {
            over_quota: -100,
            over_limit: -100,
        };
        assert!(needs_eviction(pressure, &files, now, 365));
        let victims = select_victims(files, now, pressure, 365);
        assert_eq!(
            victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn test_over_age_straggler_taken_after_budgets_covered() {
        let now = Utc::now();
        // File 1 alone covers the quota overage, but file 2 is also past max
        // persistence and must still be swept up; file 3 survives.
        let files = vec![file(1, 100, 400, now), file(2, 10, 380, now), file(3, 100, 1, now)];
        let pressure = EvictionPressure {
            over_quota: 500,
            over_limit: -1,
        };
        let victims = select_victims(files, now, pressure, 365);
        assert_eq!(
            victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_zero_overage_exerts_no_pressure() {
        let now = Utc::now();
        // Exactly at quota with one over-age file: only the over-age file is
        // selected.
        let files = vec![file(1, 10, 400, now), file(2, 50, 1, now)];
        let pressure = EvictionPressure {
            over_quota: 0,
            over_limit: 0,
        };
        let victims = select_victims(files, now, pressure, 365);
        assert_eq!(
            victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn test_victims_in_discovery_order() {
        let now = Utc::now();
        let files = vec![file(3, 10, 1, now), file(1, 10, 7, now), file(2, 10, 3, now)];
        let pressure = EvictionPressure {
            over_quota: 1_000_000,
            over_limit: -1,
        };
        let victims = select_victims(files, now, pressure, 365);
        assert_eq!(
            victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
