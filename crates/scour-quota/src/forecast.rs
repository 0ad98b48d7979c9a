//! Read-only projection of the next eviction event.
//!
//! The forecast mirrors the scheduler's discovery-order walk but considers
//! only the temporal-quota criterion: the hard byte limit and the maximum
//! persistence window play no part here. That asymmetry with the scheduler
//! is deliberate and load-bearing for the reporting surface.

use chrono::{DateTime, Duration, Utc};

use crate::{age_days, temporal_weight, FileUsage};

/// Budget fields of a user account needed to project the next eviction.
#[derive(Debug, Clone, Copy)]
pub struct UserBudget {
    pub quota_size: i64,
    pub quota_used: i64,
    pub total_used: i64,
}

/// Projected eviction event for one user.
///
/// `time_predict` is `None` when the user stores nothing; the projection is
/// then empty and no date is forecast.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub time_predict: Option<DateTime<Utc>>,
    pub over_quota: i64,
    pub victims: Vec<FileUsage>,
}

/// Project when deletions will start for a user and which files they will
/// take. Pure; mutates nothing.
pub fn project(
    budget: UserBudget,
    mut files: Vec<FileUsage>,
    now: DateTime<Utc>,
    grace_hours: i64,
) -> Projection {
    if budget.total_used == 0 {
        return Projection::default();
    }

    // Days until the byte-day budget runs out at the current storage level.
    let days_until_exhaustion =
        (budget.quota_size - budget.quota_used).div_euclid(budget.total_used) + 1;
    let time_predict = now + Duration::hours(grace_hours * days_until_exhaustion);
    let over_quota =
        days_until_exhaustion * budget.total_used + budget.quota_used - budget.quota_size;

    files.sort_by(|a, b| {
        a.first_seen
            .cmp(&b.first_seen)
            .then(a.file_id.cmp(&b.file_id))
    });

    let mut quota_delete = 0i64;
    let mut victims = Vec::new();
    for f in files {
        if quota_delete > over_quota {
            break;
        }
        quota_delete += temporal_weight(f.size, age_days(f.first_seen, now));
        victims.push(f);
    }

    Projection {
        time_predict: Some(time_predict),
        over_quota,
        victims,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: i64, size: i64, days_ago: i64, now: DateTime<Utc>) -> FileUsage {
        FileUsage {
            file_id: id,
            path: format!("user_cache/fred/file{}", id),
            size,
            first_seen: now - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_empty_cache_yields_empty_projection() {
        let budget = UserBudget {
            quota_size: 1000,
            quota_used: 0,
            total_used: 0,
        };
        let projection = project(budget, Vec::new(), Utc::now(), 24);
        assert!(projection.time_predict.is_none());
        assert!(projection.victims.is_empty());
        assert_eq!(projection.over_quota, 0);
    }

    #[test]
    fn test_projection_date_scales_with_headroom() {
        let now = Utc::now();
        let budget = UserBudget {
            quota_size: 1000,
            quota_used: 400,
            total_used: 200,
        };
        // (1000 - 400) / 200 + 1 = 4 grace periods out.
        let projection = project(budget, vec![file(1, 200, 1, now)], now, 24);
        assert_eq!(projection.time_predict, Some(now + Duration::hours(96)));
        // 4 * 200 + 400 - 1000 = 200 byte-days over at that point.
        assert_eq!(projection.over_quota, 200);
    }

    #[test]
    fn test_victims_walk_oldest_first_until_covered() {
        let now = Utc::now();
        let budget = UserBudget {
            quota_size: 100,
            quota_used: 480,
            total_used: 120,
        };
        // days = (100-480).div_euclid(120) + 1 = -4 + 1 = -3;
        // over_quota = -3*120 + 480 - 100 = 20. The oldest file's weight
        // (360) covers it alone.
        let files = vec![file(2, 60, 1, now), file(1, 60, 5, now)];
        let projection = project(budget, files, now, 24);
        assert_eq!(
            projection.victims.iter().map(|f| f.file_id).collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn test_forecast_ignores_hard_limit() {
        let now = Utc::now();
        // A user far over any plausible hard limit but with temporal
        // headroom still gets a small victim list; bytes are not the
        // criterion here.
        let budget = UserBudget {
            quota_size: 10_000,
            quota_used: 100,
            total_used: 100,
        };
        let projection = project(budget, vec![file(1, 100, 0, now)], now, 24);
        assert_eq!(projection.victims.len(), 1);
        assert!(projection.time_predict.is_some());
    }
}
