//! Per-user usage recompute and volume aggregate upkeep.

use chrono::{DateTime, Utc};
use scour_db::types::{CachedFileRow, UserRow};
use scour_db::{files, users, volumes, PgPool};
use scour_quota::usage::{usage_totals, UsageTotals};
use scour_quota::FileUsage;
use tracing::debug;

use crate::error::Result;

/// Project catalog rows into the view the quota arithmetic works on.
pub fn usage_view(records: &[CachedFileRow]) -> Vec<FileUsage> {
    records
        .iter()
        .map(|r| FileUsage {
            file_id: r.id,
            path: r.path.clone(),
            size: r.size,
            first_seen: r.first_seen,
        })
        .collect()
}

/// Recompute a user's temporal and raw usage from their cached files, write
/// the totals back onto the account, and roll the change in raw usage into
/// the volume's running aggregate.
///
/// `user` must be the row as loaded at the start of the pass: its
/// `total_used` is the previous value the signed volume delta is computed
/// against. Recomputing the volume aggregate from scratch instead would
/// double count under concurrent per-user passes.
pub async fn recompute_user(
    pool: &PgPool,
    user: &UserRow,
    now: DateTime<Utc>,
) -> Result<UsageTotals> {
    let records = files::list_for_user(pool, user.id).await?;
    let totals = usage_totals(&usage_view(&records), now);

    users::update_usage(pool, user.id, totals.quota_used, totals.total_used).await?;

    let delta = totals.total_used - user.total_used;
    if delta != 0 {
        volumes::add_used_delta(pool, user.volume_id, delta).await?;
    }

    debug!(
        user = %user.name,
        quota_used = totals.quota_used,
        total_used = totals.total_used,
        delta,
        "recomputed usage"
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_view_preserves_fields() {
        let now = Utc::now();
        let records = vec![CachedFileRow {
            id: 7,
            user_id: 1,
            path: "user_cache/fred/a.nc".to_string(),
            size: 42,
            first_seen: now,
        }];
        let view = usage_view(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].file_id, 7);
        assert_eq!(view[0].path, "user_cache/fred/a.nc");
        assert_eq!(view[0].size, 42);
        assert_eq!(view[0].first_seen, now);
    }
}
