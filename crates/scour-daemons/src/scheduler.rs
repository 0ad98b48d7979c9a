//! Deletion scheduling for one user.
//!
//! When a user's byte-day quota or hard byte limit is exceeded, or any file
//! has outlived the maximum persistence window, the oldest files are
//! gathered into a deletion batch with a grace deadline. The user is told
//! which files are affected and has until the deadline to touch the ones
//! they want to keep. Scheduling is relentless: a reprieved file simply
//! comes around again on a later pass.

use chrono::{DateTime, Duration, Utc};
use scour_db::types::{CacheVolumeRow, UserRow};
use scour_db::{deletions, files, PgPool};
use scour_quota::eviction::{needs_eviction, select_victims, EvictionPressure};
use tracing::{debug, info};

use crate::config::DaemonConfig;
use crate::error::Result;
use crate::notify;
use crate::quota::usage_view;

/// Schedule a deletion batch for a user if their budgets demand one.
/// Returns the new batch id, or `None` when nothing was scheduled.
pub async fn schedule_user(
    pool: &PgPool,
    cfg: &DaemonConfig,
    volume: &CacheVolumeRow,
    user: &UserRow,
    now: DateTime<Utc>,
) -> Result<Option<i64>> {
    // One pending batch per user; the next one can only be entered after
    // the delete daemon has consumed this one.
    if deletions::has_pending(pool, user.id).await? {
        debug!(user = %user.name, "deletion already pending, skipping");
        return Ok(None);
    }

    let records = files::list_for_user(pool, user.id).await?;
    let usage = usage_view(&records);

    let pressure = EvictionPressure {
        over_quota: user.quota_used - user.quota_size,
        over_limit: user.total_used - user.hard_limit_size,
    };

    if !needs_eviction(pressure, &usage, now, cfg.max_persistence_days) {
        return Ok(None);
    }

    let victims = select_victims(usage, now, pressure, cfg.max_persistence_days);
    if victims.is_empty() {
        return Ok(None);
    }

    let time_delete = now + Duration::hours(cfg.deletion_grace_hours);
    let file_ids: Vec<i64> = victims.iter().map(|f| f.file_id).collect();
    let deletion_id = deletions::create(pool, user.id, now, time_delete, &file_ids).await?;

    info!(
        user = %user.name,
        files = victims.len(),
        over_quota = pressure.over_quota,
        over_limit = pressure.over_limit,
        time_delete = %time_delete,
        "scheduled deletion batch"
    );

    let paths: Vec<String> = victims.into_iter().map(|f| f.path).collect();
    notify::notify_scheduled(pool, volume, user, &paths, time_delete).await;

    Ok(Some(deletion_id))
}
