use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A storage area holding many users' cache directories.
///
/// `used_bytes` is a running aggregate maintained through signed deltas as
/// per-user passes complete; it is never recomputed wholesale, so parallel
/// passes over different users cannot double count.
#[derive(Debug, Clone, FromRow)]
pub struct CacheVolumeRow {
    pub id: i64,
    pub mountpoint: String,
    pub size_bytes: i64,
    pub allocated_bytes: i64,
    pub used_bytes: i64,
}

/// A cache user. `quota_used` and `total_used` are derived values, cached
/// here for cheap reads; the source of truth is the user's cached_files.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub notify: bool,
    pub quota_size: i64,
    pub quota_used: i64,
    pub hard_limit_size: i64,
    pub total_used: i64,
    pub cache_path: String,
    pub volume_id: i64,
}

/// One file in a user's cache area. `path` is relative to the volume
/// mountpoint; `first_seen` is set at discovery and never updated.
#[derive(Debug, Clone, FromRow)]
pub struct CachedFileRow {
    pub id: i64,
    pub user_id: i64,
    pub path: String,
    pub size: i64,
    pub first_seen: DateTime<Utc>,
}

/// A pending deletion batch: the files referenced through
/// `scheduled_deletion_files` will be removed at `time_delete` unless the
/// user touches them after `time_entered`.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduledDeletionRow {
    pub id: i64,
    pub user_id: i64,
    pub time_entered: DateTime<Utc>,
    pub time_delete: DateTime<Utc>,
}
