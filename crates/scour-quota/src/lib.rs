//! Temporal-quota arithmetic for the Scour scratch cache.
//!
//! A user's quota is a byte-day budget: a file that has persisted for N whole
//! days consumes `size * (N + 1)` units, so every file carries at least one
//! day's weight from the moment it is first seen. This crate holds the
//! canonical weight formula, the aggregate usage computation, the greedy
//! eviction walk used by the scheduling daemon, and the read-only eviction
//! forecast. It performs no I/O; callers feed it catalog snapshots.

pub mod eviction;
pub mod forecast;
pub mod usage;

use chrono::{DateTime, Utc};

/// The view of a cached file needed by the quota arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUsage {
    pub file_id: i64,
    pub path: String,
    pub size: i64,
    pub first_seen: DateTime<Utc>,
}

/// Whole days a file has persisted, clamped to zero.
pub fn age_days(first_seen: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - first_seen).num_days().max(0)
}

/// Byte-day weight of a file: `size * (age_days + 1)`.
///
/// This is the single canonical formula; the usage recompute, the eviction
/// walk and the forecast all go through it.
pub fn temporal_weight(size: i64, age_days: i64) -> i64 {
    size * (age_days + 1)
}
