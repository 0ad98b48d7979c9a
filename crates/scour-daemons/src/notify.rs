//! User-facing notifications for scheduled and executed deletions.
//!
//! Messages are queued on the catalog's notification outbox; delivery is an
//! external mailer's job. Queueing is best-effort and never affects the
//! eviction pipeline: a failure is logged and swallowed.

use std::path::Path;

use chrono::{DateTime, Utc};
use scour_db::types::{CacheVolumeRow, UserRow};
use scour_db::{notifications, PgPool};
use tracing::warn;

const SCHEDULED_SUBJECT: &str = "[scour] Notification of scheduled file deletion";
const DELETED_SUBJECT: &str = "[scour] Files deleted";

fn format_utc(t: DateTime<Utc>) -> String {
    t.format("%d %b %Y %H:%M").to_string()
}

/// Body for the "files will be deleted" notice.
pub fn scheduled_body(mountpoint: &str, paths: &[String], time_delete: DateTime<Utc>) -> String {
    let mut body = format!(
        "The following files will be deleted from the scratch cache on {} UTC\n\n",
        format_utc(time_delete)
    );
    for p in paths {
        body.push_str(&format!("{}\n", Path::new(mountpoint).join(p).display()));
    }
    body
}

/// Body for the "files have been deleted" notice.
pub fn deleted_body(mountpoint: &str, paths: &[String], when: DateTime<Utc>) -> String {
    let mut body = format!(
        "The following files have been deleted on {} UTC\n\n",
        format_utc(when)
    );
    for p in paths {
        body.push_str(&format!("{}\n", Path::new(mountpoint).join(p).display()));
    }
    body
}

/// Queue a notice that the listed files are scheduled for deletion.
pub async fn notify_scheduled(
    pool: &PgPool,
    volume: &CacheVolumeRow,
    user: &UserRow,
    paths: &[String],
    time_delete: DateTime<Utc>,
) {
    if !user.notify || paths.is_empty() {
        return;
    }
    let body = scheduled_body(&volume.mountpoint, paths, time_delete);
    if let Err(e) = notifications::create(pool, &user.email, SCHEDULED_SUBJECT, &body).await {
        warn!(user = %user.name, error = %e, "failed to queue deletion notice");
    }
}

/// Queue a notice listing the files that were actually removed.
pub async fn notify_deleted(
    pool: &PgPool,
    volume: &CacheVolumeRow,
    user: &UserRow,
    paths: &[String],
    when: DateTime<Utc>,
) {
    if !user.notify || paths.is_empty() {
        return;
    }
    let body = deleted_body(&volume.mountpoint, paths, when);
    if let Err(e) = notifications::create(pool, &user.email, DELETED_SUBJECT, &body).await {
        warn!(user = %user.name, error = %e, "failed to queue deletion report");
    }
}
