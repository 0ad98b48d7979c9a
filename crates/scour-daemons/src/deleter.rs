//! Execution of due deletion batches.
//!
//! A file whose modification time is at or after the batch's entry time was
//! touched during the notice window and is reprieved: the record survives
//! and the file becomes eligible again on the next scheduling pass. A file
//! whose backing path is already gone is a catalog inconsistency and its
//! record is dropped outright. Everything else is unlinked; if the unlink
//! fails the record is kept so a later batch retries the eviction.

use std::path::Path;

use chrono::{DateTime, Utc};
use scour_db::types::{CacheVolumeRow, UserRow};
use scour_db::{deletions, files, PgPool};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::notify;
use crate::quota;

/// What to do with one file referenced by a due batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Unlink the backing file and drop the record.
    Unlink,
    /// Backing file already gone; drop the stale record.
    DropRecord,
    /// Touched during the notice window; leave record and file alone.
    Reprieve,
}

/// Decide a file's fate from its modification time (`None` = stat failed,
/// the file is gone) and the batch's entry time.
pub fn disposition(mtime: Option<DateTime<Utc>>, time_entered: DateTime<Utc>) -> Disposition {
    match mtime {
        None => Disposition::DropRecord,
        Some(t) if t >= time_entered => Disposition::Reprieve,
        Some(_) => Disposition::Unlink,
    }
}

/// Execute all of a user's due deletion batches.
pub async fn delete_user(
    pool: &PgPool,
    volume: &CacheVolumeRow,
    user: &UserRow,
    now: DateTime<Utc>,
) -> Result<()> {
    let batches = deletions::due_for_user(pool, user.id, now).await?;
    if batches.is_empty() {
        return Ok(());
    }

    let mountpoint = Path::new(&volume.mountpoint);
    let mut removed_paths = Vec::new();
    let mut freed_bytes = 0i64;
    let mut reprieved = 0usize;

    for batch in &batches {
        for file in deletions::files_for(pool, batch.id).await? {
            let full_path = mountpoint.join(&file.path);
            let mtime = match tokio::fs::metadata(&full_path).await {
                Ok(md) => md.modified().ok().map(DateTime::<Utc>::from),
                Err(_) => None,
            };

            match disposition(mtime, batch.time_entered) {
                Disposition::Reprieve => {
                    debug!(user = %user.name, path = %file.path, "file touched, reprieved");
                    reprieved += 1;
                }
                Disposition::DropRecord => {
                    info!(user = %user.name, path = %file.path, "backing file gone, dropping record");
                    files::delete(pool, file.id).await?;
                }
                Disposition::Unlink => match tokio::fs::remove_file(&full_path).await {
                    Ok(()) => {
                        info!(user = %user.name, path = %file.path, "deleted file");
                        files::delete(pool, file.id).await?;
                        freed_bytes += file.size;
                        removed_paths.push(file.path);
                    }
                    Err(e) => {
                        // Record stays so the file keeps counting against the
                        // quota and is rescheduled on a later pass.
                        error!(
                            user = %user.name,
                            path = %full_path.display(),
                            error = %e,
                            "could not delete file"
                        );
                    }
                },
            }
        }
    }

    quota::recompute_user(pool, user, now).await?;

    // A batch is consumed even when some of its files were reprieved;
    // survivors are picked up again by the next scheduling pass.
    for batch in &batches {
        deletions::delete(pool, batch.id).await?;
    }

    info!(
        user = %user.name,
        removed = removed_paths.len(),
        reprieved,
        freed_bytes,
        "processed deletion batches"
    );

    notify::notify_deleted(pool, volume, user, &removed_paths, now).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_untouched_file_is_unlinked() {
        let entered = Utc::now();
        let mtime = Some(entered - Duration::hours(5));
        assert_eq!(disposition(mtime, entered), Disposition::Unlink);
    }

    #[test]
    fn test_touched_file_is_reprieved() {
        let entered = Utc::now();
        assert_eq!(
            disposition(Some(entered + Duration::minutes(1)), entered),
            Disposition::Reprieve
        );
    }

    #[test]
    fn test_touch_at_entry_instant_is_reprieved() {
        let entered = Utc::now();
        assert_eq!(disposition(Some(entered), entered), Disposition::Reprieve);
    }

    #[test]
    fn test_vanished_file_drops_record() {
        assert_eq!(disposition(None, Utc::now()), Disposition::DropRecord);
    }
}
