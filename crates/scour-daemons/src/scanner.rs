//! Filesystem reconciliation for one user's cache area.
//!
//! The scan walks the user's subtree (following symlinks), then brings the
//! catalog in line with what is actually on disk: new files are recorded
//! with a first-seen timestamp, size drift is written back, and records
//! whose backing file vanished are dropped. Aggregate usage is not computed
//! here. Because the scan always compares catalog state against the real
//! filesystem, running it twice without filesystem changes is a no-op, and
//! redelivered scan requests are harmless.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use scour_db::types::{CacheVolumeRow, CachedFileRow, UserRow};
use scour_db::{files, PgPool};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::Result;

/// A regular file found on disk, path relative to the volume mountpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    pub path: String,
    pub size: i64,
}

/// Catalog mutations derived from comparing disk state with file records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanAction {
    Add { path: String, size: i64 },
    Resize { file_id: i64, size: i64 },
}

/// Counts of catalog mutations made by one scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    pub added: usize,
    pub resized: usize,
    pub removed: usize,
}

/// Walk a user's cache directory and collect every regular file with its
/// current size. Symbolic links are followed. Unreadable entries are logged
/// and skipped; they never abort the walk.
pub fn walk_cache_dir(mountpoint: &Path, cache_path: &str) -> Vec<FoundFile> {
    let root = mountpoint.join(cache_path);
    let mut found = Vec::new();

    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "could not read directory entry, skipping");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let size = match entry.metadata() {
            Ok(md) => md.len() as i64,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "could not stat file, skipping");
                continue;
            }
        };
        let relative = match entry.path().strip_prefix(mountpoint) {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(_) => {
                // A followed symlink escaped the mountpoint; record it under
                // its full path so the catalog still tracks the bytes.
                entry.path().to_string_lossy().into_owned()
            }
        };
        found.push(FoundFile {
            path: relative,
            size,
        });
    }

    found
}

/// Diff found files against the catalog: additions for unknown paths,
/// size updates where disk and catalog disagree. Pure.
pub fn plan_catalog_updates(records: &[CachedFileRow], found: &[FoundFile]) -> Vec<ScanAction> {
    let by_path: HashMap<&str, &CachedFileRow> =
        records.iter().map(|r| (r.path.as_str(), r)).collect();

    let mut actions = Vec::new();
    for f in found {
        match by_path.get(f.path.as_str()) {
            None => actions.push(ScanAction::Add {
                path: f.path.clone(),
                size: f.size,
            }),
            Some(record) if record.size != f.size => actions.push(ScanAction::Resize {
                file_id: record.id,
                size: f.size,
            }),
            Some(_) => {}
        }
    }
    actions
}

/// Records whose path did not appear in the walk. Each still gets an
/// existence check before removal, so a file the walk failed to stat is not
/// mistaken for a deleted one. Pure.
pub fn removal_candidates<'a>(
    records: &'a [CachedFileRow],
    found: &[FoundFile],
) -> Vec<&'a CachedFileRow> {
    let seen: std::collections::HashSet<&str> = found.iter().map(|f| f.path.as_str()).collect();
    records
        .iter()
        .filter(|r| !seen.contains(r.path.as_str()))
        .collect()
}

/// Reconcile the catalog with the filesystem for one user.
pub async fn scan_user(
    pool: &PgPool,
    volume: &CacheVolumeRow,
    user: &UserRow,
) -> Result<ScanStats> {
    let mountpoint = Path::new(&volume.mountpoint);
    let found = walk_cache_dir(mountpoint, &user.cache_path);
    let records = files::list_for_user(pool, user.id).await?;

    let mut stats = ScanStats::default();

    for action in plan_catalog_updates(&records, &found) {
        match action {
            ScanAction::Add { path, size } => {
                info!(user = %user.name, path = %path, size, "adding file");
                files::insert(pool, user.id, &path, size, Utc::now()).await?;
                stats.added += 1;
            }
            ScanAction::Resize { file_id, size } => {
                files::update_size(pool, file_id, size).await?;
                stats.resized += 1;
            }
        }
    }

    for record in removal_candidates(&records, &found) {
        let full_path = mountpoint.join(&record.path);
        match tokio::fs::try_exists(&full_path).await {
            Ok(false) => {
                info!(user = %user.name, path = %record.path, "removing record for vanished file");
                files::delete(pool, record.id).await?;
                stats.removed += 1;
            }
            Ok(true) => {}
            Err(e) => {
                warn!(path = %full_path.display(), error = %e, "could not check file, skipping");
            }
        }
    }

    info!(
        user = %user.name,
        added = stats.added,
        resized = stats.resized,
        removed = stats.removed,
        "scan complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::fs;

    fn record(id: i64, path: &str, size: i64) -> CachedFileRow {
        CachedFileRow {
            id,
            user_id: 1,
            path: path.to_string(),
            size,
            first_seen: DateTime::<Utc>::MIN_UTC,
        }
    }

    fn found(path: &str, size: i64) -> FoundFile {
        FoundFile {
            path: path.to_string(),
            size,
        }
    }

    #[test]
    fn test_walk_collects_regular_files_with_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("user_cache/fred");
        fs::create_dir_all(cache.join("sub")).unwrap();
        fs::write(cache.join("a.dat"), b"12345").unwrap();
        fs::write(cache.join("sub/b.dat"), b"666666").unwrap();

        let mut result = walk_cache_dir(dir.path(), "user_cache/fred");
        result.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            result,
            vec![
                found("user_cache/fred/a.dat", 5),
                found("user_cache/fred/sub/b.dat", 6),
            ]
        );
    }

    #[test]
    fn test_walk_skips_directories_and_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("user_cache/empty/sub")).unwrap();
        assert!(walk_cache_dir(dir.path(), "user_cache/empty").is_empty());
        // A root that does not exist yields nothing rather than an error.
        assert!(walk_cache_dir(dir.path(), "user_cache/nobody").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("user_cache/fred");
        fs::create_dir_all(&cache).unwrap();
        let target = dir.path().join("outside.dat");
        fs::write(&target, b"1234567").unwrap();
        std::os::unix::fs::symlink(&target, cache.join("link.dat")).unwrap();

        let result = walk_cache_dir(dir.path(), "user_cache/fred");
        assert_eq!(result, vec![found("user_cache/fred/link.dat", 7)]);
    }

    #[test]
    fn test_plan_adds_unknown_files() {
        let records = vec![record(1, "user_cache/fred/a", 5)];
        let on_disk = vec![found("user_cache/fred/a", 5), found("user_cache/fred/b", 9)];
        assert_eq!(
            plan_catalog_updates(&records, &on_disk),
            vec![ScanAction::Add {
                path: "user_cache/fred/b".to_string(),
                size: 9
            }]
        );
    }

    #[test]
    fn test_plan_resizes_changed_files() {
        let records = vec![record(1, "user_cache/fred/a", 5)];
        let on_disk = vec![found("user_cache/fred/a", 50)];
        assert_eq!(
            plan_catalog_updates(&records, &on_disk),
            vec![ScanAction::Resize {
                file_id: 1,
                size: 50
            }]
        );
    }

    #[test]
    fn test_plan_is_idempotent_when_catalog_matches_disk() {
        let records = vec![
            record(1, "user_cache/fred/a", 5),
            record(2, "user_cache/fred/b", 9),
        ];
        let on_disk = vec![found("user_cache/fred/a", 5), found("user_cache/fred/b", 9)];
        assert!(plan_catalog_updates(&records, &on_disk).is_empty());
        assert!(removal_candidates(&records, &on_disk).is_empty());
    }

    #[test]
    fn test_removal_candidates_are_records_missing_from_disk() {
        let records = vec![
            record(1, "user_cache/fred/a", 5),
            record(2, "user_cache/fred/gone", 9),
        ];
        let on_disk = vec![found("user_cache/fred/a", 5)];
        let candidates = removal_candidates(&records, &on_disk);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, 2);
    }
}
