use crate::types::CacheVolumeRow;

/// List all cache volumes
pub async fn list(executor: impl sqlx::PgExecutor<'_>) -> Result<Vec<CacheVolumeRow>, sqlx::Error> {
    sqlx::query_as::<_, CacheVolumeRow>(
        r#"
        SELECT id, mountpoint, size_bytes, allocated_bytes, used_bytes
        FROM cache_volumes
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Get a volume by id
pub async fn get(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<Option<CacheVolumeRow>, sqlx::Error> {
    sqlx::query_as::<_, CacheVolumeRow>(
        r#"
        SELECT id, mountpoint, size_bytes, allocated_bytes, used_bytes
        FROM cache_volumes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Get a volume by its mountpoint
pub async fn get_by_mountpoint(
    executor: impl sqlx::PgExecutor<'_>,
    mountpoint: &str,
) -> Result<Option<CacheVolumeRow>, sqlx::Error> {
    sqlx::query_as::<_, CacheVolumeRow>(
        r#"
        SELECT id, mountpoint, size_bytes, allocated_bytes, used_bytes
        FROM cache_volumes
        WHERE mountpoint = $1
        "#,
    )
    .bind(mountpoint)
    .fetch_optional(executor)
    .await
}

/// Apply a signed delta to a volume's running used-bytes aggregate.
///
/// The increment happens in SQL so concurrent per-user passes on the same
/// volume compose instead of clobbering each other.
pub async fn add_used_delta(
    executor: impl sqlx::PgExecutor<'_>,
    volume_id: i64,
    delta: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE cache_volumes SET used_bytes = used_bytes + $2 WHERE id = $1")
        .bind(volume_id)
        .bind(delta)
        .execute(executor)
        .await?;
    Ok(())
}
