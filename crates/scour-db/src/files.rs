use chrono::{DateTime, Utc};

use crate::types::CachedFileRow;

/// List a user's cached files in discovery order (first_seen ascending)
pub async fn list_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<Vec<CachedFileRow>, sqlx::Error> {
    sqlx::query_as::<_, CachedFileRow>(
        r#"
        SELECT id, user_id, path, size, first_seen
        FROM cached_files
        WHERE user_id = $1
        ORDER BY first_seen, id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// List a user's cached files whose path contains the given substring
pub async fn list_matching(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
    substring: &str,
) -> Result<Vec<CachedFileRow>, sqlx::Error> {
    sqlx::query_as::<_, CachedFileRow>(
        r#"
        SELECT id, user_id, path, size, first_seen
        FROM cached_files
        WHERE user_id = $1 AND path LIKE '%' || $2 || '%'
        ORDER BY first_seen, id
        "#,
    )
    .bind(user_id)
    .bind(substring)
    .fetch_all(executor)
    .await
}

/// Record a newly discovered file
pub async fn insert(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
    path: &str,
    size: i64,
    first_seen: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cached_files (user_id, path, size, first_seen)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, path) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(path)
    .bind(size)
    .bind(first_seen)
    .execute(executor)
    .await?;
    Ok(())
}

/// Update the stored size of a file whose on-disk size changed.
/// `first_seen` is never touched.
pub async fn update_size(
    executor: impl sqlx::PgExecutor<'_>,
    file_id: i64,
    size: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE cached_files SET size = $2 WHERE id = $1")
        .bind(file_id)
        .bind(size)
        .execute(executor)
        .await?;
    Ok(())
}

/// Delete a file record (the backing file vanished or was evicted)
pub async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    file_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM cached_files WHERE id = $1")
        .bind(file_id)
        .execute(executor)
        .await?;
    Ok(())
}
