use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::types::{CachedFileRow, ScheduledDeletionRow};

/// Whether the user already has a pending (not yet executed) deletion batch
pub async fn has_pending(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM scheduled_deletions WHERE user_id = $1 LIMIT 1")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
    Ok(row.is_some())
}

/// List a user's pending deletion batches
pub async fn list_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<Vec<ScheduledDeletionRow>, sqlx::Error> {
    sqlx::query_as::<_, ScheduledDeletionRow>(
        r#"
        SELECT id, user_id, time_entered, time_delete
        FROM scheduled_deletions
        WHERE user_id = $1
        ORDER BY time_entered
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// List a user's batches whose deadline has passed
pub async fn due_for_user(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<ScheduledDeletionRow>, sqlx::Error> {
    sqlx::query_as::<_, ScheduledDeletionRow>(
        r#"
        SELECT id, user_id, time_entered, time_delete
        FROM scheduled_deletions
        WHERE user_id = $1 AND time_delete <= $2
        ORDER BY time_entered
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_all(executor)
    .await
}

/// Create a deletion batch referencing the given files (one transaction)
pub async fn create(
    pool: &PgPool,
    user_id: i64,
    time_entered: DateTime<Utc>,
    time_delete: DateTime<Utc>,
    file_ids: &[i64],
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (deletion_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO scheduled_deletions (user_id, time_entered, time_delete)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(time_entered)
    .bind(time_delete)
    .fetch_one(&mut *tx)
    .await?;

    for file_id in file_ids {
        sqlx::query(
            r#"
            INSERT INTO scheduled_deletion_files (deletion_id, file_id)
            VALUES ($1, $2)
            ON CONFLICT (deletion_id, file_id) DO NOTHING
            "#,
        )
        .bind(deletion_id)
        .bind(file_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(deletion_id)
}

/// The file records referenced by a batch, in discovery order
pub async fn files_for(
    executor: impl sqlx::PgExecutor<'_>,
    deletion_id: i64,
) -> Result<Vec<CachedFileRow>, sqlx::Error> {
    sqlx::query_as::<_, CachedFileRow>(
        r#"
        SELECT f.id, f.user_id, f.path, f.size, f.first_seen
        FROM cached_files f
        JOIN scheduled_deletion_files sdf ON sdf.file_id = f.id
        WHERE sdf.deletion_id = $1
        ORDER BY f.first_seen, f.id
        "#,
    )
    .bind(deletion_id)
    .fetch_all(executor)
    .await
}

/// Delete a processed batch. The join rows cascade; surviving (reprieved)
/// file records are left untouched.
pub async fn delete(
    executor: impl sqlx::PgExecutor<'_>,
    deletion_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM scheduled_deletions WHERE id = $1")
        .bind(deletion_id)
        .execute(executor)
        .await?;
    Ok(())
}
