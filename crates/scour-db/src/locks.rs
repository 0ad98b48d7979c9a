//! Per-user advisory locks.
//!
//! A lock is a row in `user_locks`; the primary key turns concurrent
//! insert-if-absent attempts into a race exactly one caller wins. There is
//! no lease or timeout: a process that dies holding a lock leaves the user
//! locked until the row is cleared by hand.

/// Try to take the lock for a user. Returns whether it was acquired; `false`
/// means another process holds it and the caller should skip this user.
pub async fn try_lock(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_locks (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Check whether a user is currently locked
pub async fn is_locked(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT user_id FROM user_locks WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
    Ok(row.is_some())
}

/// Release a user's lock. Idempotent; releasing an absent lock is not an
/// error.
pub async fn unlock(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_locks WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}
