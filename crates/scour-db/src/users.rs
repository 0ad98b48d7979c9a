use crate::types::UserRow;

const USER_COLUMNS: &str = "id, name, email, notify, quota_size, quota_used, \
                            hard_limit_size, total_used, cache_path, volume_id";

/// List all users, oldest account first
pub async fn list(executor: impl sqlx::PgExecutor<'_>) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users ORDER BY id",
        USER_COLUMNS
    ))
    .fetch_all(executor)
    .await
}

/// Get a user by name
pub async fn get_by_name(
    executor: impl sqlx::PgExecutor<'_>,
    name: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users WHERE name = $1",
        USER_COLUMNS
    ))
    .bind(name)
    .fetch_optional(executor)
    .await
}

/// Write back the recomputed usage aggregates for a user
pub async fn update_usage(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
    quota_used: i64,
    total_used: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET quota_used = $2, total_used = $3 WHERE id = $1")
        .bind(user_id)
        .bind(quota_used)
        .bind(total_used)
        .execute(executor)
        .await?;
    Ok(())
}
