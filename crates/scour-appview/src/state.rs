use sqlx::postgres::PgPool;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Grace period used when projecting future evictions.
    pub deletion_grace_hours: i64,
}
