use std::env;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    /// Grace hours used by the eviction forecast; must match the value the
    /// schedule daemon runs with.
    pub deletion_grace_hours: i64,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3010);

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/scour".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()]);

        let deletion_grace_hours = env::var("DELETION_GRACE_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        Self {
            port,
            database_url,
            cors_origins,
            deletion_grace_hours,
        }
    }
}
