//! Scour daemons - quota enforcement for shared scratch storage
//!
//! Three cooperating daemons keep users' cache areas inside their budgets:
//! `scour-scan` reconciles the catalog with the filesystem and recomputes
//! usage, `scour-schedule` enters deletion batches with a notice window,
//! and `scour-delete` executes due batches. Any number of daemon processes
//! may share one catalog; per-user advisory locks keep them from treading
//! on each other, and different users are processed fully in parallel.

pub mod config;
pub mod deleter;
pub mod driver;
pub mod error;
pub mod notify;
pub mod quota;
pub mod scanner;
pub mod scheduler;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::DaemonConfig;
use crate::driver::Stage;
use crate::error::Result;

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive("scour_daemons=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
    Ok(())
}

/// Shared entry point for the three daemon binaries.
pub async fn daemon_main(stage: Stage) -> Result<()> {
    init_tracing()?;

    let cfg = DaemonConfig::from_env()?;
    info!(
        stage = stage.name(),
        mode = ?cfg.daemon_mode,
        "Starting scour daemon"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;
    scour_db::migrate::migrate(&pool).await?;

    driver::run(&pool, &cfg, stage).await
}
