//! Pass driver shared by the three daemons.
//!
//! A pass visits every user once. For each user the driver takes the
//! advisory lock, runs the stage, and releases the lock on both the success
//! and the failure path; a user whose lock is held elsewhere is skipped and
//! retried on the next pass. One user's failure never stops the pass. In
//! loop mode a termination signal lets the current user's critical section
//! finish and then prevents any further iteration.

use std::time::Duration;

use chrono::Utc;
use scour_db::types::{CacheVolumeRow, UserRow};
use scour_db::{locks, users, volumes, PgPool};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::{DaemonConfig, DaemonMode};
use crate::error::{DaemonError, Result};
use crate::{deleter, quota, scanner, scheduler};

/// The pipeline stage a daemon binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Schedule,
    Delete,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Scan => "scan",
            Stage::Schedule => "schedule",
            Stage::Delete => "delete",
        }
    }
}

async fn run_stage(
    pool: &PgPool,
    cfg: &DaemonConfig,
    stage: Stage,
    volume: &CacheVolumeRow,
    user: &UserRow,
) -> Result<()> {
    let now = Utc::now();
    match stage {
        Stage::Scan => {
            scanner::scan_user(pool, volume, user).await?;
            quota::recompute_user(pool, user, now).await?;
        }
        Stage::Schedule => {
            scheduler::schedule_user(pool, cfg, volume, user, now).await?;
        }
        Stage::Delete => {
            deleter::delete_user(pool, volume, user, now).await?;
        }
    }
    Ok(())
}

/// One pass over all users.
pub async fn run_pass(
    pool: &PgPool,
    cfg: &DaemonConfig,
    stage: Stage,
    shutdown: &watch::Receiver<bool>,
) -> Result<()> {
    for user in users::list(pool).await? {
        if *shutdown.borrow() {
            info!(stage = stage.name(), "shutdown observed, ending pass early");
            break;
        }

        let volume = match volumes::get(pool, user.volume_id).await? {
            Some(v) => v,
            None => {
                error!(user = %user.name, volume_id = user.volume_id, "cache volume missing from catalog");
                continue;
            }
        };

        if !locks::try_lock(pool, user.id).await? {
            debug!(user = %user.name, stage = stage.name(), "user already locked, skipping");
            continue;
        }

        let outcome = run_stage(pool, cfg, stage, &volume, &user).await;

        // The lock is released on every exit path before the outcome is
        // acted on, so a failed user never stays locked.
        if let Err(e) = locks::unlock(pool, user.id).await {
            error!(user = %user.name, error = %e, "failed to release user lock");
        }
        if let Err(e) = outcome {
            error!(user = %user.name, stage = stage.name(), error = %e, "stage failed for user");
        }
    }
    Ok(())
}

/// Run a daemon to completion: a single pass in one-shot mode, or a polling
/// loop with cooperative shutdown otherwise.
pub async fn run(pool: &PgPool, cfg: &DaemonConfig, stage: Stage) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt()).map_err(DaemonError::Signal)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(DaemonError::Signal)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => info!("received SIGINT, shutting down after current user"),
            _ = sigterm.recv() => info!("received SIGTERM, shutting down after current user"),
        }
        let _ = shutdown_tx.send(true);
    });

    match cfg.daemon_mode {
        DaemonMode::OneShot => run_pass(pool, cfg, stage, &shutdown_rx).await,
        DaemonMode::Loop => {
            let mut wakeup = shutdown_rx.clone();
            loop {
                if let Err(e) = run_pass(pool, cfg, stage, &shutdown_rx).await {
                    error!(stage = stage.name(), error = %e, "pass failed");
                }
                if *shutdown_rx.borrow() {
                    break;
                }
                debug!(
                    stage = stage.name(),
                    hours = cfg.run_every_hours,
                    "pass complete, sleeping"
                );
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(cfg.run_every_hours * 3600)) => {}
                    _ = wakeup.changed() => {}
                }
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            info!(stage = stage.name(), "daemon stopped");
            Ok(())
        }
    }
}
