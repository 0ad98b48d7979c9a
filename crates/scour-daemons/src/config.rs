//! Daemon configuration, loaded from the environment at startup.
//!
//! Missing or malformed configuration is fatal before any user is touched;
//! the recognized options are exactly the ones enumerated here. The log
//! level is controlled separately through `RUST_LOG`.

use std::env;

use crate::error::{DaemonError, Result};

/// Default quota size: 2 GiB of byte-days.
const DEFAULT_QUOTA_SIZE: i64 = 2 * 1024 * 1024 * 1024;
/// Default hard limit: 2 GiB.
const DEFAULT_HARD_LIMIT: i64 = 2 * 1024 * 1024 * 1024;
/// Default maximum days a file may persist before unconditional eviction.
const DEFAULT_MAX_PERSISTENCE_DAYS: i64 = 365;
/// Default notice window between scheduling a deletion and executing it.
const DEFAULT_DELETION_GRACE_HOURS: i64 = 24;
/// Default polling interval for loop mode.
const DEFAULT_RUN_EVERY_HOURS: u64 = 1;

/// Whether a daemon makes a single pass over all users or polls forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonMode {
    OneShot,
    Loop,
}

/// Configuration shared by the scan, schedule and delete daemons.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub database_url: String,
    pub daemon_mode: DaemonMode,
    pub run_every_hours: u64,
    pub deletion_grace_hours: i64,
    pub max_persistence_days: i64,
    /// Quota granted to newly provisioned users, in byte-days.
    pub default_quota_size: i64,
    /// Hard byte ceiling granted to newly provisioned users.
    pub default_hard_limit: i64,
}

impl DaemonConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").map_err(|_| {
            DaemonError::Config("DATABASE_URL environment variable is required".to_string())
        })?;

        let daemon_mode = match env::var("DAEMON_MODE") {
            Ok(raw) => parse_mode(&raw)?,
            Err(_) => DaemonMode::OneShot,
        };

        Ok(Self {
            database_url,
            daemon_mode,
            run_every_hours: env_u64("RUN_EVERY_HOURS", DEFAULT_RUN_EVERY_HOURS)?,
            deletion_grace_hours: env_i64("DELETION_GRACE_HOURS", DEFAULT_DELETION_GRACE_HOURS)?,
            max_persistence_days: env_i64("MAX_PERSISTENCE_DAYS", DEFAULT_MAX_PERSISTENCE_DAYS)?,
            default_quota_size: env_i64("DEFAULT_QUOTA_SIZE", DEFAULT_QUOTA_SIZE)?,
            default_hard_limit: env_i64("DEFAULT_HARD_LIMIT", DEFAULT_HARD_LIMIT)?,
        })
    }
}

fn parse_mode(raw: &str) -> Result<DaemonMode> {
    match raw {
        "one-shot" => Ok(DaemonMode::OneShot),
        "loop" => Ok(DaemonMode::Loop),
        other => Err(DaemonError::Config(format!(
            "DAEMON_MODE must be \"one-shot\" or \"loop\", got \"{}\"",
            other
        ))),
    }
}

fn env_i64(name: &str, default: i64) -> Result<i64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| DaemonError::Config(format!("{} must be an integer, got \"{}\"", name, raw))),
        Err(_) => Ok(default),
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            DaemonError::Config(format!(
                "{} must be a non-negative integer, got \"{}\"",
                name, raw
            ))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_one_shot() {
        assert_eq!(parse_mode("one-shot").unwrap(), DaemonMode::OneShot);
    }

    #[test]
    fn test_parse_mode_loop() {
        assert_eq!(parse_mode("loop").unwrap(), DaemonMode::Loop);
    }

    #[test]
    fn test_parse_mode_rejects_unknown() {
        let err = parse_mode("forever").unwrap_err();
        assert!(format!("{}", err).contains("DAEMON_MODE"));
    }
}
