//! Shared catalog layer for Scour services.
//!
//! Plain row structs plus explicit repository functions per entity; no row
//! type performs its own I/O. Every daemon and the appview receive a
//! `PgPool` handle at construction and pass it down to these functions.

pub mod deletions;
pub mod files;
pub mod locks;
pub mod migrate;
pub mod notifications;
pub mod types;
pub mod users;
pub mod volumes;

pub use sqlx::postgres::PgPool;
pub use types::*;
