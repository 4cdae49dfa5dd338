//! # arbor-db
//!
//! SQLite persistence for vault and registry state.
//!
//! A restart must restore `acc_per_share` and `last_settle_time` exactly —
//! any discrepancy silently corrupts subsequent accrual — so the u128
//! columns (`acc_per_share`, `reward_debt`, `reward_carry`) are stored as
//! 16-byte big-endian blobs rather than SQLite integers (which are i64).
//!
//! ## Schema
//!
//! - WAL mode mandatory
//! - Foreign keys enforced
//! - All timestamps are Unix epoch seconds
//! - Schema version stored in `PRAGMA user_version`

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod snapshot;

use std::path::Path;

use rusqlite::Connection;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the vault database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Encode a u128 as a 16-byte big-endian blob.
pub fn u128_to_blob(value: u128) -> [u8; 16] {
    value.to_be_bytes()
}

/// Decode a 16-byte big-endian blob back into a u128.
///
/// # Errors
///
/// - [`DbError::Serialization`] if the blob is not exactly 16 bytes
pub fn blob_to_u128(blob: &[u8]) -> Result<u128> {
    let bytes: [u8; 16] = blob
        .try_into()
        .map_err(|_| DbError::Serialization(format!("expected 16-byte blob, got {}", blob.len())))?;
    Ok(u128::from_be_bytes(bytes))
}

/// Decode a 32-byte account-id blob.
///
/// # Errors
///
/// - [`DbError::Serialization`] if the blob is not exactly 32 bytes
pub fn blob_to_account_id(blob: &[u8]) -> Result<arbor_types::AccountId> {
    blob.try_into()
        .map_err(|_| DbError::Serialization(format!("expected 32-byte blob, got {}", blob.len())))
}
