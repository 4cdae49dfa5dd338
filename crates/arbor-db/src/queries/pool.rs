//! Vault pool state queries.

use rusqlite::Connection;

use arbor_types::{AccountId, Amount};
use arbor_vault::accumulator::PoolState;

use crate::{blob_to_u128, u128_to_blob, DbError, Result};

/// Persist a vault's pool row, replacing any previous snapshot.
pub fn save(
    conn: &Connection,
    vault_id: &AccountId,
    pool: &PoolState,
    reward_funds: Amount,
    paused: bool,
) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO vault_pool
         (vault_id, total_principal, acc_per_share, last_settle_time,
          reward_rate_per_second, reward_funds, paused)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            vault_id.as_slice(),
            pool.total_principal as i64,
            u128_to_blob(pool.acc_per_share).as_slice(),
            pool.last_settle_time as i64,
            pool.reward_rate_per_second as i64,
            reward_funds as i64,
            paused as i64,
        ],
    )?;
    Ok(())
}

/// Load a vault's pool row: `(pool, reward_funds, paused)`.
///
/// # Errors
///
/// - [`DbError::NotFound`] if no row exists for `vault_id`
pub fn load(conn: &Connection, vault_id: &AccountId) -> Result<(PoolState, Amount, bool)> {
    let row = conn
        .query_row(
            "SELECT total_principal, acc_per_share, last_settle_time,
                    reward_rate_per_second, reward_funds, paused
             FROM vault_pool WHERE vault_id = ?1",
            [vault_id.as_slice()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)? as u64,
                    row.get::<_, Vec<u8>>(1)?,
                    row.get::<_, i64>(2)? as u64,
                    row.get::<_, i64>(3)? as u64,
                    row.get::<_, i64>(4)? as u64,
                    row.get::<_, i64>(5)? != 0,
                ))
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound("vault pool state".to_string())
            }
            other => DbError::Sqlite(other),
        })?;

    let (total_principal, acc_blob, last_settle_time, rate, reward_funds, paused) = row;
    let pool = PoolState {
        total_principal,
        acc_per_share: blob_to_u128(&acc_blob)?,
        last_settle_time,
        reward_rate_per_second: rate,
    };
    Ok((pool, reward_funds, paused))
}
