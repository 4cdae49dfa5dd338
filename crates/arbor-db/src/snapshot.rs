//! Whole-vault snapshot save and restore.
//!
//! A snapshot is written in one transaction so a crash mid-save can never
//! leave a pool row disagreeing with its account rows.

use rusqlite::Connection;

use arbor_types::{AccountId, Amount};
use arbor_vault::accumulator::PoolState;
use arbor_vault::ledger::AccountBook;
use arbor_vault::vault::{AuthorityGate, Treasury, Vault};

use crate::{queries, Result};

/// Persist a vault's complete ledger state.
pub fn save_vault<A, T>(conn: &Connection, vault: &Vault<A, T>) -> Result<()>
where
    A: AuthorityGate,
    T: Treasury,
{
    let tx = conn.unchecked_transaction()?;

    queries::pool::save(
        &tx,
        vault.id(),
        vault.pool_state(),
        vault.reward_funds(),
        vault.is_paused(),
    )?;

    tx.execute(
        "DELETE FROM vault_accounts WHERE vault_id = ?1",
        [vault.id().as_slice()],
    )?;
    for (account_id, account) in vault.book().iter() {
        queries::accounts::upsert(&tx, vault.id(), account_id, account)?;
    }

    tx.commit()?;
    tracing::info!(accounts = vault.book().len(), "vault snapshot saved");
    Ok(())
}

/// Load a vault's complete ledger state:
/// `(pool, book, reward_funds, paused)`.
///
/// Feed the result to [`Vault::restore`] together with the host's
/// collaborators. `acc_per_share` and `last_settle_time` come back exactly
/// as saved.
///
/// # Errors
///
/// - [`crate::DbError::NotFound`] if no snapshot exists for `vault_id`
pub fn load_vault(
    conn: &Connection,
    vault_id: &AccountId,
) -> Result<(PoolState, AccountBook, Amount, bool)> {
    let (pool, reward_funds, paused) = queries::pool::load(conn, vault_id)?;
    let book = queries::accounts::load_book(conn, vault_id)?;
    Ok((pool, book, reward_funds, paused))
}
