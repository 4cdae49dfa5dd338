//! Depositor account queries.

use rusqlite::Connection;

use arbor_types::AccountId;
use arbor_vault::ledger::{Account, AccountBook};

use crate::{blob_to_account_id, blob_to_u128, u128_to_blob, Result};

/// Insert or update one depositor account row.
pub fn upsert(
    conn: &Connection,
    vault_id: &AccountId,
    account_id: &AccountId,
    account: &Account,
) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO vault_accounts
         (vault_id, account_id, principal, reward_debt, reward_carry, last_touch_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            vault_id.as_slice(),
            account_id.as_slice(),
            account.principal as i64,
            u128_to_blob(account.reward_debt).as_slice(),
            u128_to_blob(account.reward_carry).as_slice(),
            account.last_touch_time as i64,
        ],
    )?;
    Ok(())
}

/// Load every account row for a vault into an [`AccountBook`].
pub fn load_book(conn: &Connection, vault_id: &AccountId) -> Result<AccountBook> {
    let mut stmt = conn.prepare(
        "SELECT account_id, principal, reward_debt, reward_carry, last_touch_time
         FROM vault_accounts WHERE vault_id = ?1",
    )?;

    let rows = stmt
        .query_map([vault_id.as_slice()], |row| {
            Ok((
                row.get::<_, Vec<u8>>(0)?,
                row.get::<_, i64>(1)? as u64,
                row.get::<_, Vec<u8>>(2)?,
                row.get::<_, Vec<u8>>(3)?,
                row.get::<_, i64>(4)? as u64,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut book = AccountBook::new();
    for (id_blob, principal, debt_blob, carry_blob, last_touch_time) in rows {
        book.put(
            blob_to_account_id(&id_blob)?,
            Account {
                principal,
                reward_debt: blob_to_u128(&debt_blob)?,
                reward_carry: blob_to_u128(&carry_blob)?,
                last_touch_time,
            },
        );
    }
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::pool;
    use arbor_vault::accumulator::PoolState;

    const VAULT_ID: AccountId = [0xAA; 32];

    fn db_with_pool() -> Connection {
        let conn = crate::open_memory().expect("open");
        pool::save(&conn, &VAULT_ID, &PoolState::new(0, 1), 0, false).expect("pool row");
        conn
    }

    #[test]
    fn test_upsert_and_load_book() {
        let conn = db_with_pool();
        let alice = [1u8; 32];
        let bob = [2u8; 32];

        upsert(
            &conn,
            &VAULT_ID,
            &alice,
            &Account {
                principal: 1_000,
                reward_debt: u128::from(u64::MAX) + 1,
                reward_carry: 250,
                last_touch_time: 500,
            },
        )
        .expect("upsert alice");
        upsert(&conn, &VAULT_ID, &bob, &Account::default()).expect("upsert bob");

        let book = load_book(&conn, &VAULT_ID).expect("load");
        assert_eq!(book.len(), 2);
        let loaded = book.get(&alice);
        assert_eq!(loaded.principal, 1_000);
        assert_eq!(loaded.reward_debt, u128::from(u64::MAX) + 1);
        assert_eq!(loaded.reward_carry, 250);
        assert_eq!(loaded.last_touch_time, 500);
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let conn = db_with_pool();
        let alice = [1u8; 32];

        upsert(
            &conn,
            &VAULT_ID,
            &alice,
            &Account {
                principal: 100,
                ..Account::default()
            },
        )
        .expect("first");
        upsert(
            &conn,
            &VAULT_ID,
            &alice,
            &Account {
                principal: 700,
                ..Account::default()
            },
        )
        .expect("second");

        let book = load_book(&conn, &VAULT_ID).expect("load");
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&alice).principal, 700);
    }

    #[test]
    fn test_empty_vault_loads_empty_book() {
        let conn = db_with_pool();
        let book = load_book(&conn, &VAULT_ID).expect("load");
        assert!(book.is_empty());
    }
}
