//! Agent validation and operator queries.

use rusqlite::Connection;

use arbor_registry::validation::AgentRecord;
use arbor_types::AccountId;

use crate::{blob_to_account_id, DbError, Result};

/// Insert or update an agent validation record.
pub fn upsert_record(conn: &Connection, record: &AgentRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO agent_records
         (agent_id, bond, registered_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            record.agent.as_slice(),
            record.bond as i64,
            record.registered_at as i64,
            record.expires_at as i64,
        ],
    )?;
    Ok(())
}

/// Delete an agent validation record (revocation).
///
/// # Errors
///
/// - [`DbError::NotFound`] if no record exists for the agent
pub fn delete_record(conn: &Connection, agent: &AccountId) -> Result<()> {
    let deleted = conn.execute(
        "DELETE FROM agent_records WHERE agent_id = ?1",
        [agent.as_slice()],
    )?;
    if deleted == 0 {
        return Err(DbError::NotFound("agent record".to_string()));
    }
    Ok(())
}

/// Load all agent validation records.
pub fn load_records(conn: &Connection) -> Result<Vec<AgentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT agent_id, bond, registered_at, expires_at FROM agent_records",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, Vec<u8>>(0)?,
                row.get::<_, i64>(1)? as u64,
                row.get::<_, i64>(2)? as u64,
                row.get::<_, i64>(3)? as u64,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id_blob, bond, registered_at, expires_at)| {
            Ok(AgentRecord {
                agent: blob_to_account_id(&id_blob)?,
                bond,
                registered_at,
                expires_at,
            })
        })
        .collect()
}

/// Add an operator to the privileged set.
pub fn add_operator(conn: &Connection, operator: &AccountId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO operators (account_id) VALUES (?1)",
        [operator.as_slice()],
    )?;
    Ok(())
}

/// Remove an operator from the privileged set.
pub fn remove_operator(conn: &Connection, operator: &AccountId) -> Result<()> {
    conn.execute(
        "DELETE FROM operators WHERE account_id = ?1",
        [operator.as_slice()],
    )?;
    Ok(())
}

/// Load the operator set.
pub fn load_operators(conn: &Connection) -> Result<Vec<AccountId>> {
    let mut stmt = conn.prepare("SELECT account_id FROM operators")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, Vec<u8>>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.iter().map(|blob| blob_to_account_id(blob)).collect()
}
