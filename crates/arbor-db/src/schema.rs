//! SQL schema definitions.

/// Complete schema for the Arbor vault database, v1.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Vault pool state (one row per vault)
-- ============================================================

CREATE TABLE IF NOT EXISTS vault_pool (
    vault_id BLOB PRIMARY KEY,
    total_principal INTEGER NOT NULL,
    acc_per_share BLOB NOT NULL,
    last_settle_time INTEGER NOT NULL,
    reward_rate_per_second INTEGER NOT NULL,
    reward_funds INTEGER NOT NULL,
    paused INTEGER NOT NULL DEFAULT 0
);

-- ============================================================
-- Depositor accounts
-- ============================================================

CREATE TABLE IF NOT EXISTS vault_accounts (
    vault_id BLOB NOT NULL REFERENCES vault_pool(vault_id) ON DELETE CASCADE,
    account_id BLOB NOT NULL,
    principal INTEGER NOT NULL,
    reward_debt BLOB NOT NULL,
    reward_carry BLOB NOT NULL,
    last_touch_time INTEGER NOT NULL,
    PRIMARY KEY (vault_id, account_id)
);

-- ============================================================
-- Agent validations & operators
-- ============================================================

CREATE TABLE IF NOT EXISTS agent_records (
    agent_id BLOB PRIMARY KEY,
    bond INTEGER NOT NULL,
    registered_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS operators (
    account_id BLOB PRIMARY KEY
);
"#;
