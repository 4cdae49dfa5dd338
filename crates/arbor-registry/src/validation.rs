//! Agent validation records with bonded, time-limited authorization.
//!
//! A validation is live from `registered_at` until `expires_at`. Expiry is
//! passive: no sweep runs, the record simply stops answering authorization
//! queries. A renewal extends the same record; revocation deletes it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use arbor_types::{AccountId, Amount, Timestamp, SECONDS_PER_DAY};
use arbor_vault::vault::AuthorityGate;

use crate::{RegistryError, Result};

/// Default validation lifetime (90 days).
pub const DEFAULT_VALIDATION_TTL: u64 = 90 * SECONDS_PER_DAY;

/// Default minimum bond (10 Grains).
pub const DEFAULT_MIN_BOND: Amount = 10 * arbor_types::MICRO_GRAINS_PER_GRAIN;

/// A bonded validation record for one agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// The agent's account identity.
    pub agent: AccountId,
    /// Bond posted at registration, in micro-grains.
    pub bond: Amount,
    /// Unix timestamp of registration.
    pub registered_at: Timestamp,
    /// Unix timestamp after which the validation stops answering.
    pub expires_at: Timestamp,
}

impl AgentRecord {
    /// Whether the validation is live at `now`.
    pub fn is_live(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// The agent validation registry and operator set.
#[derive(Clone, Debug)]
pub struct AgentRegistry {
    records: HashMap<AccountId, AgentRecord>,
    operators: HashSet<AccountId>,
    min_bond: Amount,
    validation_ttl: u64,
}

impl AgentRegistry {
    /// Create a registry with default bond and TTL parameters.
    pub fn new() -> Self {
        Self::with_params(DEFAULT_MIN_BOND, DEFAULT_VALIDATION_TTL)
    }

    /// Create a registry with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `min_bond` - Minimum bond in micro-grains
    /// * `validation_ttl` - Validation lifetime in seconds
    pub fn with_params(min_bond: Amount, validation_ttl: u64) -> Self {
        Self {
            records: HashMap::new(),
            operators: HashSet::new(),
            min_bond,
            validation_ttl,
        }
    }

    /// Reassemble a registry from persisted records and operators.
    ///
    /// Expiry timestamps come back exactly as saved; no re-validation runs.
    pub fn restore(
        records: impl IntoIterator<Item = AgentRecord>,
        operators: impl IntoIterator<Item = AccountId>,
        min_bond: Amount,
        validation_ttl: u64,
    ) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.agent, r)).collect(),
            operators: operators.into_iter().collect(),
            min_bond,
            validation_ttl,
        }
    }

    /// Register a new agent validation.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::BondTooLow`] if `bond` is below the minimum
    /// - [`RegistryError::AlreadyValidated`] if a live record exists
    pub fn register(&mut self, agent: AccountId, bond: Amount, now: Timestamp) -> Result<AgentRecord> {
        if bond < self.min_bond {
            return Err(RegistryError::BondTooLow {
                posted: bond,
                minimum: self.min_bond,
            });
        }
        if self.records.get(&agent).is_some_and(|r| r.is_live(now)) {
            return Err(RegistryError::AlreadyValidated);
        }

        let record = AgentRecord {
            agent,
            bond,
            registered_at: now,
            expires_at: now + self.validation_ttl,
        };
        self.records.insert(agent, record);

        tracing::info!(bond, expires_at = record.expires_at, "agent validated");
        Ok(record)
    }

    /// Extend an agent's validation from `now`.
    ///
    /// An expired record can be renewed; the bond stays as posted.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotValidated`] if no record exists
    pub fn renew(&mut self, agent: &AccountId, now: Timestamp) -> Result<AgentRecord> {
        let record = self
            .records
            .get_mut(agent)
            .ok_or(RegistryError::NotValidated)?;
        record.expires_at = now + self.validation_ttl;

        tracing::info!(expires_at = record.expires_at, "agent validation renewed");
        Ok(*record)
    }

    /// Remove an agent's validation.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotValidated`] if no record exists
    pub fn revoke(&mut self, agent: &AccountId) -> Result<AgentRecord> {
        let record = self
            .records
            .remove(agent)
            .ok_or(RegistryError::NotValidated)?;
        tracing::warn!("agent validation revoked");
        Ok(record)
    }

    /// Whether `agent` holds a live validation at `now`.
    pub fn is_live(&self, agent: &AccountId, now: Timestamp) -> bool {
        self.records.get(agent).is_some_and(|r| r.is_live(now))
    }

    /// The validation record for `agent`, live or expired.
    pub fn record(&self, agent: &AccountId) -> Option<&AgentRecord> {
        self.records.get(agent)
    }

    /// Iterate over all validation records.
    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.values()
    }

    /// Add `operator` to the privileged set.
    pub fn add_operator(&mut self, operator: AccountId) {
        self.operators.insert(operator);
        tracing::info!("operator added");
    }

    /// Remove `operator` from the privileged set.
    pub fn remove_operator(&mut self, operator: &AccountId) {
        self.operators.remove(operator);
        tracing::warn!("operator removed");
    }

    /// Iterate over the operator set.
    pub fn operators(&self) -> impl Iterator<Item = &AccountId> {
        self.operators.iter()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorityGate for AgentRegistry {
    fn is_harvest_authorized(&self, caller: &AccountId, now: Timestamp) -> bool {
        self.is_live(caller, now)
    }

    fn is_operator(&self, caller: &AccountId) -> bool {
        self.operators.contains(caller)
    }
}
