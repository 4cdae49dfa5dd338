//! In-memory reference collaborators.
//!
//! [`MemoryTreasury`] and [`StaticGate`] back the vault in tests and in
//! hosts that do not wire a real asset backend or registry yet. Production
//! deployments implement [`Treasury`](crate::vault::Treasury) over their
//! asset system and [`AuthorityGate`](crate::vault::AuthorityGate) over the
//! agent registry.

use std::collections::{HashMap, HashSet};

use arbor_types::{AccountId, Amount, Timestamp};

use crate::vault::{AuthorityGate, Treasury};
use crate::TransferError;

/// An in-memory balance ledger acting as the funding collaborator.
///
/// One account is designated as the vault's custody; `transfer_in` moves
/// funds into it and `transfer_out` moves funds out of it. Each call is
/// atomic: it either moves the full amount or fails without effect.
#[derive(Clone, Debug, Default)]
pub struct MemoryTreasury {
    custody: AccountId,
    balances: HashMap<AccountId, Amount>,
}

impl MemoryTreasury {
    /// Create a treasury with `custody` as the vault's holding account.
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
        }
    }

    /// Credit `amount` to `holder` out of thin air (test/genesis funding).
    pub fn credit(&mut self, holder: &AccountId, amount: Amount) {
        let balance = self.balances.entry(*holder).or_insert(0);
        *balance = balance.saturating_add(amount);
        tracing::debug!(amount, "memory treasury: balance credited");
    }

    /// Current balance of `holder`.
    pub fn balance_of(&self, holder: &AccountId) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> std::result::Result<(), TransferError> {
        let available = self.balance_of(from);
        if amount > available {
            return Err(TransferError::InsufficientFunds {
                requested: amount,
                available,
            });
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected("recipient balance overflow".to_string()))?;
        self.balances.insert(*from, available - amount);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

impl Treasury for MemoryTreasury {
    fn transfer_in(
        &mut self,
        from: &AccountId,
        amount: Amount,
    ) -> std::result::Result<(), TransferError> {
        let custody = self.custody;
        self.transfer(from, &custody, amount)
    }

    fn transfer_out(
        &mut self,
        to: &AccountId,
        amount: Amount,
    ) -> std::result::Result<(), TransferError> {
        let custody = self.custody;
        self.transfer(&custody, to, amount)
    }

    fn balance(&self, holder: &AccountId) -> Amount {
        self.balance_of(holder)
    }
}

/// A fixed-membership authorization gate.
///
/// Ignores the query timestamp: membership never expires. Registry-backed
/// deployments get expiry via `arbor-registry` instead.
#[derive(Clone, Debug, Default)]
pub struct StaticGate {
    harvesters: HashSet<AccountId>,
    operators: HashSet<AccountId>,
}

impl StaticGate {
    /// Create an empty gate (nobody is authorized).
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `agent` to trigger harvests.
    pub fn allow_harvester(&mut self, agent: AccountId) {
        self.harvesters.insert(agent);
    }

    /// Allow `operator` to perform privileged pool operations.
    pub fn allow_operator(&mut self, operator: AccountId) {
        self.operators.insert(operator);
    }
}

impl AuthorityGate for StaticGate {
    fn is_harvest_authorized(&self, caller: &AccountId, _now: Timestamp) -> bool {
        self.harvesters.contains(caller)
    }

    fn is_operator(&self, caller: &AccountId) -> bool {
        self.operators.contains(caller)
    }
}
