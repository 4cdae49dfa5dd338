//! Per-depositor principal and reward-debt bookkeeping.
//!
//! Each account tracks its principal, a reward debt (the portion of
//! `principal * acc_per_share / ACC_SCALE` already attributed to it), and a
//! reward carry (entitlement banked at the account's last principal
//! change). The debt is rebased to the current accumulator at every touch,
//! so all arithmetic stays unsigned:
//!
//! ```text
//! pending = reward_carry + principal * acc_per_share / ACC_SCALE - reward_debt
//! ```
//!
//! Accounts are created implicitly on first deposit and never deleted; a
//! withdrawal to zero principal leaves a dormant record whose banked carry
//! stays claimable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use arbor_types::{AccountId, Amount, Timestamp};

use crate::accumulator::PoolState;
use crate::{Result, VaultError};

/// A single depositor's ledger record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Amount currently deposited, in micro-grains.
    pub principal: Amount,
    /// Reward already attributed at the accumulator value of the last touch.
    pub reward_debt: u128,
    /// Entitlement banked at the last principal change, in micro-grains.
    pub reward_carry: u128,
    /// Timestamp of the last deposit, withdrawal, or harvest.
    pub last_touch_time: Timestamp,
}

impl Account {
    /// Reward accrued by this account since its last touch.
    ///
    /// Non-negative by construction: the debt was rebased to the
    /// accumulator at the last touch and the accumulator never decreases.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Overflow`] on accumulator arithmetic overflow, or if
    ///   the debt invariant is violated (defensive)
    pub fn accrued_since_touch(&self, pool: &PoolState) -> Result<u128> {
        pool.accrued_for(self.principal)?
            .checked_sub(self.reward_debt)
            .ok_or(VaultError::Overflow)
    }

    /// Currently claimable, unpaid reward in micro-grains.
    ///
    /// Reflects the accumulator as last settled; the controller settles
    /// before any state-changing use of this value.
    pub fn pending_entitlement(&self, pool: &PoolState) -> Result<Amount> {
        let pending = self
            .reward_carry
            .checked_add(self.accrued_since_touch(pool)?)
            .ok_or(VaultError::Overflow)?;
        Amount::try_from(pending).map_err(|_| VaultError::Overflow)
    }

    /// The account value after changing principal to `new_principal`.
    ///
    /// Accrued reward is banked into the carry and the debt is rebased to
    /// the current accumulator, so the pending entitlement is unchanged:
    /// newly added principal cannot claim rewards accrued before it was
    /// deposited, and withdrawn principal does not disturb what the account
    /// already earned.
    pub fn with_principal(
        &self,
        pool: &PoolState,
        new_principal: Amount,
        now: Timestamp,
    ) -> Result<Account> {
        let carry = self
            .reward_carry
            .checked_add(self.accrued_since_touch(pool)?)
            .ok_or(VaultError::Overflow)?;
        Ok(Account {
            principal: new_principal,
            reward_debt: pool.accrued_for(new_principal)?,
            reward_carry: carry,
            last_touch_time: now,
        })
    }

    /// The account value with its entitlement settled to zero, and the
    /// amount to pay out.
    ///
    /// The debt catches up to the current accumulator and the carry is
    /// cleared; immediately afterwards `pending_entitlement` is zero.
    pub fn settled_to_zero(&self, pool: &PoolState, now: Timestamp) -> Result<(Account, Amount)> {
        let paid = self.pending_entitlement(pool)?;
        Ok((
            Account {
                principal: self.principal,
                reward_debt: pool.accrued_for(self.principal)?,
                reward_carry: 0,
                last_touch_time: now,
            },
            paid,
        ))
    }
}

/// The account ledger: a map keyed by depositor identity where absence
/// means a canonical zero-value record.
#[derive(Clone, Debug, Default)]
pub struct AccountBook {
    accounts: HashMap<AccountId, Account>,
}

impl AccountBook {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The account record for `id`, or the zero record if never seen.
    pub fn get(&self, id: &AccountId) -> Account {
        self.accounts.get(id).copied().unwrap_or_default()
    }

    /// Replace the record for `id`, creating it if absent.
    pub fn put(&mut self, id: AccountId, account: Account) {
        self.accounts.insert(id, account);
    }

    /// Iterate over all known account records.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.accounts.iter()
    }

    /// Number of account records, dormant ones included.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the ledger has no records.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all accounts' principal, widened for comparison against the
    /// pool total.
    pub fn total_principal(&self) -> u128 {
        self.accounts
            .values()
            .map(|a| u128::from(a.principal))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::ACC_SCALE;

    fn settled_pool(total: Amount, rate: u64, now: Timestamp) -> PoolState {
        let mut pool = PoolState::new(0, rate);
        pool.total_principal = total;
        pool.settle(now).expect("settle");
        pool
    }

    #[test]
    fn test_unseen_account_is_zero_record() {
        let book = AccountBook::new();
        let acct = book.get(&[7u8; 32]);
        assert_eq!(acct, Account::default());
        assert!(book.is_empty());
    }

    #[test]
    fn test_pending_entitlement_after_accrual() {
        let pool = settled_pool(1_000, 10, 100);
        let acct = Account {
            principal: 1_000,
            ..Account::default()
        };
        assert_eq!(acct.pending_entitlement(&pool).expect("pending"), 1_000);
    }

    #[test]
    fn test_deposit_rebase_keeps_pending_unchanged() {
        let pool = settled_pool(1_000, 10, 100);
        let acct = Account {
            principal: 1_000,
            ..Account::default()
        };
        let before = acct.pending_entitlement(&pool).expect("pending");

        let after = acct.with_principal(&pool, 1_500, 100).expect("rebase");
        assert_eq!(after.principal, 1_500);
        assert_eq!(after.pending_entitlement(&pool).expect("pending"), before);
        // The new principal is fully offset by debt at the current index
        assert_eq!(after.reward_debt, pool.accrued_for(1_500).expect("accrued"));
    }

    #[test]
    fn test_withdraw_to_zero_banks_carry() {
        let pool = settled_pool(1_000, 10, 100);
        let acct = Account {
            principal: 1_000,
            ..Account::default()
        };

        let drained = acct.with_principal(&pool, 0, 100).expect("rebase");
        assert_eq!(drained.principal, 0);
        assert_eq!(drained.reward_debt, 0);
        assert_eq!(drained.reward_carry, 1_000);
        assert_eq!(drained.pending_entitlement(&pool).expect("pending"), 1_000);
    }

    #[test]
    fn test_settled_to_zero_pays_and_clears() {
        let pool = settled_pool(1_000, 10, 100);
        let acct = Account {
            principal: 1_000,
            reward_carry: 250,
            ..Account::default()
        };

        let (settled, paid) = acct.settled_to_zero(&pool, 100).expect("settle");
        assert_eq!(paid, 1_250);
        assert_eq!(settled.reward_carry, 0);
        assert_eq!(settled.principal, 1_000);
        assert_eq!(settled.pending_entitlement(&pool).expect("pending"), 0);
    }

    #[test]
    fn test_accrued_truncates_toward_zero() {
        // acc_per_share that does not divide principal evenly
        let pool = PoolState {
            total_principal: 3,
            acc_per_share: 10 * ACC_SCALE / 3,
            last_settle_time: 1,
            reward_rate_per_second: 10,
        };
        let acct = Account {
            principal: 1,
            ..Account::default()
        };
        // 1 * (10/3 scaled) = 3.33.. -> 3
        assert_eq!(acct.pending_entitlement(&pool).expect("pending"), 3);
    }

    #[test]
    fn test_total_principal_sums_all_records() {
        let mut book = AccountBook::new();
        book.put(
            [1u8; 32],
            Account {
                principal: 700,
                ..Account::default()
            },
        );
        book.put(
            [2u8; 32],
            Account {
                principal: 300,
                ..Account::default()
            },
        );
        assert_eq!(book.total_principal(), 1_000);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_debt_invariant_violation_detected() {
        let pool = settled_pool(1_000, 10, 100);
        // Corrupted record: debt exceeds what the principal could have accrued
        let acct = Account {
            principal: 1,
            reward_debt: u128::MAX,
            ..Account::default()
        };
        assert!(matches!(
            acct.accrued_since_touch(&pool),
            Err(VaultError::Overflow)
        ));
    }
}
