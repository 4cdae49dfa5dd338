//! Vault controller and collaborator seams.
//!
//! The controller orchestrates deposits, withdrawals, and agent-triggered
//! harvests against one pool and one account ledger. Every operation
//! settles the accumulator first, computes all fallible arithmetic next,
//! and commits ledger mutations only after the funding transfer succeeds,
//! so a failed operation leaves the vault unchanged (a completed settlement
//! may persist; it moves no funds).
//!
//! Callers hold an explicit [`Vault`] handle; there is no global state.
//! The execution model is single-writer: concurrent hosts must serialize
//! operations per vault (e.g. behind one lock).

use serde::{Deserialize, Serialize};

use arbor_types::{AccountId, Amount, PositionSummary, Timestamp};

use crate::accumulator::PoolState;
use crate::ledger::AccountBook;
use crate::{Result, TransferError, VaultError};

/// Authorization collaborator: answers caller-capability questions.
///
/// Queried fresh on every harvest: authorization may change between calls
/// (e.g. an agent's validation expires).
pub trait AuthorityGate {
    /// Whether `caller` may trigger a harvest on this vault, as of `now`.
    fn is_harvest_authorized(&self, caller: &AccountId, now: Timestamp) -> bool;

    /// Whether `caller` may perform privileged pool operations
    /// (rate changes, reward funding, pause).
    fn is_operator(&self, caller: &AccountId) -> bool;
}

/// Funding collaborator: the asset transfer mechanism.
///
/// Each call is atomic and all-or-nothing. `transfer_in` moves funds from a
/// holder into the vault's custody; `transfer_out` moves funds from custody
/// to a holder.
pub trait Treasury {
    /// Move `amount` from `from` into the vault's custody.
    fn transfer_in(&mut self, from: &AccountId, amount: Amount)
        -> std::result::Result<(), TransferError>;

    /// Move `amount` from the vault's custody to `to`.
    fn transfer_out(&mut self, to: &AccountId, amount: Amount)
        -> std::result::Result<(), TransferError>;

    /// Current balance held by `holder`.
    fn balance(&self, holder: &AccountId) -> Amount;
}

/// Result of a successful harvest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HarvestReceipt {
    /// The depositor whose rewards were paid.
    pub account: AccountId,
    /// The amount of micro-grains disbursed.
    pub amount: Amount,
    /// The timestamp at which the harvest settled.
    pub harvested_at: Timestamp,
}

/// A reward vault: one shared pool, many depositor accounts.
pub struct Vault<A, T> {
    /// Custody identity of this vault in the funding collaborator.
    id: AccountId,
    pool: PoolState,
    book: AccountBook,
    /// Funds earmarked for reward payout. Increased only by
    /// [`fund_rewards`](Vault::fund_rewards), decreased only by harvest,
    /// so total paid rewards can never exceed what was funded.
    reward_funds: Amount,
    paused: bool,
    authority: A,
    treasury: T,
}

impl<A: AuthorityGate, T: Treasury> Vault<A, T> {
    /// Create a vault at genesis.
    pub fn new(
        id: AccountId,
        genesis_time: Timestamp,
        reward_rate_per_second: u64,
        authority: A,
        treasury: T,
    ) -> Self {
        Self {
            id,
            pool: PoolState::new(genesis_time, reward_rate_per_second),
            book: AccountBook::new(),
            reward_funds: 0,
            paused: false,
            authority,
            treasury,
        }
    }

    /// Reassemble a vault from persisted state.
    ///
    /// The caller must restore `pool.acc_per_share` and
    /// `pool.last_settle_time` exactly as saved; any discrepancy corrupts
    /// subsequent accrual.
    pub fn restore(
        id: AccountId,
        pool: PoolState,
        book: AccountBook,
        reward_funds: Amount,
        paused: bool,
        authority: A,
        treasury: T,
    ) -> Self {
        Self {
            id,
            pool,
            book,
            reward_funds,
            paused,
            authority,
            treasury,
        }
    }

    /// Deposit `amount` micro-grains of principal for `depositor`.
    ///
    /// The deposit does not change the account's pending entitlement.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Paused`] while the vault is paused
    /// - [`VaultError::InvalidAmount`] if `amount` is zero
    /// - [`VaultError::Overflow`] on arithmetic overflow
    /// - [`VaultError::Transfer`] if the funding collaborator rejects
    pub fn deposit(&mut self, depositor: &AccountId, amount: Amount, now: Timestamp) -> Result<()> {
        self.pool.settle(now)?;
        if self.paused {
            return Err(VaultError::Paused);
        }
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let acct = self.book.get(depositor);
        let new_total = self
            .pool
            .total_principal
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        let new_principal = acct
            .principal
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        let staged = acct.with_principal(&self.pool, new_principal, now)?;

        self.treasury.transfer_in(depositor, amount)?;

        self.pool.total_principal = new_total;
        self.book.put(*depositor, staged);

        tracing::info!(amount, total_principal = new_total, "vault: deposit");
        Ok(())
    }

    /// Withdraw `amount` micro-grains of principal for `depositor`.
    ///
    /// Pending entitlement is unaffected; a withdrawal to zero leaves the
    /// account dormant with its earned rewards banked.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidAmount`] if `amount` is zero
    /// - [`VaultError::InsufficientPrincipal`] if `amount` exceeds holdings
    /// - [`VaultError::Overflow`] on arithmetic overflow
    /// - [`VaultError::Transfer`] if the funding collaborator rejects
    pub fn withdraw(&mut self, depositor: &AccountId, amount: Amount, now: Timestamp) -> Result<()> {
        self.pool.settle(now)?;
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let acct = self.book.get(depositor);
        if amount > acct.principal {
            return Err(VaultError::InsufficientPrincipal {
                requested: amount,
                available: acct.principal,
            });
        }

        let staged = acct.with_principal(&self.pool, acct.principal - amount, now)?;
        let new_total = self
            .pool
            .total_principal
            .checked_sub(amount)
            .ok_or(VaultError::Overflow)?;

        self.treasury.transfer_out(depositor, amount)?;

        self.pool.total_principal = new_total;
        self.book.put(*depositor, staged);

        tracing::info!(amount, total_principal = new_total, "vault: withdrawal");
        Ok(())
    }

    /// Pay out `account`'s pending entitlement, triggered by `caller`.
    ///
    /// The authorization collaborator is consulted fresh on every call.
    ///
    /// # Errors
    ///
    /// - [`VaultError::NotAuthorized`] if `caller` may not harvest here
    /// - [`VaultError::NoPrincipal`] if the account has nothing staked
    /// - [`VaultError::NothingToClaim`] if the entitlement is zero
    /// - [`VaultError::InsufficientPoolFunds`] if reward funds or treasury
    ///   balance cannot cover the payout
    /// - [`VaultError::Transfer`] if the funding collaborator rejects
    pub fn harvest(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        now: Timestamp,
    ) -> Result<HarvestReceipt> {
        self.pool.settle(now)?;
        if !self.authority.is_harvest_authorized(caller, now) {
            return Err(VaultError::NotAuthorized);
        }

        let acct = self.book.get(account);
        if acct.principal == 0 {
            return Err(VaultError::NoPrincipal);
        }

        let (staged, entitlement) = acct.settled_to_zero(&self.pool, now)?;
        if entitlement == 0 {
            return Err(VaultError::NothingToClaim);
        }
        if entitlement > self.reward_funds {
            return Err(VaultError::InsufficientPoolFunds {
                required: entitlement,
                available: self.reward_funds,
            });
        }
        let custody = self.treasury.balance(&self.id);
        if entitlement > custody {
            return Err(VaultError::InsufficientPoolFunds {
                required: entitlement,
                available: custody,
            });
        }

        self.treasury.transfer_out(account, entitlement)?;

        self.reward_funds -= entitlement;
        self.book.put(*account, staged);

        tracing::info!(
            amount = entitlement,
            reward_funds = self.reward_funds,
            "vault: harvest"
        );
        Ok(HarvestReceipt {
            account: *account,
            amount: entitlement,
            harvested_at: now,
        })
    }

    /// Change the pool reward rate. Operator only.
    ///
    /// The accumulator is settled first so the old rate never leaks into
    /// the new interval.
    pub fn set_rate(&mut self, caller: &AccountId, new_rate: u64, now: Timestamp) -> Result<()> {
        if !self.authority.is_operator(caller) {
            return Err(VaultError::NotAuthorized);
        }
        self.pool.settle(now)?;

        let old_rate = self.pool.reward_rate_per_second;
        self.pool.reward_rate_per_second = new_rate;

        tracing::warn!(old_rate, new_rate, "vault: reward rate changed");
        Ok(())
    }

    /// Move `amount` of reward budget from `caller` into the pool.
    /// Operator only.
    ///
    /// # Errors
    ///
    /// - [`VaultError::NotAuthorized`] if `caller` is not an operator
    /// - [`VaultError::Paused`] while the vault is paused
    /// - [`VaultError::InvalidAmount`] if `amount` is zero
    /// - [`VaultError::Transfer`] if the funding collaborator rejects
    pub fn fund_rewards(&mut self, caller: &AccountId, amount: Amount, now: Timestamp) -> Result<()> {
        if !self.authority.is_operator(caller) {
            return Err(VaultError::NotAuthorized);
        }
        self.pool.settle(now)?;
        if self.paused {
            return Err(VaultError::Paused);
        }
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let new_funds = self
            .reward_funds
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;

        self.treasury.transfer_in(caller, amount)?;
        self.reward_funds = new_funds;

        tracing::info!(amount, reward_funds = new_funds, "vault: rewards funded");
        Ok(())
    }

    /// Stop inbound funds (deposits and reward funding). Operator only.
    ///
    /// Withdrawals and harvests stay available: an emergency stop must
    /// never trap depositors.
    pub fn pause(&mut self, caller: &AccountId) -> Result<()> {
        if !self.authority.is_operator(caller) {
            return Err(VaultError::NotAuthorized);
        }
        self.paused = true;
        tracing::warn!("vault: paused");
        Ok(())
    }

    /// Resume inbound funds. Operator only.
    pub fn resume(&mut self, caller: &AccountId) -> Result<()> {
        if !self.authority.is_operator(caller) {
            return Err(VaultError::NotAuthorized);
        }
        self.paused = false;
        tracing::info!("vault: resumed");
        Ok(())
    }

    /// Project `account`'s claimable reward at `now` without mutating the
    /// vault.
    pub fn pending_entitlement(&self, account: &AccountId, now: Timestamp) -> Result<Amount> {
        let mut projected = self.pool.clone();
        projected.settle(now)?;
        self.book.get(account).pending_entitlement(&projected)
    }

    /// The account's raw ledger record.
    pub fn account_state(&self, account: &AccountId) -> PositionSummary {
        let acct = self.book.get(account);
        PositionSummary {
            principal: acct.principal,
            reward_debt: acct.reward_debt,
            reward_carry: acct.reward_carry,
            last_touch_time: acct.last_touch_time,
        }
    }

    /// The pool accounting state as last settled.
    pub fn pool_state(&self) -> &PoolState {
        &self.pool
    }

    /// The account ledger (read-only).
    pub fn book(&self) -> &AccountBook {
        &self.book
    }

    /// Funds currently earmarked for reward payout.
    pub fn reward_funds(&self) -> Amount {
        self.reward_funds
    }

    /// Whether inbound funds are currently blocked.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The vault's custody identity.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// The funding collaborator (read-only).
    pub fn treasury(&self) -> &T {
        &self.treasury
    }

    /// The funding collaborator, for host-side management.
    pub fn treasury_mut(&mut self) -> &mut T {
        &mut self.treasury
    }

    /// The authorization collaborator (read-only).
    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// The authorization collaborator, for host-side management.
    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }
}
