//! Fixed-point per-share reward accumulator.
//!
//! Converts elapsed wall-clock time and the pool reward rate into a global
//! per-share reward index, without iterating over depositors.
//!
//! ## Formula
//!
//! ```text
//! acc_per_share += elapsed * rate * ACC_SCALE / total_principal
//! ```
//!
//! Integer division truncates toward zero. The ledger never over-promises
//! rewards: truncation dust stays in the pool and is never assigned to any
//! account.

use serde::{Deserialize, Serialize};

use arbor_types::{Amount, Timestamp};

use crate::{Result, VaultError};

/// Fixed-point scale for `acc_per_share` (10^12).
pub const ACC_SCALE: u128 = 1_000_000_000_000;

/// Global pool accounting state, one instance per vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Sum of all accounts' principal, in micro-grains.
    pub total_principal: Amount,
    /// Cumulative reward per unit of principal since genesis, scaled by
    /// [`ACC_SCALE`]. Non-decreasing.
    pub acc_per_share: u128,
    /// Timestamp of the last settlement. Never exceeds the current time.
    pub last_settle_time: Timestamp,
    /// Pool-wide reward emission in micro-grains per second.
    pub reward_rate_per_second: u64,
}

impl PoolState {
    /// Create the pool state at genesis.
    pub fn new(genesis_time: Timestamp, reward_rate_per_second: u64) -> Self {
        Self {
            total_principal: 0,
            acc_per_share: 0,
            last_settle_time: genesis_time,
            reward_rate_per_second,
        }
    }

    /// Advance the accumulator to `now`.
    ///
    /// Must run before any operation that reads or mutates
    /// `total_principal`, `acc_per_share`, or an account's debt. With an
    /// empty pool only the clock advances, so no entitlement can appear
    /// before the first deposit and the division below never sees zero.
    ///
    /// # Errors
    ///
    /// - [`VaultError::ClockRegression`] if `now` precedes the last settlement
    /// - [`VaultError::Overflow`] if `elapsed * rate * ACC_SCALE` exceeds u128
    pub fn settle(&mut self, now: Timestamp) -> Result<()> {
        if now < self.last_settle_time {
            return Err(VaultError::ClockRegression {
                last_settle: self.last_settle_time,
                now,
            });
        }
        if now == self.last_settle_time {
            return Ok(());
        }
        if self.total_principal == 0 {
            self.last_settle_time = now;
            return Ok(());
        }

        let elapsed = now - self.last_settle_time;
        let reward = u128::from(elapsed)
            .checked_mul(u128::from(self.reward_rate_per_second))
            .ok_or(VaultError::Overflow)?;
        let delta = reward
            .checked_mul(ACC_SCALE)
            .ok_or(VaultError::Overflow)?
            / u128::from(self.total_principal);

        self.acc_per_share = self
            .acc_per_share
            .checked_add(delta)
            .ok_or(VaultError::Overflow)?;
        self.last_settle_time = now;

        tracing::trace!(
            elapsed,
            acc_per_share = %self.acc_per_share,
            "pool settled"
        );

        Ok(())
    }

    /// Cumulative reward attributable to `principal` at the current
    /// accumulator value, in micro-grains.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Overflow`] if `principal * acc_per_share` exceeds u128
    pub fn accrued_for(&self, principal: Amount) -> Result<u128> {
        u128::from(principal)
            .checked_mul(self.acc_per_share)
            .map(|v| v / ACC_SCALE)
            .ok_or(VaultError::Overflow)
    }
}
