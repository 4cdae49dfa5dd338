//! # arbor-vault
//!
//! Reward-accrual vault for the Arbor network.
//!
//! Depositors stake Grains into a shared pool and earn continuously
//! accruing rewards; validated agents trigger payout (harvest) on a
//! depositor's behalf. The accumulator pattern keeps every operation O(1)
//! regardless of the number of depositors.
//!
//! ## Modules
//!
//! - [`accumulator`] — fixed-point per-share reward accumulator
//! - [`ledger`] — per-depositor principal and reward-debt bookkeeping
//! - [`vault`] — vault controller and collaborator seams
//! - [`memory`] — in-memory reference collaborators

pub mod accumulator;
pub mod ledger;
pub mod memory;
pub mod vault;

use arbor_types::{Amount, Timestamp};

/// Error raised by the funding collaborator, propagated verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// The holder does not have enough funds for the transfer.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount requested.
        requested: Amount,
        /// Amount available.
        available: Amount,
    },

    /// The transfer was rejected by the asset backend.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Error types for vault operations.
///
/// Every failure leaves the vault unchanged, except that a completed
/// accumulator settlement may persist (settlement alone moves no funds and
/// is idempotent at the same timestamp).
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Zero amount passed to a balance-affecting operation.
    #[error("amount must be non-zero")]
    InvalidAmount,

    /// Withdrawal exceeds the account's principal.
    #[error("insufficient principal: requested {requested}, available {available}")]
    InsufficientPrincipal {
        /// Amount requested.
        requested: Amount,
        /// Principal currently held.
        available: Amount,
    },

    /// Caller is not authorized for the attempted operation.
    #[error("not authorized")]
    NotAuthorized,

    /// Harvest attempted for an account with no principal.
    #[error("account has no principal")]
    NoPrincipal,

    /// Harvest attempted with zero pending entitlement.
    #[error("nothing to claim")]
    NothingToClaim,

    /// The pool cannot cover the payout.
    #[error("insufficient pool funds: required {required}, available {available}")]
    InsufficientPoolFunds {
        /// Entitlement to be paid.
        required: Amount,
        /// Funds available for payout.
        available: Amount,
    },

    /// Arithmetic overflow in accumulator or entitlement calculation.
    #[error("arithmetic overflow")]
    Overflow,

    /// Time moved backward relative to the last settlement.
    #[error("clock regression: last settle {last_settle}, now {now}")]
    ClockRegression {
        /// Timestamp of the last settlement.
        last_settle: Timestamp,
        /// The offending current timestamp.
        now: Timestamp,
    },

    /// The vault is paused for inbound funds.
    #[error("vault is paused")]
    Paused,

    /// The funding collaborator rejected a transfer.
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

/// Convenience result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
