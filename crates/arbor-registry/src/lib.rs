//! # arbor-registry
//!
//! Agent validation records and the operator set.
//!
//! Agents post a bond to become validated for a limited period; while the
//! validation is live they may trigger reward harvests on depositors'
//! behalf. The registry implements the vault's
//! [`AuthorityGate`](arbor_vault::vault::AuthorityGate) seam, so
//! authorization is re-evaluated — including expiry — on every harvest.

pub mod validation;

/// Error types for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The agent already holds a live validation.
    #[error("agent already validated")]
    AlreadyValidated,

    /// No validation record exists for the agent.
    #[error("agent not validated")]
    NotValidated,

    /// The posted bond is below the registry minimum.
    #[error("bond too low: posted {posted}, minimum {minimum}")]
    BondTooLow {
        /// Bond posted by the agent.
        posted: u64,
        /// Minimum bond required.
        minimum: u64,
    },
}

/// Convenience result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
