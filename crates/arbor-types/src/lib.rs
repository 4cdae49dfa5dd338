//! # arbor-types
//!
//! Shared domain types used across the Arbor workspace.
//! Identifiers, amount/time aliases, and economy-wide constants.

use serde::{Deserialize, Serialize};

/// Account identifier: a 32-byte hash of the holder's public key.
pub type AccountId = [u8; 32];

/// Amount in micro-grains.
pub type Amount = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Micro-grains per Grain (1 Grain = 100,000,000 micro-grains).
pub const MICRO_GRAINS_PER_GRAIN: u64 = 100_000_000;

/// Seconds per day, used for registration TTLs.
pub const SECONDS_PER_DAY: u64 = 86400;

/// Summary of a depositor's position, exposed by read-only queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    /// Amount currently deposited, in micro-grains.
    pub principal: Amount,
    /// Reward already attributed to this position (paid or offset at deposit).
    pub reward_debt: u128,
    /// Entitlement banked at the position's last principal change.
    pub reward_carry: u128,
    /// Timestamp of the position's last deposit, withdrawal, or harvest.
    pub last_touch_time: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grain_denomination() {
        assert_eq!(MICRO_GRAINS_PER_GRAIN, 100_000_000);
        assert_eq!(5 * MICRO_GRAINS_PER_GRAIN, 500_000_000);
    }
}
