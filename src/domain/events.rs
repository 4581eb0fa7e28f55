use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Observability events published by the vault.
///
/// Delivered over a broadcast channel for in-process consumers and mirrored
/// to tracing; dropping every receiver simply discards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VaultEvent {
    /// A redemption was deferred because the venue could not return liquidity
    WithdrawalQueued {
        user: Address,
        shares: u128,
        assets: u128,
    },
    /// A deferred redemption was paid out and its slot cleared
    WithdrawalProcessed {
        user: Address,
        receiver: Address,
        net: u128,
        donation: u128,
    },
    /// The donation rate changed
    DonationBpsUpdated { bps: u16 },
    /// The donation buffer / governance address changed
    GovernanceUpdated { addr: Address },
}
