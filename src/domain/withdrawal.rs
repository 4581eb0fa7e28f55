use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Withdrawal slot states
///
/// A redemption that cannot be settled immediately burns its shares and parks
/// the payout here. `Processed` is transient: a successful
/// `process_queued_withdrawal` passes through it and clears the slot back to
/// `None` within the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawalState {
    /// No deferred payout for this user
    None,
    /// Shares burned, payout frozen, waiting for venue liquidity
    Queued,
    /// Frozen payout delivered, slot about to clear
    Processed,
}

impl WithdrawalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalState::None => "NONE",
            WithdrawalState::Queued => "QUEUED",
            WithdrawalState::Processed => "PROCESSED",
        }
    }

    /// Check if this state can transition to another state
    pub fn can_transition_to(&self, target: WithdrawalState) -> bool {
        use WithdrawalState::*;

        match (self, target) {
            // A redeem hits venue illiquidity
            (None, Queued) => true,
            // Liquidity returned and the frozen payout was delivered
            (Queued, Processed) => true,
            // Slot cleared for reuse
            (Processed, None) => true,
            // A failed processing attempt leaves the slot queued; everything
            // else is invalid
            _ => false,
        }
    }

    /// Does this state block new deposits and redemptions for the user?
    pub fn blocks_activity(&self) -> bool {
        matches!(self, WithdrawalState::Queued)
    }
}

impl fmt::Display for WithdrawalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deferred redemption payout.
///
/// Every field is frozen at queue time: the share burn is already final, and
/// processing pays exactly these amounts no matter how the share price moves
/// while the slot waits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedWithdrawal {
    /// Shares burned by the deferred redemption
    pub shares: u128,
    /// Gross asset value computed at queue time
    pub assets: u128,
    /// Net payout owed to the receiver
    pub net: u128,
    /// Donation owed to the buffer
    pub donation: u128,
    /// Where the net payout goes once liquidity returns
    pub receiver: Address,
    /// When the redemption was deferred
    pub queued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use WithdrawalState::*;

        assert!(None.can_transition_to(Queued));
        assert!(Queued.can_transition_to(Processed));
        assert!(Processed.can_transition_to(None));

        // No skipping or reversing
        assert!(!None.can_transition_to(Processed));
        assert!(!Queued.can_transition_to(None));
        assert!(!Queued.can_transition_to(Queued));
        assert!(!Processed.can_transition_to(Queued));
        assert!(!None.can_transition_to(None));
    }

    #[test]
    fn only_queued_blocks_activity() {
        assert!(WithdrawalState::Queued.blocks_activity());
        assert!(!WithdrawalState::None.blocks_activity());
        assert!(!WithdrawalState::Processed.blocks_activity());
    }
}
