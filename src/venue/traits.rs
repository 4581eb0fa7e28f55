use alloy::primitives::Address;
use async_trait::async_trait;

use crate::error::Result;

/// Outcome of asking a strategy to return liquidity.
///
/// Illiquidity is deliberately not an error at this seam: the vault converts
/// it into a queued, deferred-success redemption instead of propagating a
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    /// The requested assets were delivered to the caller.
    Completed,
    /// The venue cannot return the requested liquidity right now.
    Illiquid,
}

/// An external share-priced venue: deposits mint venue shares, redemptions
/// burn them, and pricing is always a live conversion.
#[async_trait]
pub trait ShareVenue: Send + Sync {
    /// Deposit assets pulled from `from`; returns the venue shares minted.
    async fn deposit(&self, from: Address, assets: u128) -> Result<u128>;

    /// Burn `shares` and deliver the proceeds to `to`; returns the assets
    /// delivered. Errors without any transfer when the venue is illiquid.
    async fn redeem(&self, to: Address, shares: u128) -> Result<u128>;

    /// Live valuation of a share balance in asset terms.
    async fn convert_to_assets(&self, shares: u128) -> Result<u128>;
}

/// The capital seam consumed by the vault ledger.
///
/// The vault never talks to the venue directly; it hands pooled assets to a
/// strategy and asks for them back, and the strategy reports whether the
/// venue could deliver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StrategyAdapter: Send + Sync {
    /// Forward freshly deposited assets into the venue.
    async fn deposit(&self, assets: u128) -> Result<()>;

    /// Try to pull `assets` back out of the venue and deliver them to the
    /// vault. `Ok(Illiquid)` means nothing moved and the caller may retry
    /// later.
    async fn withdraw(&self, assets: u128) -> Result<WithdrawOutcome>;

    /// Live value of the vault's pooled capital.
    async fn total_assets(&self) -> Result<u128>;
}
