//! In-memory share-priced venue for tests and the simulate mode.
//!
//! Price is set directly by the test harness; yield accrued by a price move
//! is minted into the venue's bank account at redemption time, so exits stay
//! fully backed without modelling the venue's own strategy. An optional
//! liquidity cap makes the venue refuse redemptions above it, which is how
//! deferred-withdrawal scenarios are driven.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::bank::AssetBank;
use crate::error::{GivepoolError, Result};
use crate::numeric::mul_div_floor;
use crate::venue::traits::ShareVenue;

/// Fixed-point base for the venue share price (1.0 == 1_000_000).
pub const PRICE_ONE: u128 = 1_000_000;

#[derive(Debug)]
struct VenueState {
    price_e6: u128,
    total_shares: u128,
    liquidity_cap: Option<u128>,
}

/// A settable-price venue backed by the shared asset bank.
pub struct SimulatedVenue {
    address: Address,
    bank: Arc<AssetBank>,
    state: RwLock<VenueState>,
}

impl SimulatedVenue {
    /// New venue at price 1.0 with unlimited liquidity.
    pub fn new(address: Address, bank: Arc<AssetBank>) -> Self {
        Self {
            address,
            bank,
            state: RwLock::new(VenueState {
                price_e6: PRICE_ONE,
                total_shares: 0,
                liquidity_cap: None,
            }),
        }
    }

    /// Move the share price; 1_000_000 is par.
    pub async fn set_price_e6(&self, price_e6: u128) {
        self.state.write().await.price_e6 = price_e6;
    }

    /// Cap the assets a single redemption may pull out; `None` lifts the cap.
    pub async fn set_liquidity_cap(&self, cap: Option<u128>) {
        self.state.write().await.liquidity_cap = cap;
    }

    pub async fn total_shares(&self) -> u128 {
        self.state.read().await.total_shares
    }
}

#[async_trait]
impl ShareVenue for SimulatedVenue {
    async fn deposit(&self, from: Address, assets: u128) -> Result<u128> {
        let mut state = self.state.write().await;
        let shares = mul_div_floor(assets, PRICE_ONE, state.price_e6)
            .ok_or_else(|| GivepoolError::Overflow("venue share mint".into()))?;
        self.bank.transfer(from, self.address, assets).await?;
        state.total_shares += shares;
        debug!(%from, assets, shares, "venue deposit");
        Ok(shares)
    }

    async fn redeem(&self, to: Address, shares: u128) -> Result<u128> {
        let mut state = self.state.write().await;
        if shares > state.total_shares {
            return Err(GivepoolError::Venue(format!(
                "redeeming {shares} shares against supply {}",
                state.total_shares
            )));
        }
        let assets = mul_div_floor(shares, state.price_e6, PRICE_ONE)
            .ok_or_else(|| GivepoolError::Overflow("venue redemption".into()))?;
        if let Some(cap) = state.liquidity_cap {
            if assets > cap {
                return Err(GivepoolError::Venue(format!(
                    "venue illiquid: {assets} requested, {cap} available"
                )));
            }
        }

        // Accrued yield materializes on exit.
        let held = self.bank.balance_of(self.address).await;
        if held < assets {
            self.bank.mint(self.address, assets - held).await;
        }
        self.bank.transfer(self.address, to, assets).await?;
        state.total_shares -= shares;
        debug!(%to, shares, assets, "venue redemption");
        Ok(assets)
    }

    async fn convert_to_assets(&self, shares: u128) -> Result<u128> {
        let state = self.state.read().await;
        mul_div_floor(shares, state.price_e6, PRICE_ONE)
            .ok_or_else(|| GivepoolError::Overflow("venue conversion".into()))
    }
}
