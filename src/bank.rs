//! In-memory 6-decimal asset ledger.
//!
//! Stands in for the token collaborator at the transfer seam: the vault, the
//! bridge and the external venue all hold balances here, and every value
//! movement in the system is a `transfer` between two of those accounts.

use alloy::primitives::Address;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{GivepoolError, Result};

/// Shared asset ledger keyed by account address.
#[derive(Debug, Default)]
pub struct AssetBank {
    balances: RwLock<HashMap<Address, u128>>,
}

impl AssetBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air. Test and simulation setup only;
    /// also how the mock venue materializes accrued yield on exit.
    pub async fn mint(&self, to: Address, amount: u128) {
        let mut balances = self.balances.write().await;
        *balances.entry(to).or_insert(0) += amount;
        debug!(%to, amount, "minted assets");
    }

    /// Move assets between accounts. Fails without any mutation when the
    /// source balance is insufficient.
    pub async fn transfer(&self, from: Address, to: Address, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let mut balances = self.balances.write().await;
        let available = balances.get(&from).copied().unwrap_or(0);
        if available < amount {
            return Err(GivepoolError::InsufficientBalance {
                account: from,
                requested: amount,
                available,
            });
        }
        *balances.get_mut(&from).unwrap() = available - amount;
        *balances.entry(to).or_insert(0) += amount;
        debug!(%from, %to, amount, "transferred assets");
        Ok(())
    }

    pub async fn balance_of(&self, account: Address) -> u128 {
        self.balances.read().await.get(&account).copied().unwrap_or(0)
    }
}
