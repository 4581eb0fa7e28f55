//! Bridge settlement layer.
//!
//! Custodies one external share-priced venue on behalf of multiple
//! authorized strategy callers, tracks each caller's venue share position,
//! and emits the bit-exact relay instruction for every stake and unstake.
//! Overflow of the 64-bit settlement encoding is checked before any venue
//! call so an instruction is never silently truncated.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::bank::AssetBank;
use crate::codec::ActionPayload;
use crate::error::{BridgeError, GivepoolError, Result};
use crate::numeric::{mul_div_ceil, rescale_6_to_8};
use crate::venue::{ShareVenue, StrategyAdapter, WithdrawOutcome};

#[derive(Debug, Default)]
struct BridgeState {
    authorized: HashSet<Address>,
    /// Venue share balance per authorized caller
    positions: HashMap<Address, u128>,
}

/// Custodian of pooled capital in the external venue.
pub struct BridgeAdapter {
    owner: Address,
    /// The bridge's own custody account in the asset bank
    address: Address,
    /// Vault address embedded in every emitted relay instruction
    vault_tag: Address,
    bank: Arc<AssetBank>,
    venue: Arc<dyn ShareVenue>,
    state: RwLock<BridgeState>,
    actions: RwLock<Vec<ActionPayload>>,
}

impl BridgeAdapter {
    pub fn new(
        owner: Address,
        address: Address,
        vault_tag: Address,
        bank: Arc<AssetBank>,
        venue: Arc<dyn ShareVenue>,
    ) -> Self {
        Self {
            owner,
            address,
            vault_tag,
            bank,
            venue,
            state: RwLock::new(BridgeState::default()),
            actions: RwLock::new(Vec::new()),
        }
    }

    /// Grant or revoke a strategy's right to stake through this bridge.
    /// Owner only; the zero address is never a strategy.
    pub async fn set_authorized_strategy(
        &self,
        caller: Address,
        strategy: Address,
        enabled: bool,
    ) -> Result<()> {
        if caller != self.owner {
            return Err(BridgeError::NotAuthorized { caller }.into());
        }
        if strategy == Address::ZERO {
            return Err(BridgeError::ZeroAddress.into());
        }

        let mut state = self.state.write().await;
        if enabled {
            state.authorized.insert(strategy);
        } else {
            state.authorized.remove(&strategy);
        }
        info!(%strategy, enabled, "authorized strategy updated");
        Ok(())
    }

    pub async fn is_authorized(&self, strategy: Address) -> bool {
        self.state.read().await.authorized.contains(&strategy)
    }

    /// Pull assets from an authorized caller, stake them into the venue and
    /// emit the deposit-direction relay instruction. Returns the venue
    /// shares credited to the caller's position.
    pub async fn stake(&self, caller: Address, assets: u128) -> Result<u128> {
        let mut state = self.state.write().await;
        if !state.authorized.contains(&caller) {
            return Err(BridgeError::NotAuthorized { caller }.into());
        }
        if assets == 0 {
            return Err(BridgeError::ZeroAssets.into());
        }
        let rescaled =
            rescale_6_to_8(assets).ok_or(BridgeError::AmountTooLarge { assets })?;

        self.bank.transfer(caller, self.address, assets).await?;
        let shares = match self.venue.deposit(self.address, assets).await {
            Ok(shares) => shares,
            Err(err) => {
                // Return the pulled assets; a refused stake leaves no trace.
                self.bank.transfer(self.address, caller, assets).await?;
                return Err(err);
            }
        };
        *state.positions.entry(caller).or_insert(0) += shares;

        info!(%caller, assets, shares, "staked into venue");
        self.emit(ActionPayload::vault_transfer(self.vault_tag, true, rescaled))
            .await;
        Ok(shares)
    }

    /// Unstake exactly `assets` back to an authorized caller, burning the
    /// caller's venue shares rounded up so the redemption never falls short.
    /// Returns the shares burned.
    pub async fn unstake(&self, caller: Address, assets: u128) -> Result<u128> {
        let mut state = self.state.write().await;
        if !state.authorized.contains(&caller) {
            return Err(BridgeError::NotAuthorized { caller }.into());
        }
        if assets == 0 {
            return Err(BridgeError::ZeroAssets.into());
        }
        let rescaled =
            rescale_6_to_8(assets).ok_or(BridgeError::AmountTooLarge { assets })?;

        let held = state.positions.get(&caller).copied().unwrap_or(0);
        if held == 0 {
            return Err(BridgeError::InsufficientAssets {
                requested: assets,
                received: 0,
            }
            .into());
        }

        let position_value = self.venue.convert_to_assets(held).await?;
        if position_value == 0 {
            return Err(BridgeError::InsufficientAssets {
                requested: assets,
                received: 0,
            }
            .into());
        }
        let shares_to_burn = mul_div_ceil(assets, held, position_value)
            .ok_or_else(|| GivepoolError::Overflow("bridge share burn".into()))?
            .min(held);

        let received = match self.venue.redeem(self.address, shares_to_burn).await {
            Ok(received) => received,
            Err(err) => {
                warn!(%caller, assets, %err, "venue refused redemption");
                return Err(BridgeError::InsufficientAssets {
                    requested: assets,
                    received: 0,
                }
                .into());
            }
        };
        if received < assets {
            // The venue under-delivered. The burn already happened, so
            // restake the proceeds and record the net share change; the
            // position must match what the venue actually holds.
            let restaked = if received > 0 {
                self.venue.deposit(self.address, received).await?
            } else {
                0
            };
            *state.positions.get_mut(&caller).unwrap() = held - shares_to_burn + restaked;
            warn!(%caller, assets, received, "venue under-delivered, proceeds restaked");
            return Err(BridgeError::InsufficientAssets {
                requested: assets,
                received,
            }
            .into());
        }

        *state.positions.get_mut(&caller).unwrap() = held - shares_to_burn;
        self.bank.transfer(self.address, caller, assets).await?;

        info!(%caller, assets, shares_to_burn, "unstaked from venue");
        self.emit(ActionPayload::vault_transfer(self.vault_tag, false, rescaled))
            .await;
        Ok(shares_to_burn)
    }

    /// Live asset value of a caller's venue position. Never cached.
    pub async fn total_assets(&self, caller: Address) -> Result<u128> {
        let held = {
            let state = self.state.read().await;
            state.positions.get(&caller).copied().unwrap_or(0)
        };
        self.venue.convert_to_assets(held).await
    }

    pub async fn position_of(&self, caller: Address) -> u128 {
        self.state.read().await.positions.get(&caller).copied().unwrap_or(0)
    }

    /// Every relay instruction emitted so far, oldest first.
    pub async fn emitted_actions(&self) -> Vec<ActionPayload> {
        self.actions.read().await.clone()
    }

    async fn emit(&self, payload: ActionPayload) {
        info!(payload = %payload.encode_hex(), "emitting relay instruction");
        self.actions.write().await.push(payload);
    }
}

/// Binds a bridge to one authorized caller so the vault can consume it
/// through the [`StrategyAdapter`] seam without knowing its own address is
/// the position key.
pub struct BridgeStrategy {
    bridge: Arc<BridgeAdapter>,
    caller: Address,
}

impl BridgeStrategy {
    pub fn new(bridge: Arc<BridgeAdapter>, caller: Address) -> Self {
        Self { bridge, caller }
    }
}

#[async_trait]
impl StrategyAdapter for BridgeStrategy {
    async fn deposit(&self, assets: u128) -> Result<()> {
        self.bridge.stake(self.caller, assets).await.map(|_| ())
    }

    async fn withdraw(&self, assets: u128) -> Result<WithdrawOutcome> {
        match self.bridge.unstake(self.caller, assets).await {
            Ok(_) => Ok(WithdrawOutcome::Completed),
            // The one deliberate conversion of a collaborator failure into a
            // deferred-success outcome: the vault queues instead of failing.
            Err(GivepoolError::Bridge(BridgeError::InsufficientAssets { .. })) => {
                Ok(WithdrawOutcome::Illiquid)
            }
            Err(err) => Err(err),
        }
    }

    async fn total_assets(&self) -> Result<u128> {
        self.bridge.total_assets(self.caller).await
    }
}
