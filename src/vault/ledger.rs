//! Share ledger for the pooled giving vault.
//!
//! Tracks per-user lifetime totals and vault-wide share supply, prices
//! deposits and redemptions against the live value reported by the strategy
//! adapter, and converts venue illiquidity into queued, deferred-success
//! withdrawals instead of failures. Every public operation validates before
//! it mutates, so a rejected call leaves no partial state behind.

use alloy::primitives::Address;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::bank::AssetBank;
use crate::config::VaultConfig;
use crate::domain::{QueuedWithdrawal, UserAccount, VaultEvent, WithdrawalState};
use crate::error::{GivepoolError, Result, VaultError};
use crate::numeric::{mul_div_floor, SHARE_SCALAR};
use crate::vault::donation::donation_for;
use crate::venue::{StrategyAdapter, WithdrawOutcome};

/// How a redemption settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Liquidity was available; net and donation have been paid out.
    Immediate { net: u128, donation: u128 },
    /// Shares are burned but the payout waits for venue liquidity.
    Queued { ticket: QueuedWithdrawal },
}

#[derive(Debug)]
struct VaultState {
    accounts: HashMap<Address, UserAccount>,
    share_balances: HashMap<Address, u128>,
    total_supply: u128,
    queued: HashMap<Address, QueuedWithdrawal>,
    donation_bps: u16,
    governance: Address,
}

/// The pooled, share-based giving vault.
pub struct Vault {
    /// The vault's own custody account in the asset bank
    address: Address,
    owner: Address,
    max_donation_bps: u16,
    bank: Arc<AssetBank>,
    adapter: Arc<dyn StrategyAdapter>,
    state: RwLock<VaultState>,
    events: broadcast::Sender<VaultEvent>,
}

impl Vault {
    pub fn new(
        address: Address,
        config: &VaultConfig,
        bank: Arc<AssetBank>,
        adapter: Arc<dyn StrategyAdapter>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            address,
            owner: config.owner,
            max_donation_bps: config.max_donation_bps,
            bank,
            adapter,
            state: RwLock::new(VaultState {
                accounts: HashMap::new(),
                share_balances: HashMap::new(),
                total_supply: 0,
                queued: HashMap::new(),
                donation_bps: config.donation_bps,
                governance: config.governance,
            }),
            events,
        }
    }

    /// Subscribe to vault observability events.
    pub fn subscribe(&self) -> broadcast::Receiver<VaultEvent> {
        self.events.subscribe()
    }

    // ==================== depositor operations ====================

    /// Pull `amount` assets from `caller`, stake them through the strategy
    /// adapter and mint shares to `receiver`. Returns the shares minted.
    pub async fn deposit(&self, caller: Address, amount: u128, receiver: Address) -> Result<u128> {
        if amount == 0 {
            return Err(VaultError::ZeroAssets.into());
        }
        if receiver == Address::ZERO {
            return Err(VaultError::InvalidReceiver { addr: receiver }.into());
        }

        let mut state = self.state.write().await;
        if state.queued.contains_key(&receiver) {
            return Err(VaultError::WithdrawalPending { user: receiver }.into());
        }

        let total_assets = self.adapter.total_assets().await?;
        let shares = if state.total_supply == 0 || total_assets == 0 {
            amount
                .checked_mul(SHARE_SCALAR)
                .ok_or_else(|| GivepoolError::Overflow("first deposit share mint".into()))?
        } else {
            mul_div_floor(amount, state.total_supply, total_assets)
                .ok_or_else(|| GivepoolError::Overflow("deposit share mint".into()))?
        };
        if shares == 0 {
            return Err(VaultError::DepositTooSmall { amount }.into());
        }

        self.bank.transfer(caller, self.address, amount).await?;
        if let Err(err) = self.adapter.deposit(amount).await {
            // Return the pulled assets so a rejected forward leaves no trace.
            self.bank.transfer(self.address, caller, amount).await?;
            return Err(err);
        }

        state.accounts.entry(receiver).or_default().deposited += amount;
        *state.share_balances.entry(receiver).or_insert(0) += shares;
        state.total_supply += shares;

        info!(%caller, %receiver, amount, shares, "deposit");
        Ok(shares)
    }

    /// Redeem `shares` held by `caller`, paying the proceeds to `receiver`.
    ///
    /// When the venue cannot return liquidity the shares are still burned
    /// and a [`QueuedWithdrawal`] with the payout frozen at today's figures
    /// is recorded instead; that is a success, not an error.
    pub async fn redeem(
        &self,
        caller: Address,
        shares: u128,
        receiver: Address,
    ) -> Result<Settlement> {
        if shares == 0 {
            return Err(VaultError::ZeroShares.into());
        }
        if receiver == Address::ZERO {
            return Err(VaultError::InvalidReceiver { addr: receiver }.into());
        }

        let mut state = self.state.write().await;
        if state.queued.contains_key(&caller) {
            return Err(VaultError::WithdrawalPending { user: caller }.into());
        }
        let balance = state.share_balances.get(&caller).copied().unwrap_or(0);
        if shares > balance {
            return Err(VaultError::InsufficientShares {
                requested: shares,
                available: balance,
            }
            .into());
        }

        let total_assets = self.adapter.total_assets().await?;
        let gross = mul_div_floor(shares, total_assets, state.total_supply)
            .ok_or_else(|| GivepoolError::Overflow("redemption gross".into()))?;

        let outcome = if gross == 0 {
            WithdrawOutcome::Completed
        } else {
            self.adapter.withdraw(gross).await?
        };

        let account = state.accounts.get(&caller).copied().unwrap_or_default();
        let terms = donation_for(&account, gross, state.donation_bps);

        // The burn is final either way; a queued ticket never un-burns.
        *state.share_balances.get_mut(&caller).unwrap() = balance - shares;
        state.total_supply -= shares;

        match outcome {
            WithdrawOutcome::Illiquid => {
                let ticket = QueuedWithdrawal {
                    shares,
                    assets: gross,
                    net: terms.net,
                    donation: terms.donation,
                    receiver,
                    queued_at: Utc::now(),
                };
                debug_assert!(WithdrawalState::None.can_transition_to(WithdrawalState::Queued));
                state.queued.insert(caller, ticket.clone());
                warn!(%caller, shares, gross, "venue illiquid, withdrawal queued");
                let _ = self.events.send(VaultEvent::WithdrawalQueued {
                    user: caller,
                    shares,
                    assets: gross,
                });
                Ok(Settlement::Queued { ticket })
            }
            WithdrawOutcome::Completed => {
                self.bank.transfer(self.address, receiver, terms.net).await?;
                self.bank
                    .transfer(self.address, state.governance, terms.donation)
                    .await?;
                let account = state.accounts.entry(caller).or_default();
                account.withdrawn += terms.net;
                account.donated += terms.donation;

                info!(
                    %caller, %receiver, shares,
                    gross, net = terms.net, donation = terms.donation,
                    "redeemed"
                );
                Ok(Settlement::Immediate {
                    net: terms.net,
                    donation: terms.donation,
                })
            }
        }
    }

    /// Re-attempt delivery of a queued withdrawal. Pays the values frozen at
    /// queue time and clears the slot; fails with `StillIlliquid` and no
    /// state change when the venue still cannot deliver, so the call is
    /// freely retryable.
    pub async fn process_queued_withdrawal(&self, user: Address) -> Result<(u128, u128)> {
        let mut state = self.state.write().await;
        let ticket = state
            .queued
            .get(&user)
            .cloned()
            .ok_or(VaultError::NoPendingWithdrawal { user })?;

        let outcome = if ticket.assets == 0 {
            WithdrawOutcome::Completed
        } else {
            self.adapter.withdraw(ticket.assets).await?
        };
        if outcome == WithdrawOutcome::Illiquid {
            return Err(VaultError::StillIlliquid {
                assets: ticket.assets,
            }
            .into());
        }

        debug_assert!(WithdrawalState::Queued.can_transition_to(WithdrawalState::Processed));
        self.bank
            .transfer(self.address, ticket.receiver, ticket.net)
            .await?;
        self.bank
            .transfer(self.address, state.governance, ticket.donation)
            .await?;

        let account = state.accounts.entry(user).or_default();
        account.withdrawn += ticket.net;
        account.donated += ticket.donation;
        state.queued.remove(&user);
        debug_assert!(WithdrawalState::Processed.can_transition_to(WithdrawalState::None));

        info!(
            %user, receiver = %ticket.receiver,
            net = ticket.net, donation = ticket.donation,
            "queued withdrawal processed"
        );
        let _ = self.events.send(VaultEvent::WithdrawalProcessed {
            user,
            receiver: ticket.receiver,
            net: ticket.net,
            donation: ticket.donation,
        });
        Ok((ticket.net, ticket.donation))
    }

    // ==================== admin operations ====================

    /// Owner-only: change the donation rate, bounded by the configured
    /// sanity ceiling. Redemption additionally clamps at 100% defensively.
    pub async fn set_donation_bps(&self, caller: Address, bps: u16) -> Result<()> {
        if caller != self.owner {
            return Err(VaultError::NotAuthorized { caller }.into());
        }
        if bps > self.max_donation_bps {
            return Err(VaultError::DonationBpsTooHigh {
                bps,
                ceiling: self.max_donation_bps,
            }
            .into());
        }
        self.state.write().await.donation_bps = bps;
        info!(bps, "donation rate updated");
        let _ = self.events.send(VaultEvent::DonationBpsUpdated { bps });
        Ok(())
    }

    /// Owner-only: repoint the donation buffer / governance address.
    pub async fn set_governance(&self, caller: Address, addr: Address) -> Result<()> {
        if caller != self.owner {
            return Err(VaultError::NotAuthorized { caller }.into());
        }
        if addr == Address::ZERO {
            return Err(VaultError::InvalidReceiver { addr }.into());
        }
        self.state.write().await.governance = addr;
        info!(%addr, "governance updated");
        let _ = self.events.send(VaultEvent::GovernanceUpdated { addr });
        Ok(())
    }

    // ==================== views ====================

    /// Live value of the pooled capital, always via the adapter.
    pub async fn total_assets(&self) -> Result<u128> {
        self.adapter.total_assets().await
    }

    pub async fn total_supply(&self) -> u128 {
        self.state.read().await.total_supply
    }

    pub async fn share_balance_of(&self, user: Address) -> u128 {
        self.state
            .read()
            .await
            .share_balances
            .get(&user)
            .copied()
            .unwrap_or(0)
    }

    pub async fn account(&self, user: Address) -> UserAccount {
        self.state
            .read()
            .await
            .accounts
            .get(&user)
            .copied()
            .unwrap_or_default()
    }

    pub async fn queued_withdrawal(&self, user: Address) -> Option<QueuedWithdrawal> {
        self.state.read().await.queued.get(&user).cloned()
    }

    pub async fn withdrawal_state(&self, user: Address) -> WithdrawalState {
        if self.state.read().await.queued.contains_key(&user) {
            WithdrawalState::Queued
        } else {
            WithdrawalState::None
        }
    }

    pub async fn donation_bps(&self) -> u16 {
        self.state.read().await.donation_bps
    }

    pub async fn governance(&self) -> Address {
        self.state.read().await.governance
    }
}
