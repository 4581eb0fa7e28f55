//! Command line interface: argument definitions and command handlers.

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::bank::AssetBank;
use crate::bridge::{BridgeAdapter, BridgeStrategy};
use crate::codec::ActionPayload;
use crate::config::AppConfig;
use crate::error::{GivepoolError, Result};
use crate::numeric::rescale_6_to_8;
use crate::vault::{Settlement, Vault};
use crate::venue::{ShareVenue, SimulatedVenue};

#[derive(Parser)]
#[command(name = "givepool", about = "Pooled giving vault with bridged settlement")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted deposit/appreciate/redeem/queue scenario against the
    /// simulated venue
    Simulate {
        /// Configuration directory (falls back to built-in demo config)
        #[arg(long, default_value = "config")]
        config_dir: String,
        /// Emit machine-readable JSON instead of plain lines
        #[arg(long)]
        json: bool,
    },
    /// Encode a relay instruction for debugging
    Encode {
        /// Vault address embedded in the payload
        #[arg(long)]
        vault: Address,
        /// Encode the withdraw direction instead of deposit
        #[arg(long)]
        withdraw: bool,
        /// Asset amount in 6-decimal base units
        #[arg(long)]
        amount: u128,
    },
}

const UNIT: u128 = 1_000_000;

fn fmt_units(amount: u128) -> String {
    format!("{}.{:06}", amount / UNIT, amount % UNIT)
}

/// Print one relay payload for the given transfer.
pub fn run_encode(vault: Address, withdraw: bool, amount: u128) -> Result<()> {
    let rescaled = rescale_6_to_8(amount).ok_or_else(|| {
        GivepoolError::Validation(format!(
            "amount {amount} does not fit the 64-bit settlement encoding"
        ))
    })?;
    let payload = ActionPayload::vault_transfer(vault, !withdraw, rescaled);
    println!("{}", payload.encode_hex());
    Ok(())
}

/// Wire up a full in-memory deployment and walk it through the interesting
/// paths: a profitable redemption, a deferred one, and its retry.
pub async fn run_simulate(config: &AppConfig, json_output: bool) -> Result<()> {
    let alice = Address::with_last_byte(0x0A);
    let vault_addr = config.bridge.vault_tag;
    let bridge_addr = Address::with_last_byte(0x04);
    let venue_addr = Address::with_last_byte(0x05);

    let bank = Arc::new(AssetBank::new());
    bank.mint(alice, 1_000 * UNIT).await;

    let venue = Arc::new(SimulatedVenue::new(venue_addr, Arc::clone(&bank)));
    let bridge = Arc::new(BridgeAdapter::new(
        config.bridge.owner,
        bridge_addr,
        config.bridge.vault_tag,
        Arc::clone(&bank),
        Arc::clone(&venue) as Arc<dyn ShareVenue>,
    ));
    bridge
        .set_authorized_strategy(config.bridge.owner, vault_addr, true)
        .await?;

    let adapter = Arc::new(BridgeStrategy::new(Arc::clone(&bridge), vault_addr));
    let vault = Vault::new(vault_addr, &config.vault, Arc::clone(&bank), adapter);

    let mut steps = Vec::new();

    let shares = vault.deposit(alice, 100 * UNIT, alice).await?;
    steps.push(json!({ "step": "deposit", "assets": fmt_units(100 * UNIT), "shares": shares.to_string() }));

    venue.set_price_e6(1_500_000).await;
    steps.push(json!({ "step": "price", "per_share": "1.50" }));

    match vault.redeem(alice, shares / 2, alice).await? {
        Settlement::Immediate { net, donation } => {
            steps.push(json!({ "step": "redeem_half", "net": fmt_units(net), "donation": fmt_units(donation) }));
        }
        Settlement::Queued { .. } => unreachable!("venue is liquid"),
    }

    venue.set_liquidity_cap(Some(0)).await;
    match vault.redeem(alice, shares / 2, alice).await? {
        Settlement::Queued { ticket } => {
            steps.push(json!({ "step": "redeem_queued", "frozen_net": fmt_units(ticket.net), "frozen_donation": fmt_units(ticket.donation) }));
        }
        Settlement::Immediate { .. } => unreachable!("venue cap is zero"),
    }

    if let Err(err) = vault.process_queued_withdrawal(alice).await {
        steps.push(json!({ "step": "process_retry", "error": err.to_string() }));
    }

    venue.set_liquidity_cap(None).await;
    let (net, donation) = vault.process_queued_withdrawal(alice).await?;
    steps.push(json!({ "step": "process_ok", "net": fmt_units(net), "donation": fmt_units(donation) }));

    let account = vault.account(alice).await;
    let summary = json!({
        "alice_balance": fmt_units(bank.balance_of(alice).await),
        "buffer_balance": fmt_units(bank.balance_of(config.vault.governance).await),
        "lifetime": {
            "deposited": fmt_units(account.deposited),
            "withdrawn": fmt_units(account.withdrawn),
            "donated": fmt_units(account.donated),
        },
        "relay_instructions": bridge
            .emitted_actions()
            .await
            .iter()
            .map(|a| a.encode_hex())
            .collect::<Vec<_>>(),
    });

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "steps": steps, "summary": summary }))?
        );
    } else {
        for step in &steps {
            println!("{step}");
        }
        println!("{summary:#}");
    }

    info!("simulation complete");
    Ok(())
}
