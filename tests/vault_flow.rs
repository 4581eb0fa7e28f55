//! End-to-end ledger scenarios against the simulated venue: profit-only
//! donation across single and multiple cycles, and the deferred-withdrawal
//! lifecycle.

use std::sync::Arc;

use alloy::primitives::Address;
use givepool::config::VaultConfig;
use givepool::{
    AssetBank, BridgeAdapter, BridgeStrategy, GivepoolError, Settlement, ShareVenue,
    SimulatedVenue, Vault, VaultError, VaultEvent, WithdrawalState,
};

const UNIT: u128 = 1_000_000;

fn addr(last: u8) -> Address {
    Address::with_last_byte(last)
}

const OWNER: u8 = 1;
const BUFFER: u8 = 2;
const VAULT: u8 = 3;
const BRIDGE: u8 = 4;
const VENUE: u8 = 5;
const ALICE: u8 = 10;

struct World {
    bank: Arc<AssetBank>,
    venue: Arc<SimulatedVenue>,
    vault: Vault,
}

async fn setup(donation_bps: u16) -> World {
    let bank = Arc::new(AssetBank::new());
    bank.mint(addr(ALICE), 1_000 * UNIT).await;

    let venue = Arc::new(SimulatedVenue::new(addr(VENUE), Arc::clone(&bank)));
    let bridge = Arc::new(BridgeAdapter::new(
        addr(OWNER),
        addr(BRIDGE),
        addr(VAULT),
        Arc::clone(&bank),
        Arc::clone(&venue) as Arc<dyn ShareVenue>,
    ));
    bridge
        .set_authorized_strategy(addr(OWNER), addr(VAULT), true)
        .await
        .unwrap();

    let config = VaultConfig {
        donation_bps,
        max_donation_bps: 5_000,
        owner: addr(OWNER),
        governance: addr(BUFFER),
    };
    let adapter = Arc::new(BridgeStrategy::new(Arc::clone(&bridge), addr(VAULT)));
    let vault = Vault::new(addr(VAULT), &config, Arc::clone(&bank), adapter);

    World { bank, venue, vault }
}

fn immediate(settlement: Settlement) -> (u128, u128) {
    match settlement {
        Settlement::Immediate { net, donation } => (net, donation),
        Settlement::Queued { .. } => panic!("expected immediate settlement"),
    }
}

#[tokio::test]
async fn appreciation_donates_ten_percent_of_profit() {
    let world = setup(1_000).await;
    let shares = world
        .vault
        .deposit(addr(ALICE), 100 * UNIT, addr(ALICE))
        .await
        .unwrap();

    world.venue.set_price_e6(1_500_000).await;
    assert_eq!(world.vault.total_assets().await.unwrap(), 150 * UNIT);

    let (net, donation) = immediate(
        world
            .vault
            .redeem(addr(ALICE), shares, addr(ALICE))
            .await
            .unwrap(),
    );

    assert_eq!(donation, 5 * UNIT);
    assert_eq!(net, 145 * UNIT);
    assert_eq!(net + donation, 150 * UNIT); // conservation

    assert_eq!(world.bank.balance_of(addr(ALICE)).await, 1_045 * UNIT);
    assert_eq!(world.bank.balance_of(addr(BUFFER)).await, 5 * UNIT);

    let account = world.vault.account(addr(ALICE)).await;
    assert_eq!(account.deposited, 100 * UNIT);
    assert_eq!(account.withdrawn, 145 * UNIT);
    assert_eq!(account.donated, 5 * UNIT);
}

#[tokio::test]
async fn drawdown_redeems_principal_untaxed() {
    let world = setup(1_000).await;
    let shares = world
        .vault
        .deposit(addr(ALICE), 100 * UNIT, addr(ALICE))
        .await
        .unwrap();

    world.venue.set_price_e6(400_000).await;
    let (net, donation) = immediate(
        world
            .vault
            .redeem(addr(ALICE), shares, addr(ALICE))
            .await
            .unwrap(),
    );

    assert_eq!(donation, 0);
    assert_eq!(net, 40 * UNIT);
    assert_eq!(world.bank.balance_of(addr(BUFFER)).await, 0);
}

#[tokio::test]
async fn donation_taxes_cumulative_profit_not_each_leg() {
    let world = setup(1_000).await;
    let shares = world
        .vault
        .deposit(addr(ALICE), 100 * UNIT, addr(ALICE))
        .await
        .unwrap();

    // Leg 1: redeem half in a drawdown. Pure principal, no donation.
    world.venue.set_price_e6(500_000).await;
    let (net1, donation1) = immediate(
        world
            .vault
            .redeem(addr(ALICE), shares / 2, addr(ALICE))
            .await
            .unwrap(),
    );
    assert_eq!(net1, 25 * UNIT);
    assert_eq!(donation1, 0);

    // Leg 2: the price recovers past break-even. Cumulative realized value
    // ends at 130 against 100 deposited, so only the 30 above the line is
    // taxed, not each leg's gross independently.
    world.venue.set_price_e6(2_100_000).await;
    let (net2, donation2) = immediate(
        world
            .vault
            .redeem(addr(ALICE), shares / 2, addr(ALICE))
            .await
            .unwrap(),
    );

    assert_eq!(net2 + donation2, 105 * UNIT);
    assert_eq!(donation2, 3 * UNIT);
    assert_eq!(net2, 102 * UNIT);

    let account = world.vault.account(addr(ALICE)).await;
    assert_eq!(account.donated, 3 * UNIT);
    assert_eq!(world.bank.balance_of(addr(BUFFER)).await, 3 * UNIT);
}

#[tokio::test]
async fn illiquid_redemption_queues_and_processes_exactly_once() {
    let world = setup(1_000).await;
    let mut events = world.vault.subscribe();
    let shares = world
        .vault
        .deposit(addr(ALICE), 100 * UNIT, addr(ALICE))
        .await
        .unwrap();
    let balance_before = world.bank.balance_of(addr(ALICE)).await;

    world.venue.set_liquidity_cap(Some(0)).await;
    let settlement = world
        .vault
        .redeem(addr(ALICE), shares, addr(ALICE))
        .await
        .unwrap();

    // Shares burned immediately, no assets moved, ticket frozen.
    let ticket = match settlement {
        Settlement::Queued { ticket } => ticket,
        Settlement::Immediate { .. } => panic!("expected queued settlement"),
    };
    assert_eq!(ticket.shares, shares);
    assert_eq!(ticket.assets, 100 * UNIT);
    assert_eq!(ticket.net, 100 * UNIT);
    assert_eq!(ticket.donation, 0);
    assert_eq!(world.vault.share_balance_of(addr(ALICE)).await, 0);
    assert_eq!(world.vault.total_supply().await, 0);
    assert_eq!(world.bank.balance_of(addr(ALICE)).await, balance_before);
    assert_eq!(
        world.vault.withdrawal_state(addr(ALICE)).await,
        WithdrawalState::Queued
    );
    assert_eq!(
        events.try_recv().unwrap(),
        VaultEvent::WithdrawalQueued {
            user: addr(ALICE),
            shares,
            assets: 100 * UNIT,
        }
    );

    // Further activity for this user is rejected deterministically.
    assert!(matches!(
        world
            .vault
            .redeem(addr(ALICE), 1, addr(ALICE))
            .await
            .unwrap_err(),
        GivepoolError::Vault(VaultError::WithdrawalPending { .. })
    ));
    assert!(matches!(
        world
            .vault
            .deposit(addr(ALICE), UNIT, addr(ALICE))
            .await
            .unwrap_err(),
        GivepoolError::Vault(VaultError::WithdrawalPending { .. })
    ));

    // Still illiquid: the retry fails and consumes nothing.
    assert!(matches!(
        world
            .vault
            .process_queued_withdrawal(addr(ALICE))
            .await
            .unwrap_err(),
        GivepoolError::Vault(VaultError::StillIlliquid { .. })
    ));
    assert!(world.vault.queued_withdrawal(addr(ALICE)).await.is_some());

    // Liquidity returns: the frozen payout is delivered and the slot clears.
    world.venue.set_liquidity_cap(None).await;
    let (net, donation) = world
        .vault
        .process_queued_withdrawal(addr(ALICE))
        .await
        .unwrap();
    assert_eq!((net, donation), (100 * UNIT, 0));
    assert_eq!(world.bank.balance_of(addr(ALICE)).await, 1_000 * UNIT);
    assert!(world.vault.queued_withdrawal(addr(ALICE)).await.is_none());
    assert_eq!(
        events.try_recv().unwrap(),
        VaultEvent::WithdrawalProcessed {
            user: addr(ALICE),
            receiver: addr(ALICE),
            net: 100 * UNIT,
            donation: 0,
        }
    );

    assert!(matches!(
        world
            .vault
            .process_queued_withdrawal(addr(ALICE))
            .await
            .unwrap_err(),
        GivepoolError::Vault(VaultError::NoPendingWithdrawal { .. })
    ));
}

#[tokio::test]
async fn queued_profit_pays_the_same_as_a_direct_redemption() {
    let world = setup(1_000).await;
    let shares = world
        .vault
        .deposit(addr(ALICE), 100 * UNIT, addr(ALICE))
        .await
        .unwrap();

    world.venue.set_price_e6(1_500_000).await;
    world.venue.set_liquidity_cap(Some(0)).await;
    let ticket = match world
        .vault
        .redeem(addr(ALICE), shares, addr(ALICE))
        .await
        .unwrap()
    {
        Settlement::Queued { ticket } => ticket,
        Settlement::Immediate { .. } => panic!("expected queued settlement"),
    };
    assert_eq!(ticket.net, 145 * UNIT);
    assert_eq!(ticket.donation, 5 * UNIT);

    world.venue.set_liquidity_cap(None).await;
    let (net, donation) = world
        .vault
        .process_queued_withdrawal(addr(ALICE))
        .await
        .unwrap();

    assert_eq!((net, donation), (145 * UNIT, 5 * UNIT));
    assert_eq!(world.bank.balance_of(addr(BUFFER)).await, 5 * UNIT);

    let account = world.vault.account(addr(ALICE)).await;
    assert_eq!(account.withdrawn, 145 * UNIT);
    assert_eq!(account.donated, 5 * UNIT);
}

#[tokio::test]
async fn second_depositor_prices_in_at_current_share_value() {
    let world = setup(1_000).await;
    let bob = addr(11);
    world.bank.mint(bob, 300 * UNIT).await;

    let alice_shares = world
        .vault
        .deposit(addr(ALICE), 100 * UNIT, addr(ALICE))
        .await
        .unwrap();

    world.venue.set_price_e6(2_000_000).await;
    let bob_shares = world.vault.deposit(bob, 300 * UNIT, bob).await.unwrap();

    // 300 buys shares at 2.0 per original unit: 1.5x alice's stake.
    assert_eq!(bob_shares, alice_shares * 3 / 2);

    // Both redeem everything; bob gets his 300 back, alice realizes profit.
    let (bob_net, bob_donation) =
        immediate(world.vault.redeem(bob, bob_shares, bob).await.unwrap());
    assert_eq!(bob_donation, 0);
    assert_eq!(bob_net, 300 * UNIT);

    let (alice_net, alice_donation) = immediate(
        world
            .vault
            .redeem(addr(ALICE), alice_shares, addr(ALICE))
            .await
            .unwrap(),
    );
    assert_eq!(alice_net + alice_donation, 200 * UNIT);
    assert_eq!(alice_donation, 10 * UNIT); // 10% of the 100 profit
}
