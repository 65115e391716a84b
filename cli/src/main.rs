// Copyright (c) 2026 Helio Labs. MIT License.
// See LICENSE for details.

//! # Helio Sandbox
//!
//! Entry point for the `helio` binary. The sandbox plays the external
//! caller: it wires a complete in-memory deployment and invokes the
//! engine's public operations, printing the resulting state and event
//! trail as JSON on stdout.
//!
//! Two subcommands:
//!
//! - `demo`  — run a scripted end-to-end sale
//! - `quote` — price a USD payment without deploying anything

mod cli;
mod logging;

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use parking_lot::RwLock;
use tracing::{info, warn};

use helio_engine::assets::{FixedPriceFeed, MockStablecoin, PaymentAsset};
use helio_engine::blacklist::BlacklistRegistry;
use helio_engine::config::{to_wad, wad, GENESIS_SUPPLY_TOKENS, TOKEN_NAME, TOKEN_SYMBOL};
use helio_engine::ledger::TokenLedger;
use helio_engine::roles::RoleRegistry;
use helio_engine::sale::{quote_tokens, SaleConfig, SaleEngine};

use cli::{Commands, DemoArgs, HelioCli, QuoteArgs};

// Well-known sandbox addresses. Real deployments get these from key
// material; the sandbox just needs them distinct and readable.
const ADMIN: Address = Address::repeat_byte(0xA1);
const KEEPER: Address = Address::repeat_byte(0xA2);
const ENGINE: Address = Address::repeat_byte(0x5A);
const BUYER: Address = Address::repeat_byte(0xB1);
const WHALE: Address = Address::repeat_byte(0xB2);
const MALLORY: Address = Address::repeat_byte(0xBD);

fn main() -> Result<()> {
    let cli = HelioCli::parse();

    match cli.command {
        Commands::Demo(args) => run_demo(args),
        Commands::Quote(args) => run_quote(args),
    }
}

/// Prices a payment at the given token price and prints the result.
fn run_quote(args: QuoteArgs) -> Result<()> {
    let payment_usd = to_wad(args.payment_usd);
    let price = U256::from(args.price);
    let tokens =
        quote_tokens(payment_usd, price).ok_or_else(|| anyhow::anyhow!("quote overflowed"))?;

    let out = serde_json::json!({
        "payment_usd": payment_usd,
        "token_price_usd": price,
        "token_amount": tokens,
        "whole_tokens": (tokens / wad()).to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Runs the scripted sale: deploy, fund, buy on both paths, hit the cap and
/// the blacklist, open vesting, claim, withdraw.
fn run_demo(args: DemoArgs) -> Result<()> {
    logging::init(&args.log, args.json_logs);

    // --- Deployment ---
    let roles = Arc::new(RwLock::new(RoleRegistry::new(ADMIN, Some(KEEPER))));
    let blacklist = Arc::new(RwLock::new(BlacklistRegistry::new()));
    let ledger = Arc::new(RwLock::new(TokenLedger::new(
        TOKEN_NAME,
        TOKEN_SYMBOL,
        roles.clone(),
        blacklist.clone(),
    )));

    // Genesis supply goes to the engine's account so claims are covered.
    ledger
        .write()
        .mint(ADMIN, ENGINE, to_wad(GENESIS_SUPPLY_TOKENS))?;
    info!(supply = GENESIS_SUPPLY_TOKENS, "genesis supply minted to the sale treasury");

    let mut engine = SaleEngine::new(
        SaleConfig::new(ADMIN, ENGINE),
        roles,
        blacklist.clone(),
        ledger.clone(),
        MockStablecoin::new(),
        FixedPriceFeed::usd(2_000),
    )?;

    // --- Stablecoin purchase ---
    let usdt = engine.stablecoin_mut();
    usdt.issue(BUYER, to_wad(36_000));
    usdt.approve(BUYER, ENGINE, to_wad(36_000));

    let bought = engine.convert_stable_to_tokens(BUYER, to_wad(18_000))?;
    info!(buyer = %BUYER, tokens = %bought, "stablecoin purchase accepted");

    // The second 18,000 USD purchase would push the wallet past its
    // lifetime cap and must bounce.
    match engine.convert_stable_to_tokens(BUYER, to_wad(18_000)) {
        Err(err) => warn!(%err, "second purchase rejected as expected"),
        Ok(_) => anyhow::bail!("wallet cap failed to trigger"),
    }

    // --- Native purchase ---
    let native_bought = engine.receive_native_payment(WHALE, to_wad(1))?;
    info!(buyer = %WHALE, tokens = %native_bought, "native purchase accepted");

    // --- Blacklist gate ---
    engine.add_acc_to_blacklist(KEEPER, MALLORY)?;
    match engine.convert_stable_to_tokens(MALLORY, to_wad(10)) {
        Err(err) => warn!(%err, "blacklisted purchase rejected as expected"),
        Ok(_) => anyhow::bail!("blacklist gate failed to trigger"),
    }

    // --- Vesting, claims, withdrawals ---
    engine.update_vesting_time(ADMIN, Utc::now())?;
    let claimed = engine.claim_tokens(BUYER)?;
    info!(buyer = %BUYER, tokens = %claimed, "vested tokens claimed");
    let whale_claimed = engine.claim_tokens(WHALE)?;
    info!(buyer = %WHALE, tokens = %whale_claimed, "vested tokens claimed");

    let proceeds = engine.withdraw_proceeds(ADMIN)?;
    let ether = engine.withdraw_ether(ADMIN)?;
    info!(%proceeds, %ether, "proceeds withdrawn");

    // --- Summary on stdout ---
    let summary = serde_json::json!({
        "snapshot": engine.snapshot(),
        "balances": {
            "buyer": ledger.read().balance_of(BUYER),
            "whale": ledger.read().balance_of(WHALE),
            "treasury": ledger.read().balance_of(ENGINE),
            "admin_stablecoin": engine.stablecoin().balance_of(ADMIN),
        },
        "sale_events": engine.take_events(),
        "ledger_events": ledger.write().take_events(),
        "blacklist_events": blacklist.write().take_events(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
