//! # CLI Interface
//!
//! Defines the command-line argument structure for the `helio` sandbox
//! binary using `clap` derive.

use clap::{Parser, Subcommand};

use helio_engine::config::DEFAULT_TOKEN_PRICE_USD;

/// Helio token-sale engine sandbox.
///
/// Wires a complete in-memory deployment — registries, ledger, sale engine,
/// mock stablecoin and price feed — and drives it the way an external caller
/// would, printing the resulting state and event trail.
#[derive(Parser, Debug)]
#[command(
    name = "helio",
    about = "Helio token-sale engine sandbox",
    version,
    propagate_version = true
)]
pub struct HelioCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the sandbox binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted end-to-end sale: genesis mint, purchases on both
    /// payment paths, a cap rejection, a blacklist rejection, vesting,
    /// claims, and withdrawals.
    Demo(DemoArgs),
    /// Quote a USD payment at a token price, without deploying anything.
    Quote(QuoteArgs),
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Emit JSON log lines instead of pretty-printed ones. The final state
    /// summary on stdout is always JSON.
    #[arg(long)]
    pub json_logs: bool,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, env = "HELIO_LOG", default_value = "helio=info,helio_engine=info")]
    pub log: String,
}

/// Arguments for the `quote` subcommand.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// USD payment in whole dollars.
    #[arg(long)]
    pub payment_usd: u64,

    /// Token price in 18-decimal fixed point. Defaults to 0.42 USD.
    #[arg(long, default_value_t = DEFAULT_TOKEN_PRICE_USD)]
    pub price: u64,
}
