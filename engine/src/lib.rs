// Copyright (c) 2026 Helio Labs. MIT License.
// See LICENSE for details.

//! # Helio Engine — Token Issuance & Primary Sale
//!
//! The core of the Helio network: a fungible-balance ledger with role-gated
//! supply operations and address blacklisting, coupled to a sale engine that
//! converts stablecoin or native-asset payments into vested token credits at
//! a USD-pegged price.
//!
//! ## Architecture
//!
//! Leaves first — each component owns exactly one piece of mutable state and
//! is the only mutation path to it:
//!
//! - **roles** — the set of privileged accounts (Admin, Blacklister).
//! - **blacklist** — the set of restricted accounts, policy-checked against
//!   the roles.
//! - **ledger** — balances, allowances, and total supply, gated by both
//!   registries.
//! - **assets** — the capability seams to the outside world: a price feed
//!   consumed read-only and a stablecoin the engine pulls payment through.
//! - **sale** — the orchestrator: sale window, per-wallet cap, vesting, and
//!   the checks-commit-interact purchase pipeline.
//!
//! The registries are single shared instances (`Arc<RwLock<_>>`) injected at
//! construction — there is no ambient global state. Lock order, where more
//! than one handle is held: ledger, then roles, then blacklist.
//!
//! ## Design Principles
//!
//! 1. All monetary arithmetic is checked. Wrapping arithmetic and money do
//!    not mix.
//! 2. Amounts are 256-bit integers in 18-decimal smallest units. No floating
//!    point anywhere near a balance.
//! 3. Every operation is atomic: it fully commits or leaves no observable
//!    change, including when an external payment leg fails.
//! 4. Every rejected precondition surfaces a distinct, caller-visible error.

pub mod assets;
pub mod blacklist;
pub mod config;
pub mod events;
pub mod ledger;
pub mod roles;
pub mod sale;
