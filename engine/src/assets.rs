//! # Payment Capabilities
//!
//! The sale engine never implements an external asset — it consumes two
//! narrow capability interfaces:
//!
//! - [`PriceSource`] — a read-only asset/USD quote (Chainlink-shaped:
//!   a raw value plus its decimal scale).
//! - [`PaymentAsset`] — the transfer surface of a stablecoin the engine
//!   pulls payment through.
//!
//! The engine is generic over both, so production adapters (an RPC-backed
//! feed, a real token binding) and the in-memory doubles below are
//! interchangeable. [`FixedPriceFeed`] and [`MockStablecoin`] are the
//! doubles used by the CLI sandbox and the test suites.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by payment-asset and price-feed adapters.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The paying account holds less than the requested amount.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Balance of the paying account.
        available: U256,
        /// Amount the transfer needed.
        requested: U256,
    },

    /// The spender's allowance does not cover the requested amount.
    #[error("insufficient allowance: approved {approved}, requested {requested}")]
    InsufficientAllowance {
        /// Current allowance granted to the spender.
        approved: U256,
        /// Amount the transfer needed.
        requested: U256,
    },

    /// The feed cannot produce a quote right now.
    #[error("price unavailable: {0}")]
    PriceUnavailable(String),
}

// ---------------------------------------------------------------------------
// PriceSource
// ---------------------------------------------------------------------------

/// A raw oracle quote: `value / 10^decimals` USD per unit of the asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Raw quoted value.
    pub value: U256,
    /// Decimal scale of `value`. Chainlink USD feeds use 8.
    pub decimals: u8,
}

impl PriceQuote {
    /// Converts an asset amount (18-decimal smallest units) into its USD
    /// value at 18-decimal fixed point: `amount × value / 10^decimals`.
    ///
    /// Returns `None` on overflow.
    pub fn usd_value_of(&self, amount: U256) -> Option<U256> {
        let scale = U256::from(10u64).pow(U256::from(self.decimals));
        amount.checked_mul(self.value)?.checked_div(scale)
    }
}

/// A current asset/USD quote, consumed read-only.
///
/// The engine trusts the feed's freshness; an adapter that can detect
/// staleness should refuse with [`AssetError::PriceUnavailable`] rather
/// than return a stale value.
pub trait PriceSource {
    /// Returns the latest quote.
    fn latest_price(&self) -> Result<PriceQuote, AssetError>;
}

/// A feed that always returns the same quote. Test and sandbox double.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FixedPriceFeed {
    quote: PriceQuote,
}

impl FixedPriceFeed {
    /// Creates a feed pinned to `value / 10^decimals` USD.
    pub fn new(value: U256, decimals: u8) -> Self {
        Self {
            quote: PriceQuote { value, decimals },
        }
    }

    /// Convenience: a Chainlink-shaped feed (8 decimals) quoting the given
    /// whole-dollar price.
    pub fn usd(whole_dollars: u64) -> Self {
        Self::new(U256::from(whole_dollars) * U256::from(100_000_000u64), 8)
    }
}

impl PriceSource for FixedPriceFeed {
    fn latest_price(&self) -> Result<PriceQuote, AssetError> {
        Ok(self.quote)
    }
}

// ---------------------------------------------------------------------------
// PaymentAsset
// ---------------------------------------------------------------------------

/// The transfer surface of an external fungible asset.
///
/// The engine is a caller of this interface, never an implementer: it pulls
/// purchase payments with `transfer_from` and pays out proceeds the same
/// way. A transfer where `spender == from` moves the spender's own funds
/// and needs no allowance.
pub trait PaymentAsset {
    /// Balance of `owner`, zero-default.
    fn balance_of(&self, owner: Address) -> U256;

    /// Remaining allowance `owner` has granted to `spender`.
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Sets the allowance from `owner` to `spender`. Overwrites any prior
    /// value.
    fn approve(&mut self, owner: Address, spender: Address, amount: U256);

    /// Moves `amount` from `from` to `to`, spending `spender`'s allowance
    /// when `spender != from`.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AssetError>;
}

/// In-memory stablecoin double, 1:1 USD at 18 decimals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MockStablecoin {
    balances: HashMap<Address, U256>,
    allowances: HashMap<Address, HashMap<Address, U256>>,
}

impl MockStablecoin {
    /// Creates an empty stablecoin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Faucet: credits `amount` to `to` out of thin air.
    pub fn issue(&mut self, to: Address, amount: U256) {
        let balance = self.balances.entry(to).or_default();
        *balance = balance.saturating_add(amount);
    }
}

impl PaymentAsset for MockStablecoin {
    fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AssetError> {
        if spender != from {
            let approved = self.allowance(from, spender);
            if approved < amount {
                return Err(AssetError::InsufficientAllowance {
                    approved,
                    requested: amount,
                });
            }
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(AssetError::InsufficientFunds {
                available,
                requested: amount,
            });
        }

        if spender != from {
            let approved = self.allowance(from, spender);
            self.allowances
                .entry(from)
                .or_default()
                .insert(spender, approved - amount);
        }
        self.balances.insert(from, available - amount);
        let credit = self.balances.entry(to).or_default();
        *credit = credit.saturating_add(amount);
        Ok(())
    }
}
