//! # Sale Engine
//!
//! Orchestrates the primary sale: converts stablecoin or native-asset
//! payments into vested token credits at a USD-pegged price, subject to the
//! sale window, a lifetime per-wallet cap, and the shared blacklist.
//!
//! ## Lifecycle
//!
//! The sale as a whole moves `Pending → Active → Closed` on the clock;
//! setting the duration to zero collapses it to `Closed` immediately.
//! Per wallet the path is: purchase (tokens accrue to a vesting balance) →
//! claim after the vesting deadline (tokens move out of the engine's
//! pre-funded ledger balance — nothing is minted at claim time).
//!
//! ## External calls
//!
//! The stablecoin pull and the price-feed read are the only points where
//! control leaves the engine. Purchases follow checks → commit → interact:
//! every precondition is validated and every counter committed *before* the
//! stablecoin pull, and a failed pull rolls the counters back so no partial
//! commit is ever observable. A transient in-progress flag rejects reentrant
//! entry outright as defense in depth.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::assets::{AssetError, PaymentAsset, PriceSource};
use crate::blacklist::{BlacklistError, SharedBlacklist};
use crate::config::{
    wad, DEFAULT_LIMIT_PER_WALLET, DEFAULT_SALE_DURATION_WEEKS, DEFAULT_TOKENS_FOR_SALE,
    DEFAULT_TOKEN_PRICE_USD, SECONDS_PER_WEEK,
};
use crate::events::{EngineEvent, EventLog};
use crate::ledger::{LedgerError, SharedLedger};
use crate::roles::SharedRoles;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during sale operations.
#[derive(Debug, Error)]
pub enum SaleError {
    /// Purchase attempted outside the sale window.
    #[error("sale is not active")]
    SaleNotActive,

    /// Purchase attempted by a restricted address.
    #[error("sender is blacklisted: {0}")]
    SenderBlacklisted(Address),

    /// The remaining sellable allocation does not cover the purchase.
    #[error("sold out: requested {requested}, remaining {remaining}")]
    SoldOut {
        /// Tokens the purchase would need.
        requested: U256,
        /// Tokens still sellable.
        remaining: U256,
    },

    /// The purchase would push the wallet past its lifetime cap.
    #[error("wallet limit exceeded: cap {limit}, already purchased {cumulative}, requested {requested}")]
    WalletLimitExceeded {
        /// Lifetime cap per wallet.
        limit: U256,
        /// Tokens the wallet has purchased so far.
        cumulative: U256,
        /// Tokens the purchase would add.
        requested: U256,
    },

    /// The engine's own ledger balance cannot cover every outstanding
    /// vesting obligation plus this purchase.
    #[error("no more tokens available: treasury holds {held}, obligations would be {committed}")]
    NoTokensAvailable {
        /// The engine's current ledger balance.
        held: U256,
        /// Outstanding vesting obligations including this purchase.
        committed: U256,
    },

    /// Claim with no vested balance.
    #[error("nothing to claim")]
    NothingToClaim,

    /// Claim or withdrawal before the vesting deadline.
    #[error("vesting has not ended: ends at {ends_at}")]
    VestingNotEnded {
        /// The configured vesting deadline.
        ends_at: DateTime<Utc>,
    },

    /// Admin-only operation attempted without the Admin role.
    #[error("not authorized: {0} does not hold the Admin role")]
    NotAuthorized(Address),

    /// Blacklist delegation attempted without the Blacklister role.
    #[error("not authorized: {0} does not hold the Blacklister role")]
    NotBlacklister(Address),

    /// The payment quotes to zero tokens.
    #[error("zero-amount purchases are not permitted")]
    ZeroAmount,

    /// Constructed with a zero token price.
    #[error("token price must be non-zero")]
    ZeroPrice,

    /// Constructed with a zero admin or engine address.
    #[error("the zero address cannot be a sale party")]
    ZeroAddress,

    /// Checked arithmetic overflowed.
    #[error("amount overflow: operation exceeds the representable range")]
    AmountOverflow,

    /// A payment entry point was re-entered before completing.
    #[error("reentrant call rejected")]
    ReentrantCall,

    /// The price feed could not quote.
    #[error("price feed error: {0}")]
    PriceFeed(AssetError),

    /// The external payment transfer failed; the purchase was rolled back.
    #[error("payment transfer failed: {0}")]
    Payment(#[from] AssetError),

    /// A ledger operation performed on behalf of the caller failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A delegated blacklist mutation failed.
    #[error(transparent)]
    Blacklist(BlacklistError),
}

// ---------------------------------------------------------------------------
// Status & parameters
// ---------------------------------------------------------------------------

/// Engine-wide sale state, derived from the clock and the parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    /// The window has not opened yet.
    Pending,
    /// Purchases are accepted.
    Active,
    /// The window has closed (or the duration was zeroed).
    Closed,
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleStatus::Pending => write!(f, "Pending"),
            SaleStatus::Active => write!(f, "Active"),
            SaleStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// Admin-mutable sale parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleParams {
    /// USD price of one whole token, 18-decimal fixed point.
    pub token_price_usd: U256,
    /// Remaining sellable allocation in smallest units. Decreases on
    /// purchase, increases only on explicit admin top-up.
    pub tokens_for_sale: U256,
    /// Lifetime purchase cap per wallet in smallest units.
    pub limit_per_wallet: U256,
    /// When the sale window opens.
    pub sale_start: DateTime<Utc>,
    /// Window length in seconds. Zero closes the sale outright.
    pub sale_duration_secs: u64,
    /// When vested purchases become claimable (and held native funds
    /// withdrawable).
    pub vesting_end: DateTime<Utc>,
}

/// Constructor-time configuration for a [`SaleEngine`].
#[derive(Clone, Debug)]
pub struct SaleConfig {
    /// The deploying admin — receives withdrawn proceeds.
    pub token_owner: Address,
    /// The ledger account the engine disburses from. Must be pre-funded
    /// before purchases can succeed.
    pub engine_address: Address,
    /// Initial sale parameters.
    pub params: SaleParams,
}

impl SaleConfig {
    /// Configuration with the default parameters: 0.42 USD price, 50M-token
    /// allocation, 50k-token wallet cap, a 5-week window opening now, and
    /// vesting that ends when the window closes.
    pub fn new(token_owner: Address, engine_address: Address) -> Self {
        let sale_start = Utc::now();
        let sale_duration_secs = DEFAULT_SALE_DURATION_WEEKS * SECONDS_PER_WEEK;
        Self {
            token_owner,
            engine_address,
            params: SaleParams {
                token_price_usd: U256::from(DEFAULT_TOKEN_PRICE_USD),
                tokens_for_sale: crate::config::to_wad(DEFAULT_TOKENS_FOR_SALE),
                limit_per_wallet: crate::config::to_wad(DEFAULT_LIMIT_PER_WALLET),
                sale_start,
                sale_duration_secs,
                vesting_end: sale_start + Duration::seconds(sale_duration_secs as i64),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Quoting
// ---------------------------------------------------------------------------

/// Converts a USD payment (18-decimal fixed point) into a token amount at
/// the given price: `floor(payment_usd × 10^18 / token_price_usd)`.
///
/// Integer division truncates toward zero, so fractional-unit rounding never
/// favors the buyer. Returns `None` on overflow or a zero price.
pub fn quote_tokens(payment_usd: U256, token_price_usd: U256) -> Option<U256> {
    payment_usd.checked_mul(wad())?.checked_div(token_price_usd)
}

/// Serializable point-in-time view of the engine, for external callers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaleSnapshot {
    /// Current window state.
    pub status: SaleStatus,
    /// Current parameters.
    pub params: SaleParams,
    /// Sum of all unclaimed vesting balances.
    pub pending_claims: U256,
    /// Native funds held by the engine.
    pub native_held: U256,
    /// The engine's own ledger balance.
    pub treasury_balance: U256,
}

// ---------------------------------------------------------------------------
// SaleEngine
// ---------------------------------------------------------------------------

/// The primary-sale orchestrator, generic over its price feed and payment
/// asset capabilities.
pub struct SaleEngine<P: PaymentAsset, F: PriceSource> {
    owner: Address,
    address: Address,
    params: SaleParams,
    /// Purchased-but-unclaimed tokens per wallet.
    vesting: HashMap<Address, U256>,
    /// Lifetime purchase counters per wallet. Never decrease.
    purchased: HashMap<Address, U256>,
    /// Sum of all vesting balances. Purchases must stay covered by the
    /// engine's ledger balance.
    pending_claims: U256,
    /// Native value received through purchases and not yet withdrawn.
    native_held: U256,
    roles: SharedRoles,
    blacklist: SharedBlacklist,
    ledger: SharedLedger,
    stablecoin: P,
    price_feed: F,
    entered: bool,
    events: EventLog,
}

impl<P: PaymentAsset, F: PriceSource> SaleEngine<P, F> {
    /// Creates the engine.
    ///
    /// # Errors
    ///
    /// Returns [`SaleError::ZeroAddress`] if the owner or engine address is
    /// zero and [`SaleError::ZeroPrice`] if the configured price is zero.
    pub fn new(
        config: SaleConfig,
        roles: SharedRoles,
        blacklist: SharedBlacklist,
        ledger: SharedLedger,
        stablecoin: P,
        price_feed: F,
    ) -> Result<Self, SaleError> {
        if config.token_owner == Address::ZERO || config.engine_address == Address::ZERO {
            return Err(SaleError::ZeroAddress);
        }
        if config.params.token_price_usd.is_zero() {
            return Err(SaleError::ZeroPrice);
        }

        info!(
            owner = %config.token_owner,
            engine = %config.engine_address,
            price = %config.params.token_price_usd,
            for_sale = %config.params.tokens_for_sale,
            "sale engine deployed"
        );

        Ok(Self {
            owner: config.token_owner,
            address: config.engine_address,
            params: config.params,
            vesting: HashMap::new(),
            purchased: HashMap::new(),
            pending_claims: U256::ZERO,
            native_held: U256::ZERO,
            roles,
            blacklist,
            ledger,
            stablecoin,
            price_feed,
            entered: false,
            events: EventLog::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The deploying admin.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The engine's own ledger account.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current parameters.
    pub fn params(&self) -> &SaleParams {
        &self.params
    }

    /// Remaining sellable allocation.
    pub fn tokens_for_sale(&self) -> U256 {
        self.params.tokens_for_sale
    }

    /// The engine's own ledger balance (the claim treasury).
    pub fn token_balance(&self) -> U256 {
        self.ledger.read().balance_of(self.address)
    }

    /// Unclaimed vesting balance of `account`.
    pub fn vesting_balance_of(&self, account: Address) -> U256 {
        self.vesting.get(&account).copied().unwrap_or_default()
    }

    /// Lifetime tokens purchased by `account`.
    pub fn purchased_of(&self, account: Address) -> U256 {
        self.purchased.get(&account).copied().unwrap_or_default()
    }

    /// Native funds currently held.
    pub fn native_held(&self) -> U256 {
        self.native_held
    }

    /// Window state at the current time.
    pub fn status(&self) -> SaleStatus {
        self.status_at(Utc::now())
    }

    /// Window state at an explicit instant.
    pub fn status_at(&self, now: DateTime<Utc>) -> SaleStatus {
        if self.params.sale_duration_secs == 0 {
            return SaleStatus::Closed;
        }
        if now < self.params.sale_start {
            return SaleStatus::Pending;
        }
        let ends = self.params.sale_start + Duration::seconds(self.params.sale_duration_secs as i64);
        if now < ends {
            SaleStatus::Active
        } else {
            SaleStatus::Closed
        }
    }

    /// Quotes a USD payment at the configured price.
    pub fn quote(&self, payment_usd: U256) -> Result<U256, SaleError> {
        quote_tokens(payment_usd, self.params.token_price_usd).ok_or(SaleError::AmountOverflow)
    }

    /// Serializable point-in-time view.
    pub fn snapshot(&self) -> SaleSnapshot {
        SaleSnapshot {
            status: self.status(),
            params: self.params.clone(),
            pending_claims: self.pending_claims,
            native_held: self.native_held,
            treasury_balance: self.token_balance(),
        }
    }

    /// Read access to the payment asset.
    pub fn stablecoin(&self) -> &P {
        &self.stablecoin
    }

    /// Mutable access to the payment asset — the sandbox and tests seed
    /// balances and approvals through this.
    pub fn stablecoin_mut(&mut self) -> &mut P {
        &mut self.stablecoin
    }

    /// The events recorded by sale operations.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.events.take()
    }

    // -----------------------------------------------------------------------
    // Purchases
    // -----------------------------------------------------------------------

    /// Buys tokens with the stablecoin, treated 1:1 as USD at 18 decimals.
    ///
    /// The caller must have approved the engine for `stable_amount` on the
    /// stablecoin beforehand. Returns the token amount credited to the
    /// caller's vesting balance.
    pub fn convert_stable_to_tokens(
        &mut self,
        caller: Address,
        stable_amount: U256,
    ) -> Result<U256, SaleError> {
        self.enter()?;
        let result = self.buy_with_stable(caller, stable_amount);
        self.exit();
        result
    }

    /// Buys tokens with a plain native-value transfer. The payment's USD
    /// value is derived from the price feed; the received value stays held
    /// by the engine until the admin withdraws it.
    pub fn receive_native_payment(
        &mut self,
        caller: Address,
        amount_wei: U256,
    ) -> Result<U256, SaleError> {
        self.enter()?;
        let result = self.buy_with_native(caller, amount_wei);
        self.exit();
        result
    }

    fn buy_with_stable(&mut self, caller: Address, stable_amount: U256) -> Result<U256, SaleError> {
        let token_amount = self.execute_purchase(caller, stable_amount)?;

        // Interact last: pull the payment. The counters above are already
        // committed, so a failed pull must restore them.
        if let Err(err) =
            self.stablecoin
                .transfer_from(self.address, caller, self.address, stable_amount)
        {
            self.revert_purchase(caller, token_amount);
            return Err(SaleError::Payment(err));
        }

        info!(buyer = %caller, amount = %token_amount, "tokens bought with stablecoin");
        self.events.record(EngineEvent::TokensBought {
            buyer: caller,
            amount: token_amount,
        });
        Ok(token_amount)
    }

    fn buy_with_native(&mut self, caller: Address, amount_wei: U256) -> Result<U256, SaleError> {
        let price = self
            .price_feed
            .latest_price()
            .map_err(SaleError::PriceFeed)?;
        let payment_usd = price
            .usd_value_of(amount_wei)
            .ok_or(SaleError::AmountOverflow)?;
        let new_held = self
            .native_held
            .checked_add(amount_wei)
            .ok_or(SaleError::AmountOverflow)?;

        let token_amount = self.execute_purchase(caller, payment_usd)?;
        // The value arrived with the call; nothing external remains to fail.
        self.native_held = new_held;

        info!(buyer = %caller, amount = %token_amount, wei = %amount_wei, "tokens bought with native value");
        self.events.record(EngineEvent::TokensBought {
            buyer: caller,
            amount: token_amount,
        });
        Ok(token_amount)
    }

    // Validates every purchase precondition, then commits the counters.
    // Order: window, blacklist, quote, allocation, wallet cap, treasury
    // coverage.
    fn execute_purchase(&mut self, caller: Address, payment_usd: U256) -> Result<U256, SaleError> {
        if self.status() != SaleStatus::Active {
            return Err(SaleError::SaleNotActive);
        }
        if self.blacklist.read().is_blacklisted(caller) {
            return Err(SaleError::SenderBlacklisted(caller));
        }

        let token_amount = self.quote(payment_usd)?;
        if token_amount.is_zero() {
            return Err(SaleError::ZeroAmount);
        }

        let remaining = self.params.tokens_for_sale;
        if token_amount > remaining {
            return Err(SaleError::SoldOut {
                requested: token_amount,
                remaining,
            });
        }

        let cumulative = self.purchased_of(caller);
        let new_cumulative = cumulative
            .checked_add(token_amount)
            .ok_or(SaleError::AmountOverflow)?;
        if new_cumulative > self.params.limit_per_wallet {
            return Err(SaleError::WalletLimitExceeded {
                limit: self.params.limit_per_wallet,
                cumulative,
                requested: token_amount,
            });
        }

        let new_vested = self
            .vesting_balance_of(caller)
            .checked_add(token_amount)
            .ok_or(SaleError::AmountOverflow)?;
        let new_pending = self
            .pending_claims
            .checked_add(token_amount)
            .ok_or(SaleError::AmountOverflow)?;

        let held = self.token_balance();
        if held < new_pending {
            return Err(SaleError::NoTokensAvailable {
                held,
                committed: new_pending,
            });
        }

        self.params.tokens_for_sale = remaining - token_amount;
        self.purchased.insert(caller, new_cumulative);
        self.vesting.insert(caller, new_vested);
        self.pending_claims = new_pending;
        Ok(token_amount)
    }

    // Restores the pre-purchase counters after a failed payment leg.
    fn revert_purchase(&mut self, caller: Address, token_amount: U256) {
        self.params.tokens_for_sale = self.params.tokens_for_sale.saturating_add(token_amount);
        let cumulative = self.purchased_of(caller).saturating_sub(token_amount);
        self.purchased.insert(caller, cumulative);
        let vested = self.vesting_balance_of(caller).saturating_sub(token_amount);
        self.vesting.insert(caller, vested);
        self.pending_claims = self.pending_claims.saturating_sub(token_amount);
    }

    // -----------------------------------------------------------------------
    // Claims & withdrawals
    // -----------------------------------------------------------------------

    /// Claims the caller's full vested balance into their ledger balance.
    ///
    /// Available once per vesting cycle: the balance is zeroed on success
    /// and a second claim without a new purchase fails with
    /// [`SaleError::NothingToClaim`]. The ledger transfer is subject to the
    /// blacklist gates, so a restricted buyer cannot claim until cleared.
    pub fn claim_tokens(&mut self, caller: Address) -> Result<U256, SaleError> {
        self.enter()?;
        let result = self.claim_inner(caller);
        self.exit();
        result
    }

    fn claim_inner(&mut self, caller: Address) -> Result<U256, SaleError> {
        let now = Utc::now();
        if now < self.params.vesting_end {
            return Err(SaleError::VestingNotEnded {
                ends_at: self.params.vesting_end,
            });
        }
        let amount = self.vesting_balance_of(caller);
        if amount.is_zero() {
            return Err(SaleError::NothingToClaim);
        }

        // Effects before the transfer; restore both on failure.
        self.vesting.insert(caller, U256::ZERO);
        self.pending_claims = self.pending_claims.saturating_sub(amount);

        if let Err(err) = self.ledger.write().transfer(self.address, caller, amount) {
            self.vesting.insert(caller, amount);
            self.pending_claims = self.pending_claims.saturating_add(amount);
            return Err(SaleError::Ledger(err));
        }

        info!(buyer = %caller, amount = %amount, "vested tokens claimed");
        self.events.record(EngineEvent::TokensClaimed {
            buyer: caller,
            amount,
        });
        Ok(amount)
    }

    /// Withdraws the engine's entire held native balance to the caller.
    /// Admin-only, and gated on the vesting deadline.
    pub fn withdraw_ether(&mut self, caller: Address) -> Result<U256, SaleError> {
        self.enter()?;
        let result = self.withdraw_ether_inner(caller);
        self.exit();
        result
    }

    fn withdraw_ether_inner(&mut self, caller: Address) -> Result<U256, SaleError> {
        self.require_admin(caller)?;
        if Utc::now() < self.params.vesting_end {
            return Err(SaleError::VestingNotEnded {
                ends_at: self.params.vesting_end,
            });
        }

        let amount = self.native_held;
        self.native_held = U256::ZERO;
        info!(to = %caller, amount = %amount, "ether withdrawn");
        self.events.record(EngineEvent::EtherWithdrawn {
            to: caller,
            amount,
        });
        Ok(amount)
    }

    /// Withdraws the engine's entire stablecoin balance to the caller.
    /// Admin-only. Unlike [`withdraw_ether`](Self::withdraw_ether) this is
    /// not gated on the vesting deadline.
    pub fn withdraw_proceeds(&mut self, caller: Address) -> Result<U256, SaleError> {
        self.enter()?;
        let result = self.withdraw_proceeds_inner(caller);
        self.exit();
        result
    }

    fn withdraw_proceeds_inner(&mut self, caller: Address) -> Result<U256, SaleError> {
        self.require_admin(caller)?;

        let amount = self.stablecoin.balance_of(self.address);
        if !amount.is_zero() {
            self.stablecoin
                .transfer_from(self.address, self.address, caller, amount)?;
        }
        info!(to = %caller, amount = %amount, "stablecoin proceeds withdrawn");
        self.events.record(EngineEvent::ProceedsWithdrawn {
            to: caller,
            amount,
        });
        Ok(amount)
    }

    // -----------------------------------------------------------------------
    // Admin setters
    // -----------------------------------------------------------------------

    /// Sets the sale window length in weeks. Zero closes the sale
    /// immediately.
    pub fn update_sale_duration(&mut self, caller: Address, weeks: u64) -> Result<(), SaleError> {
        self.require_admin(caller)?;
        let duration_secs = weeks
            .checked_mul(SECONDS_PER_WEEK)
            .ok_or(SaleError::AmountOverflow)?;
        self.params.sale_duration_secs = duration_secs;
        debug!(duration_secs, "sale duration updated");
        self.events
            .record(EngineEvent::SaleDurationUpd { duration_secs });
        Ok(())
    }

    /// Tops up the sellable allocation by `delta`.
    pub fn update_tokens_for_sale(&mut self, caller: Address, delta: U256) -> Result<(), SaleError> {
        self.require_admin(caller)?;
        self.params.tokens_for_sale = self
            .params
            .tokens_for_sale
            .checked_add(delta)
            .ok_or(SaleError::AmountOverflow)?;
        debug!(remaining = %self.params.tokens_for_sale, "tokens for sale topped up");
        self.events.record(EngineEvent::TokensForSaleUpd {
            remaining: self.params.tokens_for_sale,
        });
        Ok(())
    }

    /// Zeroes the sellable allocation, making every purchase fail with
    /// [`SaleError::SoldOut`] until topped up again.
    pub fn reset_tokens_for_sale(&mut self, caller: Address) -> Result<(), SaleError> {
        self.require_admin(caller)?;
        self.params.tokens_for_sale = U256::ZERO;
        debug!("tokens for sale reset to zero");
        self.events.record(EngineEvent::TokensForSaleUpd {
            remaining: U256::ZERO,
        });
        Ok(())
    }

    /// Moves the vesting deadline.
    pub fn update_vesting_time(
        &mut self,
        caller: Address,
        vesting_end: DateTime<Utc>,
    ) -> Result<(), SaleError> {
        self.require_admin(caller)?;
        self.params.vesting_end = vesting_end;
        debug!(%vesting_end, "vesting deadline updated");
        self.events
            .record(EngineEvent::VestingTimeUpd { vesting_end });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Blacklist delegation
    // -----------------------------------------------------------------------

    /// Adds `account` to the shared blacklist on behalf of the caller.
    pub fn add_acc_to_blacklist(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), SaleError> {
        let roles = self.roles.read();
        self.blacklist
            .write()
            .add(&roles, caller, account)
            .map_err(Self::map_blacklist_err)
    }

    /// Removes `account` from the shared blacklist on behalf of the caller.
    pub fn remove_acc_from_blacklist(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), SaleError> {
        let roles = self.roles.read();
        self.blacklist
            .write()
            .remove(&roles, caller, account)
            .map_err(Self::map_blacklist_err)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn map_blacklist_err(err: BlacklistError) -> SaleError {
        match err {
            BlacklistError::NotBlacklister(caller) => SaleError::NotBlacklister(caller),
            other => SaleError::Blacklist(other),
        }
    }

    fn require_admin(&self, caller: Address) -> Result<(), SaleError> {
        if !self.roles.read().is_admin(caller) {
            return Err(SaleError::NotAuthorized(caller));
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), SaleError> {
        if self.entered {
            return Err(SaleError::ReentrantCall);
        }
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) {
        self.entered = false;
    }
}
