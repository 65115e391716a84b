//! # Token Ledger
//!
//! The fungible balance store: balances, allowances, and total supply for
//! the Helio token. Minting and burning are admin-only; transfers are gated
//! by the shared [`BlacklistRegistry`]. Admin-initiated mint and burn are
//! deliberately *not* blacklist-gated — the admin must be able to reduce a
//! restricted wallet's balance, and minting to a restricted wallet is an
//! explicit administrative act.
//!
//! Balances are zero-default: an account exists the moment something is
//! credited to it and persists at zero thereafter. The conservation
//! invariant — `total_supply == Σ balances` — holds after every operation;
//! [`holders`](TokenLedger::holders) exists so tests can assert it.
//!
//! Lock order: the ledger's own lock (held by the caller), then roles, then
//! blacklist.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::RwLock;
use thiserror::Error;

use crate::blacklist::{BlacklistError, SharedBlacklist};
use crate::config::TOKEN_DECIMALS;
use crate::events::{EngineEvent, EventLog};
use crate::roles::{Role, RoleError, SharedRoles};

/// Shared handle to the single token ledger instance.
pub type SharedLedger = Arc<RwLock<TokenLedger>>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The caller does not hold the Admin role. Holding only Blacklister is
    /// not enough for mint or burn.
    #[error("not authorized: {0} does not hold the Admin role")]
    NotAuthorized(Address),

    /// The zero address can neither hold nor receive tokens.
    #[error("the zero address cannot hold tokens")]
    ZeroAddress,

    /// Moving or burning more than the account holds.
    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Current balance of the debited account.
        available: U256,
        /// Amount the operation needed.
        requested: U256,
    },

    /// The spender's allowance does not cover the transfer.
    #[error("insufficient allowance: approved {approved}, requested {requested}")]
    InsufficientAllowance {
        /// Current allowance granted to the spender.
        approved: U256,
        /// Amount the transfer needed.
        requested: U256,
    },

    /// The sending party is blacklisted.
    #[error("sender is blacklisted: {0}")]
    BlacklistedSender(Address),

    /// The receiving party is blacklisted.
    #[error("recipient is blacklisted: {0}")]
    BlacklistedRecipient(Address),

    /// A mint would push the supply (or a balance) past `U256::MAX`.
    #[error("supply overflow: minting {amount} exceeds the representable supply")]
    SupplyOverflow {
        /// The amount that was attempted.
        amount: U256,
    },

    /// A delegated role operation failed.
    #[error(transparent)]
    Role(#[from] RoleError),

    /// A delegated blacklist operation failed.
    #[error(transparent)]
    Blacklist(#[from] BlacklistError),
}

// ---------------------------------------------------------------------------
// TokenLedger
// ---------------------------------------------------------------------------

/// The fungible balance store, gated by the shared role and blacklist
/// registries injected at construction.
#[derive(Clone, Debug)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: U256,
    balances: HashMap<Address, U256>,
    /// owner -> spender -> remaining allowance
    allowances: HashMap<Address, HashMap<Address, U256>>,
    roles: SharedRoles,
    blacklist: SharedBlacklist,
    events: EventLog,
}

impl TokenLedger {
    /// Creates an empty ledger. Supply starts at zero — the deployer mints
    /// the genesis supply explicitly.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        roles: SharedRoles,
        blacklist: SharedBlacklist,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: TOKEN_DECIMALS,
            total_supply: U256::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            roles,
            blacklist,
            events: EventLog::new(),
        }
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Decimal places.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Current total supply.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance of `account`, zero-default.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Remaining allowance from `owner` to `spender`.
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or_default()
    }

    /// All non-zero balances as `(account, balance)` pairs.
    pub fn holders(&self) -> Vec<(Address, U256)> {
        self.balances
            .iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(account, balance)| (*account, *balance))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Supply operations (admin-only)
    // -----------------------------------------------------------------------

    /// Mints `amount` to `to`, increasing the total supply.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotAuthorized`] if `caller` is not an admin,
    /// [`LedgerError::ZeroAddress`] if `to` is the zero address, and
    /// [`LedgerError::SupplyOverflow`] on arithmetic overflow.
    pub fn mint(&mut self, caller: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.require_admin(caller)?;
        if to == Address::ZERO {
            return Err(LedgerError::ZeroAddress);
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { amount })?;
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { amount })?;

        self.total_supply = new_supply;
        self.balances.insert(to, new_balance);
        self.events.record(EngineEvent::SuccessMint { to, amount });
        Ok(())
    }

    /// Burns `amount` from `from`, decreasing the total supply.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotAuthorized`] if `caller` is not an admin
    /// and [`LedgerError::InsufficientBalance`] when burning more than the
    /// account holds.
    pub fn burn_from(
        &mut self,
        caller: Address,
        from: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller)?;

        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        self.balances.insert(from, available - amount);
        self.total_supply = self.total_supply.saturating_sub(amount);
        self.events.record(EngineEvent::SuccessBurn { from, amount });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transfers
    // -----------------------------------------------------------------------

    /// Moves `amount` from `from` to `to`. Both parties must be clear of the
    /// blacklist.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.check_blacklist(from, to)?;
        self.move_tokens(from, to, amount)
    }

    /// Moves `amount` from `owner` to `to` on behalf of `spender`, spending
    /// the allowance `owner` granted.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.check_blacklist(owner, to)?;

        let approved = self.allowance(owner, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                approved,
                requested: amount,
            });
        }

        self.move_tokens(owner, to, amount)?;
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, approved - amount);
        Ok(())
    }

    /// Sets the allowance from `owner` to `spender`. Overwrites — this is
    /// not additive.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }

    // -----------------------------------------------------------------------
    // Registry delegation
    // -----------------------------------------------------------------------

    /// Grants the Blacklister role. Admin-only; exposed here for caller
    /// convenience.
    pub fn grant_blacklister_role(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), LedgerError> {
        self.roles
            .write()
            .grant_role(caller, Role::Blacklister, account)?;
        Ok(())
    }

    /// Revokes the Blacklister role. Admin-only.
    pub fn revoke_blacklister_role(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), LedgerError> {
        self.roles
            .write()
            .revoke_role(caller, Role::Blacklister, account)?;
        Ok(())
    }

    /// Adds `account` to the shared blacklist.
    pub fn add_to_blacklist(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), LedgerError> {
        let roles = self.roles.read();
        self.blacklist.write().add(&roles, caller, account)?;
        Ok(())
    }

    /// Removes `account` from the shared blacklist.
    pub fn remove_from_blacklist(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), LedgerError> {
        let roles = self.roles.read();
        self.blacklist.write().remove(&roles, caller, account)?;
        Ok(())
    }

    /// `true` if `account` is blacklisted.
    pub fn is_blacklisted(&self, account: Address) -> bool {
        self.blacklist.read().is_blacklisted(account)
    }

    /// The events recorded by ledger operations.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.events.take()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require_admin(&self, caller: Address) -> Result<(), LedgerError> {
        if !self.roles.read().is_admin(caller) {
            return Err(LedgerError::NotAuthorized(caller));
        }
        Ok(())
    }

    fn check_blacklist(&self, from: Address, to: Address) -> Result<(), LedgerError> {
        let blacklist = self.blacklist.read();
        if blacklist.is_blacklisted(from) {
            return Err(LedgerError::BlacklistedSender(from));
        }
        if blacklist.is_blacklisted(to) {
            return Err(LedgerError::BlacklistedRecipient(to));
        }
        Ok(())
    }

    fn move_tokens(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        if to == Address::ZERO {
            return Err(LedgerError::ZeroAddress);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        let new_recipient = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { amount })?;

        self.balances.insert(from, available - amount);
        self.balances.insert(to, new_recipient);
        Ok(())
    }
}
