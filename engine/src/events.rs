//! # Observable Events
//!
//! Every state change a caller can act on is surfaced as an [`EngineEvent`].
//! Components append to their own [`EventLog`]; external callers (the CLI
//! sandbox, tests, an indexer if one ever exists) drain the log after each
//! operation. Events are observations, not state — dropping them never
//! changes engine behavior.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// A caller-visible observation emitted by the engine.
///
/// Each parameter update has its own kind. Reusing one kind for several
/// distinct updates would force consumers to re-read state to learn what
/// actually changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Tokens were minted by an admin.
    SuccessMint { to: Address, amount: U256 },
    /// Tokens were burned by an admin.
    SuccessBurn { from: Address, amount: U256 },
    /// A role was granted to an account.
    RoleGranted { role: Role, account: Address },
    /// A role was revoked from an account.
    RoleRevoked { role: Role, account: Address },
    /// An account was added to the blacklist.
    AddedToBlacklist { account: Address },
    /// An account was removed from the blacklist.
    RemovedFromBlacklist { account: Address },
    /// A purchase was accepted and recorded into the buyer's vesting balance.
    TokensBought { buyer: Address, amount: U256 },
    /// A vested balance was claimed into the buyer's ledger balance.
    TokensClaimed { buyer: Address, amount: U256 },
    /// The sale window length changed.
    SaleDurationUpd { duration_secs: u64 },
    /// The remaining sellable allocation changed (top-up or reset).
    TokensForSaleUpd { remaining: U256 },
    /// The vesting deadline moved.
    VestingTimeUpd { vesting_end: DateTime<Utc> },
    /// Held native funds were withdrawn by the admin.
    EtherWithdrawn { to: Address, amount: U256 },
    /// Stablecoin proceeds were withdrawn by the admin.
    ProceedsWithdrawn { to: Address, amount: U256 },
}

/// An append-only, in-memory event recorder.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event.
    pub fn record(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Returns the most recent event, if any.
    pub fn last(&self) -> Option<&EngineEvent> {
        self.events.last()
    }

    /// Iterates over all recorded events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EngineEvent> {
        self.events.iter()
    }

    /// Removes and returns all recorded events, oldest first.
    pub fn take(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` if nothing has been recorded (or everything was taken).
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
