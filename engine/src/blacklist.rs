//! # Blacklist Registry
//!
//! The set of restricted addresses. The ledger refuses transfers touching a
//! blacklisted party and the sale engine refuses purchases from one.
//!
//! Mutations are policy-checked against the [`RoleRegistry`]: an admin can
//! never be restricted, and blacklisters cannot restrict each other — only
//! an admin may restrict a blacklister. The registry takes the role view as
//! an explicit parameter instead of holding its own handle; callers that own
//! both shared registries acquire the role lock first (lock order: ledger,
//! then roles, then blacklist).

use std::collections::HashSet;
use std::sync::Arc;

use alloy_primitives::Address;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::{EngineEvent, EventLog};
use crate::roles::RoleRegistry;

/// Shared handle to the single blacklist registry instance.
pub type SharedBlacklist = Arc<RwLock<BlacklistRegistry>>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during blacklist operations.
#[derive(Debug, Error)]
pub enum BlacklistError {
    /// The caller holds neither the Blacklister nor the Admin role.
    #[error("not authorized: {0} does not hold the Blacklister role")]
    NotBlacklister(Address),

    /// The target holds the Admin role.
    #[error("cannot restrict an admin account: {0}")]
    CannotRestrictAdmin(Address),

    /// The target holds the Blacklister role and the caller is not an admin.
    #[error("cannot restrict a peer blacklister: {0}")]
    CannotRestrictPeerBlacklister(Address),
}

// ---------------------------------------------------------------------------
// BlacklistRegistry
// ---------------------------------------------------------------------------

/// The set of restricted addresses.
///
/// Membership is zero-default: an address never touched by `add` is simply
/// not restricted. Both `add` and `remove` are idempotent — repeating an
/// operation succeeds without changing the set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlacklistRegistry {
    restricted: HashSet<Address>,
    events: EventLog,
}

impl BlacklistRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `account` is currently restricted.
    pub fn is_blacklisted(&self, account: Address) -> bool {
        self.restricted.contains(&account)
    }

    /// Number of restricted addresses.
    pub fn len(&self) -> usize {
        self.restricted.len()
    }

    /// `true` if nothing is restricted.
    pub fn is_empty(&self) -> bool {
        self.restricted.is_empty()
    }

    /// Adds `account` to the blacklist.
    ///
    /// # Errors
    ///
    /// Returns [`BlacklistError::NotBlacklister`] if `caller` holds neither
    /// role, [`BlacklistError::CannotRestrictAdmin`] if the target is an
    /// admin, and [`BlacklistError::CannotRestrictPeerBlacklister`] if the
    /// target is a blacklister and the caller is not an admin.
    pub fn add(
        &mut self,
        roles: &RoleRegistry,
        caller: Address,
        account: Address,
    ) -> Result<(), BlacklistError> {
        Self::authorize(roles, caller, account)?;
        self.restricted.insert(account);
        self.events.record(EngineEvent::AddedToBlacklist { account });
        Ok(())
    }

    /// Removes `account` from the blacklist. Same authorization and policy
    /// as [`add`](Self::add).
    pub fn remove(
        &mut self,
        roles: &RoleRegistry,
        caller: Address,
        account: Address,
    ) -> Result<(), BlacklistError> {
        Self::authorize(roles, caller, account)?;
        self.restricted.remove(&account);
        self.events
            .record(EngineEvent::RemovedFromBlacklist { account });
        Ok(())
    }

    /// The events recorded by blacklist mutations.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.events.take()
    }

    // Checks, in order: caller privilege, admin-target protection,
    // peer-blacklister protection.
    fn authorize(
        roles: &RoleRegistry,
        caller: Address,
        account: Address,
    ) -> Result<(), BlacklistError> {
        if !roles.is_blacklister(caller) && !roles.is_admin(caller) {
            return Err(BlacklistError::NotBlacklister(caller));
        }
        if roles.is_admin(account) {
            return Err(BlacklistError::CannotRestrictAdmin(account));
        }
        if roles.is_blacklister(account) && !roles.is_admin(caller) {
            return Err(BlacklistError::CannotRestrictPeerBlacklister(account));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    const ADMIN: Address = Address::repeat_byte(0xA1);
    const KEEPER: Address = Address::repeat_byte(0xA2);
    const PEER: Address = Address::repeat_byte(0xA3);
    const ALICE: Address = Address::repeat_byte(0x11);

    fn roles() -> RoleRegistry {
        let mut registry = RoleRegistry::new(ADMIN, Some(KEEPER));
        registry.grant_role(ADMIN, Role::Blacklister, PEER).unwrap();
        registry
    }

    #[test]
    fn blacklister_can_add_and_remove() {
        let roles = roles();
        let mut blacklist = BlacklistRegistry::new();

        blacklist.add(&roles, KEEPER, ALICE).unwrap();
        assert!(blacklist.is_blacklisted(ALICE));

        blacklist.remove(&roles, KEEPER, ALICE).unwrap();
        assert!(!blacklist.is_blacklisted(ALICE));
    }

    #[test]
    fn regular_account_cannot_mutate() {
        let roles = roles();
        let mut blacklist = BlacklistRegistry::new();

        let result = blacklist.add(&roles, ALICE, KEEPER);
        assert!(matches!(result, Err(BlacklistError::NotBlacklister(a)) if a == ALICE));
        assert!(blacklist.is_empty());
    }

    #[test]
    fn admin_is_untouchable() {
        let roles = roles();
        let mut blacklist = BlacklistRegistry::new();

        let result = blacklist.add(&roles, KEEPER, ADMIN);
        assert!(matches!(result, Err(BlacklistError::CannotRestrictAdmin(_))));

        // Even the admin cannot restrict itself.
        let result = blacklist.add(&roles, ADMIN, ADMIN);
        assert!(matches!(result, Err(BlacklistError::CannotRestrictAdmin(_))));
    }

    #[test]
    fn blacklisters_cannot_restrict_each_other() {
        let roles = roles();
        let mut blacklist = BlacklistRegistry::new();

        let result = blacklist.add(&roles, KEEPER, PEER);
        assert!(matches!(
            result,
            Err(BlacklistError::CannotRestrictPeerBlacklister(a)) if a == PEER
        ));
    }

    #[test]
    fn admin_may_restrict_a_blacklister() {
        let roles = roles();
        let mut blacklist = BlacklistRegistry::new();

        blacklist.add(&roles, ADMIN, PEER).unwrap();
        assert!(blacklist.is_blacklisted(PEER));
    }

    #[test]
    fn double_add_and_double_remove_succeed() {
        let roles = roles();
        let mut blacklist = BlacklistRegistry::new();

        blacklist.add(&roles, KEEPER, ALICE).unwrap();
        blacklist.add(&roles, KEEPER, ALICE).unwrap();
        assert!(blacklist.is_blacklisted(ALICE));
        assert_eq!(blacklist.len(), 1);

        blacklist.remove(&roles, KEEPER, ALICE).unwrap();
        blacklist.remove(&roles, KEEPER, ALICE).unwrap();
        assert!(!blacklist.is_blacklisted(ALICE));
    }

    #[test]
    fn registry_serialization_roundtrip() {
        let roles = roles();
        let mut blacklist = BlacklistRegistry::new();
        blacklist.add(&roles, KEEPER, ALICE).unwrap();

        let json = serde_json::to_string(&blacklist).expect("serialize");
        let recovered: BlacklistRegistry = serde_json::from_str(&json).expect("deserialize");
        assert!(recovered.is_blacklisted(ALICE));
    }
}
