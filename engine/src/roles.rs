//! # Role Registry
//!
//! Holds the set of privileged accounts. Two roles exist: [`Role::Admin`]
//! (mint/burn, role management, sale parameters, withdrawals) and
//! [`Role::Blacklister`] (blacklist management only — a blacklister without
//! the Admin role can neither mint nor manage roles).
//!
//! The registry is a single shared instance: the ledger and the sale engine
//! each hold an `Arc<RwLock<RoleRegistry>>` handle injected at construction,
//! so a grant or revoke is immediately visible to both. Accounts are
//! zero-default — an address that was never granted anything simply has no
//! entry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::Address;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::{EngineEvent, EventLog};

/// Shared handle to the single role registry instance.
pub type SharedRoles = Arc<RwLock<RoleRegistry>>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during role operations.
#[derive(Debug, Error)]
pub enum RoleError {
    /// The caller does not hold the Admin role.
    #[error("not authorized: {0} does not hold the Admin role")]
    NotAuthorized(Address),

    /// Revoking this grant would leave the registry with no admin at all,
    /// making every privileged operation permanently unreachable.
    #[error("cannot revoke the last remaining Admin: {0}")]
    CannotRemoveLastAdmin(Address),
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// A privilege grantable to an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative privilege: mint/burn, role grants, sale
    /// parameters, withdrawals.
    Admin,
    /// Blacklist management only.
    Blacklister,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Blacklister => write!(f, "Blacklister"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoleRegistry
// ---------------------------------------------------------------------------

/// The set of privileged accounts and their roles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleRegistry {
    grants: HashMap<Address, HashSet<Role>>,
    events: EventLog,
}

impl RoleRegistry {
    /// Creates the registry with its genesis grants.
    ///
    /// The deploying admin receives both roles — the admin must be able to
    /// manage the blacklist without granting itself anything first. An
    /// optional delegated blacklister receives only [`Role::Blacklister`].
    pub fn new(admin: Address, initial_blacklister: Option<Address>) -> Self {
        let mut grants: HashMap<Address, HashSet<Role>> = HashMap::new();
        grants.insert(admin, HashSet::from([Role::Admin, Role::Blacklister]));
        if let Some(blacklister) = initial_blacklister {
            grants
                .entry(blacklister)
                .or_default()
                .insert(Role::Blacklister);
        }
        Self {
            grants,
            events: EventLog::new(),
        }
    }

    /// `true` if `account` holds `role`.
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.grants
            .get(&account)
            .map(|roles| roles.contains(&role))
            .unwrap_or(false)
    }

    /// `true` if `account` holds the Admin role.
    pub fn is_admin(&self, account: Address) -> bool {
        self.has_role(Role::Admin, account)
    }

    /// `true` if `account` holds the Blacklister role.
    pub fn is_blacklister(&self, account: Address) -> bool {
        self.has_role(Role::Blacklister, account)
    }

    /// Grants `role` to `account`. Admin-only.
    ///
    /// Granting a role the account already holds succeeds without recording
    /// a duplicate observation.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::NotAuthorized`] if `caller` is not an admin.
    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), RoleError> {
        if !self.is_admin(caller) {
            return Err(RoleError::NotAuthorized(caller));
        }
        if self.grants.entry(account).or_default().insert(role) {
            self.events.record(EngineEvent::RoleGranted { role, account });
        }
        Ok(())
    }

    /// Revokes `role` from `account`. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::NotAuthorized`] if `caller` is not an admin.
    /// Returns [`RoleError::CannotRemoveLastAdmin`] if the revocation would
    /// leave zero admins.
    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), RoleError> {
        if !self.is_admin(caller) {
            return Err(RoleError::NotAuthorized(caller));
        }
        if role == Role::Admin && self.is_admin(account) && self.admin_count() == 1 {
            return Err(RoleError::CannotRemoveLastAdmin(account));
        }
        let removed = self
            .grants
            .get_mut(&account)
            .map(|roles| roles.remove(&role))
            .unwrap_or(false);
        if removed {
            self.events.record(EngineEvent::RoleRevoked { role, account });
        }
        Ok(())
    }

    /// The events recorded by role operations.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.events.take()
    }

    fn admin_count(&self) -> usize {
        self.grants
            .values()
            .filter(|roles| roles.contains(&Role::Admin))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Address = Address::repeat_byte(0xA1);
    const SHOP_OWNER: Address = Address::repeat_byte(0xA2);
    const ALICE: Address = Address::repeat_byte(0x11);
    const BOB: Address = Address::repeat_byte(0x22);

    #[test]
    fn genesis_grants_admin_both_roles() {
        let registry = RoleRegistry::new(ADMIN, Some(SHOP_OWNER));
        assert!(registry.is_admin(ADMIN));
        assert!(registry.is_blacklister(ADMIN));
        assert!(registry.is_blacklister(SHOP_OWNER));
        assert!(!registry.is_admin(SHOP_OWNER));
    }

    #[test]
    fn unknown_account_has_no_roles() {
        let registry = RoleRegistry::new(ADMIN, None);
        assert!(!registry.has_role(Role::Admin, ALICE));
        assert!(!registry.has_role(Role::Blacklister, ALICE));
    }

    #[test]
    fn admin_can_grant_and_revoke_blacklister() {
        let mut registry = RoleRegistry::new(ADMIN, None);
        registry.grant_role(ADMIN, Role::Blacklister, ALICE).unwrap();
        assert!(registry.is_blacklister(ALICE));
        registry.revoke_role(ADMIN, Role::Blacklister, ALICE).unwrap();
        assert!(!registry.is_blacklister(ALICE));
    }

    #[test]
    fn non_admin_cannot_grant() {
        let mut registry = RoleRegistry::new(ADMIN, None);
        registry.grant_role(ADMIN, Role::Blacklister, ALICE).unwrap();

        // A blacklister is not an admin; granting must fail.
        let result = registry.grant_role(ALICE, Role::Blacklister, BOB);
        assert!(matches!(result, Err(RoleError::NotAuthorized(a)) if a == ALICE));
        assert!(!registry.is_blacklister(BOB));
    }

    #[test]
    fn last_admin_cannot_be_revoked() {
        let mut registry = RoleRegistry::new(ADMIN, None);
        let result = registry.revoke_role(ADMIN, Role::Admin, ADMIN);
        assert!(matches!(result, Err(RoleError::CannotRemoveLastAdmin(_))));
        assert!(registry.is_admin(ADMIN));
    }

    #[test]
    fn second_admin_unlocks_revocation() {
        let mut registry = RoleRegistry::new(ADMIN, None);
        registry.grant_role(ADMIN, Role::Admin, ALICE).unwrap();
        registry.revoke_role(ADMIN, Role::Admin, ADMIN).unwrap();
        assert!(!registry.is_admin(ADMIN));
        assert!(registry.is_admin(ALICE));
    }

    #[test]
    fn duplicate_grant_records_one_event() {
        let mut registry = RoleRegistry::new(ADMIN, None);
        registry.grant_role(ADMIN, Role::Blacklister, ALICE).unwrap();
        registry.grant_role(ADMIN, Role::Blacklister, ALICE).unwrap();
        assert_eq!(registry.events().len(), 1);
    }

    #[test]
    fn registry_serialization_roundtrip() {
        let mut registry = RoleRegistry::new(ADMIN, Some(SHOP_OWNER));
        registry.grant_role(ADMIN, Role::Blacklister, ALICE).unwrap();

        let json = serde_json::to_string(&registry).expect("serialize");
        let recovered: RoleRegistry = serde_json::from_str(&json).expect("deserialize");
        assert!(recovered.is_admin(ADMIN));
        assert!(recovered.is_blacklister(ALICE));
    }
}
