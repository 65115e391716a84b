//! Ledger property tests: conservation of supply across arbitrary operation
//! sequences, blacklist symmetry on transfers, and allowance semantics.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::RwLock;

use helio_engine::blacklist::BlacklistRegistry;
use helio_engine::config::{to_wad, TOKEN_NAME, TOKEN_SYMBOL};
use helio_engine::ledger::{LedgerError, TokenLedger};
use helio_engine::roles::RoleRegistry;

const ADMIN: Address = Address::repeat_byte(0xA1);
const ALICE: Address = Address::repeat_byte(0x11);
const BOB: Address = Address::repeat_byte(0x22);
const CAROL: Address = Address::repeat_byte(0x33);

fn ledger() -> TokenLedger {
    let roles = Arc::new(RwLock::new(RoleRegistry::new(ADMIN, None)));
    let blacklist = Arc::new(RwLock::new(BlacklistRegistry::new()));
    TokenLedger::new(TOKEN_NAME, TOKEN_SYMBOL, roles, blacklist)
}

fn assert_conserved(ledger: &TokenLedger) {
    let sum = ledger
        .holders()
        .iter()
        .fold(U256::ZERO, |acc, (_, balance)| acc + *balance);
    assert_eq!(
        sum,
        ledger.total_supply(),
        "total supply must equal the sum of all balances"
    );
}

#[test]
fn conservation_across_mint_burn_transfer_sequences() {
    let mut ledger = ledger();

    // A fixed walk through every balance-moving operation, checking the
    // invariant after each step.
    ledger.mint(ADMIN, ALICE, to_wad(1_000)).unwrap();
    assert_conserved(&ledger);

    ledger.mint(ADMIN, BOB, to_wad(250)).unwrap();
    assert_conserved(&ledger);

    ledger.transfer(ALICE, BOB, to_wad(400)).unwrap();
    assert_conserved(&ledger);

    ledger.burn_from(ADMIN, BOB, to_wad(650)).unwrap();
    assert_conserved(&ledger);

    ledger.approve(ALICE, CAROL, to_wad(600));
    ledger
        .transfer_from(CAROL, ALICE, CAROL, to_wad(600))
        .unwrap();
    assert_conserved(&ledger);

    ledger.burn_from(ADMIN, CAROL, to_wad(600)).unwrap();
    assert_conserved(&ledger);

    // Failed operations must not disturb the invariant either.
    assert!(ledger.transfer(ALICE, BOB, to_wad(10_000)).is_err());
    assert_conserved(&ledger);

    assert_eq!(ledger.total_supply(), to_wad(600));
}

#[test]
fn accounts_persist_at_zero_after_full_spend() {
    let mut ledger = ledger();
    ledger.mint(ADMIN, ALICE, to_wad(5)).unwrap();
    ledger.transfer(ALICE, BOB, to_wad(5)).unwrap();

    assert_eq!(ledger.balance_of(ALICE), U256::ZERO);
    // Zeroed accounts drop out of the holders view but stay addressable.
    assert!(ledger.holders().iter().all(|(account, _)| *account != ALICE));
    ledger.mint(ADMIN, ALICE, to_wad(1)).unwrap();
    assert_eq!(ledger.balance_of(ALICE), to_wad(1));
}

#[test]
fn blacklist_symmetry_on_transfers() {
    let mut ledger = ledger();
    ledger.mint(ADMIN, ALICE, to_wad(100)).unwrap();
    ledger.mint(ADMIN, BOB, to_wad(100)).unwrap();
    ledger.add_to_blacklist(ADMIN, CAROL).unwrap();

    // Restricted as recipient, restricted as sender (via allowance too).
    assert!(matches!(
        ledger.transfer(ALICE, CAROL, to_wad(1)),
        Err(LedgerError::BlacklistedRecipient(_))
    ));
    ledger.approve(CAROL, BOB, to_wad(1));
    assert!(matches!(
        ledger.transfer_from(BOB, CAROL, BOB, to_wad(1)),
        Err(LedgerError::BlacklistedSender(_))
    ));

    // After removal the exact same operations succeed under otherwise
    // valid conditions.
    ledger.remove_from_blacklist(ADMIN, CAROL).unwrap();
    ledger.transfer(ALICE, CAROL, to_wad(1)).unwrap();
    ledger.transfer_from(BOB, CAROL, BOB, to_wad(1)).unwrap();
    assert_conserved(&ledger);
}

#[test]
fn allowance_is_spent_not_shared() {
    let mut ledger = ledger();
    ledger.mint(ADMIN, ALICE, to_wad(100)).unwrap();
    ledger.approve(ALICE, BOB, to_wad(30));

    ledger.transfer_from(BOB, ALICE, BOB, to_wad(20)).unwrap();
    assert_eq!(ledger.allowance(ALICE, BOB), to_wad(10));

    // The remaining allowance does not cover another 20.
    let result = ledger.transfer_from(BOB, ALICE, BOB, to_wad(20));
    assert!(matches!(
        result,
        Err(LedgerError::InsufficientAllowance { .. })
    ));

    // Another spender has no allowance at all.
    let result = ledger.transfer_from(CAROL, ALICE, CAROL, to_wad(1));
    assert!(matches!(
        result,
        Err(LedgerError::InsufficientAllowance { .. })
    ));
}

#[test]
fn transfer_to_zero_address_rejected() {
    let mut ledger = ledger();
    ledger.mint(ADMIN, ALICE, to_wad(10)).unwrap();
    let result = ledger.transfer(ALICE, Address::ZERO, to_wad(1));
    assert!(matches!(result, Err(LedgerError::ZeroAddress)));
    assert_conserved(&ledger);
}
