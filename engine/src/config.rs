//! # Engine Constants & Default Sale Parameters
//!
//! Every magic number in the engine lives here. Amounts are `U256` values in
//! the token's smallest denomination (18 decimals, same scale as wei), so the
//! whole-token constants below go through [`to_wad`] before they touch any
//! arithmetic.

use alloy_primitives::U256;

// ---------------------------------------------------------------------------
// Fixed-Point Scale
// ---------------------------------------------------------------------------

/// One whole token in smallest units: 10^18.
///
/// Fits in a `u64` (10^18 < 2^63), so it can stay a plain constant; lift it
/// into `U256` with [`wad`] before multiplying.
pub const WAD: u64 = 1_000_000_000_000_000_000;

/// Decimal places of the ledger token. Matches the 18-decimal scale used for
/// USD prices and stablecoin amounts, so quoting never has to rescale.
pub const TOKEN_DECIMALS: u8 = 18;

/// [`WAD`] as a `U256`.
pub fn wad() -> U256 {
    U256::from(WAD)
}

/// Converts a whole-token count into smallest units.
pub fn to_wad(tokens: u64) -> U256 {
    U256::from(tokens) * wad()
}

// ---------------------------------------------------------------------------
// Token Identity
// ---------------------------------------------------------------------------

/// Human-readable name of the ledger token.
pub const TOKEN_NAME: &str = "Helio Green Token";

/// Ticker symbol.
pub const TOKEN_SYMBOL: &str = "HGT";

/// Genesis supply minted by the deployer, in whole tokens.
pub const GENESIS_SUPPLY_TOKENS: u64 = 100_000_000;

// ---------------------------------------------------------------------------
// Default Sale Parameters
// ---------------------------------------------------------------------------

/// Default USD price of one token, 18-decimal fixed point: 0.42 USD.
pub const DEFAULT_TOKEN_PRICE_USD: u64 = 420_000_000_000_000_000;

/// Default sellable allocation, in whole tokens. Half the genesis supply.
pub const DEFAULT_TOKENS_FOR_SALE: u64 = 50_000_000;

/// Lifetime purchase ceiling per wallet, in whole tokens. This caps
/// cumulative purchases, not current balance.
pub const DEFAULT_LIMIT_PER_WALLET: u64 = 50_000;

/// Default sale window length, in weeks.
pub const DEFAULT_SALE_DURATION_WEEKS: u64 = 5;

/// Seconds in one week. Admin duration updates are expressed in weeks and
/// stored in seconds.
pub const SECONDS_PER_WEEK: u64 = 7 * 24 * 60 * 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wad_is_ten_to_the_eighteenth() {
        assert_eq!(wad(), U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(U256::from(WAD), wad());
    }

    #[test]
    fn to_wad_scales_whole_tokens() {
        assert_eq!(to_wad(0), U256::ZERO);
        assert_eq!(to_wad(1), wad());
        assert_eq!(to_wad(50_000), U256::from(50_000u64) * wad());
    }

    #[test]
    fn default_price_is_42_cents() {
        // 0.42 * 10^18
        assert_eq!(
            U256::from(DEFAULT_TOKEN_PRICE_USD) * U256::from(100u64),
            U256::from(42u64) * wad()
        );
    }

    #[test]
    fn sale_defaults_are_consistent() {
        // The per-wallet cap must be a small fraction of the allocation,
        // and the allocation must fit inside the genesis supply.
        assert!(DEFAULT_LIMIT_PER_WALLET < DEFAULT_TOKENS_FOR_SALE);
        assert!(DEFAULT_TOKENS_FOR_SALE <= GENESIS_SUPPLY_TOKENS);
    }

    #[test]
    fn a_week_is_a_week() {
        assert_eq!(SECONDS_PER_WEEK, 604_800);
    }
}
