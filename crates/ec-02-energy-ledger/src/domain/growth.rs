//! Energy growth arithmetic.
//!
//! Consensus-critical: integer only, truncating division, 512-bit
//! intermediate product. A quotient beyond `U256::MAX` saturates.

use ec_01_account_state::Account;
use shared_types::{BlockTime, U256, U512};

use super::EnergyParams;

/// Energy accrued by `balance` over `elapsed` seconds.
pub fn energy_growth(balance: U256, elapsed: u64, params: &EnergyParams) -> U256 {
    if balance.is_zero() || elapsed == 0 || params.scale.is_zero() {
        return U256::zero();
    }

    let product = U512::from(params.growth_rate)
        .checked_mul(U512::from(balance))
        .and_then(|p| p.checked_mul(U512::from(elapsed)));

    match product {
        Some(product) => U256::try_from(product / U512::from(params.scale)).unwrap_or(U256::MAX),
        None => U256::MAX,
    }
}

/// Energy of `account` at time `now`.
///
/// A `now` earlier than the stored timestamp accrues nothing. Neither does
/// an account the ledger never touched: growth starts at the first touch.
pub fn grown_energy(account: &Account, now: BlockTime, params: &EnergyParams) -> U256 {
    let Some(since) = account.energy_timestamp else {
        return account.energy;
    };
    let elapsed = now.saturating_sub(since);
    account
        .energy
        .saturating_add(energy_growth(account.balance, elapsed, params))
}

/// Fold accrued growth into the stored fields.
///
/// The stored timestamp never moves backwards, otherwise the clamped
/// interval would be counted again on the next touch.
pub fn realize_energy(account: &mut Account, now: BlockTime, params: &EnergyParams) {
    account.energy = grown_energy(account, now, params);
    account.energy_timestamp = Some(account.energy_timestamp.map_or(now, |ts| ts.max(now)));
}
