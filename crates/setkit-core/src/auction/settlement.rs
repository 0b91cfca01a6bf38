//! # Settlement Math
//!
//! Converts the vault balances left by a completed auction into next sets,
//! and splits a failed auction's vault among holders.

use alloy_primitives::U256;

use crate::errors::{CoreResult, SetCoreError};
use crate::math::big_int::{mul_div, round_down_to_multiple, Rounding};
use crate::types::CombinedTokenArray;

/// Largest quantity of next sets the vault balances can issue.
///
/// Each component held by the next basket caps the issuance at
/// `balance * N / next_units`; the tightest cap wins and is rounded down to
/// the next basket's natural unit.
pub fn next_set_issue_quantity(
    combined: &CombinedTokenArray,
    next_natural_unit: U256,
    component_balances: &[U256],
) -> CoreResult<U256> {
    if component_balances.len() != combined.len() {
        return Err(SetCoreError::InvalidParameter(
            "balances do not match the combined token array",
        ));
    }

    let mut issuable: Option<U256> = None;
    for (balance, units) in component_balances.iter().zip(&combined.next_units) {
        if units.is_zero() {
            continue;
        }
        let cap = mul_div(*balance, combined.natural_unit, *units, Rounding::Down)?;
        issuable = Some(issuable.map_or(cap, |current| current.min(cap)));
    }

    let issuable =
        issuable.ok_or(SetCoreError::malformed_basket("next basket has no units"))?;
    round_down_to_multiple(issuable, next_natural_unit)
}

/// Unit shares that back `total_supply` rebalancing tokens with `issue_quantity` next sets
pub fn unit_shares_for(
    issue_quantity: U256,
    rebalancing_natural_unit: U256,
    total_supply: U256,
) -> CoreResult<U256> {
    if total_supply.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }
    let unit_shares = mul_div(
        issue_quantity,
        rebalancing_natural_unit,
        total_supply,
        Rounding::Down,
    )?;
    if unit_shares.is_zero() {
        return Err(SetCoreError::InvalidParameter("settlement leaves zero unit shares"));
    }
    Ok(unit_shares)
}

/// A holder's pro-rata share of each vault balance
pub fn drawdown_withdrawal(
    component_balances: &[U256],
    holder_balance: U256,
    total_supply: U256,
) -> CoreResult<Vec<U256>> {
    if total_supply.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }
    if holder_balance > total_supply {
        return Err(SetCoreError::InvalidParameter("holder balance exceeds total supply"));
    }
    component_balances
        .iter()
        .map(|balance| mul_div(*balance, holder_balance, total_supply, Rounding::Down))
        .collect()
}
