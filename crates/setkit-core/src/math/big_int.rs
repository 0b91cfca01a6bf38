//! Big integer operations for auction settlement math
//!
//! All amounts are 256-bit unsigned integers, the width the on-chain
//! contracts compute in. Every helper here is checked: an operation that
//! would wrap on-chain reverts there, so it is an error here.

use alloy_primitives::U256;

use crate::errors::{CoreResult, SetCoreError};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Multiply two values and divide by a third with specified rounding
/// result = (a * b) / denominator
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> CoreResult<U256> {
    if denominator.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }

    let product = a.checked_mul(b).ok_or(SetCoreError::MathOverflow)?;
    let quotient = product / denominator;

    if rounding == Rounding::Up && !(product % denominator).is_zero() {
        return quotient
            .checked_add(U256::from(1u64))
            .ok_or(SetCoreError::MathOverflow);
    }

    Ok(quotient)
}

/// Greatest common divisor (Euclid)
pub fn gcd(a: U256, b: U256) -> U256 {
    let (mut a, mut b) = (a, b);
    while !b.is_zero() {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple; zero inputs are rejected
pub fn lcm(a: U256, b: U256) -> CoreResult<U256> {
    if a.is_zero() || b.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }
    // a / gcd is exact, so only the final multiply can overflow
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(SetCoreError::MathOverflow)
}

/// Whether `value` is an exact multiple of `unit`
pub fn is_multiple_of(value: U256, unit: U256) -> bool {
    !unit.is_zero() && (value % unit).is_zero()
}

/// Round `value` down to the nearest multiple of `unit`
pub fn round_down_to_multiple(value: U256, unit: U256) -> CoreResult<U256> {
    if unit.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }
    Ok(value - value % unit)
}
