//! # Minimum Bid
//!
//! The smallest bid quantity whose inflows and outflows are integral for
//! every component at every point of the price curve.

use alloy_primitives::U256;

use crate::errors::{BidRejection, CoreResult, SetCoreError};
use crate::math::big_int::{is_multiple_of, lcm};
use crate::math::safe_math::mul_u256;

/// Minimum bid of an auction between baskets with the given natural units
pub fn minimum_bid(
    current_natural_unit: U256,
    next_natural_unit: U256,
    price_denominator: U256,
) -> CoreResult<U256> {
    if current_natural_unit.is_zero() || next_natural_unit.is_zero() {
        return Err(SetCoreError::malformed_basket("natural unit must be positive"));
    }
    if price_denominator.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }
    mul_u256(lcm(current_natural_unit, next_natural_unit)?, price_denominator)
}

/// Whether `quantity` is a positive multiple of `minimum_bid`
pub fn is_multiple_of_minimum_bid(quantity: U256, minimum_bid: U256) -> bool {
    !quantity.is_zero() && is_multiple_of(quantity, minimum_bid)
}

/// Check a bid quantity against the minimum bid granularity
pub fn check_bid_granularity(quantity: U256, minimum_bid: U256) -> CoreResult<()> {
    if quantity.is_zero() {
        return Err(SetCoreError::invalid_bid(BidRejection::Zero));
    }
    if !is_multiple_of(quantity, minimum_bid) {
        return Err(SetCoreError::invalid_bid(BidRejection::NotMultipleOfMinimumBid {
            quantity,
            minimum_bid,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_minimum_bid() {
        assert_eq!(minimum_bid(u(10), u(100), u(1000)).unwrap(), u(100_000));
        assert_eq!(minimum_bid(u(100), u(100), u(1000)).unwrap(), u(100_000));
        assert_eq!(minimum_bid(u(4), u(6), u(1000)).unwrap(), u(12_000));

        let two_e18 = U256::from(2_000_000_000_000_000_000u64);
        assert_eq!(
            minimum_bid(two_e18, two_e18, u(1000)).unwrap(),
            two_e18 * u(1000)
        );
    }

    #[test]
    fn test_minimum_bid_rejects_zero() {
        assert!(minimum_bid(U256::ZERO, u(1), u(1000)).is_err());
        assert_eq!(minimum_bid(u(1), u(1), U256::ZERO), Err(SetCoreError::DivisionByZero));
    }

    #[test]
    fn test_granularity() {
        let min = u(1000);
        assert!(check_bid_granularity(u(3000), min).is_ok());
        assert_eq!(
            check_bid_granularity(U256::ZERO, min),
            Err(SetCoreError::InvalidBidQuantity(BidRejection::Zero))
        );
        assert!(check_bid_granularity(u(1), min).unwrap_err().is_invalid_bid());
        assert!(check_bid_granularity(u(1500), min).is_err());

        assert!(is_multiple_of_minimum_bid(u(2000), min));
        assert!(!is_multiple_of_minimum_bid(U256::ZERO, min));
        assert!(!is_multiple_of_minimum_bid(u(999), min));
    }
}
