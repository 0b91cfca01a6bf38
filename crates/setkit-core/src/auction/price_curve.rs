//! # Linear Auction Price Curve
//!
//! Maps elapsed auction time to a price ratio. The numerator moves linearly
//! from the start price to the pivot price over `time_to_pivot` seconds and
//! keeps the same slope afterwards; the denominator never changes.
//!
//! Division truncates the magnitude of the price delta, so an ascending
//! curve is rounded down and a descending one is rounded up toward its start.

use alloy_primitives::U256;

use crate::errors::{CoreResult, SetCoreError};
use crate::math::big_int::{mul_div, Rounding};
use crate::math::safe_math::add_u256;
use crate::types::{AuctionParameters, AuctionPrice};

/// Price of the auction `elapsed_seconds` after it started
pub fn price_at(
    elapsed_seconds: u64,
    time_to_pivot: u64,
    start_price: U256,
    pivot_price: U256,
    price_denominator: U256,
) -> CoreResult<AuctionPrice> {
    if time_to_pivot == 0 || price_denominator.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }

    let elapsed = U256::from(elapsed_seconds);
    let duration = U256::from(time_to_pivot);

    let numerator = if pivot_price >= start_price {
        let delta = mul_div(pivot_price - start_price, elapsed, duration, Rounding::Down)?;
        add_u256(start_price, delta)?
    } else {
        // Descending curves bottom out at zero once extrapolated past it
        let delta = mul_div(start_price - pivot_price, elapsed, duration, Rounding::Down)?;
        start_price.saturating_sub(delta)
    };

    Ok(AuctionPrice {
        numerator,
        denominator: price_denominator,
    })
}

impl AuctionParameters {
    /// Price on this curve `elapsed_seconds` after auction start
    pub fn price_at(&self, elapsed_seconds: u64) -> CoreResult<AuctionPrice> {
        price_at(
            elapsed_seconds,
            self.time_to_pivot,
            self.start_price,
            self.pivot_price,
            self.price_denominator,
        )
    }

    /// Whether the curve rises over time
    pub fn is_ascending(&self) -> bool {
        self.pivot_price >= self.start_price
    }
}
