//! # Bid Flows
//!
//! Token inflow and outflow of a bid, and bid placement against a live
//! auction cycle.
//!
//! For a bid of `q` current sets at price `pn / pd` over a combined array
//! with natural unit `N`:
//!
//! ```text
//! outflow[i] = current_units[i] * q / N
//! inflow[i]  = next_units[i] * q * pn / (N * pd)
//! ```
//!
//! Both truncate. At a multiple of the minimum bid the outflow is exact.

use alloy_primitives::U256;

use crate::auction::minimum_bid::check_bid_granularity;
use crate::auction::state_machine::AuctionCycle;
use crate::errors::{BidRejection, CoreResult, SetCoreError};
use crate::math::big_int::{mul_div, round_down_to_multiple, Rounding};
use crate::math::safe_math::{mul_u256, sub_u256};
use crate::types::{AuctionPrice, Bid, BidOutcome, CombinedTokenArray, TokenFlow};

/// Token flow of a bid of `quantity` current sets at `price_numerator / price_denominator`
pub fn compute_flow(
    combined: &CombinedTokenArray,
    quantity: U256,
    price_numerator: U256,
    price_denominator: U256,
) -> CoreResult<TokenFlow> {
    if combined.natural_unit.is_zero() || price_denominator.is_zero() {
        return Err(SetCoreError::DivisionByZero);
    }
    if combined.current_units.len() != combined.len() || combined.next_units.len() != combined.len()
    {
        return Err(SetCoreError::malformed_basket("combined units do not match components"));
    }

    let inflow_denominator = mul_u256(combined.natural_unit, price_denominator)?;

    let outflow = combined
        .current_units
        .iter()
        .map(|units| mul_div(*units, quantity, combined.natural_unit, Rounding::Down))
        .collect::<CoreResult<Vec<_>>>()?;

    let inflow = combined
        .next_units
        .iter()
        .map(|units| {
            let scaled = mul_u256(*units, quantity)?;
            mul_div(scaled, price_numerator, inflow_denominator, Rounding::Down)
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(TokenFlow { inflow, outflow })
}

/// Quantity a bid actually fills given what is left in the auction
pub fn resolve_fill(
    quantity: U256,
    remaining: U256,
    minimum_bid: U256,
    allow_partial_fill: bool,
) -> CoreResult<U256> {
    check_bid_granularity(quantity, minimum_bid)?;

    if quantity <= remaining {
        return Ok(quantity);
    }
    if !allow_partial_fill {
        return Err(SetCoreError::invalid_bid(BidRejection::ExceedsRemaining {
            quantity,
            remaining,
        }));
    }

    let filled = round_down_to_multiple(remaining, minimum_bid)?;
    if filled.is_zero() {
        return Err(SetCoreError::invalid_bid(BidRejection::NothingToFill {
            remaining,
            minimum_bid,
        }));
    }
    Ok(filled)
}

impl AuctionCycle {
    /// Place a bid, returning the updated cycle and the token movement owed
    pub fn place_bid(&self, bid: &Bid, now: u64) -> CoreResult<(Self, BidOutcome)> {
        let outcome = self.quote(bid, now)?;

        let mut next = self.clone();
        if let Some(auction) = next.auction.as_mut() {
            auction.remaining_current_sets = outcome.remaining_current_sets;
        }
        Ok((next, outcome))
    }

    /// Price and token flow a bid of `quantity` would get at `now`, without
    /// partial filling
    pub fn bid_price(&self, quantity: U256, now: u64) -> CoreResult<BidOutcome> {
        let bid = Bid {
            rebalancing_token: self.rebalancing_token,
            quantity,
            allow_partial_fill: false,
        };
        self.quote(&bid, now)
    }

    fn quote(&self, bid: &Bid, now: u64) -> CoreResult<BidOutcome> {
        let (proposal, auction) = self.live_auction("placeBid")?;

        if bid.rebalancing_token != self.rebalancing_token {
            return Err(SetCoreError::InvalidParameter(
                "bid targets a different rebalancing token",
            ));
        }
        if now >= auction.fail_deadline {
            return Err(SetCoreError::StaleAuctionParameters {
                now,
                deadline: auction.fail_deadline,
            });
        }

        let filled_quantity = resolve_fill(
            bid.quantity,
            auction.remaining_current_sets,
            auction.minimum_bid,
            bid.allow_partial_fill,
        )?;

        let elapsed = self.elapsed_since_start(auction, now)?;
        let price: AuctionPrice = proposal.parameters.price_at(elapsed)?;
        let flow = compute_flow(
            &auction.combined,
            filled_quantity,
            price.numerator,
            price.denominator,
        )?;

        Ok(BidOutcome {
            filled_quantity,
            price,
            flow,
            remaining_current_sets: sub_u256(auction.remaining_current_sets, filled_quantity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn units(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    fn combined() -> CombinedTokenArray {
        CombinedTokenArray {
            components: vec![Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3)],
            current_units: units(&[3, 4, 0]),
            next_units: units(&[0, 5, 6]),
            natural_unit: u(10),
        }
    }

    #[test]
    fn test_flow_at_par() {
        // 100 sets at price 1000/1000
        let flow = compute_flow(&combined(), u(100), u(1000), u(1000)).unwrap();
        assert_eq!(flow.outflow, units(&[30, 40, 0]));
        assert_eq!(flow.inflow, units(&[0, 50, 60]));
    }

    #[test]
    fn test_flow_scales_with_price() {
        let flow = compute_flow(&combined(), u(100), u(500), u(1000)).unwrap();
        assert_eq!(flow.outflow, units(&[30, 40, 0]));
        assert_eq!(flow.inflow, units(&[0, 25, 30]));

        let flow = compute_flow(&combined(), u(100), u(1500), u(1000)).unwrap();
        assert_eq!(flow.inflow, units(&[0, 75, 90]));
    }

    #[test]
    fn test_flow_truncates() {
        // 5 * 10 * 333 / (10 * 1000) = 1.665
        let flow = compute_flow(&combined(), u(10), u(333), u(1000)).unwrap();
        assert_eq!(flow.inflow, units(&[0, 1, 1]));
        assert_eq!(flow.outflow, units(&[3, 4, 0]));
    }

    #[test]
    fn test_flow_zero_price() {
        let flow = compute_flow(&combined(), u(100), U256::ZERO, u(1000)).unwrap();
        assert_eq!(flow.inflow, units(&[0, 0, 0]));
    }

    #[test]
    fn test_flow_rejects_degenerate() {
        assert_eq!(
            compute_flow(&combined(), u(1), u(1), U256::ZERO),
            Err(SetCoreError::DivisionByZero)
        );
        let mut bad = combined();
        bad.next_units.pop();
        assert!(compute_flow(&bad, u(1), u(1), u(1)).is_err());
    }

    #[test]
    fn test_resolve_fill() {
        let min = u(1000);
        assert_eq!(resolve_fill(u(2000), u(7000), min, false).unwrap(), u(2000));
        assert_eq!(resolve_fill(u(7000), u(7000), min, false).unwrap(), u(7000));

        assert_eq!(
            resolve_fill(u(8000), u(7000), min, false),
            Err(SetCoreError::InvalidBidQuantity(BidRejection::ExceedsRemaining {
                quantity: u(8000),
                remaining: u(7000),
            }))
        );
        assert_eq!(resolve_fill(u(8000), u(7500), min, true).unwrap(), u(7000));
        assert_eq!(
            resolve_fill(u(1000), u(999), min, true),
            Err(SetCoreError::InvalidBidQuantity(BidRejection::NothingToFill {
                remaining: u(999),
                minimum_bid: min,
            }))
        );
        assert!(resolve_fill(u(1500), u(7000), min, true).unwrap_err().is_invalid_bid());
    }
}
