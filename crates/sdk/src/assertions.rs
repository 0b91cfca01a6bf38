//! Precondition checks run before a bid transaction is built.
//!
//! Each check defers to the auction engine and turns its typed failure into
//! a message an end user can act on.

use alloy_primitives::U256;
use setkit_core::auction::check_bid_granularity;
use setkit_core::{AuctionCycle, BidRejection, RebalanceState, SetCoreError};

use crate::{SdkError, SdkResult};

/// Auction must be accepting bids
pub fn assert_auction_open(cycle: &AuctionCycle) -> SdkResult<()> {
    if cycle.state.allows_bidding() {
        return Ok(());
    }
    Err(SdkError::assertion(format!(
        "auction is not currently open for bids (state: {})",
        cycle.state
    )))
}

/// Bid timestamp must not precede the auction start
pub fn assert_auction_started(cycle: &AuctionCycle, now: u64) -> SdkResult<()> {
    match &cycle.auction {
        Some(auction) if now < auction.auction_start_time => Err(SdkError::assertion(format!(
            "auction opens at {}; wait until then to bid",
            auction.auction_start_time
        ))),
        _ => Ok(()),
    }
}

/// Auction must still have at least one minimum bid of current sets
pub fn assert_auction_not_complete(cycle: &AuctionCycle) -> SdkResult<()> {
    if cycle.is_auction_complete() {
        return Err(SdkError::assertion(format!(
            "auction is drained ({} current sets remaining); settle it instead of bidding",
            cycle.remaining_current_sets().unwrap_or_default()
        )));
    }
    Ok(())
}

/// Auction must still be before its fail deadline
pub fn assert_not_stale(cycle: &AuctionCycle, now: u64) -> SdkResult<()> {
    match cycle.auction_fail_deadline() {
        Some(deadline) if now >= deadline => Err(SdkError::assertion(format!(
            "auction passed its fail deadline at {}; end the failed auction instead of bidding",
            deadline
        ))),
        _ => Ok(()),
    }
}

/// Bid quantity must be a positive multiple of the minimum bid
pub fn assert_bid_quantity(quantity: U256, minimum_bid: U256) -> SdkResult<()> {
    check_bid_granularity(quantity, minimum_bid).map_err(|err| match err {
        SetCoreError::InvalidBidQuantity(BidRejection::Zero) => {
            SdkError::assertion(format!("bid must be at least {}", minimum_bid))
        }
        SetCoreError::InvalidBidQuantity(BidRejection::NotMultipleOfMinimumBid { .. }) => {
            SdkError::assertion(format!(
                "bid quantity {} must be a multiple of the minimum bid {}",
                quantity, minimum_bid
            ))
        }
        other => SdkError::Core(other),
    })
}

/// Bid must fit in the remaining current sets unless partial fills are allowed
pub fn assert_within_remaining(
    quantity: U256,
    remaining: U256,
    allow_partial_fill: bool,
) -> SdkResult<()> {
    if quantity > remaining && !allow_partial_fill {
        return Err(SdkError::assertion(format!(
            "bid quantity {} exceeds the {} current sets remaining; allow a partial fill or bid less",
            quantity, remaining
        )));
    }
    Ok(())
}

/// Auction must be drained before it can settle
pub fn assert_can_settle(cycle: &AuctionCycle) -> SdkResult<()> {
    if cycle.state != RebalanceState::Rebalance {
        return Err(SdkError::assertion(format!(
            "no auction to settle (state: {})",
            cycle.state
        )));
    }
    if !cycle.is_auction_complete() {
        return Err(SdkError::assertion(format!(
            "auction still has {} current sets to bid on",
            cycle.remaining_current_sets().unwrap_or_default()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_quantity_messages() {
        let min = U256::from(1_000u64);
        assert!(assert_bid_quantity(U256::from(3_000u64), min).is_ok());

        let err = assert_bid_quantity(U256::ZERO, min).unwrap_err();
        assert_eq!(err.to_string(), "bid must be at least 1000");

        let err = assert_bid_quantity(U256::from(1u64), min).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bid quantity 1 must be a multiple of the minimum bid 1000"
        );
    }

    #[test]
    fn test_remaining() {
        let remaining = U256::from(5_000u64);
        assert!(assert_within_remaining(U256::from(5_000u64), remaining, false).is_ok());
        assert!(assert_within_remaining(U256::from(6_000u64), remaining, true).is_ok());
        assert!(assert_within_remaining(U256::from(6_000u64), remaining, false).is_err());
    }
}
