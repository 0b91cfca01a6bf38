//! # Core Error Types
//!
//! Typed failures raised by the auction engine. Every operation checks its
//! preconditions locally and surfaces one of these immediately; nothing is
//! clamped or corrected on the caller's behalf.

use alloy_primitives::U256;
use thiserror::Error;

/// Errors raised by the rebalancing auction engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub enum SetCoreError {
    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Math overflow")]
    MathOverflow,

    #[error("Math underflow")]
    MathUnderflow,

    #[error("Division by zero")]
    DivisionByZero,

    // ========================================================================
    // Bid Errors
    // ========================================================================

    #[error("Invalid bid quantity: {0}")]
    InvalidBidQuantity(BidRejection),

    #[error("Auction parameters are stale: now {now} is past the fail deadline {deadline}")]
    StaleAuctionParameters { now: u64, deadline: u64 },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================

    #[error("Invalid auction state: {operation} requires {expected}, current state is {actual}")]
    InvalidAuctionState {
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Caller is not the rebalancing token manager")]
    Unauthorized,

    #[error("Rebalance interval has not elapsed: next proposal allowed at {allowed_at}")]
    RebalanceIntervalNotElapsed { allowed_at: u64 },

    #[error("Proposal period has not elapsed: rebalance can start at {allowed_at}")]
    ProposalPeriodNotElapsed { allowed_at: u64 },

    #[error("Insufficient current sets: {available} available, minimum bid is {minimum_bid}")]
    InsufficientCurrentSets { available: U256, minimum_bid: U256 },

    #[error("Auction not complete: {remaining} current sets remain biddable")]
    AuctionNotComplete { remaining: U256 },

    #[error("Auction complete: {remaining} current sets are below the minimum bid, settle instead")]
    AuctionComplete { remaining: U256 },

    #[error("Fail deadline not reached: auction can be ended at {deadline}")]
    FailDeadlineNotReached { deadline: u64 },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Malformed basket data: {0}")]
    MalformedBasketData(&'static str),

    #[error("Invalid auction parameters: {0}")]
    InvalidAuctionParameters(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Why a bid quantity was refused
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub enum BidRejection {
    /// Quantity is zero
    Zero,
    /// Quantity is not an integer multiple of the minimum bid
    NotMultipleOfMinimumBid { quantity: U256, minimum_bid: U256 },
    /// Quantity exceeds the remaining current sets and partial fills are off
    ExceedsRemaining { quantity: U256, remaining: U256 },
    /// A partial fill would transfer nothing
    NothingToFill { remaining: U256, minimum_bid: U256 },
}

impl std::fmt::Display for BidRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BidRejection::Zero => write!(f, "quantity must be greater than zero"),
            BidRejection::NotMultipleOfMinimumBid { quantity, minimum_bid } => write!(
                f,
                "quantity {} is not a multiple of the minimum bid {}",
                quantity, minimum_bid
            ),
            BidRejection::ExceedsRemaining { quantity, remaining } => write!(
                f,
                "quantity {} exceeds the {} remaining current sets",
                quantity, remaining
            ),
            BidRejection::NothingToFill { remaining, minimum_bid } => write!(
                f,
                "{} remaining current sets are below the minimum bid {}",
                remaining, minimum_bid
            ),
        }
    }
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, SetCoreError>;

// Helper functions for creating specific errors
impl SetCoreError {
    /// Create an invalid state error for `operation`
    pub fn invalid_state(
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::InvalidAuctionState {
            operation,
            expected,
            actual,
        }
    }

    /// Create an invalid bid quantity error
    pub fn invalid_bid(reason: BidRejection) -> Self {
        Self::InvalidBidQuantity(reason)
    }

    /// Create a malformed basket error with reason
    pub fn malformed_basket(reason: &'static str) -> Self {
        Self::MalformedBasketData(reason)
    }

    /// Whether the error is one of the bid quantity failures
    pub fn is_invalid_bid(&self) -> bool {
        matches!(self, Self::InvalidBidQuantity(_))
    }

    /// Whether the error is an auction state failure
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidAuctionState { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SetCoreError::invalid_state("bid", "Rebalance", "Drawdown");
        assert_eq!(
            format!("{}", err),
            "Invalid auction state: bid requires Rebalance, current state is Drawdown"
        );
        assert!(err.is_invalid_state());

        let err = SetCoreError::malformed_basket("natural unit must be positive");
        assert_eq!(format!("{}", err), "Malformed basket data: natural unit must be positive");
    }

    #[test]
    fn test_bid_rejection_messages() {
        let err = SetCoreError::invalid_bid(BidRejection::NotMultipleOfMinimumBid {
            quantity: U256::from(1u64),
            minimum_bid: U256::from(1000u64),
        });
        assert!(err.is_invalid_bid());
        assert_eq!(
            format!("{}", err),
            "Invalid bid quantity: quantity 1 is not a multiple of the minimum bid 1000"
        );

        let err = SetCoreError::invalid_bid(BidRejection::Zero);
        assert!(format!("{}", err).contains("greater than zero"));
    }
}
