//! # Auction Types
//!
//! Parameters, lifecycle state and per-bid results of a rebalancing auction.

use alloy_primitives::{Address, U256};

use crate::constants::*;
use crate::errors::{CoreResult, SetCoreError};
use crate::math::safe_math::add_u256;

/// Price curve parameters captured when a rebalance is proposed
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct AuctionParameters {
    /// Liquidator contract running the auction
    pub liquidator: Address,
    /// Seconds from auction start until the pivot price is reached
    pub time_to_pivot: u64,
    /// Price numerator at auction start
    pub start_price: U256,
    /// Price numerator at the pivot
    pub pivot_price: U256,
    /// Fixed-point denominator shared by every price of the auction
    pub price_denominator: U256,
}

impl AuctionParameters {
    /// Create validated auction parameters
    pub fn new(
        liquidator: Address,
        time_to_pivot: u64,
        start_price: U256,
        pivot_price: U256,
        price_denominator: U256,
    ) -> CoreResult<Self> {
        let params = Self {
            liquidator,
            time_to_pivot,
            start_price,
            pivot_price,
            price_denominator,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parameters quoted against [`DEFAULT_PRICE_DENOMINATOR`]
    pub fn with_default_denominator(
        liquidator: Address,
        time_to_pivot: u64,
        start_price: U256,
        pivot_price: U256,
    ) -> CoreResult<Self> {
        Self::new(
            liquidator,
            time_to_pivot,
            start_price,
            pivot_price,
            U256::from(DEFAULT_PRICE_DENOMINATOR),
        )
    }

    /// Check parameter bounds
    pub fn validate(&self) -> CoreResult<()> {
        if self.liquidator.is_zero() {
            return Err(SetCoreError::InvalidAuctionParameters("liquidator address is zero"));
        }
        if self.time_to_pivot < MIN_TIME_TO_PIVOT || self.time_to_pivot > MAX_TIME_TO_PIVOT {
            return Err(SetCoreError::InvalidAuctionParameters("time to pivot out of range"));
        }
        if self.price_denominator.is_zero()
            || self.price_denominator > U256::from(MAX_PRICE_DENOMINATOR)
        {
            return Err(SetCoreError::InvalidAuctionParameters("price denominator out of range"));
        }
        if self.pivot_price.is_zero() {
            return Err(SetCoreError::InvalidAuctionParameters("pivot price must be positive"));
        }
        Ok(())
    }
}

/// Timing rules of the rebalance lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct RebalanceSchedule {
    /// Seconds a proposal must wait before its auction can start
    pub proposal_period: u64,
    /// Minimum seconds between the last rebalance and a new proposal
    pub rebalance_interval: u64,
    /// Seconds after the pivot before an unfilled auction may be failed
    pub fail_grace_period: u64,
}

impl RebalanceSchedule {
    /// Check the schedule is usable
    pub fn validate(&self) -> CoreResult<()> {
        if self.proposal_period == 0 {
            return Err(SetCoreError::InvalidParameter("proposal period must be positive"));
        }
        Ok(())
    }
}

impl Default for RebalanceSchedule {
    fn default() -> Self {
        Self {
            proposal_period: DEFAULT_PROPOSAL_PERIOD,
            rebalance_interval: DEFAULT_REBALANCE_INTERVAL,
            fail_grace_period: DEFAULT_FAIL_GRACE_PERIOD,
        }
    }
}

/// Rebalance lifecycle state
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RebalanceState {
    /// No rebalance in progress
    #[default]
    Default = 0,
    /// Next basket proposed, waiting out the proposal period
    Proposal = 1,
    /// Auction open for bids
    Rebalance = 2,
    /// Auction failed with bids outstanding
    Drawdown = 3,
}

impl RebalanceState {
    /// Name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            RebalanceState::Default => "Default",
            RebalanceState::Proposal => "Proposal",
            RebalanceState::Rebalance => "Rebalance",
            RebalanceState::Drawdown => "Drawdown",
        }
    }

    /// Check if state accepts bids
    pub fn allows_bidding(&self) -> bool {
        matches!(self, RebalanceState::Rebalance)
    }

    /// Check if state accepts a new proposal
    pub fn allows_proposal(&self) -> bool {
        matches!(self, RebalanceState::Default | RebalanceState::Drawdown)
    }

    /// Validate state transition
    pub fn can_transition_to(&self, next: RebalanceState) -> bool {
        match (self, next) {
            (RebalanceState::Default, RebalanceState::Proposal) => true,
            (RebalanceState::Proposal, RebalanceState::Rebalance) => true,

            // Settlement, or failure with no bids placed
            (RebalanceState::Rebalance, RebalanceState::Default) => true,
            (RebalanceState::Rebalance, RebalanceState::Drawdown) => true,

            // Drawdown is resolved outside the engine, then re-proposed
            (RebalanceState::Drawdown, RebalanceState::Proposal) => true,

            _ => false,
        }
    }
}

impl std::fmt::Display for RebalanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the auction price curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct AuctionPrice {
    pub numerator: U256,
    pub denominator: U256,
}

/// A request to take part of the auction
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Bid {
    /// Rebalancing token whose auction is bid on
    pub rebalancing_token: Address,
    /// Quantity of current sets requested
    pub quantity: U256,
    /// Fill at most the remaining sets instead of rejecting an oversized bid
    pub allow_partial_fill: bool,
}

/// Per-component token movement of one bid, indexed like the combined array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenFlow {
    /// Tokens the bidder must supply
    pub inflow: Vec<U256>,
    /// Tokens the bidder receives
    pub outflow: Vec<U256>,
}

impl TokenFlow {
    /// Component-wise sum of two flows over the same combined array
    pub fn checked_add(&self, other: &TokenFlow) -> CoreResult<TokenFlow> {
        if self.inflow.len() != other.inflow.len() || self.outflow.len() != other.outflow.len() {
            return Err(SetCoreError::InvalidParameter("token flows differ in length"));
        }
        let sum = |a: &[U256], b: &[U256]| -> CoreResult<Vec<U256>> {
            a.iter().zip(b).map(|(x, y)| add_u256(*x, *y)).collect()
        };
        Ok(TokenFlow {
            inflow: sum(&self.inflow, &other.inflow)?,
            outflow: sum(&self.outflow, &other.outflow)?,
        })
    }

    /// Zero flow of `len` components
    pub fn zero(len: usize) -> Self {
        Self {
            inflow: vec![U256::ZERO; len],
            outflow: vec![U256::ZERO; len],
        }
    }
}

/// Result of an accepted bid
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct BidOutcome {
    /// Quantity actually filled (less than requested only on a partial fill)
    pub filled_quantity: U256,
    /// Price the bid was executed at
    pub price: AuctionPrice,
    /// Token movement of the bid
    pub flow: TokenFlow,
    /// Current sets left after the bid
    pub remaining_current_sets: U256,
}

/// Result of a successful settlement
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Settlement {
    /// Next sets issued from the vault balances
    pub issue_quantity: U256,
    /// Unit shares of the rebalancing token after settlement
    pub unit_shares: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liquidator() -> Address {
        Address::repeat_byte(0x11)
    }

    #[test]
    fn test_parameter_validation() {
        let ok = AuctionParameters::with_default_denominator(
            liquidator(),
            100_000,
            U256::from(500u64),
            U256::from(1000u64),
        );
        assert!(ok.is_ok());

        let zero_pivot_time = AuctionParameters::with_default_denominator(
            liquidator(),
            0,
            U256::from(500u64),
            U256::from(1000u64),
        );
        assert!(matches!(
            zero_pivot_time,
            Err(SetCoreError::InvalidAuctionParameters(_))
        ));

        let zero_denominator = AuctionParameters::new(
            liquidator(),
            100,
            U256::from(1u64),
            U256::from(2u64),
            U256::ZERO,
        );
        assert!(zero_denominator.is_err());

        let no_liquidator = AuctionParameters::with_default_denominator(
            Address::ZERO,
            100,
            U256::from(1u64),
            U256::from(2u64),
        );
        assert!(no_liquidator.is_err());
    }

    #[test]
    fn test_state_transitions() {
        use RebalanceState as S;

        assert!(S::Default.can_transition_to(S::Proposal));
        assert!(S::Proposal.can_transition_to(S::Rebalance));
        assert!(S::Rebalance.can_transition_to(S::Default));
        assert!(S::Rebalance.can_transition_to(S::Drawdown));
        assert!(S::Drawdown.can_transition_to(S::Proposal));

        assert!(!S::Default.can_transition_to(S::Rebalance));
        assert!(!S::Default.can_transition_to(S::Drawdown));
        assert!(!S::Proposal.can_transition_to(S::Default));
        assert!(!S::Proposal.can_transition_to(S::Drawdown));
        assert!(!S::Rebalance.can_transition_to(S::Proposal));
        assert!(!S::Drawdown.can_transition_to(S::Rebalance));

        assert!(S::Rebalance.allows_bidding());
        assert!(!S::Drawdown.allows_bidding());
        assert_eq!(S::default(), S::Default);
    }

    #[test]
    fn test_flow_addition() {
        let a = TokenFlow {
            inflow: vec![U256::from(1u64), U256::ZERO],
            outflow: vec![U256::ZERO, U256::from(2u64)],
        };
        let sum = a.checked_add(&a).unwrap();
        assert_eq!(sum.inflow, vec![U256::from(2u64), U256::ZERO]);
        assert_eq!(sum.outflow, vec![U256::ZERO, U256::from(4u64)]);

        assert!(a.checked_add(&TokenFlow::zero(3)).is_err());
        assert_eq!(TokenFlow::zero(2).checked_add(&a).unwrap(), a);
    }
}
