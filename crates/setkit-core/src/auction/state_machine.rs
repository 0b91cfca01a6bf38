//! # Rebalance State Machine
//!
//! `AuctionCycle` holds everything one rebalancing token needs to gate its
//! auction: the current basket, the pending proposal and the live auction.
//! It is a plain value. Every transition borrows the cycle and returns the
//! next one, leaving the input untouched when it fails.
//!
//! ```text
//! Default --propose--> Proposal --start_rebalance--> Rebalance
//!    ^                     ^                            |
//!    |                     |            settle / fail (no bids)
//!    |                     +-- propose -- Drawdown <-- fail (bids placed)
//!    +------------------------------------------+
//! ```

use alloy_primitives::{Address, U256};

use crate::auction::combined_units;
use crate::auction::minimum_bid::minimum_bid;
use crate::auction::settlement;
use crate::errors::{CoreResult, SetCoreError};
use crate::math::safe_math::{add_u64, sub_u64};
use crate::types::{
    AuctionParameters, AuctionPrice, Basket, CombinedTokenArray, RebalanceSchedule,
    RebalanceState, Settlement,
};

/// A proposed rebalance waiting for its auction to start
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Proposal {
    /// Basket the rebalancing token moves into
    pub next_basket: Basket,
    /// Price curve of the auction
    pub parameters: AuctionParameters,
    /// Timestamp the proposal was made
    pub proposal_start_time: u64,
}

/// Progress of a started auction
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct AuctionProgress {
    /// Index basis of every bid flow
    pub combined: CombinedTokenArray,
    /// Bid granularity
    pub minimum_bid: U256,
    /// Current sets backing the token when the auction started
    pub starting_current_sets: U256,
    /// Current sets still to be bid on
    pub remaining_current_sets: U256,
    /// Timestamp the auction started
    pub auction_start_time: u64,
    /// Timestamp from which the auction may be failed
    pub fail_deadline: u64,
}

impl AuctionProgress {
    /// Whether no bid was ever accepted
    pub fn has_no_bids(&self) -> bool {
        self.remaining_current_sets == self.starting_current_sets
    }

    /// Whether no further bid can be placed
    pub fn is_complete(&self) -> bool {
        self.remaining_current_sets < self.minimum_bid
    }
}

/// Rebalance state of one rebalancing token
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct AuctionCycle {
    /// Rebalancing token address
    pub rebalancing_token: Address,
    /// Only address allowed to propose
    pub manager: Address,
    /// Natural unit of the rebalancing token
    pub natural_unit: U256,
    /// Current basket units backing one natural unit of the rebalancing token
    pub unit_shares: U256,
    /// Basket currently backing the token
    pub current_basket: Basket,
    /// Lifecycle timing
    pub schedule: RebalanceSchedule,
    /// Timestamp of the last settled or abandoned rebalance
    pub last_rebalance_timestamp: u64,
    /// Lifecycle state
    pub state: RebalanceState,
    /// Pending proposal (Proposal and Rebalance states)
    pub proposal: Option<Proposal>,
    /// Auction progress (Rebalance and Drawdown states)
    pub auction: Option<AuctionProgress>,
}

impl AuctionCycle {
    /// Create a cycle in the Default state
    pub fn new(
        rebalancing_token: Address,
        manager: Address,
        natural_unit: U256,
        unit_shares: U256,
        current_basket: Basket,
        schedule: RebalanceSchedule,
        last_rebalance_timestamp: u64,
    ) -> CoreResult<Self> {
        if natural_unit.is_zero() {
            return Err(SetCoreError::InvalidParameter("natural unit must be positive"));
        }
        if unit_shares.is_zero() {
            return Err(SetCoreError::InvalidParameter("unit shares must be positive"));
        }
        current_basket.validate()?;
        schedule.validate()?;

        Ok(Self {
            rebalancing_token,
            manager,
            natural_unit,
            unit_shares,
            current_basket,
            schedule,
            last_rebalance_timestamp,
            state: RebalanceState::Default,
            proposal: None,
            auction: None,
        })
    }

    /// Propose a rebalance into `next_basket` (Default or Drawdown → Proposal)
    pub fn propose(
        &self,
        caller: Address,
        next_basket: Basket,
        parameters: AuctionParameters,
        now: u64,
    ) -> CoreResult<Self> {
        if !self.state.allows_proposal() {
            return Err(self.state_error("propose", "Default or Drawdown"));
        }
        if caller != self.manager {
            return Err(SetCoreError::Unauthorized);
        }

        let allowed_at = add_u64(self.last_rebalance_timestamp, self.schedule.rebalance_interval)?;
        if now < allowed_at {
            return Err(SetCoreError::RebalanceIntervalNotElapsed { allowed_at });
        }

        next_basket.validate()?;
        parameters.validate()?;

        let mut next = self.transition(RebalanceState::Proposal, "propose")?;
        next.proposal = Some(Proposal {
            next_basket,
            parameters,
            proposal_start_time: now,
        });
        next.auction = None;
        Ok(next)
    }

    /// Open the auction once the proposal period is over (Proposal → Rebalance).
    ///
    /// `current_sets_backing` is the quantity of current sets held for the
    /// token, read from chain by the caller.
    pub fn start_rebalance(&self, current_sets_backing: U256, now: u64) -> CoreResult<Self> {
        let proposal = match (&self.state, &self.proposal) {
            (RebalanceState::Proposal, Some(proposal)) => proposal,
            _ => return Err(self.state_error("startRebalance", "Proposal")),
        };

        let allowed_at = add_u64(proposal.proposal_start_time, self.schedule.proposal_period)?;
        if now < allowed_at {
            return Err(SetCoreError::ProposalPeriodNotElapsed { allowed_at });
        }

        let combined = combined_units::build(&self.current_basket, &proposal.next_basket)?;
        let minimum_bid = minimum_bid(
            self.current_basket.natural_unit,
            proposal.next_basket.natural_unit,
            proposal.parameters.price_denominator,
        )?;
        if current_sets_backing < minimum_bid {
            return Err(SetCoreError::InsufficientCurrentSets {
                available: current_sets_backing,
                minimum_bid,
            });
        }

        let fail_deadline = add_u64(
            add_u64(now, proposal.parameters.time_to_pivot)?,
            self.schedule.fail_grace_period,
        )?;

        let mut next = self.transition(RebalanceState::Rebalance, "startRebalance")?;
        next.auction = Some(AuctionProgress {
            combined,
            minimum_bid,
            starting_current_sets: current_sets_backing,
            remaining_current_sets: current_sets_backing,
            auction_start_time: now,
            fail_deadline,
        });
        Ok(next)
    }

    /// Settle a fully bid auction (Rebalance → Default).
    ///
    /// `component_balances` are the vault balances of the token, indexed like
    /// the combined token array; `total_supply` is the rebalancing token supply.
    pub fn settle_rebalance(
        &self,
        component_balances: &[U256],
        total_supply: U256,
        now: u64,
    ) -> CoreResult<(Self, Settlement)> {
        let (proposal, auction) = self.live_auction("settleRebalance")?;
        if !auction.is_complete() {
            return Err(SetCoreError::AuctionNotComplete {
                remaining: auction.remaining_current_sets,
            });
        }

        let issue_quantity = settlement::next_set_issue_quantity(
            &auction.combined,
            proposal.next_basket.natural_unit,
            component_balances,
        )?;
        let unit_shares =
            settlement::unit_shares_for(issue_quantity, self.natural_unit, total_supply)?;

        let mut next = self.transition(RebalanceState::Default, "settleRebalance")?;
        next.current_basket = proposal.next_basket.clone();
        next.unit_shares = unit_shares;
        next.last_rebalance_timestamp = now;
        next.proposal = None;
        next.auction = None;

        Ok((
            next,
            Settlement {
                issue_quantity,
                unit_shares,
            },
        ))
    }

    /// Abandon an auction past its fail deadline.
    ///
    /// With no bid ever placed the token returns to Default untouched;
    /// otherwise it enters Drawdown and keeps the auction progress so holders
    /// can withdraw their share of the vault.
    pub fn end_failed_auction(&self, now: u64) -> CoreResult<Self> {
        let (_, auction) = self.live_auction("endFailedAuction")?;
        if now < auction.fail_deadline {
            return Err(SetCoreError::FailDeadlineNotReached {
                deadline: auction.fail_deadline,
            });
        }
        if auction.is_complete() {
            return Err(SetCoreError::AuctionComplete {
                remaining: auction.remaining_current_sets,
            });
        }

        let mut next = if auction.has_no_bids() {
            let mut next = self.transition(RebalanceState::Default, "endFailedAuction")?;
            next.auction = None;
            next
        } else {
            self.transition(RebalanceState::Drawdown, "endFailedAuction")?
        };
        next.proposal = None;
        next.last_rebalance_timestamp = now;
        Ok(next)
    }

    /// A holder's share of each vault balance while in Drawdown
    pub fn drawdown_withdrawal(
        &self,
        component_balances: &[U256],
        holder_balance: U256,
        total_supply: U256,
    ) -> CoreResult<Vec<U256>> {
        let auction = match (&self.state, &self.auction) {
            (RebalanceState::Drawdown, Some(auction)) => auction,
            _ => return Err(self.state_error("withdrawDrawdown", "Drawdown")),
        };
        if component_balances.len() != auction.combined.len() {
            return Err(SetCoreError::InvalidParameter(
                "balances do not match the combined token array",
            ));
        }
        settlement::drawdown_withdrawal(component_balances, holder_balance, total_supply)
    }

    /// Restore bid progress read back from chain into a replayed auction
    pub fn restore_remaining_current_sets(&self, remaining: U256) -> CoreResult<Self> {
        let (_, auction) = self.live_auction("restoreRemainingCurrentSets")?;
        if remaining > auction.starting_current_sets {
            return Err(SetCoreError::InvalidParameter(
                "remaining current sets exceed the starting amount",
            ));
        }
        let mut next = self.clone();
        if let Some(auction) = next.auction.as_mut() {
            auction.remaining_current_sets = remaining;
        }
        Ok(next)
    }

    /// Price of the live auction at `now`
    pub fn current_price(&self, now: u64) -> CoreResult<AuctionPrice> {
        let (proposal, auction) = self.live_auction("getCurrentPrice")?;
        let elapsed = self.elapsed_since_start(auction, now)?;
        proposal.parameters.price_at(elapsed)
    }

    /// Fail deadline of the live auction
    pub fn auction_fail_deadline(&self) -> Option<u64> {
        self.auction.as_ref().map(|auction| auction.fail_deadline)
    }

    /// Current sets left to bid on
    pub fn remaining_current_sets(&self) -> Option<U256> {
        self.auction.as_ref().map(|auction| auction.remaining_current_sets)
    }

    /// Minimum bid of the live auction
    pub fn minimum_bid(&self) -> Option<U256> {
        self.auction.as_ref().map(|auction| auction.minimum_bid)
    }

    /// Combined token array of the live auction
    pub fn combined_token_array(&self) -> Option<&CombinedTokenArray> {
        self.auction.as_ref().map(|auction| &auction.combined)
    }

    /// Whether the live auction can be settled
    pub fn is_auction_complete(&self) -> bool {
        self.state == RebalanceState::Rebalance
            && self.auction.as_ref().is_some_and(AuctionProgress::is_complete)
    }

    // ------------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------------

    /// Proposal and auction of a cycle in the Rebalance state
    pub(crate) fn live_auction(
        &self,
        operation: &'static str,
    ) -> CoreResult<(&Proposal, &AuctionProgress)> {
        match (&self.state, &self.proposal, &self.auction) {
            (RebalanceState::Rebalance, Some(proposal), Some(auction)) => Ok((proposal, auction)),
            _ => Err(self.state_error(operation, "Rebalance")),
        }
    }

    pub(crate) fn elapsed_since_start(&self, auction: &AuctionProgress, now: u64) -> CoreResult<u64> {
        sub_u64(now, auction.auction_start_time)
            .map_err(|_| SetCoreError::InvalidParameter("timestamp precedes auction start"))
    }

    pub(crate) fn state_error(&self, operation: &'static str, expected: &'static str) -> SetCoreError {
        SetCoreError::invalid_state(operation, expected, self.state.as_str())
    }

    fn transition(&self, to: RebalanceState, operation: &'static str) -> CoreResult<Self> {
        if !self.state.can_transition_to(to) {
            return Err(self.state_error(operation, to.as_str()));
        }
        let mut next = self.clone();
        next.state = to;
        Ok(next)
    }
}
