//! High-level auction API
//!
//! Reads a rebalancing token through a [`RebalancingTokenReader`] and runs
//! the auction engine over the result, so callers can price and check a bid
//! before anything is submitted.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use serde::Serialize;
use setkit_core::{AuctionCycle, AuctionPrice, Bid, BidOutcome, RebalanceState, Settlement};

use crate::assertions;
use crate::config::SdkConfig;
use crate::reader::RebalancingTokenReader;
use crate::{SdkError, SdkResult};

/// Snapshot of an auction as seen at one timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionQuote {
    pub rebalancing_token: Address,
    pub timestamp: u64,
    pub state: RebalanceState,
    pub price: AuctionPrice,
    pub minimum_bid: U256,
    pub remaining_current_sets: U256,
    pub fail_deadline: u64,
    /// Flows of the requested bid, absent when it would be rejected
    pub outcome: Option<BidOutcome>,
}

impl AuctionQuote {
    pub fn to_json(&self) -> SdkResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Validated access to rebalancing auctions
pub struct RebalancingAuctionApi<R: RebalancingTokenReader> {
    reader: Arc<R>,
    config: SdkConfig,
}

impl<R: RebalancingTokenReader> RebalancingAuctionApi<R> {
    pub fn new(reader: Arc<R>, config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;
        Ok(Self { reader, config })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub async fn auction_cycle(&self, token: Address) -> SdkResult<AuctionCycle> {
        self.read(self.reader.auction_cycle(token)).await
    }

    /// Price of the auction at the latest block
    pub async fn current_price(&self, token: Address) -> SdkResult<AuctionPrice> {
        let (cycle, now) = self.cycle_and_time(token).await?;
        Ok(cycle.current_price(now)?)
    }

    pub async fn minimum_bid(&self, token: Address) -> SdkResult<U256> {
        let cycle = self.auction_cycle(token).await?;
        assertions::assert_auction_open(&cycle)?;
        cycle
            .minimum_bid()
            .ok_or_else(|| SdkError::assertion("auction has no minimum bid"))
    }

    pub async fn remaining_current_sets(&self, token: Address) -> SdkResult<U256> {
        let cycle = self.auction_cycle(token).await?;
        assertions::assert_auction_open(&cycle)?;
        cycle
            .remaining_current_sets()
            .ok_or_else(|| SdkError::assertion("auction has no remaining current sets"))
    }

    /// Price and flows a bid of `quantity` would get at the latest block
    pub async fn bid_price(&self, token: Address, quantity: U256) -> SdkResult<BidOutcome> {
        let (cycle, now) = self.cycle_and_time(token).await?;
        Self::check_bid(&cycle, quantity, false, now)?;
        Ok(cycle.bid_price(quantity, now)?)
    }

    /// Run every bid precondition with user-facing messages
    pub async fn assert_can_bid(&self, bid: &Bid) -> SdkResult<()> {
        let (cycle, now) = self.cycle_and_time(bid.rebalancing_token).await?;
        Self::check_bid(&cycle, bid.quantity, bid.allow_partial_fill, now)
    }

    /// Outcome of `bid` if it were mined in the latest block
    pub async fn simulate_bid(&self, bid: &Bid) -> SdkResult<BidOutcome> {
        let (cycle, now) = self.cycle_and_time(bid.rebalancing_token).await?;
        Self::check_bid(&cycle, bid.quantity, bid.allow_partial_fill, now)?;
        let (_, outcome) = cycle.place_bid(bid, now)?;
        log::debug!(
            "Simulated bid of {} on {}: filled {} at {}/{}",
            bid.quantity,
            bid.rebalancing_token,
            outcome.filled_quantity,
            outcome.price.numerator,
            outcome.price.denominator
        );
        Ok(outcome)
    }

    /// Settlement a drained auction would produce from the current vault
    pub async fn simulate_settlement(&self, token: Address) -> SdkResult<Settlement> {
        let (cycle, now) = self.cycle_and_time(token).await?;
        assertions::assert_can_settle(&cycle)?;
        let balances = self.read(self.reader.component_balances(token)).await?;
        let total_supply = self.read(self.reader.total_supply(token)).await?;
        let (_, settlement) = cycle.settle_rebalance(&balances, total_supply, now)?;
        Ok(settlement)
    }

    /// Quote the auction at `timestamp` for a bid of `quantity`
    pub async fn quote_at(
        &self,
        token: Address,
        quantity: U256,
        timestamp: u64,
    ) -> SdkResult<AuctionQuote> {
        let cycle = self.auction_cycle(token).await?;
        assertions::assert_auction_open(&cycle)?;

        let (minimum_bid, remaining_current_sets, fail_deadline) = match &cycle.auction {
            Some(auction) => (
                auction.minimum_bid,
                auction.remaining_current_sets,
                auction.fail_deadline,
            ),
            None => return Err(SdkError::assertion("auction has not started")),
        };

        let outcome = match cycle.bid_price(quantity, timestamp) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                log::debug!("Bid of {} on {} not quotable: {}", quantity, token, err);
                None
            }
        };

        Ok(AuctionQuote {
            rebalancing_token: token,
            timestamp,
            state: cycle.state,
            price: cycle.current_price(timestamp)?,
            minimum_bid,
            remaining_current_sets,
            fail_deadline,
            outcome,
        })
    }

    fn check_bid(
        cycle: &AuctionCycle,
        quantity: U256,
        allow_partial_fill: bool,
        now: u64,
    ) -> SdkResult<()> {
        assertions::assert_auction_open(cycle)?;
        assertions::assert_auction_started(cycle, now)?;
        assertions::assert_not_stale(cycle, now)?;
        assertions::assert_auction_not_complete(cycle)?;
        if let (Some(minimum_bid), Some(remaining)) =
            (cycle.minimum_bid(), cycle.remaining_current_sets())
        {
            assertions::assert_bid_quantity(quantity, minimum_bid)?;
            assertions::assert_within_remaining(quantity, remaining, allow_partial_fill)?;
        }
        Ok(())
    }

    async fn cycle_and_time(&self, token: Address) -> SdkResult<(AuctionCycle, u64)> {
        let cycle = self.auction_cycle(token).await?;
        let now = self.read(self.reader.block_timestamp()).await?;
        Ok((cycle, now))
    }

    async fn read<T>(&self, request: impl Future<Output = SdkResult<T>>) -> SdkResult<T> {
        tokio::time::timeout(self.config.request_timeout(), request)
            .await
            .map_err(|_| SdkError::Timeout(self.config.timeout))?
    }
}
