//! Testing utilities for SetKit rebalancing auctions
//!
//! [`InMemoryRebalancingToken`] plays the part of the deployed contracts: it
//! owns each token's cycle, vault and supply, applies every transition
//! through the auction engine and serves the results through
//! [`RebalancingTokenReader`].

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use setkit_core::math::{add_u256, mul_div, sub_u256, Rounding};
use setkit_core::{AuctionCycle, AuctionParameters, Basket, Bid, BidOutcome, Settlement};
use tokio::sync::RwLock;

use crate::reader::RebalancingTokenReader;
use crate::{SdkError, SdkResult};

/// On-chain state of one simulated rebalancing token
#[derive(Debug, Clone)]
pub struct SimulatedToken {
    pub cycle: AuctionCycle,
    /// Current sets held for the token outside an auction
    pub current_sets_backing: U256,
    /// Component balances during and after an auction, combined-array indexed
    pub vault: Vec<U256>,
    pub total_supply: U256,
}

#[derive(Debug, Default)]
struct Chain {
    now: u64,
    tokens: HashMap<Address, SimulatedToken>,
}

/// Single-process stand-in for the rebalancing token contracts
#[derive(Debug, Default)]
pub struct InMemoryRebalancingToken {
    chain: RwLock<Chain>,
}

impl InMemoryRebalancingToken {
    /// Create an empty chain at timestamp `now`
    pub fn new(now: u64) -> Self {
        Self {
            chain: RwLock::new(Chain {
                now,
                tokens: HashMap::new(),
            }),
        }
    }

    /// Register a token backed by `current_sets_backing` current sets
    pub async fn deploy(&self, cycle: AuctionCycle, current_sets_backing: U256, total_supply: U256) {
        let mut chain = self.chain.write().await;
        chain.tokens.insert(
            cycle.rebalancing_token,
            SimulatedToken {
                cycle,
                current_sets_backing,
                vault: Vec::new(),
                total_supply,
            },
        );
    }

    /// Move the clock forward
    pub async fn advance_time(&self, seconds: u64) {
        let mut chain = self.chain.write().await;
        chain.now = chain.now.saturating_add(seconds);
    }

    pub async fn now(&self) -> u64 {
        self.chain.read().await.now
    }

    /// Snapshot of a token's simulated state
    pub async fn token(&self, token: Address) -> SdkResult<SimulatedToken> {
        let chain = self.chain.read().await;
        chain.tokens.get(&token).cloned().ok_or(SdkError::TokenNotFound(token))
    }

    pub async fn propose(
        &self,
        token: Address,
        caller: Address,
        next_basket: Basket,
        parameters: AuctionParameters,
    ) -> SdkResult<()> {
        self.apply(token, |now, state| {
            state.cycle = state.cycle.propose(caller, next_basket, parameters, now)?;
            Ok(())
        })
        .await
    }

    /// Start the auction, redeeming the backing current sets into the vault
    pub async fn start_rebalance(&self, token: Address) -> SdkResult<()> {
        self.apply(token, |now, state| {
            let cycle = state.cycle.start_rebalance(state.current_sets_backing, now)?;
            let combined = cycle
                .combined_token_array()
                .ok_or(SdkError::InvalidParameters("auction did not start".to_string()))?;
            state.vault = combined
                .current_units
                .iter()
                .map(|units| {
                    mul_div(
                        *units,
                        state.current_sets_backing,
                        combined.natural_unit,
                        Rounding::Down,
                    )
                })
                .collect::<Result<_, _>>()?;
            state.current_sets_backing = U256::ZERO;
            state.cycle = cycle;
            Ok(())
        })
        .await
    }

    /// Place a bid, moving its flows through the vault
    pub async fn bid(&self, bid: &Bid) -> SdkResult<BidOutcome> {
        self.apply(bid.rebalancing_token, |now, state| {
            let (cycle, outcome) = state.cycle.place_bid(bid, now)?;
            for (i, balance) in state.vault.iter_mut().enumerate() {
                let credited = add_u256(*balance, outcome.flow.inflow[i])?;
                *balance = sub_u256(credited, outcome.flow.outflow[i])?;
            }
            state.cycle = cycle;
            Ok(outcome)
        })
        .await
    }

    /// Settle a drained auction, issuing next sets from the vault
    pub async fn settle(&self, token: Address) -> SdkResult<Settlement> {
        self.apply(token, |now, state| {
            let (cycle, settlement) =
                state
                    .cycle
                    .settle_rebalance(&state.vault, state.total_supply, now)?;
            state.current_sets_backing = settlement.issue_quantity;
            state.vault.clear();
            state.cycle = cycle;
            Ok(settlement)
        })
        .await
    }

    pub async fn end_failed_auction(&self, token: Address) -> SdkResult<()> {
        self.apply(token, |now, state| {
            let cycle = state.cycle.end_failed_auction(now)?;
            if cycle.auction.is_none() {
                // No bid moved anything; the vault goes back to current sets
                state.current_sets_backing = state
                    .cycle
                    .remaining_current_sets()
                    .unwrap_or_default();
                state.vault.clear();
            }
            state.cycle = cycle;
            Ok(())
        })
        .await
    }

    /// Burn `holder_balance` tokens for a pro-rata share of the drawdown vault
    pub async fn withdraw_drawdown(&self, token: Address, holder_balance: U256) -> SdkResult<Vec<U256>> {
        self.apply(token, |_, state| {
            let share =
                state
                    .cycle
                    .drawdown_withdrawal(&state.vault, holder_balance, state.total_supply)?;
            for (balance, taken) in state.vault.iter_mut().zip(&share) {
                *balance = sub_u256(*balance, *taken)?;
            }
            state.total_supply = sub_u256(state.total_supply, holder_balance)?;
            Ok(share)
        })
        .await
    }

    /// Run `f` against a copy of the token's state and commit it on success
    async fn apply<T>(
        &self,
        token: Address,
        f: impl FnOnce(u64, &mut SimulatedToken) -> SdkResult<T>,
    ) -> SdkResult<T> {
        let mut chain = self.chain.write().await;
        let now = chain.now;
        let state = chain.tokens.get_mut(&token).ok_or(SdkError::TokenNotFound(token))?;

        let mut next = state.clone();
        let result = f(now, &mut next)?;
        if next.cycle.state != state.cycle.state {
            log::debug!(
                "{}: {} -> {} at {}",
                token,
                state.cycle.state,
                next.cycle.state,
                now
            );
        }
        *state = next;
        Ok(result)
    }
}

#[async_trait]
impl RebalancingTokenReader for InMemoryRebalancingToken {
    async fn auction_cycle(&self, token: Address) -> SdkResult<AuctionCycle> {
        Ok(self.token(token).await?.cycle)
    }

    async fn block_timestamp(&self) -> SdkResult<u64> {
        Ok(self.now().await)
    }

    async fn current_sets_backing(&self, token: Address) -> SdkResult<U256> {
        Ok(self.token(token).await?.current_sets_backing)
    }

    async fn component_balances(&self, token: Address) -> SdkResult<Vec<U256>> {
        Ok(self.token(token).await?.vault)
    }

    async fn total_supply(&self, token: Address) -> SdkResult<U256> {
        Ok(self.token(token).await?.total_supply)
    }
}
