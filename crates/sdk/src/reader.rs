//! Chain access seam
//!
//! The auction engine is pure; everything it needs from chain is fetched
//! through this trait first. An RPC client implements it in production and
//! [`crate::testing::InMemoryRebalancingToken`] implements it in tests.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use setkit_core::AuctionCycle;

use crate::SdkResult;

/// Read-only view of rebalancing token state
#[async_trait]
pub trait RebalancingTokenReader: Send + Sync {
    /// Lifecycle state of `token`
    async fn auction_cycle(&self, token: Address) -> SdkResult<AuctionCycle>;

    /// Timestamp of the latest block
    async fn block_timestamp(&self) -> SdkResult<u64>;

    /// Current sets held for `token`
    async fn current_sets_backing(&self, token: Address) -> SdkResult<U256>;

    /// Vault balances of `token`, indexed like its combined token array
    async fn component_balances(&self, token: Address) -> SdkResult<Vec<U256>>;

    /// Total supply of `token`
    async fn total_supply(&self, token: Address) -> SdkResult<U256>;
}
