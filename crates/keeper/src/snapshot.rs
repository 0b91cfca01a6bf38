//! Reader serving the auction snapshots from the keeper configuration

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use setkit_core::AuctionCycle;
use setkit_sdk::{RebalancingTokenReader, SdkError, SdkResult};

use crate::config::AuctionConfig;
use crate::error::KeeperResult;

struct Snapshot {
    cycle: AuctionCycle,
    starting_current_sets: U256,
    total_supply: U256,
}

/// Configured auctions replayed into cycles, timed by the wall clock
pub struct SnapshotReader {
    snapshots: HashMap<Address, Snapshot>,
}

impl SnapshotReader {
    pub fn from_config<'a>(auctions: impl IntoIterator<Item = &'a AuctionConfig>) -> KeeperResult<Self> {
        let mut snapshots = HashMap::new();
        for auction in auctions {
            snapshots.insert(
                auction.rebalancing_token,
                Snapshot {
                    cycle: auction.replay()?,
                    starting_current_sets: auction.starting_current_sets,
                    total_supply: auction.total_supply,
                },
            );
        }
        Ok(Self { snapshots })
    }

    fn snapshot(&self, token: Address) -> SdkResult<&Snapshot> {
        self.snapshots.get(&token).ok_or(SdkError::TokenNotFound(token))
    }
}

/// Current wall-clock time in seconds
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

#[async_trait]
impl RebalancingTokenReader for SnapshotReader {
    async fn auction_cycle(&self, token: Address) -> SdkResult<AuctionCycle> {
        Ok(self.snapshot(token)?.cycle.clone())
    }

    async fn block_timestamp(&self) -> SdkResult<u64> {
        Ok(unix_now())
    }

    async fn current_sets_backing(&self, token: Address) -> SdkResult<U256> {
        Ok(self.snapshot(token)?.starting_current_sets)
    }

    async fn component_balances(&self, _token: Address) -> SdkResult<Vec<U256>> {
        Err(SdkError::InvalidParameters(
            "vault balances are not part of the keeper snapshot".to_string(),
        ))
    }

    async fn total_supply(&self, token: Address) -> SdkResult<U256> {
        Ok(self.snapshot(token)?.total_supply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::example_auction;
    use crate::error::KeeperError;

    #[tokio::test]
    async fn test_serves_replayed_snapshot() {
        let auction = example_auction(1_700_000_000).unwrap();
        let reader = SnapshotReader::from_config([&auction]).unwrap();

        let cycle = reader.auction_cycle(auction.rebalancing_token).await.unwrap();
        assert_eq!(cycle.remaining_current_sets(), Some(auction.remaining_current_sets));
        assert_eq!(
            reader.total_supply(auction.rebalancing_token).await.unwrap(),
            auction.total_supply
        );
        assert!(matches!(
            reader.total_supply(Address::repeat_byte(0x99)).await,
            Err(SdkError::TokenNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_vault_balances_are_not_retried() {
        let auction = example_auction(1_700_000_000).unwrap();
        let reader = SnapshotReader::from_config([&auction]).unwrap();

        let err = reader.component_balances(auction.rebalancing_token).await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidParameters(_)));
        assert!(!KeeperError::Sdk(err).is_retryable());
    }
}
