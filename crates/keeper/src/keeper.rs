use std::collections::HashSet;
use std::fs::OpenOptions;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use setkit_sdk::{AuctionQuote, RebalancingAuctionApi};

use crate::config::{AuctionConfig, KeeperConfig, RetryConfig};
use crate::error::{KeeperError, KeeperResult};
use crate::snapshot::{unix_now, SnapshotReader};

/// Where an auction stands at one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStatus {
    /// Auction start time is still ahead
    NotStarted,
    /// Open, price below the alert price
    Open,
    /// Open, price at or above the alert price
    AlertPriceReached,
    /// Drained; waiting for settlement
    ReadyToSettle,
    /// Fail deadline passed with sets outstanding
    PastFailDeadline,
}

/// Result of polling one auction
#[derive(Debug, Clone)]
pub struct AuctionReport {
    pub name: String,
    pub rebalancing_token: Address,
    pub status: AuctionStatus,
    pub quote: Option<AuctionQuote>,
}

/// Off-chain watcher quoting configured rebalancing auctions
pub struct Keeper {
    /// Auction API over the configured snapshots
    api: RebalancingAuctionApi<SnapshotReader>,

    /// Keeper configuration
    config: KeeperConfig,

    /// Tokens whose alert price has been reported
    alerted: HashSet<Address>,

    /// Dry run mode flag
    dry_run: bool,
}

impl Keeper {
    /// Create a new keeper instance
    pub fn new(config: KeeperConfig, dry_run: bool) -> KeeperResult<Self> {
        config.validate()?;
        let reader = SnapshotReader::from_config(config.enabled_auctions())?;
        let api = RebalancingAuctionApi::new(Arc::new(reader), config.sdk_config()?)?;

        Ok(Self {
            api,
            config,
            alerted: HashSet::new(),
            dry_run,
        })
    }

    /// Poll every enabled auction at the current time, returning the number of new alerts
    pub async fn poll_all_auctions(&mut self) -> KeeperResult<usize> {
        let reports = self.poll_at(unix_now()).await?;
        Ok(reports
            .iter()
            .filter(|r| r.status == AuctionStatus::AlertPriceReached)
            .count())
    }

    /// Poll every enabled auction as of `now`
    pub async fn poll_at(&mut self, now: u64) -> KeeperResult<Vec<AuctionReport>> {
        let auctions: Vec<AuctionConfig> =
            self.config.enabled_auctions().into_iter().cloned().collect();
        let mut reports = Vec::with_capacity(auctions.len());

        for auction in &auctions {
            match self.quote_auction(auction, now).await {
                Ok(report) => {
                    self.record(&report)?;
                    reports.push(report);
                }
                Err(e) => {
                    log::error!("Failed to poll auction {}: {}", auction.name, e);
                    // Continue with other auctions
                }
            }
        }

        Ok(reports)
    }

    /// Check that every watched auction is readable
    pub async fn health_check(&self) -> KeeperResult<()> {
        for auction in self.config.enabled_auctions() {
            let cycle = self.api.auction_cycle(auction.rebalancing_token).await?;
            log::debug!("Health check passed for {}: state {}", auction.name, cycle.state);
        }
        Ok(())
    }

    async fn quote_auction(&self, auction: &AuctionConfig, now: u64) -> KeeperResult<AuctionReport> {
        let token = auction.rebalancing_token;
        let api = &self.api;
        let cycle = with_retry(&self.config.retry, move || async move {
            Ok(api.auction_cycle(token).await?)
        })
        .await?;

        let progress = cycle.auction.as_ref().ok_or_else(|| {
            KeeperError::InvalidConfig(format!("{}: auction has not started", auction.name))
        })?;

        let (status, quote) = if cycle.is_auction_complete() {
            (AuctionStatus::ReadyToSettle, None)
        } else if now < progress.auction_start_time {
            (AuctionStatus::NotStarted, None)
        } else if now >= progress.fail_deadline {
            (AuctionStatus::PastFailDeadline, None)
        } else {
            let quote = self.api.quote_at(token, auction.bid_quantity, now).await?;
            let reached = if auction.parameters.is_ascending() {
                quote.price.numerator >= auction.alert_price
            } else {
                quote.price.numerator <= auction.alert_price
            };
            let status = if reached {
                AuctionStatus::AlertPriceReached
            } else {
                AuctionStatus::Open
            };
            (status, Some(quote))
        };

        Ok(AuctionReport {
            name: auction.name.clone(),
            rebalancing_token: token,
            status,
            quote,
        })
    }

    fn record(&mut self, report: &AuctionReport) -> KeeperResult<()> {
        match (report.status, &report.quote) {
            (AuctionStatus::AlertPriceReached, Some(quote)) => {
                if !self.alerted.insert(report.rebalancing_token) {
                    return Ok(());
                }
                log::info!(
                    "{}: price {}/{} reached the alert price, {} sets remaining",
                    report.name,
                    quote.price.numerator,
                    quote.price.denominator,
                    quote.remaining_current_sets
                );
                if self.dry_run {
                    log::info!("DRY RUN: Would write bid quote for {}", report.name);
                } else {
                    self.write_quote(quote)?;
                }
            }
            (AuctionStatus::Open, Some(quote)) => {
                self.alerted.remove(&report.rebalancing_token);
                log::debug!(
                    "{}: price {}/{}",
                    report.name,
                    quote.price.numerator,
                    quote.price.denominator
                );
            }
            (AuctionStatus::ReadyToSettle, _) => {
                log::info!("{}: auction drained, ready to settle", report.name);
            }
            (AuctionStatus::PastFailDeadline, _) => {
                log::warn!("{}: fail deadline passed, auction can be ended", report.name);
            }
            _ => {
                log::debug!("{}: {:?}", report.name, report.status);
            }
        }
        Ok(())
    }

    fn write_quote(&self, quote: &AuctionQuote) -> KeeperResult<()> {
        let Some(path) = &self.config.quote_output else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", quote.to_json()?)?;
        Ok(())
    }
}

/// Run `op`, retrying transient failures with exponential backoff
async fn with_retry<T, F, Fut>(retry: &RetryConfig, mut op: F) -> KeeperResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = KeeperResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                let delay = retry.delay_for_attempt(attempt);
                log::warn!("Attempt {} failed: {}, retrying in {}ms", attempt + 1, e, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
