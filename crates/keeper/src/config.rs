use std::fs;

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use setkit_core::{AuctionCycle, AuctionParameters, Basket, RebalanceSchedule};
use setkit_sdk::SdkConfig;

use crate::error::{KeeperError, KeeperResult};

/// Keeper configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeeperConfig {
    /// Network preset ("mainnet" or "localnet")
    pub network: String,

    /// RPC endpoint overriding the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Default poll interval in seconds
    pub default_poll_interval: u64,

    /// Reader request timeout in seconds
    pub request_timeout: u64,

    /// File receiving bid quotes once an alert price is reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_output: Option<String>,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Auctions to watch
    pub auctions: Vec<AuctionConfig>,
}

/// Snapshot of one running auction and what to watch for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuctionConfig {
    /// Auction name for logging
    pub name: String,

    /// Whether this auction is watched
    pub enabled: bool,

    pub rebalancing_token: Address,
    pub manager: Address,
    pub natural_unit: U256,
    pub unit_shares: U256,

    /// Timestamp the auction started
    pub auction_start_time: u64,

    /// Current sets backing the token when the auction started
    pub starting_current_sets: U256,

    /// Current sets still to be bid on
    pub remaining_current_sets: U256,

    pub total_supply: U256,

    /// Bid size to quote
    pub bid_quantity: U256,

    /// Price numerator at which the quote is reported, crossed upward on an
    /// ascending curve and downward on a descending one
    pub alert_price: U256,

    pub schedule: RebalanceSchedule,
    pub current_basket: Basket,
    pub next_basket: Basket,
    pub parameters: AuctionParameters,
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Maximum number of retries for failed operations
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    pub base_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,

    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,
}

impl KeeperConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> KeeperResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| KeeperError::Io(format!("Failed to read config file {}: {}", path, e)))?;

        let config: KeeperConfig = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> KeeperResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| KeeperError::Io(format!("Failed to write config file {}: {}", path, e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> KeeperResult<()> {
        if self.auctions.is_empty() {
            return Err(KeeperError::InvalidConfig("at least one auction is required".to_string()));
        }

        if self.default_poll_interval == 0 {
            return Err(KeeperError::InvalidConfig(
                "default_poll_interval must be greater than 0".to_string(),
            ));
        }

        self.sdk_config()?.validate()?;

        for auction in &self.auctions {
            auction.validate()?;
        }

        self.retry.validate()?;

        Ok(())
    }

    /// SDK settings for the configured network
    pub fn sdk_config(&self) -> KeeperResult<SdkConfig> {
        let preset = match self.network.as_str() {
            "mainnet" => SdkConfig::mainnet(),
            "localnet" => SdkConfig::localnet(),
            other => {
                return Err(KeeperError::InvalidConfig(format!("unknown network: {}", other)))
            }
        };
        let config = preset.with_timeout(self.request_timeout);
        Ok(match &self.rpc_url {
            Some(url) => config.with_rpc_url(url.clone()),
            None => config,
        })
    }

    /// Enabled auctions in configuration order
    pub fn enabled_auctions(&self) -> Vec<&AuctionConfig> {
        self.auctions.iter().filter(|a| a.enabled).collect()
    }
}

impl AuctionConfig {
    /// Validate auction configuration
    fn validate(&self) -> KeeperResult<()> {
        if self.name.is_empty() {
            return Err(KeeperError::InvalidConfig("auction name cannot be empty".to_string()));
        }

        if self.remaining_current_sets > self.starting_current_sets {
            return Err(KeeperError::InvalidConfig(format!(
                "{}: remaining_current_sets exceeds starting_current_sets",
                self.name
            )));
        }

        if self.bid_quantity.is_zero() {
            return Err(KeeperError::InvalidConfig(format!(
                "{}: bid_quantity must be greater than 0",
                self.name
            )));
        }

        // Replaying checks baskets, parameters and schedule
        self.replay()?;
        Ok(())
    }

    /// Rebuild the auction cycle by running the lifecycle up to the snapshot
    pub fn replay(&self) -> KeeperResult<AuctionCycle> {
        let proposed_at = self
            .auction_start_time
            .checked_sub(self.schedule.proposal_period)
            .ok_or_else(|| {
                KeeperError::InvalidConfig(format!(
                    "{}: auction_start_time precedes the proposal period",
                    self.name
                ))
            })?;

        let cycle = AuctionCycle::new(
            self.rebalancing_token,
            self.manager,
            self.natural_unit,
            self.unit_shares,
            self.current_basket.clone(),
            self.schedule,
            proposed_at.saturating_sub(self.schedule.rebalance_interval),
        )?
        .propose(
            self.manager,
            self.next_basket.clone(),
            self.parameters.clone(),
            proposed_at,
        )?
        .start_rebalance(self.starting_current_sets, self.auction_start_time)?
        .restore_remaining_current_sets(self.remaining_current_sets)?;

        Ok(cycle)
    }
}

impl RetryConfig {
    /// Validate retry configuration
    fn validate(&self) -> KeeperResult<()> {
        if self.base_delay_ms == 0 {
            return Err(KeeperError::InvalidConfig("base_delay_ms must be greater than 0".to_string()));
        }

        if self.max_delay_ms < self.base_delay_ms {
            return Err(KeeperError::InvalidConfig(format!(
                "max_delay_ms must be at least base_delay_ms ({})",
                self.base_delay_ms
            )));
        }

        if self.backoff_multiplier <= 1.0 {
            return Err(KeeperError::InvalidConfig(
                "backoff_multiplier must be greater than 1.0".to_string(),
            ));
        }

        Ok(())
    }

    /// Calculate delay for retry attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        if attempt == 0 {
            return self.base_delay_ms;
        }

        let exponential_delay = self.base_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        (exponential_delay as u64).min(self.max_delay_ms)
    }
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            network: "mainnet".to_string(),
            rpc_url: None,
            default_poll_interval: 60,
            request_timeout: 30,
            quote_output: None,
            retry: RetryConfig::default(),
            auctions: vec![],
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

fn e18(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

/// Example auction: a two-token basket moving one component, 7e18 sets at auction
pub fn example_auction(auction_start_time: u64) -> KeeperResult<AuctionConfig> {
    let natural_unit = U256::from(10u64).pow(U256::from(15u64));
    let weth = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    let wbtc = address!("2260fac5e5542a773aa44fbcfedf7c193bc2c599");
    let usdc = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

    Ok(AuctionConfig {
        name: "ETH/BTC to BTC/USDC".to_string(),
        enabled: true,
        rebalancing_token: address!("00000000000000000000000000000000000000a0"),
        manager: address!("00000000000000000000000000000000000000b0"),
        natural_unit: U256::from(10u64),
        unit_shares: U256::from(1u64),
        auction_start_time,
        starting_current_sets: e18(7),
        remaining_current_sets: e18(7),
        total_supply: e18(70),
        bid_quantity: e18(1),
        alert_price: U256::from(750u64),
        schedule: RebalanceSchedule::default(),
        current_basket: Basket::new(
            address!("00000000000000000000000000000000000000c0"),
            vec![weth, wbtc],
            vec![U256::from(1_000u64), U256::from(2_000u64)],
            natural_unit,
        )?,
        next_basket: Basket::new(
            address!("00000000000000000000000000000000000000c1"),
            vec![wbtc, usdc],
            vec![U256::from(3_000u64), U256::from(4_000u64)],
            natural_unit,
        )?,
        parameters: AuctionParameters::new(
            address!("0000000000000000000000000000000000000077"),
            100_000,
            U256::from(500u64),
            U256::from(1_000u64),
            U256::from(1_000u64),
        )?,
    })
}

/// Create example configuration file
pub fn create_example_config(path: &str) -> KeeperResult<()> {
    let example_config = KeeperConfig {
        network: "localnet".to_string(),
        rpc_url: None,
        default_poll_interval: 30,
        request_timeout: 10,
        quote_output: Some("quotes.jsonl".to_string()),
        retry: RetryConfig::default(),
        auctions: vec![example_auction(1_700_000_000)?],
    };

    example_config.save(path)?;
    Ok(())
}
