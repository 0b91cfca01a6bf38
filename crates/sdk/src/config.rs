use std::time::Duration;

use crate::{SdkError, SdkResult};

/// SDK configuration for reading rebalancing tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Chain the rebalancing tokens live on
    pub chain_id: u64,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl SdkConfig {
    pub fn localnet() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31_337,
            timeout: 30,
        }
    }

    pub fn mainnet() -> Self {
        Self {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            chain_id: 1,
            timeout: 30,
        }
    }

    pub fn with_rpc_url(mut self, url: String) -> Self {
        self.rpc_url = url;
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Timeout applied to every reader call
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.rpc_url.is_empty() {
            return Err(SdkError::InvalidParameters("rpc_url cannot be empty".to_string()));
        }
        if self.timeout == 0 {
            return Err(SdkError::InvalidParameters("timeout must be greater than 0".to_string()));
        }
        Ok(())
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::localnet()
    }
}
