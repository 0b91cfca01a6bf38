//! Error types for the keeper service

use setkit_core::SetCoreError;
use setkit_sdk::SdkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeeperError {
    #[error("Auction engine error: {0}")]
    Core(#[from] SetCoreError),

    #[error("SDK error: {0}")]
    Sdk(#[from] SdkError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for KeeperError {
    fn from(err: std::io::Error) -> Self {
        KeeperError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KeeperError {
    fn from(err: serde_json::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for KeeperError {
    fn from(err: toml::de::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}

impl From<toml::ser::Error> for KeeperError {
    fn from(err: toml::ser::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}

impl KeeperError {
    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            KeeperError::Sdk(SdkError::Timeout(_)) | KeeperError::Sdk(SdkError::Reader(_))
        )
    }
}

pub type KeeperResult<T> = Result<T, KeeperError>;
