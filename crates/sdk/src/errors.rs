//! SDK error types

use alloy_primitives::Address;
use setkit_core::SetCoreError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Auction engine rejected the operation
    #[error(transparent)]
    Core(#[from] SetCoreError),

    /// Chain reader failure
    #[error("Reader error: {0}")]
    Reader(String),

    /// Reader did not answer within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Rebalancing token not known to the reader
    #[error("Rebalancing token not found: {0}")]
    TokenNotFound(Address),

    /// Precondition check failed before building a transaction
    #[error("{0}")]
    Assertion(String),

    /// Serialization error
    #[error("Failed to serialize data: {0}")]
    SerializationError(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Reader(err.to_string())
    }
}

impl SdkError {
    /// Create an assertion failure with a user-facing message
    pub fn assertion(message: impl Into<String>) -> Self {
        SdkError::Assertion(message.into())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
