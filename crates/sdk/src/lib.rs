//! SetKit SDK
//!
//! Client-side prediction and validation for rebalancing token auctions.
//! Provides high-level abstractions for:
//! - Reading rebalancing token state
//! - Quoting auction prices and bid flows
//! - Checking bids before submission
//! - Simulating the full rebalance lifecycle in tests

pub mod api;
pub mod assertions;
pub mod config;
pub mod errors;
pub mod reader;
pub mod testing;

pub use api::*;
pub use config::*;
pub use errors::*;
pub use reader::*;

// Re-export the auction engine
pub use setkit_core;
