//! # SetKit Core - Rebalancing Auction Logic
//!
//! This crate contains the pure auction logic behind rebalancing tokens:
//! a token backed by one basket of components moves into another basket
//! by selling its current sets through a linear price auction. It provides:
//!
//! - Basket and auction types
//! - The linear price curve and minimum bid granularity
//! - Per-bid token flows over the combined token array
//! - The Default → Proposal → Rebalance → Drawdown lifecycle
//!
//! Nothing here performs I/O. Every operation takes the state it needs and
//! returns the next state or a typed error.
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde serialization for off-chain use

// Re-export all modules
pub mod auction;
pub mod constants;
pub mod errors;
pub mod math;
pub mod types;

// Re-export commonly used items
pub use auction::{AuctionCycle, AuctionProgress, Proposal};
pub use constants::*;
pub use errors::{BidRejection, CoreResult, SetCoreError};
pub use types::*;
