//! # Rebalancing Auction Engine
//!
//! Price curve, combined token array, minimum bid, bid flows and the
//! lifecycle state machine that ties them together.

pub mod bid_flow;
pub mod combined_units;
pub mod minimum_bid;
pub mod price_curve;
pub mod settlement;
pub mod state_machine;

pub use bid_flow::{compute_flow, resolve_fill};
pub use combined_units::combined_natural_unit;
pub use minimum_bid::{check_bid_granularity, is_multiple_of_minimum_bid, minimum_bid};
pub use price_curve::price_at;
pub use settlement::{drawdown_withdrawal, next_set_issue_quantity, unit_shares_for};
pub use state_machine::{AuctionCycle, AuctionProgress, Proposal};
