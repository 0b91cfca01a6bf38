//! # Core Type Definitions
//!
//! Baskets, auction parameters and the values produced by the auction engine.

pub mod auction;
pub mod basket;

// Re-export all types
pub use auction::*;
pub use basket::*;
