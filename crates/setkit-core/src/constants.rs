//! # Protocol Constants
//!
//! Fixed values of the rebalancing auction:
//! - Price curve fixed-point denominator
//! - Rebalance lifecycle timing defaults
//! - Basket size limits

// ============================================================================
// Price Curve Constants
// ============================================================================

/// Default auction price denominator (prices are quoted in thousandths)
pub const DEFAULT_PRICE_DENOMINATOR: u64 = 1_000;

/// Largest price denominator accepted by auction parameters
pub const MAX_PRICE_DENOMINATOR: u64 = 1_000_000_000_000_000_000;

// ============================================================================
// Lifecycle Constants (in seconds)
// ============================================================================

/// Default delay between a proposal and the start of its auction (1 day)
pub const DEFAULT_PROPOSAL_PERIOD: u64 = 86_400;

/// Default minimum spacing between two rebalances (30 days)
pub const DEFAULT_REBALANCE_INTERVAL: u64 = 2_592_000;

/// Default grace window after the pivot before an auction may be failed (1 day)
pub const DEFAULT_FAIL_GRACE_PERIOD: u64 = 86_400;

/// Minimum time to pivot accepted by auction parameters
pub const MIN_TIME_TO_PIVOT: u64 = 1;

/// Maximum time to pivot accepted by auction parameters (30 days)
pub const MAX_TIME_TO_PIVOT: u64 = 2_592_000;

// ============================================================================
// Basket Constants
// ============================================================================

/// Maximum number of components in a single basket
pub const MAX_BASKET_COMPONENTS: usize = 64;

/// Maximum number of components in a combined token array
pub const MAX_COMBINED_COMPONENTS: usize = MAX_BASKET_COMPONENTS * 2;
