//! # Mathematical Functions
//!
//! Checked 256-bit integer helpers used by the auction engine.

pub mod big_int;
pub mod safe_math;

// Re-export commonly used functions
pub use big_int::*;
pub use safe_math::*;
