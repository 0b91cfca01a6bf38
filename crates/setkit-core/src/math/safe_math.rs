//! # Safe Math Operations
//!
//! Overflow-checked arithmetic on auction amounts.

use alloy_primitives::U256;

use crate::errors::{CoreResult, SetCoreError};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident, $error:expr) => {
        /// Checked binary operation
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            a.$checked_method(b).ok_or($error)
        }
    };

    // Division operations with zero check
    (div, $fn_name:ident, $type:ty) => {
        /// Safe division with zero check
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            a.checked_div(b).ok_or(SetCoreError::DivisionByZero)
        }
    };
}

safe_arith!(add_u256, U256, checked_add, SetCoreError::MathOverflow);
safe_arith!(sub_u256, U256, checked_sub, SetCoreError::MathUnderflow);
safe_arith!(mul_u256, U256, checked_mul, SetCoreError::MathOverflow);
safe_arith!(div, div_u256, U256);

safe_arith!(add_u64, u64, checked_add, SetCoreError::MathOverflow);
safe_arith!(sub_u64, u64, checked_sub, SetCoreError::MathUnderflow);

/// Sum a slice of amounts
pub fn sum_u256(values: &[U256]) -> CoreResult<U256> {
    values.iter().try_fold(U256::ZERO, |acc, v| add_u256(acc, *v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_arithmetic() {
        assert_eq!(add_u256(U256::from(100u64), U256::from(200u64)).unwrap(), U256::from(300u64));
        assert!(add_u256(U256::MAX, U256::from(1u64)).is_err());

        assert_eq!(sub_u256(U256::from(300u64), U256::from(200u64)).unwrap(), U256::from(100u64));
        assert_eq!(
            sub_u256(U256::from(1u64), U256::from(2u64)),
            Err(SetCoreError::MathUnderflow)
        );

        assert!(mul_u256(U256::MAX, U256::from(2u64)).is_err());
        assert_eq!(div_u256(U256::from(1u64), U256::ZERO), Err(SetCoreError::DivisionByZero));

        assert_eq!(add_u64(1, 2).unwrap(), 3);
        assert!(add_u64(u64::MAX, 1).is_err());
        assert!(sub_u64(0, 1).is_err());
    }

    #[test]
    fn test_sum() {
        let values = [U256::from(1u64), U256::from(2u64), U256::from(3u64)];
        assert_eq!(sum_u256(&values).unwrap(), U256::from(6u64));
        assert!(sum_u256(&[U256::MAX, U256::from(1u64)]).is_err());
    }
}
