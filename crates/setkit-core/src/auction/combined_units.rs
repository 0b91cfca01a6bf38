//! # Combined Token Array
//!
//! Merges the current and next baskets into one component list that serves
//! as the index basis for every bid flow of an auction cycle.

use alloy_primitives::U256;

use crate::errors::CoreResult;
use crate::math::big_int::{lcm, mul_div, Rounding};
use crate::types::{Basket, CombinedTokenArray};

/// Common natural unit of two baskets
pub fn combined_natural_unit(current: &Basket, next: &Basket) -> CoreResult<U256> {
    lcm(current.natural_unit, next.natural_unit)
}

/// Build the combined token array of a rebalance from `current` to `next`.
///
/// Current components come first in basket order, followed by the next
/// basket's components that the current basket does not hold. Units are
/// rescaled from each basket's own natural unit to the combined one.
pub fn build(current: &Basket, next: &Basket) -> CoreResult<CombinedTokenArray> {
    current.validate()?;
    next.validate()?;

    let natural_unit = combined_natural_unit(current, next)?;

    let mut components = current.components.clone();
    components.extend(
        next.components
            .iter()
            .filter(|component| current.position(component).is_none())
            .copied(),
    );

    let scale = |basket: &Basket| -> CoreResult<Vec<U256>> {
        components
            .iter()
            .map(|component| {
                let units = basket.units_of(component);
                // natural_unit is a multiple of basket.natural_unit, so this is exact
                mul_div(units, natural_unit, basket.natural_unit, Rounding::Down)
            })
            .collect()
    };

    let current_units = scale(current)?;
    let next_units = scale(next)?;

    Ok(CombinedTokenArray {
        components,
        current_units,
        next_units,
        natural_unit,
    })
}
