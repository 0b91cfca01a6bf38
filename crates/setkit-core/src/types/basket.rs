//! # Basket Types
//!
//! A basket ("Set") is an ordered bundle of component tokens with fixed
//! units per natural unit of the basket.

use std::collections::HashSet;

use alloy_primitives::{Address, U256};

use crate::constants::MAX_BASKET_COMPONENTS;
use crate::errors::{CoreResult, SetCoreError};

/// A fixed bundle of component tokens
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Basket {
    /// Address of the basket token
    pub address: Address,
    /// Component token addresses, in basket order
    pub components: Vec<Address>,
    /// Units of each component per `natural_unit` of the basket
    pub units: Vec<U256>,
    /// Smallest quantity in which the basket can be issued or redeemed
    pub natural_unit: U256,
}

impl Basket {
    /// Create a basket, validating its component data
    pub fn new(
        address: Address,
        components: Vec<Address>,
        units: Vec<U256>,
        natural_unit: U256,
    ) -> CoreResult<Self> {
        let basket = Self {
            address,
            components,
            units,
            natural_unit,
        };
        basket.validate()?;
        Ok(basket)
    }

    /// Check the basket invariants
    pub fn validate(&self) -> CoreResult<()> {
        if self.natural_unit.is_zero() {
            return Err(SetCoreError::malformed_basket("natural unit must be positive"));
        }
        if self.components.is_empty() {
            return Err(SetCoreError::malformed_basket("basket has no components"));
        }
        if self.components.len() != self.units.len() {
            return Err(SetCoreError::malformed_basket(
                "component and unit arrays differ in length",
            ));
        }
        if self.components.len() > MAX_BASKET_COMPONENTS {
            return Err(SetCoreError::malformed_basket("too many components"));
        }
        if self.units.iter().any(|unit| unit.is_zero()) {
            return Err(SetCoreError::malformed_basket("component units must be positive"));
        }

        let mut seen = HashSet::with_capacity(self.components.len());
        for component in &self.components {
            if component.is_zero() {
                return Err(SetCoreError::malformed_basket("component address is zero"));
            }
            if !seen.insert(component) {
                return Err(SetCoreError::malformed_basket("duplicate component"));
            }
        }

        Ok(())
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the basket has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Index of `component` in this basket
    pub fn position(&self, component: &Address) -> Option<usize> {
        self.components.iter().position(|c| c == component)
    }

    /// Units of `component`, zero when the basket does not hold it
    pub fn units_of(&self, component: &Address) -> U256 {
        self.position(component)
            .map(|i| self.units[i])
            .unwrap_or(U256::ZERO)
    }

    /// Iterate `(component, units)` pairs in basket order
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.components.iter().zip(self.units.iter())
    }
}

/// Merged view of a current and a next basket, indexed by combined position.
///
/// Units on both sides are expressed per `natural_unit` sets, the common
/// scale of the two baskets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct CombinedTokenArray {
    /// Union of current and next components
    pub components: Vec<Address>,
    /// Current basket units per combined natural unit (zero if absent)
    pub current_units: Vec<U256>,
    /// Next basket units per combined natural unit (zero if absent)
    pub next_units: Vec<U256>,
    /// Common natural unit both unit arrays are scaled to
    pub natural_unit: U256,
}

impl CombinedTokenArray {
    /// Number of combined components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Index of `component` in the combined order
    pub fn position(&self, component: &Address) -> Option<usize> {
        self.components.iter().position(|c| c == component)
    }
}
