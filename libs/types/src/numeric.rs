//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Price comparisons and quantity arithmetic are exact, so a level keyed by
//! `100` and an order priced `100.00` land on the same book entry.

use crate::errors::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Limit or execution price. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Validate and wrap a decimal price
    pub fn try_new(value: Decimal) -> Result<Self, OrderError> {
        if value <= Decimal::ZERO {
            return Err(OrderError::InvalidPrice(format!(
                "price must be positive, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Whole-unit price
    ///
    /// # Panics
    /// Panics if `value` is zero
    pub fn from_u64(value: u64) -> Self {
        assert!(value > 0, "Price must be positive");
        Self(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = OrderError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str_exact(s)
            .map_err(|e| OrderError::InvalidPrice(format!("{}: {}", s, e)))?;
        Self::try_new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order or trade quantity. Never negative.
///
/// Subtraction below zero is an invariant violation and panics; use
/// [`Quantity::checked_sub`] where the caller can recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Validate and wrap a decimal quantity (zero allowed)
    pub fn try_new(value: Decimal) -> Result<Self, OrderError> {
        if value < Decimal::ZERO {
            return Err(OrderError::InvalidQuantity(format!(
                "quantity must not be negative, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Subtract, returning None instead of going negative
    pub fn checked_sub(self, rhs: Quantity) -> Option<Quantity> {
        if rhs.0 > self.0 {
            None
        } else {
            Some(Self(self.0 - rhs.0))
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        self.checked_sub(rhs)
            .unwrap_or_else(|| panic!("Quantity underflow: {} - {}", self, rhs))
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = OrderError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl FromStr for Quantity {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str_exact(s)
            .map_err(|e| OrderError::InvalidQuantity(format!("{}: {}", s, e)))?;
        Self::try_new(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rejects_non_positive() {
        assert!(Price::try_new(Decimal::ZERO).is_err());
        assert!(Price::try_new(Decimal::from(-1)).is_err());
        assert!("0".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn test_price_scale_insensitive_ordering() {
        let a = Price::from_str("100").unwrap();
        let b = Price::from_str("100.00").unwrap();
        assert_eq!(a, b);
        assert!(Price::from_str("99.99").unwrap() < a);
    }

    #[test]
    fn test_quantity_arithmetic() {
        let a = Quantity::from_str("1.5").unwrap();
        let b = Quantity::from_str("0.5").unwrap();
        assert_eq!(a - b, Quantity::from_u64(1));
        assert_eq!(a + b, Quantity::from_u64(2));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(a.min(b), b);
    }

    #[test]
    #[should_panic(expected = "Quantity underflow")]
    fn test_quantity_underflow_panics() {
        let _ = Quantity::from_u64(1) - Quantity::from_u64(2);
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert!(Quantity::try_new(Decimal::from(-1)).is_err());
        assert!(Quantity::try_new(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn test_price_deserialize_validates() {
        let ok: Price = serde_json::from_str("\"43251.00\"").unwrap();
        assert_eq!(ok, Price::from_u64(43251));
        assert!(serde_json::from_str::<Price>("\"-1\"").is_err());
    }
}
