//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative US dollar amounts. They are persisted as plain
//! JSON numbers (`999`, `12.5`) because that is the shape stored product and
//! cart records already have; deserialization re-checks the sign so a
//! hand-edited record cannot smuggle in a negative price.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount is NaN, infinite, or outside the decimal range.
    #[error("price must be a finite number")]
    NotFinite,
}

/// A non-negative amount in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from whole dollars.
    #[must_use]
    pub fn from_dollars(dollars: u32) -> Self {
        Self(Decimal::from(dollars))
    }

    /// Create a price from an untrusted floating point amount (form input).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotFinite` for NaN or infinite input and
    /// `PriceError::Negative` for amounts below zero.
    pub fn from_f64(amount: f64) -> Result<Self, PriceError> {
        let amount = Decimal::try_from(amount).map_err(|_| PriceError::NotFinite)?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Unit price multiplied by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Whether this amount is strictly above `other`.
    #[must_use]
    pub fn exceeds(&self, other: Self) -> bool {
        self.0 > other.0
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Price::from_f64(12.5).unwrap().display(), "$12.50");
        assert_eq!(Price::from_f64(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(Price::from_f64(f64::INFINITY), Err(PriceError::NotFinite));
        assert!(matches!(Price::from_f64(-3.0), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::from_f64(19.99).unwrap();
        let line = unit.times(3);
        assert_eq!(line.amount(), Decimal::new(5997, 2));

        let total: Price = [line, Price::from_dollars(15)].into_iter().sum();
        assert_eq!(total.display(), "$74.97");
    }

    #[test]
    fn test_exceeds_is_strict() {
        let hundred = Price::from_dollars(100);
        assert!(!hundred.exceeds(Price::from_dollars(100)));
        assert!(Price::from_f64(100.01).unwrap().exceeds(hundred));
    }

    #[test]
    fn test_json_number_shape() {
        let parsed: Price = serde_json::from_str("999").unwrap();
        assert_eq!(parsed, Price::from_dollars(999));

        let parsed: Price = serde_json::from_str("0.5").unwrap();
        assert_eq!(parsed.display(), "$0.50");

        let json = serde_json::to_value(Price::from_dollars(50)).unwrap();
        assert!(json.is_number());

        assert!(serde_json::from_str::<Price>("-4").is_err());
    }
}
