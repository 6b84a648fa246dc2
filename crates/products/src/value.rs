//! Validated value objects for product fields.
//!
//! Every constructor here is the single place its invariant is checked. Product
//! creation, setters and partial updates all go through these constructors.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use parlor_core::{DomainError, DomainResult};

/// Product name: trimmed, non-empty, bounded by the store's column width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    pub const MAX_CHARS: usize = 100;

    pub fn new(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(DomainError::validation(format!(
                "name cannot exceed {} characters",
                Self::MAX_CHARS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unit price: non-negative, two fractional digits.
///
/// Input is rounded half away from zero and rescaled, so `3` and `3.004` both
/// become `3.00`. The upper bound matches a `DECIMAL(10,2)` column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    pub const SCALE: u32 = 2;

    pub fn max() -> Decimal {
        // 99_999_999.99
        Decimal::new(9_999_999_999, Self::SCALE)
    }

    pub fn new(raw: Decimal) -> DomainResult<Self> {
        if raw.is_sign_negative() && !raw.is_zero() {
            return Err(DomainError::validation("price cannot be negative"));
        }
        let mut value = raw.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        if value > Self::max() {
            return Err(DomainError::validation(format!("price cannot exceed {}", Self::max())));
        }
        value.rescale(Self::SCALE);
        // -0.00 would otherwise render with a sign.
        value.set_sign_positive(true);
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::new(0, Self::SCALE))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("price is not a number: {e}")))?;
        Self::new(raw)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Units in stock, at most [`Quantity::MAX`].
///
/// The bound keeps per-line stock value (`Price::max() * MAX`) and inventory
/// totals well inside `i64` and `Decimal` range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub const MAX: i64 = 1_000_000_000;

    pub fn new(raw: i64) -> DomainResult<Self> {
        if raw < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if raw > Self::MAX {
            return Err(DomainError::validation(format!("quantity cannot exceed {}", Self::MAX)));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = i64::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("quantity is not an integer: {e}")))?;
        Self::new(raw)
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_is_trimmed() {
        let name = ProductName::new("  Vanilla  ").unwrap();
        assert_eq!(name.as_str(), "Vanilla");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = ProductName::new(" \t ").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn overlong_name_is_rejected() {
        let raw = "x".repeat(ProductName::MAX_CHARS + 1);
        assert!(ProductName::new(&raw).is_err());
        assert!(ProductName::new(&"x".repeat(ProductName::MAX_CHARS)).is_ok());
    }

    #[test]
    fn price_rounds_half_away_from_zero() {
        let price = Price::new(Decimal::new(2345, 3)).unwrap(); // 2.345
        assert_eq!(price.amount(), Decimal::new(235, 2));
        assert_eq!(price.to_string(), "2.35");
    }

    #[test]
    fn whole_prices_render_with_two_digits() {
        let price: Price = "3".parse().unwrap();
        assert_eq!(price.to_string(), "3.00");
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(Price::new(Decimal::new(-1, 0)).unwrap_err().is_validation());
        assert!("-0.01".parse::<Price>().is_err());
    }

    #[test]
    fn price_above_column_range_is_rejected() {
        assert!(Price::new(Decimal::new(100_000_000, 0)).is_err());
        assert!(Price::new(Price::max()).is_ok());
    }

    #[test]
    fn price_parse_error_is_a_validation_error() {
        assert!("three".parse::<Price>().unwrap_err().is_validation());
    }

    #[test]
    fn negative_zero_normalizes_to_zero() {
        let price = Price::new(-Decimal::new(0, 2)).unwrap();
        assert_eq!(price, Price::zero());
        assert_eq!(price.to_string(), "0.00");
    }

    #[test]
    fn quantity_must_be_non_negative() {
        assert_eq!(Quantity::new(0).unwrap().get(), 0);
        assert!(Quantity::new(-1).unwrap_err().is_validation());
        assert!("abc".parse::<Quantity>().unwrap_err().is_validation());
    }

    #[test]
    fn quantity_is_bounded() {
        assert_eq!(Quantity::new(Quantity::MAX).unwrap().get(), Quantity::MAX);
        assert!(Quantity::new(Quantity::MAX + 1).unwrap_err().is_validation());
        assert!(Quantity::new(i64::MAX).is_err());
    }

    #[test]
    fn price_serializes_as_json_number() {
        let price: Price = "3.50".parse().unwrap();
        assert_eq!(serde_json::to_value(price).unwrap(), serde_json::json!(3.5));
    }

    proptest! {
        #[test]
        fn accepted_prices_have_scale_two(cents in 0i64..9_999_999_999, extra in 0u32..3) {
            let raw = Decimal::new(cents * 10i64.pow(extra), 2 + extra);
            let price = Price::new(raw).unwrap();
            prop_assert_eq!(price.amount().scale(), 2);
            prop_assert!(price.amount() >= Decimal::ZERO);
        }

        #[test]
        fn negative_prices_never_validate(cents in 1i64..1_000_000) {
            prop_assert!(Price::new(Decimal::new(-cents, 2)).is_err());
        }

        #[test]
        fn quantities_validate_iff_in_range(q in any::<i64>()) {
            prop_assert_eq!(Quantity::new(q).is_ok(), (0..=Quantity::MAX).contains(&q));
        }
    }
}
