//! Money type for representing monetary values.
//!
//! Amounts are exact decimals so that line totals never drift. Rounding
//! happens once, when an amount is formatted for display.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CartError;

/// Number of fractional digits in a formatted amount.
pub const DISPLAY_PLACES: u32 = 2;

/// Rounding applied when formatting: ties go away from zero (`2.005` -> `2.01`).
pub const DISPLAY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// A monetary amount in the store's single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create a Money value from a decimal amount.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from an integer number of cents.
    ///
    /// ```
    /// use turbo_cart::money::Money;
    /// assert_eq!(Money::from_cents(1250).display_amount(), "12.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse an amount such as `"5.25"`.
    pub fn parse(s: &str) -> Result<Self, CartError> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| CartError::Serialization(format!("invalid amount {:?}: {}", s, e)))
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn try_multiply(&self, quantity: u64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    /// Add another amount, returning `None` on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sum amounts, returning `None` on overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        iter.try_fold(Money::ZERO, |acc, m| acc.try_add(m))
    }

    /// Round to the display precision using [`DISPLAY_ROUNDING`].
    ///
    /// Returns `None` when the amount has too many integer digits to carry
    /// [`DISPLAY_PLACES`] fractional digits.
    pub fn try_rounded(&self) -> Option<Money> {
        let mut rounded = self.0.round_dp_with_strategy(DISPLAY_PLACES, DISPLAY_ROUNDING);
        // Pad to a fixed scale so "12.5" prints as "12.50". rescale stops
        // short of the target scale when the mantissa would overflow.
        rounded.rescale(DISPLAY_PLACES);
        (rounded.scale() == DISPLAY_PLACES).then_some(Money(rounded))
    }

    /// Format with exactly two fractional digits (e.g., "12.50").
    pub fn try_display_amount(&self) -> Result<String, CartError> {
        self.try_rounded()
            .map(|rounded| rounded.0.to_string())
            .ok_or(CartError::Overflow)
    }

    /// Like [`try_display_amount`](Self::try_display_amount), falling back to
    /// the rounded amount at whatever scale fits.
    pub fn display_amount(&self) -> String {
        self.try_display_amount().unwrap_or_else(|_| {
            self.0
                .round_dp_with_strategy(DISPLAY_PLACES, DISPLAY_ROUNDING)
                .to_string()
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_amount())
    }
}
