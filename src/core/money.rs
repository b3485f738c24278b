//! Fixed-precision money amounts.
//!
//! Amounts are tracked as integer cents so that "paid in full" is an exact integer
//! comparison. Decimal values arriving over the wire are rounded to the nearest cent
//! once, at the boundary, and rendered back as decimals on the way out.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Largest absolute decimal amount accepted from callers.
const MAX_DECIMAL_AMOUNT: f64 = 1_000_000_000_000.0;

/// An amount of money in integer minor units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    /// Zero cents
    pub const ZERO: Self = Self(0);

    /// Wraps a raw cent count.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw cent count.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// True for amounts strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts a decimal amount to cents, rounding to the nearest cent.
    ///
    /// # Errors
    /// Returns `Error::InvalidAmount` for negative, NaN, infinite, or out-of-range values.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_decimal(amount: f64) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 || amount > MAX_DECIMAL_AMOUNT {
            return Err(Error::InvalidAmount { amount });
        }
        // Bounded above, so the cast cannot overflow.
        Ok(Self((amount * 100.0).round() as i64))
    }

    /// Returns the amount as a decimal number of currency units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

/// A decimal amount as sent by a client: either a JSON number or a numeric string
/// (HTML form inputs usually post strings).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// `56.15`
    Number(f64),
    /// `"56.15"` or `"$56.15"`
    Text(String),
}

impl AmountInput {
    /// True when the client sent an empty string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Parses the input into cents, reporting failures against `field`.
    ///
    /// # Errors
    /// Returns `Error::InvalidField` for non-numeric text and `Error::InvalidAmount`
    /// for values [`Cents::from_decimal`] rejects.
    pub fn to_cents(&self, field: &'static str) -> Result<Cents> {
        let amount = match self {
            Self::Number(amount) => *amount,
            Self::Text(text) => {
                let trimmed = text.trim();
                trimmed
                    .strip_prefix('$')
                    .unwrap_or(trimmed)
                    .parse::<f64>()
                    .map_err(|_| Error::InvalidField {
                        field,
                        reason: format!("'{text}' is not a decimal amount"),
                    })?
            }
        };
        Cents::from_decimal(amount)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_from_decimal_rounds_to_nearest_cent() {
        // 56.15 * 100.0 is 5614.999... in binary floating point
        assert_eq!(Cents::from_decimal(56.15).unwrap(), Cents::new(5615));
        assert_eq!(Cents::from_decimal(15.57).unwrap(), Cents::new(1557));
        assert_eq!(Cents::from_decimal(0.0).unwrap(), Cents::ZERO);
    }

    #[test]
    fn test_from_decimal_rejects_invalid_amounts() {
        for amount in [-0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e13] {
            assert!(matches!(
                Cents::from_decimal(amount),
                Err(Error::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn test_floating_sum_matches_after_conversion() {
        let due = Cents::from_decimal(0.1 + 0.2).unwrap();
        let paid = Cents::from_decimal(0.3).unwrap();
        assert_eq!(due, paid);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(Cents::new(5615).to_string(), "56.15");
        assert_eq!(Cents::new(7).to_string(), "0.07");
        assert_eq!(Cents::new(-250).to_string(), "-2.50");
        assert_eq!(serde_json::to_string(&Cents::new(5615)).unwrap(), "56.15");
        assert_eq!(Cents::new(5615).to_decimal(), 56.15);
    }

    #[test]
    fn test_amount_input_accepts_numbers_and_strings() {
        let number: AmountInput = serde_json::from_str("56.15").unwrap();
        let integer: AmountInput = serde_json::from_str("56").unwrap();
        let text: AmountInput = serde_json::from_str("\"$56.15\"").unwrap();

        assert_eq!(number.to_cents("amountDue").unwrap(), Cents::new(5615));
        assert_eq!(integer.to_cents("amountDue").unwrap(), Cents::new(5600));
        assert_eq!(text.to_cents("amountDue").unwrap(), Cents::new(5615));
    }

    #[test]
    fn test_amount_input_rejects_garbage_text() {
        let input = AmountInput::Text("lots".to_string());
        let err = input.to_cents("amountPaid").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidField {
                field: "amountPaid",
                ..
            }
        ));
        assert!(AmountInput::Text("  ".to_string()).is_blank());
        assert!(!AmountInput::Number(0.0).is_blank());
    }
}
